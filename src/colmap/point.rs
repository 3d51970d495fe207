#[derive(Debug, Clone)]
pub struct Point3D {
    pub point3d_id: u64,
    pub xyz: [f64; 3],
    pub rgb: [u8; 3],
    pub error: f64,
    /// (image_id, point2d_idx)
    pub track: Vec<(u32, u32)>,
}
