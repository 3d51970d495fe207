use nalgebra::{Rotation3, UnitQuaternion, Vector3};

/// Registered image of a reconstruction with its world-to-camera pose.
#[derive(Debug, Clone)]
pub struct Image {
    pub image_id: u32,
    pub camera_id: u32,
    pub name: String,
    /// world -> camera rotation, stored as read (qw, qx, qy, qz)
    pub rotation: UnitQuaternion<f64>,
    /// world -> camera translation
    pub translation: Vector3<f64>,
    /// (x, y, point3d_id), id is -1 when untriangulated
    pub points2d: Vec<(f64, f64, i64)>,
}

impl Image {
    /// World -> camera rotation matrix.
    ///
    /// The quaternion is not re-normalised, so drift in the stored values
    /// carries into the matrix.
    pub fn rotation_matrix(&self) -> Rotation3<f64> {
        self.rotation.to_rotation_matrix()
    }

    /// Camera centre in world coordinates, `-R^T t`.
    pub fn projection_center(&self) -> Vector3<f64> {
        -(self.rotation_matrix().matrix().transpose() * self.translation)
    }
}
