/// COLMAP camera model, as stored in the `model_id` field of `cameras.bin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraModelId {
    SimplePinhole = 0,
    Pinhole = 1,
    SimpleRadial = 2,
    Radial = 3,
    OpenCV = 4,
    OpenCVFisheye = 5,
    FullOpenCV = 6,
    Fov = 7,
    SimpleRadialFisheye = 8,
    RadialFisheye = 9,
    ThinPrismFisheye = 10,
    RadTanThinPrismFisheye = 11,
    SimpleDivision = 12,
    Division = 13,
    SimpleFisheye = 14,
    Fisheye = 15,
}

impl CameraModelId {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::SimplePinhole),
            1 => Some(Self::Pinhole),
            2 => Some(Self::SimpleRadial),
            3 => Some(Self::Radial),
            4 => Some(Self::OpenCV),
            5 => Some(Self::OpenCVFisheye),
            6 => Some(Self::FullOpenCV),
            7 => Some(Self::Fov),
            8 => Some(Self::SimpleRadialFisheye),
            9 => Some(Self::RadialFisheye),
            10 => Some(Self::ThinPrismFisheye),
            11 => Some(Self::RadTanThinPrismFisheye),
            12 => Some(Self::SimpleDivision),
            13 => Some(Self::Division),
            14 => Some(Self::SimpleFisheye),
            15 => Some(Self::Fisheye),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SimplePinhole => "SIMPLE_PINHOLE",
            Self::Pinhole => "PINHOLE",
            Self::SimpleRadial => "SIMPLE_RADIAL",
            Self::Radial => "RADIAL",
            Self::OpenCV => "OPENCV",
            Self::OpenCVFisheye => "OPENCV_FISHEYE",
            Self::FullOpenCV => "FULL_OPENCV",
            Self::Fov => "FOV",
            Self::SimpleRadialFisheye => "SIMPLE_RADIAL_FISHEYE",
            Self::RadialFisheye => "RADIAL_FISHEYE",
            Self::ThinPrismFisheye => "THIN_PRISM_FISHEYE",
            Self::RadTanThinPrismFisheye => "RAD_TAN_THIN_PRISM_FISHEYE",
            Self::SimpleDivision => "SIMPLE_DIVISION",
            Self::Division => "DIVISION",
            Self::SimpleFisheye => "SIMPLE_FISHEYE",
            Self::Fisheye => "FISHEYE",
        }
    }

    /// Number of `f64` parameters stored after the image size.
    pub fn num_params(&self) -> usize {
        match self {
            Self::SimplePinhole => 3,
            Self::Pinhole => 4,
            Self::SimpleRadial => 4,
            Self::Radial => 5,
            Self::OpenCV => 8,
            Self::OpenCVFisheye => 8,
            Self::FullOpenCV => 12,
            Self::Fov => 5,
            Self::SimpleRadialFisheye => 4,
            Self::RadialFisheye => 5,
            Self::ThinPrismFisheye => 12,
            Self::RadTanThinPrismFisheye => 16,
            Self::SimpleDivision => 4,
            Self::Division => 5,
            Self::SimpleFisheye => 3,
            Self::Fisheye => 4,
        }
    }

    /// Parameter slots of the x and y focal lengths.
    ///
    /// Single-focal models report the same slot twice.
    pub fn focal_length_idxs(&self) -> (usize, usize) {
        match self {
            Self::SimplePinhole
            | Self::SimpleRadial
            | Self::Radial
            | Self::SimpleRadialFisheye
            | Self::RadialFisheye
            | Self::SimpleDivision
            | Self::SimpleFisheye => (0, 0),
            Self::Pinhole
            | Self::OpenCV
            | Self::OpenCVFisheye
            | Self::FullOpenCV
            | Self::Fov
            | Self::ThinPrismFisheye
            | Self::RadTanThinPrismFisheye
            | Self::Division
            | Self::Fisheye => (0, 1),
        }
    }
}

impl std::fmt::Display for CameraModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Camera intrinsics entry of a reconstruction.
#[derive(Debug, Clone)]
pub struct Camera {
    pub camera_id: u32,
    pub model: CameraModelId,
    pub width: u64,
    pub height: u64,
    pub params: Vec<f64>,
}
