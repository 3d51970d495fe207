//! Focal length extraction per camera model.

use crate::colmap::{Camera, CameraModelId, ColmapError};

/// How the viewer's `fx`/`fy` are read out of a camera's parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrinsicsKind {
    /// `[fx, fy, cx, cy]`
    Pinhole,
    /// `[f, cx, cy]`
    SimplePinhole,
    /// `[f, cx, cy, k1, k2]`
    Radial,
    /// `[f, cx, cy, k]`
    SimpleRadial,
    /// Any other model; focal slots come from the model table.
    Other(CameraModelId),
}

impl From<CameraModelId> for IntrinsicsKind {
    fn from(model: CameraModelId) -> Self {
        match model {
            CameraModelId::Pinhole => Self::Pinhole,
            CameraModelId::SimplePinhole => Self::SimplePinhole,
            CameraModelId::Radial => Self::Radial,
            CameraModelId::SimpleRadial => Self::SimpleRadial,
            other => Self::Other(other),
        }
    }
}

impl IntrinsicsKind {
    /// Returns `(fx, fy)` without ever indexing past `params`.
    ///
    /// `None` only when `params` is empty.
    pub fn focal_lengths(&self, params: &[f64]) -> Option<(f64, f64)> {
        let first = *params.first()?;
        let focal = match self {
            Self::Pinhole => (first, params.get(1).copied().unwrap_or(first)),
            Self::SimplePinhole | Self::Radial | Self::SimpleRadial => (first, first),
            Self::Other(model) => {
                let (x, y) = model.focal_length_idxs();
                match (params.get(x), params.get(y)) {
                    (Some(&fx), Some(&fy)) => (fx, fy),
                    _ => (first, params.get(1).copied().unwrap_or(first)),
                }
            }
        };
        Some(focal)
    }
}

/// `(fx, fy)` of a reconstruction camera.
pub fn focal_lengths(camera: &Camera) -> Result<(f64, f64), ColmapError> {
    IntrinsicsKind::from(camera.model)
        .focal_lengths(&camera.params)
        .ok_or(ColmapError::EmptyParams(camera.camera_id))
}
