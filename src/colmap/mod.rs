//! COLMAP sparse reconstruction loading
//!
//! Only the binary model format is read, since that is what `da3` exports.
//! Format reference: https://colmap.github.io/format.html
mod binary;
mod camera;
mod image;
mod point;

use std::collections::BTreeMap;
use std::path::Path;

pub use binary::{read_cameras_bin, read_images_bin, read_points3d_bin};
pub use camera::{Camera, CameraModelId};
pub use image::Image;
pub use point::Point3D;

#[cfg(test)]
pub(crate) use binary::fixtures;

#[derive(Debug, thiserror::Error)]
pub enum ColmapError {
    #[error("error reading COLMAP file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("unknown camera model id {0}")]
    UnknownCameraModel(i32),

    #[error("image {image_id} references missing camera {camera_id}")]
    MissingCamera { image_id: u32, camera_id: u32 },

    #[error("camera {0} has no parameters")]
    EmptyParams(u32),

    #[error("parse error: {0}")]
    ParseError(String),
}

/// Cameras, registered images and sparse points keyed by their COLMAP ids.
#[derive(Debug, Default)]
pub struct Reconstruction {
    pub cameras: BTreeMap<u32, Camera>,
    pub images: BTreeMap<u32, Image>,
    pub points3d: BTreeMap<u64, Point3D>,
}

impl Reconstruction {
    const CAMERAS_BIN: &'static str = "cameras.bin";
    const IMAGES_BIN: &'static str = "images.bin";
    const POINTS3D_BIN: &'static str = "points3D.bin";

    /// Load `cameras.bin`, `images.bin` and, when present, `points3D.bin`.
    pub fn read(dir: &Path) -> Result<Self, ColmapError> {
        let cameras = read_cameras_bin(dir.join(Self::CAMERAS_BIN))?
            .into_iter()
            .map(|camera| (camera.camera_id, camera))
            .collect();
        let images = read_images_bin(dir.join(Self::IMAGES_BIN))?
            .into_iter()
            .map(|image| (image.image_id, image))
            .collect();

        let points_path = dir.join(Self::POINTS3D_BIN);
        let points3d = if points_path.is_file() {
            read_points3d_bin(&points_path)?
                .into_iter()
                .map(|point| (point.point3d_id, point))
                .collect()
        } else {
            log::debug!("no {} in {}", Self::POINTS3D_BIN, dir.display());
            BTreeMap::new()
        };

        let reconstruction = Self {
            cameras,
            images,
            points3d,
        };
        log::info!(
            "loaded reconstruction: {} cameras, {} images, {} points",
            reconstruction.cameras.len(),
            reconstruction.images.len(),
            reconstruction.points3d.len()
        );
        Ok(reconstruction)
    }

    pub fn camera_of(&self, image: &Image) -> Result<&Camera, ColmapError> {
        self.cameras
            .get(&image.camera_id)
            .ok_or(ColmapError::MissingCamera {
                image_id: image.image_id,
                camera_id: image.camera_id,
            })
    }
}
