use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One entry of `cameras.json`, camera-to-world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// Position in the name-sorted list, not the COLMAP image id.
    pub id: usize,
    #[serde(rename = "img_name")]
    pub image_name: String,
    pub width: u64,
    pub height: u64,
    pub position: [f64; 3],
    /// Row-major camera -> world rotation.
    pub rotation: [[f64; 3]; 3],
    pub fy: f64,
    pub fx: f64,
}

/// Write `records` as a pretty-printed JSON array (2-space indent).
pub fn write_cameras_json(records: &[CameraRecord], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}
