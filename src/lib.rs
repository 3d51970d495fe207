//! Turns `da3` exports into the dataset layout a gaussian splatting viewer
//! loads: COLMAP sparse model, per-image depth maps, `cameras.json`,
//! `cfg_args` and the point cloud.
pub mod camera;
pub mod colmap;
pub mod config;
pub mod convert;
pub mod dataset;
pub mod depth;
pub mod error;
pub mod pipeline;
pub mod relocate;
pub mod runner;
pub mod save;
pub mod utility;

pub use error::{PrepError, Result};
