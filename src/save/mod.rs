//! Files written for the gaussian splatting viewer.
mod cameras;
mod cfg_args;

pub use cameras::{write_cameras_json, CameraRecord};
pub use cfg_args::{write_cfg_args, CfgArgs};
