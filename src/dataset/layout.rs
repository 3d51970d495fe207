use std::path::PathBuf;

use crate::config::{
    CAMERAS_JSON, CFG_ARGS, DEFAULT_SPARSE_DIR, POINT_CLOUD_DIR, POINT_CLOUD_FILE,
};

/// Directory roles of a dataset rooted at one path.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    pub root: PathBuf,
}

impl DatasetLayout {
    const IMAGES_PATH: &'static str = "images";
    const OUTPUT_PATH: &'static str = "output";
    const DEPTHS_PATH: &'static str = "depths";
    const NPZ_PATH: &'static str = "exports/npz/results.npz";
    const GS_PLY_PATH: &'static str = "gs_ply";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(Self::IMAGES_PATH)
    }

    /// Export directory handed to `da3`.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(Self::OUTPUT_PATH)
    }

    pub fn sparse_dir(&self) -> PathBuf {
        self.root.join(DEFAULT_SPARSE_DIR)
    }

    pub fn depths_dir(&self) -> PathBuf {
        self.root.join(Self::DEPTHS_PATH)
    }

    /// Depth batch written by `da3` under its npz export.
    pub fn npz_path(&self) -> PathBuf {
        self.output_dir().join(Self::NPZ_PATH)
    }

    /// Where `da3` drops its gaussian `.ply` and where the viewer tree lives.
    pub fn gs_root(&self) -> PathBuf {
        self.output_dir().join(Self::GS_PLY_PATH)
    }

    pub fn viewer(&self) -> ViewerLayout {
        ViewerLayout::new(self.gs_root())
    }
}

/// Files consumed by the gaussian splatting viewer.
#[derive(Debug, Clone)]
pub struct ViewerLayout {
    pub root: PathBuf,
}

impl ViewerLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn cameras_json(&self) -> PathBuf {
        self.root.join(CAMERAS_JSON)
    }

    pub fn cfg_args(&self) -> PathBuf {
        self.root.join(CFG_ARGS)
    }

    pub fn point_cloud_dir(&self) -> PathBuf {
        self.root.join(POINT_CLOUD_DIR)
    }

    pub fn point_cloud_file(&self) -> PathBuf {
        self.point_cloud_dir().join(POINT_CLOUD_FILE)
    }
}
