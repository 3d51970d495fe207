//! Fixed names and defaults shared by the pipeline stages.

/// Default `--process-res` handed to `da3`.
pub const DEFAULT_PROCESS_RES: u32 = 1024;
/// Conda environment used when `da3` cannot be run directly.
pub const DEFAULT_FALLBACK_ENV: &str = "py311_da3";
/// Sparse reconstruction directory, relative to the dataset root.
pub const DEFAULT_SPARSE_DIR: &str = "sparse/0";

/// Export formats requested from `da3`.
pub const DA3_EXPORT_FORMAT: &str = "glb-colmap-npz-gs_ply";

/// COLMAP binaries produced by `da3` that belong in the sparse directory.
pub const COLMAP_BINS: [&str; 5] = [
    "cameras.bin",
    "images.bin",
    "points3D.bin",
    "frames.bin",
    "rigs.bin",
];
/// Files that must exist before a reconstruction is loaded.
pub const REQUIRED_SPARSE_FILES: [&str; 2] = ["cameras.bin", "images.bin"];

/// Image extensions picked up when listing the images directory (lowercase).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
/// Array name holding the depth batch inside the npz archive.
pub const DEPTH_FIELD: &str = "depth";
pub const DEPTH_EXTENSION: &str = "npy";

pub const POINT_CLOUD_SUFFIX: &str = ".ply";
pub const CAMERAS_JSON: &str = "cameras.json";
pub const CFG_ARGS: &str = "cfg_args";
pub const POINT_CLOUD_DIR: &str = "point_cloud";
pub const POINT_CLOUD_FILE: &str = "point_cloud.ply";
