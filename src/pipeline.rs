//! `da3` run + reorganisation of its outputs into a viewer-ready dataset.
//!
//! Stages run in order and each one can be re-run on its own: moves skip
//! what is already in place and written files are overwritten.

use std::path::{Path, PathBuf};

use crate::config::{COLMAP_BINS, DEFAULT_SPARSE_DIR};
use crate::convert::{convert_dataset, place_point_cloud};
use crate::dataset::DatasetLayout;
use crate::depth::{npz_to_npy, DepthOutcome};
use crate::error::{PrepError, Result};
use crate::relocate::relocate;
use crate::runner::{run_with_fallback, ExecEnv, ToolCommand};

#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    pub dataset_root: PathBuf,
    pub model_dir: PathBuf,
    pub process_res: u32,
    /// Conda environment to retry `da3` in.
    pub fallback_env: Option<String>,
    /// Start from existing `da3` outputs.
    pub skip_da3: bool,
}

/// What each stage produced.
#[derive(Debug)]
pub struct OrganizeReport {
    pub moved_bins: Vec<String>,
    /// `None` when there was no npz export to split.
    pub depth: Option<DepthOutcome>,
    pub cameras: usize,
}

pub fn organize_dataset(options: &OrganizeOptions) -> Result<OrganizeReport> {
    let layout = DatasetLayout::new(&options.dataset_root);
    let images_dir = layout.images_dir();
    if !images_dir.is_dir() {
        return Err(PrepError::MissingPath {
            what: "images directory",
            path: images_dir,
        });
    }

    // 1) da3
    if options.skip_da3 {
        log::info!("skipping da3");
    } else {
        let command = ToolCommand::da3_images(
            &images_dir,
            &options.model_dir,
            &layout.output_dir(),
            options.process_res,
        );
        let fallback = options.fallback_env.as_deref().map(ExecEnv::conda);
        run_with_fallback(&command, fallback.as_ref())?;
    }

    // 2) COLMAP binaries -> sparse/0
    let sparse_dir = layout.sparse_dir();
    let moved_bins = relocate(&COLMAP_BINS, &layout.output_dir(), &sparse_dir)?;
    if moved_bins.is_empty() {
        log::warn!("no COLMAP binaries to move");
    } else {
        log::info!("moved COLMAP files to {}: {:?}", sparse_dir.display(), moved_bins);
    }

    // 3) npz -> per-image npy
    let depths_dir = layout.depths_dir();
    std::fs::create_dir_all(&depths_dir)?;
    let npz_path = layout.npz_path();
    let depth = if npz_path.is_file() {
        Some(npz_to_npy(&npz_path, &images_dir, &depths_dir)?)
    } else {
        log::warn!("{} not found, skipping depth split", npz_path.display());
        None
    };

    // 4) COLMAP -> viewer files
    let records = convert_dataset(&options.dataset_root, Path::new(DEFAULT_SPARSE_DIR), None)?;

    // 5) make sure the point cloud landed
    place_point_cloud(&layout.gs_root(), &layout.viewer());

    log::info!("dataset ready: {}", options.dataset_root.display());
    Ok(OrganizeReport {
        moved_bins,
        depth,
        cameras: records.len(),
    })
}
