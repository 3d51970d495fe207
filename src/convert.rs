//! COLMAP sparse model -> gaussian splatting viewer files.

use std::path::{Path, PathBuf};

use crate::camera::focal_lengths;
use crate::colmap::{ColmapError, Reconstruction};
use crate::config::{POINT_CLOUD_SUFFIX, REQUIRED_SPARSE_FILES};
use crate::dataset::{DatasetLayout, ViewerLayout};
use crate::error::{PrepError, Result};
use crate::relocate::{relocate_first_match, Placement};
use crate::save::{write_cameras_json, write_cfg_args, CameraRecord, CfgArgs};

/// Build the viewer camera list: camera-to-world, sorted by image name, with
/// ids renumbered `0..N` in that order.
pub fn convert(reconstruction: &Reconstruction) -> std::result::Result<Vec<CameraRecord>, ColmapError> {
    let mut records = Vec::with_capacity(reconstruction.images.len());
    for image in reconstruction.images.values() {
        let camera = reconstruction.camera_of(image)?;

        let rot_w2c = image.rotation_matrix();
        let center = image.projection_center();
        let rot_c2w = rot_w2c.matrix().transpose();
        let (fx, fy) = focal_lengths(camera)?;

        records.push(CameraRecord {
            id: records.len(),
            image_name: image.name.clone(),
            width: camera.width,
            height: camera.height,
            position: [center.x, center.y, center.z],
            rotation: std::array::from_fn(|r| std::array::from_fn(|c| rot_c2w[(r, c)])),
            fy,
            fx,
        });
    }

    records.sort_by(|a, b| a.image_name.cmp(&b.image_name));
    for (i, record) in records.iter_mut().enumerate() {
        record.id = i;
    }
    Ok(records)
}

/// Fail unless `sparse_dir` exists and holds the files needed to load it.
pub fn check_sparse_dir(sparse_dir: &Path) -> Result<()> {
    if !sparse_dir.is_dir() {
        return Err(PrepError::MissingPath {
            what: "sparse directory",
            path: sparse_dir.to_path_buf(),
        });
    }
    let missing: Vec<String> = REQUIRED_SPARSE_FILES
        .iter()
        .filter(|name| !sparse_dir.join(name).is_file())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PrepError::MissingSparseFiles {
            dir: sparse_dir.to_path_buf(),
            missing,
        });
    }
    Ok(())
}

/// Whole conversion stage for a dataset.
///
/// Reads `<dataset>/<sparse_subdir>`, writes `cameras.json` and `cfg_args`
/// into `output_dir` (default `<dataset>/output/gs_ply`) and moves the first
/// `.ply` found in `<dataset>/output/gs_ply` to `point_cloud/point_cloud.ply`.
/// Nothing is written when the sparse model is incomplete.
pub fn convert_dataset(
    dataset_path: &Path,
    sparse_subdir: &Path,
    output_dir: Option<&Path>,
) -> Result<Vec<CameraRecord>> {
    let dataset = DatasetLayout::new(dataset_path);
    let sparse_dir = dataset_path.join(sparse_subdir);
    check_sparse_dir(&sparse_dir)?;

    let viewer = ViewerLayout::new(
        output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dataset.gs_root()),
    );
    log::info!("dataset: {}", dataset_path.display());
    log::info!("sparse: {}", sparse_dir.display());
    log::info!("output: {}", viewer.root.display());
    std::fs::create_dir_all(viewer.point_cloud_dir())?;

    let reconstruction = Reconstruction::read(&sparse_dir)?;
    let records = convert(&reconstruction)?;
    write_cameras_json(&records, &viewer.cameras_json())?;
    log::info!("wrote cameras.json with {} cameras", records.len());

    let cfg_args = CfgArgs {
        source_path: absolute(dataset_path)?,
        model_path: absolute(&viewer.root)?,
    };
    write_cfg_args(&cfg_args, &viewer.cfg_args())?;
    log::info!("wrote cfg_args");

    place_point_cloud(&dataset.gs_root(), &viewer);

    log::info!("viewer files ready in {}", viewer.root.display());
    log::info!(
        "view with: ./SIBR_gaussianViewer_app -m {}",
        cfg_args.model_path.display()
    );
    Ok(records)
}

/// Move the first `.ply` of `search_root` into the viewer's point cloud slot.
/// Failures are logged, never returned.
pub fn place_point_cloud(search_root: &Path, viewer: &ViewerLayout) {
    let dest = viewer.point_cloud_file();
    match relocate_first_match(POINT_CLOUD_SUFFIX, search_root, &dest) {
        Ok(Placement::AlreadyPresent) => log::info!("point cloud present: {}", dest.display()),
        Ok(Placement::Moved { from }) => {
            log::info!("moved point cloud {} -> {}", from.display(), dest.display())
        }
        Ok(Placement::NoCandidate) => {
            log::warn!("no .ply point cloud found in {}", search_root.display())
        }
        Err(e) => log::warn!("failed to place point cloud: {e}"),
    }
}

/// Absolute form of `path`, with `.` components dropped; `..` is kept as is.
fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path)
}
