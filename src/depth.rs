//! Splitting the `da3` depth batch into one `.npy` per image.
//!
//! Depth maps are matched to images purely by position: entry `i` of the
//! batch belongs to the `i`-th image of the name-sorted image list. Nothing
//! checks this against the reconstruction's own image order, so a tool that
//! orders its inputs differently yields mismatched depth files.

use std::fs::File;
use std::path::Path;

use ndarray::{Array3, ArrayView3, Axis};
use ndarray_npy::{write_npy, NpzReader, WritableElement};

use crate::config::{DEPTH_EXTENSION, DEPTH_FIELD};
use crate::dataset::list_sorted_images;
use crate::error::{PrepError, Result};

/// Stacked depth maps, first axis = image ordinal.
#[derive(Debug, Clone)]
pub enum DepthBatch {
    F32(Array3<f32>),
    F64(Array3<f64>),
}

impl DepthBatch {
    /// Number of depth maps in the batch.
    pub fn len(&self) -> usize {
        self.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::F32(batch) => batch.shape(),
            Self::F64(batch) => batch.shape(),
        }
    }

    pub fn split(&self, image_names: &[String], output_dir: &Path) -> Result<SplitReport> {
        match self {
            Self::F32(batch) => split_depth_batch(batch.view(), image_names, output_dir),
            Self::F64(batch) => split_depth_batch(batch.view(), image_names, output_dir),
        }
    }
}

/// Contents of the npz archive as far as depth is concerned.
#[derive(Debug)]
pub enum NpzDepth {
    Batch(DepthBatch),
    /// No `depth` entry; `available` lists the entries that do exist.
    MissingField { available: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    /// Depth files written.
    pub written: usize,
    /// Images listed.
    pub images: usize,
    /// Ordinal at which the batch ran out before the image list did.
    pub stopped_at: Option<usize>,
}

#[derive(Debug)]
pub enum DepthOutcome {
    Split(SplitReport),
    MissingField { available: Vec<String> },
}

/// Read the `depth` array of an npz archive written by `numpy.savez`.
///
/// Entry names are matched with or without the `.npy` suffix numpy adds.
pub fn read_depth_batch(npz_path: &Path) -> Result<NpzDepth> {
    let mut npz = NpzReader::new(File::open(npz_path)?)?;
    let names = npz.names()?;
    log::info!("npz entries: {:?}", names);

    let Some(name) = names
        .iter()
        .find(|name| name.strip_suffix(".npy").unwrap_or(name.as_str()) == DEPTH_FIELD)
        .cloned()
    else {
        return Ok(NpzDepth::MissingField { available: names });
    };

    let batch = match npz.by_name(&name) {
        Ok(batch) => DepthBatch::F32(batch),
        Err(f32_err) => match npz.by_name(&name) {
            Ok(batch) => DepthBatch::F64(batch),
            Err(f64_err) => {
                log::debug!("reading {name} as f64 failed too: {f64_err}");
                return Err(f32_err.into());
            }
        },
    };
    log::info!("depth batch shape: {:?}", batch.shape());
    Ok(NpzDepth::Batch(batch))
}

/// Write `batch[i]` as `<output_dir>/<stem of image_names[i]>.npy`.
///
/// Stops early, without error, when the batch is shorter than the image list.
/// Existing files are overwritten.
pub fn split_depth_batch<A: WritableElement>(
    batch: ArrayView3<'_, A>,
    image_names: &[String],
    output_dir: &Path,
) -> Result<SplitReport> {
    let available = batch.len_of(Axis(0));
    let mut stopped_at = None;
    let mut written = 0;

    for (i, image_name) in image_names.iter().enumerate() {
        if i >= available {
            log::warn!("fewer depth maps than images, stopping at index {i}");
            stopped_at = Some(i);
            break;
        }
        let stem = Path::new(image_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| image_name.clone());
        let depth_path = output_dir.join(format!("{stem}.{DEPTH_EXTENSION}"));
        let depth = batch.index_axis(Axis(0), i);
        write_npy(&depth_path, &depth)?;
        log::debug!("saved {} (shape: {:?})", depth_path.display(), depth.shape());
        written += 1;
    }

    Ok(SplitReport {
        written,
        images: image_names.len(),
        stopped_at,
    })
}

/// Whole depth stage: npz archive + images directory -> per-image `.npy` files.
pub fn npz_to_npy(npz_path: &Path, images_dir: &Path, depths_dir: &Path) -> Result<DepthOutcome> {
    if !npz_path.is_file() {
        return Err(PrepError::MissingPath {
            what: "npz file",
            path: npz_path.to_path_buf(),
        });
    }
    if !images_dir.is_dir() {
        return Err(PrepError::MissingPath {
            what: "images directory",
            path: images_dir.to_path_buf(),
        });
    }

    let image_names = list_sorted_images(images_dir)?;
    log::info!("images: {}", image_names.len());

    let batch = match read_depth_batch(npz_path)? {
        NpzDepth::Batch(batch) => batch,
        NpzDepth::MissingField { available } => {
            log::error!("npz has no `{DEPTH_FIELD}` entry (found {available:?})");
            return Ok(DepthOutcome::MissingField { available });
        }
    };
    log::info!("depth maps: {}", batch.len());

    std::fs::create_dir_all(depths_dir)?;
    let report = batch.split(&image_names, depths_dir)?;
    log::info!(
        "wrote {} depth files to {}",
        report.written,
        depths_dir.display()
    );
    Ok(DepthOutcome::Split(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};
    use ndarray_npy::{read_npy, NpzWriter};

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn write_npz(path: &Path, entry: &str, batch: &Array3<f32>) {
        let mut npz = NpzWriter::new(File::create(path).unwrap());
        npz.add_array(entry, batch).unwrap();
        npz.finish().unwrap();
    }

    #[test]
    fn test_split_stops_at_batch_len() {
        let dir = tempfile::tempdir().unwrap();
        let batch = Array3::from_shape_fn((3, 2, 4), |(i, y, x)| (i * 100 + y * 10 + x) as f32);
        let images = names(&["a.jpg", "b.png", "c.jpeg", "d.jpg", "e.jpg"]);

        let report = split_depth_batch(batch.view(), &images, dir.path()).unwrap();
        assert_eq!(
            report,
            SplitReport {
                written: 3,
                images: 5,
                stopped_at: Some(3)
            }
        );

        for (i, stem) in ["a", "b", "c"].iter().enumerate() {
            let depth: Array2<f32> = read_npy(dir.path().join(format!("{stem}.npy"))).unwrap();
            assert_eq!(depth, batch.index_axis(Axis(0), i));
        }
        assert!(!dir.path().join("d.npy").exists());
        assert!(!dir.path().join("e.npy").exists());
    }

    #[test]
    fn test_split_with_spare_depth_maps() {
        let dir = tempfile::tempdir().unwrap();
        let batch = Array3::<f64>::zeros((4, 2, 2));
        let report = split_depth_batch(batch.view(), &names(&["x.png"]), dir.path()).unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(report.stopped_at, None);
        let depth: Array2<f64> = read_npy(dir.path().join("x.npy")).unwrap();
        assert_eq!(depth.shape(), &[2, 2]);
    }

    #[test]
    fn test_split_dotfile_image_keeps_full_name() {
        let dir = tempfile::tempdir().unwrap();
        let batch = Array3::<f32>::zeros((1, 2, 2));
        split_depth_batch(batch.view(), &names(&[".png"]), dir.path()).unwrap();
        assert!(dir.path().join(".png.npy").is_file());
    }

    #[test]
    fn test_npz_to_npy() {
        let dir = tempfile::tempdir().unwrap();
        let images_dir = dir.path().join("images");
        std::fs::create_dir(&images_dir).unwrap();
        for name in ["b.png", "a.png", "notes.txt"] {
            std::fs::write(images_dir.join(name), b"").unwrap();
        }
        let npz_path = dir.path().join("results.npz");
        let batch = Array3::from_shape_fn((2, 3, 3), |(i, _, _)| i as f32 + 1.0);
        write_npz(&npz_path, "depth.npy", &batch);

        let depths_dir = dir.path().join("depths");
        let outcome = npz_to_npy(&npz_path, &images_dir, &depths_dir).unwrap();
        let DepthOutcome::Split(report) = outcome else {
            panic!("expected split outcome, got {outcome:?}");
        };
        assert_eq!(report.written, 2);

        let a: Array2<f32> = read_npy(depths_dir.join("a.npy")).unwrap();
        let b: Array2<f32> = read_npy(depths_dir.join("b.npy")).unwrap();
        assert_eq!(a[[0, 0]], 1.0);
        assert_eq!(b[[0, 0]], 2.0);

        // f64 batches are kept as f64
        let batch = Array3::from_shape_fn((2, 2, 2), |(i, _, _)| i as f64 + 0.25);
        let mut npz = NpzWriter::new(File::create(&npz_path).unwrap());
        npz.add_array("depth", &batch).unwrap();
        npz.finish().unwrap();
        match read_depth_batch(&npz_path).unwrap() {
            NpzDepth::Batch(DepthBatch::F64(read)) => assert_eq!(read, batch),
            other => panic!("expected an f64 batch, got {other:?}"),
        }

        let outcome = npz_to_npy(&npz_path, &images_dir, &depths_dir).unwrap();
        assert!(matches!(outcome, DepthOutcome::Split(SplitReport { written: 2, .. })));
        let a: Array2<f64> = read_npy(depths_dir.join("a.npy")).unwrap();
        let b: Array2<f64> = read_npy(depths_dir.join("b.npy")).unwrap();
        assert_eq!(a[[1, 1]], 0.25);
        assert_eq!(b[[1, 1]], 1.25);
    }

    #[test]
    fn test_missing_depth_field() {
        let dir = tempfile::tempdir().unwrap();
        let images_dir = dir.path().join("images");
        std::fs::create_dir(&images_dir).unwrap();
        std::fs::write(images_dir.join("a.png"), b"").unwrap();
        let npz_path = dir.path().join("results.npz");
        write_npz(&npz_path, "conf.npy", &Array3::zeros((1, 2, 2)));

        let depths_dir = dir.path().join("depths");
        let outcome = npz_to_npy(&npz_path, &images_dir, &depths_dir).unwrap();
        match outcome {
            DepthOutcome::MissingField { available } => assert_eq!(available, vec!["conf.npy"]),
            other => panic!("expected missing field, got {other:?}"),
        }
        assert!(!depths_dir.exists());
    }

    #[test]
    fn test_missing_npz_is_precondition_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = npz_to_npy(
            &dir.path().join("results.npz"),
            dir.path(),
            &dir.path().join("depths"),
        )
        .unwrap_err();
        assert!(matches!(err, PrepError::MissingPath { what: "npz file", .. }));
    }
}
