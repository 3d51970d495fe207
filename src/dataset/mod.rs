//! Dataset directory layout
//!
//! `<root>/images` holds the input frames, `da3` exports into `<root>/output`,
//! and the conversion stages fill `<root>/sparse/0`, `<root>/depths` and the
//! viewer tree under `<root>/output/gs_ply`.
mod layout;

use std::path::Path;

pub use layout::{DatasetLayout, ViewerLayout};

use crate::config::IMAGE_EXTENSIONS;

/// List the image files directly inside `images_dir`, sorted by file name.
///
/// Only `.jpg`, `.jpeg` and `.png` files are kept (extension compared
/// case-insensitively). Depth maps are matched to this list by position.
pub fn list_sorted_images(images_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(images_dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            log::warn!("skipping non utf-8 file name in {}", images_dir.display());
            continue;
        };
        if is_image_name(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Suffix match on the lowercased name, so a bare `.png` counts too.
fn is_image_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| name.strip_suffix(ext).is_some_and(|rest| rest.ends_with('.')))
}
