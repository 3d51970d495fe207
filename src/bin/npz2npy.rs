//! Split the `depth` array of a `da3` results.npz into per-image `.npy` files.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use da3_gs_prep::depth::{npz_to_npy, DepthOutcome};

#[derive(Debug, Parser)]
#[command(version, about = "Convert results.npz to per-image .npy depth files")]
struct Args {
    /// Path to results.npz exported by da3
    #[arg(long)]
    npz_path: PathBuf,

    /// Directory containing the input images
    #[arg(long)]
    images_dir: PathBuf,

    /// Output directory for the .npy depth files
    #[arg(long)]
    depths_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    da3_gs_prep::utility::init_logger();
    let args = Args::parse();

    let outcome = npz_to_npy(&args.npz_path, &args.images_dir, &args.depths_dir)
        .with_context(|| format!("splitting {}", args.npz_path.display()))?;
    match outcome {
        DepthOutcome::Split(report) => match report.stopped_at {
            Some(i) => log::warn!(
                "done: {} of {} images have depth (batch ended at index {i})",
                report.written,
                report.images
            ),
            None => log::info!("done: {} depth files", report.written),
        },
        DepthOutcome::MissingField { .. } => log::warn!("done: no depth files written"),
    }
    Ok(())
}
