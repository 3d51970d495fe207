//! Runs `da3` on `<dataset-root>/images` and reorganises its exports:
//!
//! - COLMAP binaries -> `<dataset-root>/sparse/0/`
//! - `output/exports/npz/results.npz` -> `<dataset-root>/depths/*.npy`
//! - viewer files -> `<dataset-root>/output/gs_ply/`
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use da3_gs_prep::config::{DEFAULT_FALLBACK_ENV, DEFAULT_PROCESS_RES};
use da3_gs_prep::pipeline::{organize_dataset, OrganizeOptions};

#[derive(Debug, Parser)]
#[command(version, about = "Run da3 and organise its outputs for a 3DGS viewer")]
struct Args {
    /// Dataset root (contains images/)
    #[arg(long)]
    dataset_root: PathBuf,

    /// Model directory passed to `da3 --model-dir`
    #[arg(long)]
    model_dir: PathBuf,

    /// `--process-res` passed to da3
    #[arg(long, default_value_t = DEFAULT_PROCESS_RES)]
    process_res: u32,

    /// Conda env to retry da3 in (`conda run -n ENV da3 ...`)
    #[arg(long, default_value = DEFAULT_FALLBACK_ENV)]
    env: String,

    /// Skip running da3, only reorganise existing outputs
    #[arg(long)]
    skip_da3: bool,
}

fn main() -> anyhow::Result<()> {
    da3_gs_prep::utility::init_logger();
    let args = Args::parse();
    log::debug!("{:?}", args);

    let options = OrganizeOptions {
        dataset_root: args.dataset_root,
        model_dir: args.model_dir,
        process_res: args.process_res,
        fallback_env: Some(args.env),
        skip_da3: args.skip_da3,
    };
    let report = organize_dataset(&options)
        .with_context(|| format!("organising {}", options.dataset_root.display()))?;
    log::info!(
        "done: {} COLMAP files moved, {} cameras",
        report.moved_bins.len(),
        report.cameras
    );
    Ok(())
}
