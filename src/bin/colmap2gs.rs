//! Convert a COLMAP sparse model into `cameras.json` + `cfg_args` for a
//! gaussian splatting viewer.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use da3_gs_prep::config::DEFAULT_SPARSE_DIR;
use da3_gs_prep::convert::convert_dataset;

#[derive(Debug, Parser)]
#[command(version, about = "Convert COLMAP output to 3DGS viewer format")]
struct Args {
    /// Dataset path (contains sparse/, images/, ...)
    #[arg(long)]
    dataset_path: PathBuf,

    /// COLMAP sparse directory, relative to the dataset path
    #[arg(long, default_value = DEFAULT_SPARSE_DIR)]
    sparse_dir: PathBuf,

    /// Output directory (default: <dataset_path>/output/gs_ply)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    da3_gs_prep::utility::init_logger();
    let args = Args::parse();

    let records = convert_dataset(&args.dataset_path, &args.sparse_dir, args.output_dir.as_deref())
        .with_context(|| format!("converting {}", args.dataset_path.display()))?;
    log::info!("done: {} cameras", records.len());
    Ok(())
}
