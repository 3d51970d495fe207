use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// The `cfg_args` file: a python `Namespace(...)` repr of the training
/// options the viewer expects. Only the two paths vary.
#[derive(Debug, Clone)]
pub struct CfgArgs {
    pub source_path: PathBuf,
    pub model_path: PathBuf,
}

impl fmt::Display for CfgArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Namespace(sh_degree=0, source_path='{}', model_path='{}', images='images', \
             resolution=-1, white_background=False, data_device='cuda', no_load_depth=False, \
             eval=False, lambda_local_pearson=0.15, lambda_pearson=0.05, box_p=128, p_corr=0.5, \
             prune_exp=7.5, prune_perc=0.98, densify_lag=1000000, power_thresh=-4.0, \
             densify_period=5000, step_ratio=0.95, lambda_diffusion=0.0, SDS_freq=0.1, \
             lambda_reg=0.1, warp_reg_start_itr=4999)",
            self.source_path.display(),
            self.model_path.display()
        )
    }
}

pub fn write_cfg_args(args: &CfgArgs, path: &Path) -> Result<()> {
    std::fs::write(path, args.to_string())?;
    Ok(())
}

#[test]
fn test_cfg_args_template() {
    let args = CfgArgs {
        source_path: PathBuf::from("/data/lectern"),
        model_path: PathBuf::from("/data/lectern/output/gs_ply"),
    };
    let text = args.to_string();
    assert!(text.starts_with(
        "Namespace(sh_degree=0, source_path='/data/lectern', \
         model_path='/data/lectern/output/gs_ply', images='images', resolution=-1, "
    ));
    assert!(text.ends_with("lambda_reg=0.1, warp_reg_start_itr=4999)"));
    assert!(!text.contains('\n'));
    assert!(!text.contains("  "));
}
