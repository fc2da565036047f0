// apps/wl_cli/src/commands/validate.rs

//! 校验耦合配置文件

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use wl_coupling::CouplingConfig;

/// `validate` 子命令参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 耦合配置文件 (JSON)
    pub config: PathBuf,
}

pub fn execute(args: ValidateArgs) -> anyhow::Result<()> {
    let config = CouplingConfig::from_file(&args.config)?;

    info!("config ok: {}", args.config.display());
    info!("  sampling:                {:?}", config.sampling);
    info!("  dominant_only_sampling:  {}", config.dominant_only_sampling);
    info!("  dominant_only_projection: {}", config.dominant_only_projection);
    info!("  projection_weight_limit: {}", config.projection_weight_limit);
    info!("  sampling_weight_limit:   {}", config.sampling_weight_limit);

    Ok(())
}
