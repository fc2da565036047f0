// apps/wl_cli/src/commands/run.rs

//! 运行演示模拟
//!
//! 构建高斯翼模型与均匀六面体分区，在均匀来流下推进若干时间步，
//! 报告投影进动量方程的合力。

use std::path::PathBuf;

use clap::Args;
use glam::DVec3;
use tracing::info;

use wl_comm::SerialComm;
use wl_coupling::{ActuatorLineCoupling, CouplingConfig};
use wl_mesh::{CellCloudPartition, CellVectorField, MeshPartition};
use wl_model::{GaussianWingBuilder, GaussianWingModel};

/// `run` 子命令参数
#[derive(Args)]
pub struct RunArgs {
    /// 模型构建文件 (JSON)，缺省使用内置演示翼
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// 耦合配置文件 (JSON)，缺省采用模型自报的策略与阈值
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 时间步数
    #[arg(long, default_value_t = 20)]
    pub steps: usize,

    /// 时间步长 [s]
    #[arg(long, default_value_t = 0.05)]
    pub dt: f64,

    /// x 方向单元数
    #[arg(long, default_value_t = 8)]
    pub nx: usize,

    /// y 方向单元数
    #[arg(long, default_value_t = 4)]
    pub ny: usize,

    /// z 方向单元数
    #[arg(long, default_value_t = 4)]
    pub nz: usize,

    /// 均匀来流速度 [m/s]，沿 x 方向
    #[arg(long, default_value_t = 5.0)]
    pub wind: f64,

    /// 结果输出目录（缺省不落盘）
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// 内置演示翼：展向沿 z，跨过网格中心
fn demo_wing() -> Result<GaussianWingModel, wl_model::ModelError> {
    GaussianWingBuilder {
        root: [0.0, 0.0, -1.0],
        tip: [0.0, 0.0, 1.0],
        n_span_lines: 8,
        smoothing_length: 0.4,
        initial_angle: 0.15,
        ..GaussianWingBuilder::default()
    }
    .build()
}

pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let model = match &args.model {
        Some(path) => GaussianWingModel::new_from_file(path)?,
        None => demo_wing()?,
    };

    let config = match &args.config {
        Some(path) => CouplingConfig::from_file(path)?,
        None => CouplingConfig::from_model(&model),
    };

    // 0.5 m 的均匀单元，块中心对准原点
    let cell_size = DVec3::splat(0.5);
    let origin = DVec3::new(
        -0.5 * args.nx as f64 * cell_size.x,
        -0.5 * args.ny as f64 * cell_size.y,
        -0.5 * args.nz as f64 * cell_size.z,
    );
    let mesh = CellCloudPartition::uniform_box(origin, cell_size, args.nx, args.ny, args.nz);
    let n_cells = mesh.n_cells();

    info!(
        "mesh: {} cells, sampling: {:?}, projection limit: {}",
        n_cells, config.sampling, config.projection_weight_limit
    );

    let mut coupling = ActuatorLineCoupling::new(model, SerialComm, config, n_cells)?;
    if let Some(dir) = &args.out {
        std::fs::create_dir_all(dir)?;
        coupling = coupling.with_results_dir(dir);
    }

    let mut velocity = CellVectorField::zeros(n_cells);
    for cell in 0..n_cells {
        velocity[cell] = DVec3::new(args.wind, 0.0, 0.0);
    }

    let mut time = 0.0;
    for step in 0..args.steps {
        let mut source = CellVectorField::zeros(n_cells);
        coupling.step(&mesh, &velocity, &mut source, time, args.dt);
        time += args.dt;

        let total = source.total();
        info!(
            "step {:>4}  t={:6.3}s  projected force = ({:+.4e}, {:+.4e}, {:+.4e})",
            step + 1,
            time,
            total.x,
            total.y,
            total.z
        );
    }

    let projection = coupling
        .projection_set()
        .map(|set| set.len())
        .unwrap_or(0);
    info!("done: {} cells in projection cache", projection);

    Ok(())
}
