// crates/wl_coupling/src/driver.rs

//! 力施加器 / 步进驱动
//!
//! 每个仿真时间步执行一次固定顺序的协议：
//! 1. 跨进程同步共享模型状态（翼角）
//! 2. "需要更新"置位时重建投影缓存与当前策略的采样缓存
//! 3. 采样速度并写入模型
//! 4. 模型推进一个时间步
//! 5. 按投影缓存把力投影进动量方程源项，写诊断场
//! 6. 本地清除"需要更新"，控制器查询 + 逻辑或归约决定下一步
//!    是否重建；仅主进程触发结果落盘
//!
//! 违反该顺序（例如在同步之前重建缓存，或在归约"需要更新"决定
//! 之前施加力）是正确性缺陷而非崩溃，顺序由测试显式约束。
//!
//! # 失败语义
//!
//! 步进路径中没有任何操作会失败：几何未命中退化为哨兵/零值，
//! 再由归约消解。构造阶段的配置错误通过 [`CouplingError`] 上抛。

use std::path::PathBuf;

use wl_comm::{master_value, Communicator};
use wl_mesh::{CellScalarField, CellVectorField, MeshPartition};
use wl_model::LineForceModel;

use crate::config::CouplingConfig;
use crate::error::CouplingResult;
use crate::projection::ProjectionSet;
use crate::sampling::{self, SamplingSet};

/// 执行器线耦合实例
///
/// 绑定到一个网格区域：独占持有模型副本与通信器，维护两份派生
/// 缓存、进程级"需要更新"标志（初始为真）和两个诊断输出场。
pub struct ActuatorLineCoupling<M, C> {
    model: M,
    comm: C,
    config: CouplingConfig,
    projection: Option<ProjectionSet>,
    sampling: Option<SamplingSet>,
    needs_update: bool,
    body_force: CellVectorField,
    body_force_weight: CellScalarField,
    results_dir: Option<PathBuf>,
}

impl<M, C> ActuatorLineCoupling<M, C>
where
    M: LineForceModel,
    C: Communicator,
{
    /// 创建耦合实例
    ///
    /// `n_cells` 是诊断场覆盖的分区长度。配置在此处校验，
    /// 之后不可变。
    pub fn new(model: M, comm: C, config: CouplingConfig, n_cells: usize) -> CouplingResult<Self> {
        config.validate()?;

        Ok(Self {
            model,
            comm,
            config,
            projection: None,
            sampling: None,
            needs_update: true,
            body_force: CellVectorField::zeros(n_cells),
            body_force_weight: CellScalarField::zeros(n_cells),
            results_dir: None,
        })
    }

    /// 设置结果输出目录（仅主进程写入）
    pub fn with_results_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.results_dir = Some(dir.into());
        self
    }

    /// 推进一个仿真时间步
    ///
    /// `velocity` 是当前速度场，`source` 是动量方程源项的累加目标，
    /// 两者都按单元编号索引且覆盖整个分区。
    pub fn step<P>(
        &mut self,
        mesh: &P,
        velocity: &CellVectorField,
        source: &mut CellVectorField,
        time: f64,
        dt: f64,
    ) where
        P: MeshPartition + Sync,
    {
        self.sync_wing_angles();

        if self.needs_update {
            self.rebuild_caches(mesh);
        }

        sampling::sample(
            &mut self.model,
            mesh,
            &self.comm,
            velocity,
            self.sampling.as_ref(),
            self.config.sampling,
            self.config.dominant_only_sampling,
        );

        self.model.advance(time, dt);

        self.apply_forces(mesh, velocity, source);

        self.refresh_needs_update(time, dt);
    }

    /// 同步共享标量状态：主进程的翼角是权威值
    fn sync_wing_angles(&mut self) {
        for wing in 0..self.model.nr_wings() {
            let local = self.model.wing_angle(wing);
            let synced = master_value(&self.comm, local);
            self.model.set_wing_angle(wing, synced);
        }
    }

    /// 整体重建两份派生缓存
    fn rebuild_caches<P>(&mut self, mesh: &P)
    where
        P: MeshPartition + Sync,
    {
        self.projection = Some(ProjectionSet::build(
            &self.model,
            mesh,
            self.config.projection_weight_limit,
            &mut self.body_force_weight,
        ));

        self.sampling = Some(SamplingSet::build(
            self.config.sampling,
            &self.model,
            mesh,
            self.config.sampling_weight_limit,
        ));
    }

    /// 把缓存内每个单元的投影力加进源项并写诊断场
    fn apply_forces<P>(&mut self, mesh: &P, velocity: &CellVectorField, source: &mut CellVectorField)
    where
        P: MeshPartition,
    {
        self.body_force.fill_zero();

        let Some(projection) = &self.projection else {
            return;
        };

        let n_lines = self.model.nr_span_lines();

        for entry in projection.entries() {
            let cell_velocity = velocity[entry.cell];

            let raw_force = if self.config.dominant_only_projection {
                self.model.force_to_project(entry.line, cell_velocity)
            } else {
                (0..n_lines)
                    .map(|line| self.model.force_to_project(line, cell_velocity))
                    .sum()
            };

            // 单位体积体积力 = 模型力 × 缓存权重；源项按单元体积放大
            let force_per_volume = raw_force * entry.weight;
            source[entry.cell] += force_per_volume * mesh.cell_volume(entry.cell);
            self.body_force[entry.cell] = force_per_volume;
        }
    }

    /// 步末协议：控制器查询 → 逻辑或归约进"需要更新" → 主进程落盘
    fn refresh_needs_update(&mut self, time: f64, dt: f64) {
        // 每个进程都要推进控制器状态，但只有主进程的答案是权威的
        let local_flag = self.model.update_controller(time, dt);
        let master_flag = self.comm.is_master() && local_flag;

        // 归约后的决定对所有分区生效：任何分区要求重建，全体重建
        self.needs_update = self.comm.any(master_flag);

        if self.needs_update {
            log::debug!("controller invalidated spatial mappings, caches will rebuild next step");
        }

        if self.comm.is_master() {
            if let Some(dir) = &self.results_dir {
                if let Err(e) = self.model.write_results(dir) {
                    log::error!("failed to persist model results: {e}");
                }
            }
        }
    }

    // =========================================================================
    // 访问器
    // =========================================================================

    /// 模型引用
    #[inline]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// 配置引用
    #[inline]
    pub fn config(&self) -> &CouplingConfig {
        &self.config
    }

    /// 当前投影缓存（尚未构建时为 `None`）
    #[inline]
    pub fn projection_set(&self) -> Option<&ProjectionSet> {
        self.projection.as_ref()
    }

    /// 当前采样缓存（尚未构建时为 `None`）
    #[inline]
    pub fn sampling_set(&self) -> Option<&SamplingSet> {
        self.sampling.as_ref()
    }

    /// "需要更新"标志
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// 单位体积体积力诊断场
    #[inline]
    pub fn body_force(&self) -> &CellVectorField {
        &self.body_force
    }

    /// 投影权重诊断场
    #[inline]
    pub fn body_force_weight(&self) -> &CellScalarField {
        &self.body_force_weight
    }
}
