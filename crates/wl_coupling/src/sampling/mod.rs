// crates/wl_coupling/src/sampling/mod.rs

//! 速度采样
//!
//! 把本地分区的速度场翻译成外部模型每条展向线"看到"的来流速度。
//! 两种可互换的策略，在构造时由配置选定：
//! - [`point`]: 控制点最近单元插值，廉价且在单点处精确，
//!   但对控制点附近的网格分辨率敏感
//! - [`integral`]: 体积加权核积分，开销更大，但当展向线贴近单元
//!   边界或低分辨率区域时更稳健，因为它在核加权的邻域上做平均
//!
//! 两种策略各自维护一份派生缓存（[`SamplingSet`]），生命周期与
//! 投影缓存相同：懒构建、整体替换、"需要更新"置位时重建。

pub mod integral;
pub mod point;

use glam::DVec3;

use wl_comm::Communicator;
use wl_mesh::{CellVectorField, MeshPartition};
use wl_model::{LineForceModel, SamplingMode};

pub use point::UNSAMPLED_VELOCITY;

/// 点采样站点：一条展向线的控制点及其定位结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStation {
    /// 控制点坐标
    pub point: DVec3,
    /// 定位到的本地单元，点在分区外时为 `None`
    pub cell: Option<usize>,
}

/// 积分采样模板条目：一个相关单元及其主导线元
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilEntry {
    /// 单元编号
    pub cell: usize,
    /// 该单元中心处的主导线元
    pub line: usize,
}

/// 采样缓存，形状随策略而定
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingSet {
    /// 点采样：每条展向线一个站点
    Point(Vec<SampleStation>),
    /// 积分采样：权重超过采样阈值的单元集合
    Integral(Vec<StencilEntry>),
}

impl SamplingSet {
    /// 按策略构建采样缓存
    pub fn build<M, P>(mode: SamplingMode, model: &M, mesh: &P, sampling_weight_limit: f64) -> Self
    where
        M: LineForceModel,
        P: MeshPartition + Sync,
    {
        match mode {
            SamplingMode::Point => Self::Point(point::build_stations(model, mesh)),
            SamplingMode::Integral => {
                Self::Integral(integral::build_stencil(model, mesh, sampling_weight_limit))
            }
        }
    }

    /// 缓存覆盖的条目数量
    pub fn len(&self) -> usize {
        match self {
            Self::Point(stations) => stations.len(),
            Self::Integral(entries) => entries.len(),
        }
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 按策略执行一次采样，把速度写入模型
///
/// `set` 为 `None`（或形状与策略不符）时走无缓存回退路径：
/// 点采样现场定位控制点，积分采样扫描全部本地单元。
pub fn sample<M, P, C>(
    model: &mut M,
    mesh: &P,
    comm: &C,
    velocity: &CellVectorField,
    set: Option<&SamplingSet>,
    mode: SamplingMode,
    dominant_only: bool,
) where
    M: LineForceModel,
    P: MeshPartition,
    C: Communicator,
{
    match (mode, set) {
        (SamplingMode::Point, Some(SamplingSet::Point(stations))) => {
            point::sample(model, mesh, comm, velocity, Some(stations));
        }
        (SamplingMode::Point, _) => {
            point::sample(model, mesh, comm, velocity, None);
        }
        (SamplingMode::Integral, Some(SamplingSet::Integral(entries))) => {
            integral::sample(model, mesh, comm, velocity, Some(entries), dominant_only);
        }
        (SamplingMode::Integral, _) => {
            integral::sample(model, mesh, comm, velocity, None, dominant_only);
        }
    }
}
