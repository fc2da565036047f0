// crates/wl_model/src/model.rs

//! 线力模型 trait
//!
//! 耦合核心唯一依赖的模型接口。每个进程持有模型的一个独立完整副本，
//! 副本间的共享状态靠耦合核心的显式同步协议保持一致。

use std::io;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::terms::IntegralTerms;

/// 速度采样策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// 控制点最近单元插值采样
    Point,
    /// 体积加权核积分采样
    #[default]
    Integral,
}

/// 线力模型能力接口
///
/// 所有查询必须返回确定的（可能退化的）值；任何操作都不允许
/// 在时间步内向调用方抛错。模型实例被其所属进程独占持有与变更。
pub trait LineForceModel: Send + Sync {
    /// 模型期望的采样策略
    fn sampling_mode(&self) -> SamplingMode;

    /// 积分采样的权重阈值
    fn sampling_weight_limit(&self) -> f64;

    /// 力投影的权重阈值
    fn projection_weight_limit(&self) -> f64;

    /// 展向线数量
    fn nr_span_lines(&self) -> usize;

    /// 翼数量
    fn nr_wings(&self) -> usize;

    /// 读取某个翼的可控角
    fn wing_angle(&self, wing: usize) -> f64;

    /// 写入某个翼的可控角（跨进程同步后回写）
    fn set_wing_angle(&mut self, wing: usize, angle: f64);

    /// 某条展向线的控制点
    fn ctrl_point(&self, line: usize) -> DVec3;

    /// 给定单元的速度、中心与体积，计算某条线元的积分采样项
    fn velocity_integral_terms(
        &self,
        line: usize,
        velocity: DVec3,
        cell_center: DVec3,
        cell_volume: f64,
    ) -> IntegralTerms;

    /// 写入某条线元的采样速度
    fn set_velocity(&mut self, line: usize, velocity: DVec3);

    /// 空间点处的主导线元索引
    fn dominant_line_at_point(&self, point: DVec3) -> usize;

    /// 空间点处所有线元的投影权重之和
    fn summed_projection_weight(&self, point: DVec3) -> f64;

    /// 给定线元与单元速度，计算待投影的力
    ///
    /// 返回值尚未乘以投影权重与单元体积，由耦合核心完成。
    fn force_to_project(&self, line: usize, velocity: DVec3) -> DVec3;

    /// 推进一个时间步
    fn advance(&mut self, time: f64, dt: f64);

    /// 运行控制器更新
    ///
    /// 返回 `true` 表示控制器动作使空间映射失效，需要重建缓存。
    /// 只有主进程的返回值是权威的。
    fn update_controller(&mut self, time: f64, dt: f64) -> bool;

    /// 把累计结果写入目录（仅主进程调用）
    fn write_results(&self, dir: &Path) -> io::Result<()>;
}
