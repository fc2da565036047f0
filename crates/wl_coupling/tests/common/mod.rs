// crates/wl_coupling/tests/common/mod.rs

//! 集成测试共用的脚本化模型
//!
//! 一个完全确定的 [`LineForceModel`] 测试替身：空间权重由注入的
//! 函数指针给出，投影力是常向量，控制器按脚本逐步返回。
//! 同时记录调用顺序与权重查询次数，供顺序约束与缓存陈旧性
//! 测试断言。

// 各个测试二进制只使用其中一部分辅助方法
#![allow(dead_code)]

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use glam::DVec3;
use wl_model::{IntegralTerms, LineForceModel, SamplingMode};

/// 脚本化线力模型
pub struct ScriptedModel {
    pub mode: SamplingMode,
    pub ctrl_points: Vec<DVec3>,
    /// 空间点 → 权重和（各线元核值视为相同）
    pub weight_fn: fn(DVec3) -> f64,
    /// 常量投影力
    pub force: DVec3,
    pub projection_limit: f64,
    pub sampling_limit: f64,
    pub angle: f64,
    pub velocities: Vec<DVec3>,
    /// 控制器逐次调用的返回值脚本，耗尽后返回 false
    pub controller_script: Vec<bool>,
    controller_calls: usize,
    /// 权重查询计数（缓存重建的开销指标）
    pub weight_queries: AtomicUsize,
    /// 粗粒度调用日志
    pub calls: Mutex<Vec<&'static str>>,
}

impl ScriptedModel {
    pub fn new(
        mode: SamplingMode,
        ctrl_points: Vec<DVec3>,
        weight_fn: fn(DVec3) -> f64,
        force: DVec3,
    ) -> Self {
        let n = ctrl_points.len();
        Self {
            mode,
            ctrl_points,
            weight_fn,
            force,
            projection_limit: 0.1,
            sampling_limit: 0.1,
            angle: 0.0,
            velocities: vec![DVec3::ZERO; n],
            controller_script: Vec::new(),
            controller_calls: 0,
            weight_queries: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_controller_script(mut self, script: Vec<bool>) -> Self {
        self.controller_script = script;
        self
    }

    fn record(&self, event: &'static str) {
        self.calls.lock().unwrap().push(event);
    }

    /// 某事件首次出现的位置
    pub fn first_call_index(&self, event: &str) -> Option<usize> {
        self.calls.lock().unwrap().iter().position(|&e| e == event)
    }

    pub fn weight_query_count(&self) -> usize {
        self.weight_queries.load(Ordering::Relaxed)
    }
}

impl LineForceModel for ScriptedModel {
    fn sampling_mode(&self) -> SamplingMode {
        self.mode
    }

    fn sampling_weight_limit(&self) -> f64 {
        self.sampling_limit
    }

    fn projection_weight_limit(&self) -> f64 {
        self.projection_limit
    }

    fn nr_span_lines(&self) -> usize {
        self.ctrl_points.len()
    }

    fn nr_wings(&self) -> usize {
        1
    }

    fn wing_angle(&self, _wing: usize) -> f64 {
        self.angle
    }

    fn set_wing_angle(&mut self, _wing: usize, angle: f64) {
        self.record("set_wing_angle");
        self.angle = angle;
    }

    fn ctrl_point(&self, line: usize) -> DVec3 {
        self.ctrl_points[line]
    }

    fn velocity_integral_terms(
        &self,
        _line: usize,
        velocity: DVec3,
        cell_center: DVec3,
        cell_volume: f64,
    ) -> IntegralTerms {
        let denominator = cell_volume * (self.weight_fn)(cell_center);
        IntegralTerms::new(velocity * denominator, denominator)
    }

    fn set_velocity(&mut self, line: usize, velocity: DVec3) {
        self.record("set_velocity");
        self.velocities[line] = velocity;
    }

    fn dominant_line_at_point(&self, point: DVec3) -> usize {
        // 最近控制点即主导线元
        let mut best = 0;
        let mut best_d2 = f64::MAX;
        for (line, &ctrl) in self.ctrl_points.iter().enumerate() {
            let d2 = point.distance_squared(ctrl);
            if d2 < best_d2 {
                best_d2 = d2;
                best = line;
            }
        }
        best
    }

    fn summed_projection_weight(&self, point: DVec3) -> f64 {
        self.weight_queries.fetch_add(1, Ordering::Relaxed);
        self.record("summed_projection_weight");
        (self.weight_fn)(point)
    }

    fn force_to_project(&self, _line: usize, _velocity: DVec3) -> DVec3 {
        self.record("force_to_project");
        self.force
    }

    fn advance(&mut self, _time: f64, _dt: f64) {
        self.record("advance");
    }

    fn update_controller(&mut self, _time: f64, _dt: f64) -> bool {
        self.record("update_controller");
        let flag = self
            .controller_script
            .get(self.controller_calls)
            .copied()
            .unwrap_or(false);
        self.controller_calls += 1;
        flag
    }

    fn write_results(&self, _dir: &Path) -> io::Result<()> {
        Ok(())
    }
}
