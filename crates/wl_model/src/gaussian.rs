// crates/wl_model/src/gaussian.rs

//! 内置高斯翼模型
//!
//! 一个自洽的解析线力模型：直线翼均分为若干展向线元，投影核取
//! 各向同性高斯 `exp(-d²/2ε²)`，投影力按环量式升力
//! `ρ Γ (ŝ × v) ℓ` 计算，环量与单个可控翼角成正比。
//!
//! 不含环量求解器与升阻力曲线，那些属于外部模型。这里只提供
//! 一个行为确定、可序列化配置的模型，让耦合核心可以被端到端
//! 驱动与测试。
//!
//! # 使用示例
//!
//! ```
//! use wl_model::{GaussianWingBuilder, LineForceModel};
//!
//! let model = GaussianWingBuilder {
//!     root: [0.0, 0.0, 0.0],
//!     tip: [0.0, 0.0, 4.0],
//!     n_span_lines: 8,
//!     ..GaussianWingBuilder::default()
//! }
//! .build()
//! .unwrap();
//!
//! assert_eq!(model.nr_span_lines(), 8);
//! ```

use std::fs;
use std::io;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{LineForceModel, SamplingMode};
use crate::terms::IntegralTerms;

/// 模型构建/配置错误
///
/// 只在构造阶段出现；时间步内的一切查询都不会失败。
#[derive(Error, Debug)]
pub enum ModelError {
    /// 参数非法
    #[error("模型参数非法: {field}, {reason}")]
    InvalidParameter {
        field: &'static str,
        reason: String,
    },

    /// JSON 解析失败
    #[error("模型配置解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 配置文件读取失败
    #[error("模型配置读取失败: {0}")]
    Io(#[from] io::Error),
}

/// 定间隔翼角控制器设置
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControllerSettings {
    /// 控制器动作间隔 [s]
    pub interval: f64,
    /// 翼角调整速率 [rad/s]
    pub angle_rate: f64,
}

/// 高斯翼模型构建器
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaussianWingBuilder {
    /// 翼根位置
    pub root: [f64; 3],
    /// 翼梢位置
    pub tip: [f64; 3],
    /// 展向线元数量
    pub n_span_lines: usize,
    /// 高斯核光滑长度 ε [m]
    #[serde(default = "default_smoothing_length")]
    pub smoothing_length: f64,
    /// 流体密度 [kg/m³]
    #[serde(default = "default_density")]
    pub density: f64,
    /// 单位翼角对应的环量 [m²/s/rad]
    #[serde(default = "default_circulation_per_angle")]
    pub circulation_per_angle: f64,
    /// 初始翼角 [rad]
    #[serde(default)]
    pub initial_angle: f64,
    /// 采样策略
    #[serde(default)]
    pub sampling: SamplingMode,
    /// 力投影权重阈值
    #[serde(default = "default_projection_weight_limit")]
    pub projection_weight_limit: f64,
    /// 积分采样权重阈值
    #[serde(default = "default_sampling_weight_limit")]
    pub sampling_weight_limit: f64,
    /// 可选的定间隔控制器
    #[serde(default)]
    pub controller: Option<ControllerSettings>,
}

fn default_smoothing_length() -> f64 {
    0.5
}
fn default_density() -> f64 {
    1.0
}
fn default_circulation_per_angle() -> f64 {
    1.0
}
fn default_projection_weight_limit() -> f64 {
    0.001
}
fn default_sampling_weight_limit() -> f64 {
    0.1
}

impl Default for GaussianWingBuilder {
    fn default() -> Self {
        Self {
            root: [0.0; 3],
            tip: [0.0, 0.0, 1.0],
            n_span_lines: 4,
            smoothing_length: default_smoothing_length(),
            density: default_density(),
            circulation_per_angle: default_circulation_per_angle(),
            initial_angle: 0.0,
            sampling: SamplingMode::default(),
            projection_weight_limit: default_projection_weight_limit(),
            sampling_weight_limit: default_sampling_weight_limit(),
            controller: None,
        }
    }
}

impl GaussianWingBuilder {
    /// 校验并构建模型
    pub fn build(&self) -> Result<GaussianWingModel, ModelError> {
        if self.n_span_lines == 0 {
            return Err(ModelError::InvalidParameter {
                field: "n_span_lines",
                reason: "至少需要一个展向线元".to_string(),
            });
        }
        if !(self.smoothing_length > 0.0) {
            return Err(ModelError::InvalidParameter {
                field: "smoothing_length",
                reason: format!("必须为正数, 得到 {}", self.smoothing_length),
            });
        }

        let root = DVec3::from_array(self.root);
        let tip = DVec3::from_array(self.tip);
        let span = tip - root;
        let span_length = span.length();

        if span_length <= 0.0 {
            return Err(ModelError::InvalidParameter {
                field: "tip",
                reason: "翼根与翼梢重合".to_string(),
            });
        }

        for (field, value) in [
            ("projection_weight_limit", self.projection_weight_limit),
            ("sampling_weight_limit", self.sampling_weight_limit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidParameter {
                    field,
                    reason: format!("阈值必须为非负有限数, 得到 {value}"),
                });
            }
        }

        let n = self.n_span_lines;
        let span_dir = span / span_length;
        let element_length = span_length / n as f64;

        // 控制点取各线元中点
        let ctrl_points = (0..n)
            .map(|i| root + span_dir * ((i as f64 + 0.5) * element_length))
            .collect();

        Ok(GaussianWingModel {
            ctrl_points,
            span_dir,
            element_length,
            smoothing_length: self.smoothing_length,
            density: self.density,
            circulation_per_angle: self.circulation_per_angle,
            angle: self.initial_angle,
            velocities: vec![DVec3::ZERO; n],
            sampling: self.sampling,
            projection_weight_limit: self.projection_weight_limit,
            sampling_weight_limit: self.sampling_weight_limit,
            controller: self.controller,
            last_controller_time: f64::NEG_INFINITY,
            results: Vec::new(),
        })
    }
}

/// 单步结果记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// 模拟时间 [s]
    pub time: f64,
    /// 当前翼角 [rad]
    pub angle: f64,
    /// 各线元采样速度
    pub velocities: Vec<[f64; 3]>,
    /// 各线元投影力（以采样速度计）
    pub forces: Vec<[f64; 3]>,
}

/// 内置高斯翼模型
#[derive(Debug, Clone)]
pub struct GaussianWingModel {
    ctrl_points: Vec<DVec3>,
    span_dir: DVec3,
    element_length: f64,
    smoothing_length: f64,
    density: f64,
    circulation_per_angle: f64,
    angle: f64,
    velocities: Vec<DVec3>,
    sampling: SamplingMode,
    projection_weight_limit: f64,
    sampling_weight_limit: f64,
    controller: Option<ControllerSettings>,
    last_controller_time: f64,
    results: Vec<StepRecord>,
}

impl GaussianWingModel {
    /// 从 JSON 字符串构建
    pub fn new_from_str(builder_json: &str) -> Result<Self, ModelError> {
        let builder: GaussianWingBuilder = serde_json::from_str(builder_json)?;
        builder.build()
    }

    /// 从 JSON 文件构建
    pub fn new_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let contents = fs::read_to_string(path)?;
        Self::new_from_str(&contents)
    }

    /// 某条线元在空间点处的高斯核值
    fn kernel(&self, line: usize, point: DVec3) -> f64 {
        let d2 = point.distance_squared(self.ctrl_points[line]);
        (-d2 / (2.0 * self.smoothing_length * self.smoothing_length)).exp()
    }

    /// 当前环量
    #[inline]
    fn circulation(&self) -> f64 {
        self.circulation_per_angle * self.angle
    }

    /// 已记录的步数
    pub fn n_records(&self) -> usize {
        self.results.len()
    }

    /// 某条线元当前持有的速度
    pub fn velocity(&self, line: usize) -> DVec3 {
        self.velocities[line]
    }
}

impl LineForceModel for GaussianWingModel {
    fn sampling_mode(&self) -> SamplingMode {
        self.sampling
    }

    fn sampling_weight_limit(&self) -> f64 {
        self.sampling_weight_limit
    }

    fn projection_weight_limit(&self) -> f64 {
        self.projection_weight_limit
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
        self.angle = angle;
    }

    fn ctrl_point(&self, line: usize) -> DVec3 {
        self.ctrl_points[line]
    }

    fn velocity_integral_terms(
        &self,
        line: usize,
        velocity: DVec3,
        cell_center: DVec3,
        cell_volume: f64,
    ) -> IntegralTerms {
        let denominator = cell_volume * self.kernel(line, cell_center);
        IntegralTerms::new(velocity * denominator, denominator)
    }

    fn set_velocity(&mut self, line: usize, velocity: DVec3) {
        self.velocities[line] = velocity;
    }

    fn dominant_line_at_point(&self, point: DVec3) -> usize {
        let mut best = 0;
        let mut best_weight = f64::NEG_INFINITY;

        for line in 0..self.ctrl_points.len() {
            let w = self.kernel(line, point);
            if w > best_weight {
                best_weight = w;
                best = line;
            }
        }

        best
    }

    fn summed_projection_weight(&self, point: DVec3) -> f64 {
        (0..self.ctrl_points.len())
            .map(|line| self.kernel(line, point))
            .sum()
    }

    fn force_to_project(&self, _line: usize, velocity: DVec3) -> DVec3 {
        // 环量式升力，方向垂直于来流与展向
        self.density * self.circulation() * self.element_length * self.span_dir.cross(velocity)
    }

    fn advance(&mut self, time: f64, _dt: f64) {
        let forces: Vec<[f64; 3]> = (0..self.ctrl_points.len())
            .map(|line| self.force_to_project(line, self.velocities[line]).to_array())
            .collect();

        self.results.push(StepRecord {
            time,
            angle: self.angle,
            velocities: self.velocities.iter().map(|v| v.to_array()).collect(),
            forces,
        });
    }

    fn update_controller(&mut self, time: f64, _dt: f64) -> bool {
        let Some(controller) = self.controller else {
            return false;
        };

        if time - self.last_controller_time < controller.interval {
            return false;
        }

        self.angle += controller.angle_rate * controller.interval;
        self.last_controller_time = time;
        log::debug!("controller adjusted wing angle to {:.6} rad at t={time}", self.angle);

        true
    }

    fn write_results(&self, dir: &Path) -> io::Result<()> {
        let serialized = serde_json::to_string_pretty(&self.results)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(dir.join("windline_results.json"), serialized)
    }
}
