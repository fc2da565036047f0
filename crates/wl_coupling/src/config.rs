// crates/wl_coupling/src/config.rs

//! 耦合配置
//!
//! 构造时读取一次，实例生命周期内不可变（无热重载）。
//! 识别的选项与效果：
//! - `sampling`: 采样策略（点插值 / 体积加权积分）
//! - `dominant_only_sampling`: 积分采样时只把单元贡献记入主导线元
//! - `dominant_only_projection`: 投影时只用主导线元计算力
//! - `projection_weight_limit`: 投影权重阈值，低于它的单元贡献恒为零
//! - `sampling_weight_limit`: 积分采样的权重阈值

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use wl_model::{LineForceModel, SamplingMode};

use crate::error::{CouplingError, CouplingResult};

/// 耦合配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CouplingConfig {
    /// 采样策略
    #[serde(default)]
    pub sampling: SamplingMode,

    /// 积分采样只归因主导线元
    #[serde(default = "default_dominant_only")]
    pub dominant_only_sampling: bool,

    /// 力投影只用主导线元
    #[serde(default = "default_dominant_only")]
    pub dominant_only_projection: bool,

    /// 投影权重阈值
    #[serde(default = "default_projection_weight_limit")]
    pub projection_weight_limit: f64,

    /// 积分采样权重阈值
    #[serde(default = "default_sampling_weight_limit")]
    pub sampling_weight_limit: f64,
}

fn default_dominant_only() -> bool {
    true
}
fn default_projection_weight_limit() -> f64 {
    0.1
}
fn default_sampling_weight_limit() -> f64 {
    0.1
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingMode::default(),
            dominant_only_sampling: default_dominant_only(),
            dominant_only_projection: default_dominant_only(),
            projection_weight_limit: default_projection_weight_limit(),
            sampling_weight_limit: default_sampling_weight_limit(),
        }
    }
}

impl CouplingConfig {
    /// 采用模型自报的策略与阈值
    pub fn from_model<M: LineForceModel>(model: &M) -> Self {
        Self {
            sampling: model.sampling_mode(),
            projection_weight_limit: model.projection_weight_limit(),
            sampling_weight_limit: model.sampling_weight_limit(),
            ..Self::default()
        }
    }

    /// 从 JSON 字符串解析并校验
    pub fn from_json(json: &str) -> CouplingResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件解析并校验
    pub fn from_file<P: AsRef<Path>>(path: P) -> CouplingResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// 校验阈值
    pub fn validate(&self) -> CouplingResult<()> {
        for (field, value) in [
            ("projection_weight_limit", self.projection_weight_limit),
            ("sampling_weight_limit", self.sampling_weight_limit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CouplingError::InvalidOption {
                    field,
                    reason: format!("阈值必须为非负有限数, 得到 {value}"),
                });
            }
        }
        Ok(())
    }
}
