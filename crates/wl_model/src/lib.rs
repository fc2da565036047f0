// crates/wl_model/src/lib.rs

//! 线力模型能力接口
//!
//! 外部的 1-D 执行器线模型（环量求解、控制器、翼运动）不属于本工作区，
//! 耦合核心只通过 [`LineForceModel`] trait 消费它：
//! - 查询：采样策略、权重阈值、展向线/翼数量、控制点、逐单元积分项、
//!   主导线元、待投影力、某点的权重和、翼角读取
//! - 变更：按索引写入速度、推进一个时间步、控制器更新、翼角写入、结果落盘
//!
//! 所有查询都是值进值出，不跨边界抛错；几何未命中等情况返回退化值
//! （零权重、零积分项）。
//!
//! [`GaussianWingModel`] 是自带的解析模型：直线翼、各向同性高斯核、
//! 环量式投影力，用于集成测试与演示。

pub mod gaussian;
pub mod model;
pub mod terms;

pub use gaussian::{ControllerSettings, GaussianWingBuilder, GaussianWingModel, ModelError, StepRecord};
pub use model::{LineForceModel, SamplingMode};
pub use terms::IntegralTerms;
