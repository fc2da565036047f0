// crates/wl_coupling/src/lib.rs

//! 执行器线 / CFD 耦合核心
//!
//! 把 1-D 执行器线力模型耦合到域分解的 3-D 非结构网格：
//! - 速度采样 (sampling) - 点插值与体积加权积分两种策略
//! - 投影缓存 (projection) - 哪些单元接收哪条线元的力，权重几何
//!   只在线几何变化时失效
//! - 步进驱动 (driver) - 每步的同步/重建/采样/推进/投影协议
//! - 配置 (config) - 构造时读取一次的不可变选项
//!
//! # 协调模型
//!
//! 每个进程独立推进一个网格分区（SPMD），核心内部无并发；
//! 所有跨进程一致性都来自显式的归约协议（见 `wl_comm`），
//! 没有锁或事务。采样与投影缓存是网格几何加模型查询的纯函数，
//! 只有步进驱动拥有跨切面的控制流。

pub mod config;
pub mod driver;
pub mod error;
pub mod projection;
pub mod sampling;

pub use config::CouplingConfig;
pub use driver::ActuatorLineCoupling;
pub use error::{CouplingError, CouplingResult};
pub use projection::{ProjectionEntry, ProjectionSet};
pub use sampling::{SampleStation, SamplingSet, StencilEntry, UNSAMPLED_VELOCITY};
