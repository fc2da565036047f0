// crates/wl_mesh/src/lib.rs

//! 网格分区视图与单元场
//!
//! 提供耦合核心消费的宿主网格接口：
//! - [`MeshPartition`]: 本进程网格分区的只读视图
//! - [`CellVectorField`] / [`CellScalarField`]: 覆盖整个分区的逐单元场
//! - [`CellCloudPartition`]: 自带的分区实现（R-Tree 最近单元定位 + IDW 插值），
//!   用于测试与演示
//!
//! # 设计原则
//!
//! 宿主的网格与场数据结构不属于本工作区，这里只定义耦合核心依赖的
//! 最小接口：有序的本地单元列表、单元中心与体积、最近单元点定位、
//! 以及场插值原语。

pub mod cloud;
pub mod field;
pub mod partition;

pub use cloud::CellCloudPartition;
pub use field::{CellScalarField, CellVectorField};
pub use partition::MeshPartition;
