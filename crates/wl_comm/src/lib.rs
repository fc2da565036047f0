// crates/wl_comm/src/lib.rs

//! 进程间归约通信层
//!
//! 提供耦合核心所需的跨进程归约原语：
//! - [`Communicator`]: 归约接口（求和、取最小、逻辑或）
//! - [`SerialComm`]: 单进程实现（恒等归约）
//! - [`ThreadComm`]: 进程内 SPMD 线程组实现，用于测试与演示
//! - [`master_value`]: 主进程权威值的广播协议
//!
//! # 设计
//!
//! 每个网格分区由一个进程独立推进，归约是唯一的进程间通信手段。
//! 所有归约都是集合操作：每个成员各自贡献本地值，阻塞等待其余成员，
//! 并得到完全相同的归约结果。

pub mod comm;
pub mod local;
pub mod shared;

pub use comm::{Communicator, SerialComm};
pub use local::ThreadComm;
pub use shared::master_value;
