// crates/wl_comm/src/shared.rs

//! 主进程权威值的同步协议
//!
//! 每个进程各自持有外部模型的完整副本，其中部分标量状态（如翼角）
//! 在逻辑上是全局唯一的。同步协议：主进程贡献权威值，其余进程贡献
//! 对求和中性的 0.0，求和归约后所有进程写回同一个值。
//!
//! 该协议成立的前提是恰好一个进程对每个被同步量是权威的，
//! 且非主进程的贡献为零。

use crate::comm::Communicator;

/// 把主进程的权威标量广播到组内所有进程
///
/// `local` 是本进程读到的值；只有主进程的读取被保留，
/// 其余进程的贡献被替换为 0.0。返回值在所有进程上相同。
pub fn master_value<C: Communicator>(comm: &C, local: f64) -> f64 {
    let contribution = if comm.is_master() { local } else { 0.0 };
    comm.sum_scalar(contribution)
}
