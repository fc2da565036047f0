// crates/wl_comm/src/comm.rs

//! 归约通信接口
//!
//! 定义耦合核心消费的全部归约操作。接口刻意保持很小：
//! 标量求和、三维向量求和、三维向量逐分量取最小、布尔逻辑或，
//! 以及主进程判定。底层分布式运行时（MPI 等）由宿主适配。

use glam::DVec3;

/// 归约通信接口
///
/// 所有归约都是集合操作：组内每个成员必须以相同的顺序调用相同的
/// 归约，否则会死锁或得到错误结果。归约算子均为交换且结合的，
/// 因此成员的遍历顺序不影响结果（浮点求和顺序敏感性除外）。
pub trait Communicator: Send + Sync {
    /// 当前进程在组内的序号
    fn rank(&self) -> usize;

    /// 组内进程数量
    fn n_ranks(&self) -> usize;

    /// 当前进程是否为主进程
    ///
    /// 主进程负责权威状态读取与结果落盘。
    #[inline]
    fn is_master(&self) -> bool {
        self.rank() == 0
    }

    /// 标量跨进程求和
    fn sum_scalar(&self, value: f64) -> f64;

    /// 三维向量跨进程求和
    fn sum_vec3(&self, value: DVec3) -> DVec3;

    /// 三维向量跨进程逐分量取最小
    fn min_vec3(&self, value: DVec3) -> DVec3;

    /// 布尔值跨进程逻辑或
    fn any(&self, value: bool) -> bool;
}

/// 单进程通信器
///
/// 所有归约都是恒等操作。用于串行运行与单分区测试。
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComm;

impl Communicator for SerialComm {
    #[inline]
    fn rank(&self) -> usize {
        0
    }

    #[inline]
    fn n_ranks(&self) -> usize {
        1
    }

    #[inline]
    fn sum_scalar(&self, value: f64) -> f64 {
        value
    }

    #[inline]
    fn sum_vec3(&self, value: DVec3) -> DVec3 {
        value
    }

    #[inline]
    fn min_vec3(&self, value: DVec3) -> DVec3 {
        value
    }

    #[inline]
    fn any(&self, value: bool) -> bool {
        value
    }
}
