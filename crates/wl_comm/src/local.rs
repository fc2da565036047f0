// crates/wl_comm/src/local.rs

//! 进程内 SPMD 线程组通信器
//!
//! 用线程模拟分布式运行时：每个"进程"是一个线程，归约通过共享槽位
//! 加双栅栏交换实现。行为与真实分布式归约一致（集合、阻塞、
//! 所有成员得到相同结果），因此可以在单元测试里验证跨分区协议。
//!
//! # 使用示例
//!
//! ```
//! use wl_comm::{Communicator, ThreadComm};
//!
//! let comms = ThreadComm::group(3);
//! let handles: Vec<_> = comms
//!     .into_iter()
//!     .map(|comm| {
//!         std::thread::spawn(move || comm.sum_scalar(comm.rank() as f64))
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     // 0 + 1 + 2
//!     assert_eq!(handle.join().unwrap(), 3.0);
//! }
//! ```

use std::sync::{Arc, Barrier};

use glam::DVec3;
use parking_lot::Mutex;

use crate::comm::Communicator;

/// 线程组共享状态
struct GroupShared {
    n_ranks: usize,
    /// 每个成员一个槽位，归约前写入本地贡献
    slots: Mutex<Vec<[f64; 3]>>,
    barrier: Barrier,
}

/// 进程内线程组通信器
///
/// 通过 [`ThreadComm::group`] 一次性创建整组成员，再把每个成员移动到
/// 各自的线程中运行。所有归约按固定的成员序号顺序折叠，
/// 因此每个成员得到逐位相同的结果。
pub struct ThreadComm {
    rank: usize,
    shared: Arc<GroupShared>,
}

impl ThreadComm {
    /// 创建一个 `n_ranks` 个成员的通信组
    ///
    /// # Panics
    ///
    /// `n_ranks` 为 0 时 panic。
    pub fn group(n_ranks: usize) -> Vec<ThreadComm> {
        assert!(n_ranks > 0, "ThreadComm group requires at least one rank");

        let shared = Arc::new(GroupShared {
            n_ranks,
            slots: Mutex::new(vec![[0.0; 3]; n_ranks]),
            barrier: Barrier::new(n_ranks),
        });

        (0..n_ranks)
            .map(|rank| ThreadComm {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect()
    }

    /// 通用归约：写入本地槽位，栅栏同步，按序号顺序折叠
    ///
    /// 第二道栅栏保证所有成员读完槽位后才允许下一次归约复用槽位。
    fn allreduce(&self, value: [f64; 3], op: fn([f64; 3], [f64; 3]) -> [f64; 3]) -> [f64; 3] {
        {
            let mut slots = self.shared.slots.lock();
            slots[self.rank] = value;
        }
        self.shared.barrier.wait();

        let result = {
            let slots = self.shared.slots.lock();
            let mut acc = slots[0];
            for rank in 1..self.shared.n_ranks {
                acc = op(acc, slots[rank]);
            }
            acc
        };
        self.shared.barrier.wait();

        result
    }
}

fn add3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn min3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])]
}

fn max3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])]
}

impl Communicator for ThreadComm {
    #[inline]
    fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    fn n_ranks(&self) -> usize {
        self.shared.n_ranks
    }

    fn sum_scalar(&self, value: f64) -> f64 {
        self.allreduce([value, 0.0, 0.0], add3)[0]
    }

    fn sum_vec3(&self, value: DVec3) -> DVec3 {
        let out = self.allreduce(value.to_array(), add3);
        DVec3::from_array(out)
    }

    fn min_vec3(&self, value: DVec3) -> DVec3 {
        let out = self.allreduce(value.to_array(), min3);
        DVec3::from_array(out)
    }

    fn any(&self, value: bool) -> bool {
        let flag = if value { 1.0 } else { 0.0 };
        self.allreduce([flag, 0.0, 0.0], max3)[0] > 0.5
    }
}
