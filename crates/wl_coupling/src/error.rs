// crates/wl_coupling/src/error.rs

//! 耦合核心错误类型
//!
//! 只覆盖构造阶段：配置非法、配置文件读取/解析失败。
//! 时间步内的几何未命中与退化累加都以哨兵/零值就地恢复，
//! 绝不作为错误上抛。

use thiserror::Error;

/// 耦合模块结果类型
pub type CouplingResult<T> = Result<T, CouplingError>;

/// 耦合错误枚举
#[derive(Error, Debug)]
pub enum CouplingError {
    /// 配置项非法
    #[error("配置项非法: {field}, {reason}")]
    InvalidOption {
        field: &'static str,
        reason: String,
    },

    /// 配置解析失败
    #[error("配置解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 配置文件读取失败
    #[error("配置读取失败: {0}")]
    Io(#[from] std::io::Error),
}
