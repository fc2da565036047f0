// crates/wl_model/src/terms.rs

//! 积分采样的逐单元贡献
//!
//! 体积加权速度采样把每个单元的贡献拆成 (3+1) 元组：
//! 三个分子分量（速度 × 权重 × 体积）加一个分母（权重 × 体积）。
//! 各线元独立累加，跨进程求和归约后用分母归一化得到采样速度。

use std::ops::AddAssign;

use glam::DVec3;

/// 单个线元的积分采样项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegralTerms {
    /// 分子：速度 × 权重 × 体积
    pub numerator: DVec3,
    /// 分母：权重 × 体积
    pub denominator: f64,
}

impl IntegralTerms {
    /// 零贡献常量
    pub const ZERO: Self = Self {
        numerator: DVec3::ZERO,
        denominator: 0.0,
    };

    /// 创建新的积分项
    #[inline]
    pub fn new(numerator: DVec3, denominator: f64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// 归一化得到采样速度
    ///
    /// 分母恰好为零时返回 `None`，调用方保留模型的旧速度，
    /// 绝不产生除零的 NaN/Inf。
    #[inline]
    pub fn velocity(&self) -> Option<DVec3> {
        if self.denominator == 0.0 {
            None
        } else {
            Some(self.numerator / self.denominator)
        }
    }

    /// 检查所有分量是否有限
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.numerator.is_finite() && self.denominator.is_finite()
    }
}

impl Default for IntegralTerms {
    fn default() -> Self {
        Self::ZERO
    }
}

impl AddAssign for IntegralTerms {
    fn add_assign(&mut self, rhs: Self) {
        self.numerator += rhs.numerator;
        self.denominator += rhs.denominator;
    }
}
