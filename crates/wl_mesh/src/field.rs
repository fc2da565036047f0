// crates/wl_mesh/src/field.rs

//! 逐单元场
//!
//! 覆盖整个分区的向量/标量场，按单元编号索引。
//! 耦合核心每步写入两个诊断场（单位体积体积力、投影权重），
//! 以及动量方程源项的累加目标。

use std::ops::{Index, IndexMut};

use glam::DVec3;

/// 逐单元向量场
#[derive(Debug, Clone, PartialEq)]
pub struct CellVectorField {
    data: Vec<DVec3>,
}

impl CellVectorField {
    /// 创建全零场
    pub fn zeros(n_cells: usize) -> Self {
        Self {
            data: vec![DVec3::ZERO; n_cells],
        }
    }

    /// 场长度
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 全场置零
    pub fn fill_zero(&mut self) {
        self.data.fill(DVec3::ZERO);
    }

    /// 只读切片
    #[inline]
    pub fn as_slice(&self) -> &[DVec3] {
        &self.data
    }

    /// 全场求和（诊断用）
    pub fn total(&self) -> DVec3 {
        self.data.iter().copied().sum()
    }
}

impl Index<usize> for CellVectorField {
    type Output = DVec3;

    #[inline]
    fn index(&self, cell: usize) -> &DVec3 {
        &self.data[cell]
    }
}

impl IndexMut<usize> for CellVectorField {
    #[inline]
    fn index_mut(&mut self, cell: usize) -> &mut DVec3 {
        &mut self.data[cell]
    }
}

/// 逐单元标量场
#[derive(Debug, Clone, PartialEq)]
pub struct CellScalarField {
    data: Vec<f64>,
}

impl CellScalarField {
    /// 创建全零场
    pub fn zeros(n_cells: usize) -> Self {
        Self {
            data: vec![0.0; n_cells],
        }
    }

    /// 场长度
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 全场置零
    pub fn fill_zero(&mut self) {
        self.data.fill(0.0);
    }

    /// 只读切片
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<usize> for CellScalarField {
    type Output = f64;

    #[inline]
    fn index(&self, cell: usize) -> &f64 {
        &self.data[cell]
    }
}

impl IndexMut<usize> for CellScalarField {
    #[inline]
    fn index_mut(&mut self, cell: usize) -> &mut f64 {
        &mut self.data[cell]
    }
}
