// crates/wl_coupling/src/projection.rs

//! 投影缓存
//!
//! 记录哪些本地单元接收线元的力贡献：对每个本地单元在其中心查询
//! 模型的空间权重，超过阈值的单元进入缓存，同时记录该点的主导线元
//! 与权重值；低于阈值的单元不入缓存，其贡献定义为恰好为零。
//!
//! 这是逐单元独立的纯几何计算，无需跨进程归约，但它是核心的主要
//! 开销（O(本地单元数 × 模型查询)），因此只在"需要更新"标志置位时
//! 重建，而不是每步无条件重算。
//!
//! # 生命周期
//!
//! 缓存是不可变快照：重建时整体替换，从不原地修补；条目顺序与
//! 重建时的本地单元顺序一致。

use rayon::prelude::*;

use wl_mesh::{CellScalarField, MeshPartition};
use wl_model::LineForceModel;

/// 投影缓存条目
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionEntry {
    /// 单元编号
    pub cell: usize,
    /// 该单元中心处的主导线元
    pub line: usize,
    /// 模型在该单元中心报告的权重和
    pub weight: f64,
}

/// 投影缓存
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSet {
    entries: Vec<ProjectionEntry>,
}

impl ProjectionSet {
    /// 扫描本地单元构建缓存，并写入权重诊断场
    ///
    /// 诊断场覆盖全部本地单元：超过阈值的单元写入模型报告的权重，
    /// 其余单元写入恰好的 0.0。
    pub fn build<M, P>(
        model: &M,
        mesh: &P,
        weight_limit: f64,
        weight_field: &mut CellScalarField,
    ) -> Self
    where
        M: LineForceModel,
        P: MeshPartition + Sync,
    {
        let owned = mesh.owned_cells();

        // 权重查询是主要开销，并行扫描
        let weights: Vec<f64> = owned
            .par_iter()
            .map(|&cell| model.summed_projection_weight(mesh.cell_center(cell)))
            .collect();

        let mut entries = Vec::new();

        for (&cell, &weight) in owned.iter().zip(weights.iter()) {
            if weight > weight_limit {
                entries.push(ProjectionEntry {
                    cell,
                    line: model.dominant_line_at_point(mesh.cell_center(cell)),
                    weight,
                });
                weight_field[cell] = weight;
            } else {
                weight_field[cell] = 0.0;
            }
        }

        log::debug!(
            "projection cache rebuilt: {} of {} owned cells above limit {}",
            entries.len(),
            owned.len(),
            weight_limit
        );

        Self { entries }
    }

    /// 缓存条目（顺序与重建时的本地单元顺序一致）
    #[inline]
    pub fn entries(&self) -> &[ProjectionEntry] {
        &self.entries
    }

    /// 条目数量
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use wl_mesh::CellCloudPartition;
    use wl_model::GaussianWingBuilder;

    fn wing_and_mesh() -> (wl_model::GaussianWingModel, CellCloudPartition) {
        // 翼沿 z 轴，网格沿 x 轴延伸，远端单元权重衰减到阈值之下
        let model = GaussianWingBuilder {
            root: [0.0, 0.0, -0.5],
            tip: [0.0, 0.0, 0.5],
            n_span_lines: 2,
            smoothing_length: 0.4,
            ..GaussianWingBuilder::default()
        }
        .build()
        .unwrap();

        let mesh = CellCloudPartition::uniform_box(
            DVec3::new(-0.5, -0.5, -0.5),
            DVec3::ONE,
            6,
            1,
            1,
        );

        (model, mesh)
    }

    #[test]
    fn test_threshold_consistency() {
        let (model, mesh) = wing_and_mesh();
        let mut weight_field = CellScalarField::zeros(mesh.n_cells());

        let set = ProjectionSet::build(&model, &mesh, 0.1, &mut weight_field);

        use wl_model::LineForceModel;
        for &cell in mesh.owned_cells() {
            let weight = model.summed_projection_weight(mesh.cell_center(cell));
            let in_set = set.entries().iter().any(|e| e.cell == cell);

            if weight > 0.1 {
                assert!(in_set, "cell {cell} above limit must be cached");
                assert_eq!(weight_field[cell], weight);
            } else {
                assert!(!in_set, "cell {cell} below limit must be absent");
                assert_eq!(weight_field[cell], 0.0);
            }
        }
    }

    #[test]
    fn test_entries_follow_owned_cell_order() {
        let (model, mesh) = wing_and_mesh();
        let mut weight_field = CellScalarField::zeros(mesh.n_cells());

        let set = ProjectionSet::build(&model, &mesh, 0.0, &mut weight_field);

        let cells: Vec<usize> = set.entries().iter().map(|e| e.cell).collect();
        let mut sorted = cells.clone();
        sorted.sort_unstable();
        assert_eq!(cells, sorted);
    }

    #[test]
    fn test_rebuild_replaces_snapshot_wholesale() {
        let (model, mesh) = wing_and_mesh();
        let mut weight_field = CellScalarField::zeros(mesh.n_cells());

        let first = ProjectionSet::build(&model, &mesh, 0.1, &mut weight_field);
        let second = ProjectionSet::build(&model, &mesh, 0.1, &mut weight_field);

        // 同一几何下重建得到相同内容的新快照
        assert_eq!(first, second);
    }
}
