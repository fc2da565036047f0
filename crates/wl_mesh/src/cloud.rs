// crates/wl_mesh/src/cloud.rs

//! 单元云分区
//!
//! 自带的 [`MeshPartition`] 实现：单元以中心点加包围半径表示，
//! 最近单元定位走 R-Tree，场插值用反距离加权（IDW）。
//! 用于测试与演示；生产环境由宿主 CFD 代码提供真实分区视图。
//!
//! # 点定位语义
//!
//! `find_cell` 只在本进程拥有的单元里查找：取最近的单元中心，
//! 当点到中心的距离不超过该单元的包围半径时判定为命中，
//! 否则视为点在分区之外。对均匀六面体网格，最近中心分配
//! 与真实的单元归属一致。

use glam::DVec3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::field::CellVectorField;
use crate::partition::MeshPartition;

/// IDW 插值的最小距离阈值，低于该距离直接取站点值
const MIN_IDW_DISTANCE: f64 = 1e-9;

/// R-Tree 中的单元锚点
#[derive(Debug, Clone)]
struct CellAnchor {
    cell: usize,
    center: [f64; 3],
}

impl RTreeObject for CellAnchor {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.center)
    }
}

impl PointDistance for CellAnchor {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.center[0] - point[0];
        let dy = self.center[1] - point[1];
        let dz = self.center[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// 单元云分区
#[derive(Debug)]
pub struct CellCloudPartition {
    n_cells: usize,
    owned: Vec<usize>,
    centers: Vec<DVec3>,
    volumes: Vec<f64>,
    radii: Vec<f64>,
    tree: RTree<CellAnchor>,
}

impl CellCloudPartition {
    /// 从单元几何数据创建分区
    ///
    /// `centers` / `volumes` / `radii` 覆盖整个网格（长度 `n_cells`），
    /// `owned` 列出本进程拥有的单元编号。
    ///
    /// # Panics
    ///
    /// 数组长度与 `n_cells` 不一致，或 `owned` 中有越界编号时 panic。
    pub fn from_cells(
        n_cells: usize,
        owned: Vec<usize>,
        centers: Vec<DVec3>,
        volumes: Vec<f64>,
        radii: Vec<f64>,
    ) -> Self {
        assert_eq!(centers.len(), n_cells, "cell center count mismatch");
        assert_eq!(volumes.len(), n_cells, "cell volume count mismatch");
        assert_eq!(radii.len(), n_cells, "cell radius count mismatch");
        assert!(
            owned.iter().all(|&c| c < n_cells),
            "owned cell id out of range"
        );

        let anchors: Vec<CellAnchor> = owned
            .iter()
            .map(|&cell| CellAnchor {
                cell,
                center: centers[cell].to_array(),
            })
            .collect();

        Self {
            n_cells,
            owned,
            centers,
            volumes,
            radii,
            tree: RTree::bulk_load(anchors),
        }
    }

    /// 创建均匀六面体块分区（全部单元归本进程）
    ///
    /// 单元按 x 最快、z 最慢的顺序编号。
    pub fn uniform_box(origin: DVec3, cell_size: DVec3, nx: usize, ny: usize, nz: usize) -> Self {
        let n_cells = nx * ny * nz;
        let mut centers = Vec::with_capacity(n_cells);

        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    centers.push(DVec3::new(
                        origin.x + (i as f64 + 0.5) * cell_size.x,
                        origin.y + (j as f64 + 0.5) * cell_size.y,
                        origin.z + (k as f64 + 0.5) * cell_size.z,
                    ));
                }
            }
        }

        let volume = cell_size.x * cell_size.y * cell_size.z;
        let radius = 0.5 * cell_size.length();

        Self::from_cells(
            n_cells,
            (0..n_cells).collect(),
            centers,
            vec![volume; n_cells],
            vec![radius; n_cells],
        )
    }

    /// 以相同几何、不同单元归属派生新分区
    ///
    /// 用于在测试里把同一个网格切成多个进程分区。
    pub fn subset(&self, owned: Vec<usize>) -> Self {
        Self::from_cells(
            self.n_cells,
            owned,
            self.centers.clone(),
            self.volumes.clone(),
            self.radii.clone(),
        )
    }
}

impl MeshPartition for CellCloudPartition {
    #[inline]
    fn owned_cells(&self) -> &[usize] {
        &self.owned
    }

    #[inline]
    fn cell_center(&self, cell: usize) -> DVec3 {
        self.centers[cell]
    }

    #[inline]
    fn cell_volume(&self, cell: usize) -> f64 {
        self.volumes[cell]
    }

    fn find_cell(&self, point: DVec3) -> Option<usize> {
        let nearest = self.tree.nearest_neighbor(&point.to_array())?;
        let dist2 = nearest.distance_2(&point.to_array());
        let radius = self.radii[nearest.cell];

        if dist2 <= radius * radius {
            Some(nearest.cell)
        } else {
            None
        }
    }

    fn interpolate_vector(&self, field: &CellVectorField, point: DVec3, cell: usize) -> DVec3 {
        let search_radius = 2.0 * self.radii[cell];
        let mut sum_weight = 0.0;
        let mut sum_weighted = DVec3::ZERO;

        for anchor in self
            .tree
            .locate_within_distance(point.to_array(), search_radius * search_radius)
        {
            let dist = point.distance(DVec3::from_array(anchor.center));

            // 距离极小时直接取该单元的值
            if dist < MIN_IDW_DISTANCE {
                return field[anchor.cell];
            }

            let weight = 1.0 / (dist * dist);
            sum_weight += weight;
            sum_weighted += field[anchor.cell] * weight;
        }

        if sum_weight < 1e-14 {
            field[cell]
        } else {
            sum_weighted / sum_weight
        }
    }

    #[inline]
    fn n_cells(&self) -> usize {
        self.n_cells
    }
}
