// crates/wl_mesh/src/partition.rs

//! 网格分区只读视图
//!
//! 域分解下每个进程只能看到自己的分区。视图每步由宿主隐式刷新，
//! 耦合核心不持有它，只在调用期间借用。

use glam::DVec3;

use crate::field::CellVectorField;

/// 本进程网格分区的只读视图
///
/// `cell` 参数一律是宿主网格的单元编号，与场的下标一致。
/// 对非本地单元调用 `cell_center` / `cell_volume` 属于调用方错误。
pub trait MeshPartition {
    /// 本进程拥有的单元编号（有序，重建缓存时的遍历顺序）
    fn owned_cells(&self) -> &[usize];

    /// 单元中心坐标
    fn cell_center(&self, cell: usize) -> DVec3;

    /// 单元体积
    fn cell_volume(&self, cell: usize) -> f64;

    /// 最近单元点定位
    ///
    /// 点落在本分区之外时返回 `None`。每个点至多属于一个分区。
    fn find_cell(&self, point: DVec3) -> Option<usize>;

    /// 在指定单元附近对向量场插值
    ///
    /// `cell` 必须是此前 `find_cell(point)` 的结果。
    fn interpolate_vector(&self, field: &CellVectorField, point: DVec3, cell: usize) -> DVec3;

    /// 分区覆盖的场长度（含非本地单元）
    fn n_cells(&self) -> usize;
}
