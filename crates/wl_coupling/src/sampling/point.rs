// crates/wl_coupling/src/sampling/point.rs

//! 点插值采样
//!
//! 每条展向线在其控制点处采样：拥有该点的分区在定位单元内插值，
//! 其余分区贡献哨兵大值，逐分量取最小的归约后留下真实采样值。
//! 协议成立的前提是每个控制点至多属于一个分区。
//!
//! 若没有任何分区拥有该点（网格空洞或点在计算域外），哨兵会在
//! 归约后存活。这里显式检测并告警，同时保留模型的旧速度，
//! 而不是把哨兵写进模型。

use glam::DVec3;

use wl_comm::Communicator;
use wl_mesh::{CellVectorField, MeshPartition};
use wl_model::LineForceModel;

use super::SampleStation;

/// 未采样哨兵值，真实流速远小于它，min 归约中必然被淘汰
pub const UNSAMPLED_VELOCITY: f64 = 1.0e30;

/// 超过该值即认定归约结果仍是哨兵
const UNSAMPLED_GUARD: f64 = 0.5e30;

/// 为每条展向线定位控制点
pub fn build_stations<M, P>(model: &M, mesh: &P) -> Vec<SampleStation>
where
    M: LineForceModel,
    P: MeshPartition,
{
    (0..model.nr_span_lines())
        .map(|line| {
            let point = model.ctrl_point(line);
            SampleStation {
                point,
                cell: mesh.find_cell(point),
            }
        })
        .collect()
}

/// 执行一次点采样
///
/// `stations` 为 `None` 时现场定位（缓存尚未构建的回退路径）。
pub fn sample<M, P, C>(
    model: &mut M,
    mesh: &P,
    comm: &C,
    velocity: &CellVectorField,
    stations: Option<&[SampleStation]>,
) where
    M: LineForceModel,
    P: MeshPartition,
    C: Communicator,
{
    let built;
    let stations = match stations {
        Some(stations) => stations,
        None => {
            built = build_stations(model, mesh);
            &built
        }
    };

    for (line, station) in stations.iter().enumerate() {
        let local = match station.cell {
            Some(cell) => mesh.interpolate_vector(velocity, station.point, cell),
            None => DVec3::splat(UNSAMPLED_VELOCITY),
        };

        let reduced = comm.min_vec3(local);

        if reduced.max_element() >= UNSAMPLED_GUARD {
            log::warn!(
                "no partition owns ctrl point {:?} of span line {line}, keeping previous velocity",
                station.point
            );
            continue;
        }

        model.set_velocity(line, reduced);
    }
}
