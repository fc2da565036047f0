// crates/wl_coupling/src/sampling/integral.rs

//! 体积加权积分采样
//!
//! 对每个相关单元向模型查询 (3+1) 积分项（分子三分量 + 分母），
//! 按线元独立累加，再对每条线元做跨进程求和归约，最后用
//! 分母归一化得到采样速度。分母恰好为零的线元跳过更新，
//! 模型保留旧值，绝不产生除零结果。
//!
//! 单元贡献的归因方式由配置决定：只记入该单元的主导线元，
//! 或累加进每条线元的累计量。

use rayon::prelude::*;

use wl_comm::Communicator;
use wl_mesh::{CellVectorField, MeshPartition};
use wl_model::{IntegralTerms, LineForceModel};

use super::StencilEntry;

/// 扫描本地单元，构建积分采样模板
///
/// 与投影缓存同样的阈值扫描，只是阈值取采样阈值。
pub fn build_stencil<M, P>(model: &M, mesh: &P, weight_limit: f64) -> Vec<StencilEntry>
where
    M: LineForceModel,
    P: MeshPartition + Sync,
{
    let owned = mesh.owned_cells();

    let weights: Vec<f64> = owned
        .par_iter()
        .map(|&cell| model.summed_projection_weight(mesh.cell_center(cell)))
        .collect();

    let entries: Vec<StencilEntry> = owned
        .iter()
        .zip(weights.iter())
        .filter(|&(_, &weight)| weight > weight_limit)
        .map(|(&cell, _)| StencilEntry {
            cell,
            line: model.dominant_line_at_point(mesh.cell_center(cell)),
        })
        .collect();

    log::debug!(
        "sampling stencil rebuilt: {} of {} owned cells above limit {}",
        entries.len(),
        owned.len(),
        weight_limit
    );

    entries
}

/// 执行一次积分采样
///
/// `stencil` 为 `None` 时扫描全部本地单元（缓存尚未构建的回退路径）。
pub fn sample<M, P, C>(
    model: &mut M,
    mesh: &P,
    comm: &C,
    velocity: &CellVectorField,
    stencil: Option<&[StencilEntry]>,
    dominant_only: bool,
) where
    M: LineForceModel,
    P: MeshPartition,
    C: Communicator,
{
    let n_lines = model.nr_span_lines();
    let mut accumulated = vec![IntegralTerms::ZERO; n_lines];

    match stencil {
        Some(entries) => {
            for entry in entries {
                accumulate_cell(
                    model,
                    mesh,
                    velocity,
                    entry.cell,
                    Some(entry.line),
                    dominant_only,
                    &mut accumulated,
                );
            }
        }
        None => {
            for &cell in mesh.owned_cells() {
                accumulate_cell(model, mesh, velocity, cell, None, dominant_only, &mut accumulated);
            }
        }
    }

    // 每条线元独立归约；遍历顺序不影响归约结果
    for (line, local) in accumulated.into_iter().enumerate() {
        let total = IntegralTerms::new(
            comm.sum_vec3(local.numerator),
            comm.sum_scalar(local.denominator),
        );

        match total.velocity() {
            Some(v) => model.set_velocity(line, v),
            None => {
                // 退化累加：跳过更新，模型保留旧速度
                log::debug!("span line {line} has zero integral denominator, keeping previous velocity");
            }
        }
    }
}

/// 累加单个单元的贡献
fn accumulate_cell<M, P>(
    model: &M,
    mesh: &P,
    velocity: &CellVectorField,
    cell: usize,
    cached_line: Option<usize>,
    dominant_only: bool,
    accumulated: &mut [IntegralTerms],
) where
    M: LineForceModel,
    P: MeshPartition,
{
    let v = velocity[cell];
    let center = mesh.cell_center(cell);
    let volume = mesh.cell_volume(cell);

    if dominant_only {
        let line = cached_line.unwrap_or_else(|| model.dominant_line_at_point(center));
        accumulated[line] += model.velocity_integral_terms(line, v, center, volume);
    } else {
        for (line, acc) in accumulated.iter_mut().enumerate() {
            *acc += model.velocity_integral_terms(line, v, center, volume);
        }
    }
}
