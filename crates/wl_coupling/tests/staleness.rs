// crates/wl_coupling/tests/staleness.rs

//! 缓存陈旧性与协议顺序
//!
//! - "需要更新"为假的连续两步之间，派生缓存逐字节相同且不重算
//! - 控制器触发后，下一步在施力之前完成整体重建
//! - 单步内的协议顺序：同步 → 重建 → 采样 → 推进 → 施力 → 控制器

mod common;

use glam::DVec3;
use wl_comm::SerialComm;
use wl_coupling::{ActuatorLineCoupling, CouplingConfig};
use wl_mesh::{CellCloudPartition, CellVectorField, MeshPartition};
use wl_model::SamplingMode;

use common::ScriptedModel;

fn near_origin_weight(point: DVec3) -> f64 {
    if point.length() < 1.5 {
        0.8
    } else {
        0.0
    }
}

fn four_cell_mesh() -> CellCloudPartition {
    CellCloudPartition::uniform_box(DVec3::new(-0.5, -0.5, -0.5), DVec3::ONE, 4, 1, 1)
}

fn make_coupling(
    script: Vec<bool>,
) -> (
    ActuatorLineCoupling<ScriptedModel, SerialComm>,
    CellCloudPartition,
) {
    let mesh = four_cell_mesh();
    let model = ScriptedModel::new(
        SamplingMode::Integral,
        vec![DVec3::ZERO],
        near_origin_weight,
        DVec3::new(1.0, 0.0, 0.0),
    )
    .with_controller_script(script);

    let config = CouplingConfig {
        sampling: SamplingMode::Integral,
        ..CouplingConfig::default()
    };

    let coupling = ActuatorLineCoupling::new(model, SerialComm, config, mesh.n_cells()).unwrap();
    (coupling, mesh)
}

fn run_step(
    coupling: &mut ActuatorLineCoupling<ScriptedModel, SerialComm>,
    mesh: &CellCloudPartition,
    time: f64,
) {
    let mut velocity = CellVectorField::zeros(mesh.n_cells());
    for cell in 0..mesh.n_cells() {
        velocity[cell] = DVec3::new(1.0, 0.0, 0.0);
    }
    let mut source = CellVectorField::zeros(mesh.n_cells());
    coupling.step(mesh, &velocity, &mut source, time, 0.1);
}

#[test]
fn test_caches_are_not_recomputed_between_clean_steps() {
    let (mut coupling, mesh) = make_coupling(vec![false, false]);

    run_step(&mut coupling, &mesh, 0.0);
    let queries_after_first = coupling.model().weight_query_count();
    let projection_snapshot = coupling.projection_set().unwrap().clone();
    let sampling_snapshot = coupling.sampling_set().unwrap().clone();

    run_step(&mut coupling, &mesh, 0.1);

    // 干净步之间：无权重查询，快照逐字节相同
    assert_eq!(coupling.model().weight_query_count(), queries_after_first);
    assert_eq!(coupling.projection_set().unwrap(), &projection_snapshot);
    assert_eq!(coupling.sampling_set().unwrap(), &sampling_snapshot);
}

#[test]
fn test_controller_trigger_forces_full_rebuild() {
    let (mut coupling, mesh) = make_coupling(vec![true, false]);

    run_step(&mut coupling, &mesh, 0.0);
    assert!(coupling.needs_update(), "controller flagged, next step must rebuild");
    let queries_after_first = coupling.model().weight_query_count();

    run_step(&mut coupling, &mesh, 0.1);

    // 第二步重建：投影与采样各扫描一遍本地单元
    let expected = queries_after_first + 2 * mesh.owned_cells().len();
    assert_eq!(coupling.model().weight_query_count(), expected);
    assert!(!coupling.needs_update());
}

#[test]
fn test_needs_update_starts_true_and_clears_after_step() {
    let (mut coupling, mesh) = make_coupling(vec![]);
    assert!(coupling.needs_update());

    run_step(&mut coupling, &mesh, 0.0);
    assert!(!coupling.needs_update());
}

#[test]
fn test_step_orders_sync_before_caches_before_forces() {
    let (mut coupling, mesh) = make_coupling(vec![false]);
    run_step(&mut coupling, &mesh, 0.0);

    let model = coupling.model();
    let sync = model.first_call_index("set_wing_angle").unwrap();
    let build = model.first_call_index("summed_projection_weight").unwrap();
    let sample = model.first_call_index("set_velocity").unwrap();
    let advance = model.first_call_index("advance").unwrap();
    let force = model.first_call_index("force_to_project").unwrap();
    let controller = model.first_call_index("update_controller").unwrap();

    assert!(sync < build, "shared state must sync before cache rebuild");
    assert!(build < sample, "caches must exist before sampling uses them");
    assert!(sample < advance, "model advances on freshly sampled velocities");
    assert!(advance < force, "forces come from the advanced model");
    assert!(force < controller, "needs-update decision happens after force application");
}

#[test]
fn test_zero_weight_everywhere_is_degenerate_but_safe() {
    fn zero_weight(_point: DVec3) -> f64 {
        0.0
    }

    let mesh = four_cell_mesh();
    let mut model = ScriptedModel::new(
        SamplingMode::Integral,
        vec![DVec3::ZERO],
        zero_weight,
        DVec3::new(1.0, 0.0, 0.0),
    );
    model.velocities[0] = DVec3::new(7.0, 8.0, 9.0);

    let config = CouplingConfig {
        sampling: SamplingMode::Integral,
        ..CouplingConfig::default()
    };
    let mut coupling =
        ActuatorLineCoupling::new(model, SerialComm, config, mesh.n_cells()).unwrap();

    run_step(&mut coupling, &mesh, 0.0);

    // 缓存为空、源项为零、模型速度保持原值且有限
    assert!(coupling.projection_set().unwrap().is_empty());
    let v = coupling.model().velocities[0];
    assert_eq!(v, DVec3::new(7.0, 8.0, 9.0));
    assert!(v.is_finite());
}
