// crates/wl_coupling/tests/end_to_end.rs

//! 单分区端到端场景
//!
//! 两个单元的网格：中心 (0,0,0) 与 (1,0,0)，体积各 1.0；
//! 一条展向线，权重函数在单元 0 处为 0.5、单元 1 处为 0.0，
//! 阈值 0.1；投影力 (10,0,0)。
//!
//! 预期：投影缓存 = {(单元 0, 线元 0, 权重 0.5)}；
//! 权重诊断场 = [0.5, 0.0]；单元 0 的动量源项增加 (5,0,0)，
//! 体积力诊断场在单元 0 处等于 (5,0,0)。

mod common;

use glam::DVec3;
use wl_comm::SerialComm;
use wl_coupling::{ActuatorLineCoupling, CouplingConfig};
use wl_mesh::{CellCloudPartition, CellVectorField, MeshPartition};
use wl_model::SamplingMode;

use common::ScriptedModel;

fn step_weight(point: DVec3) -> f64 {
    if point.x < 0.5 {
        0.5
    } else {
        0.0
    }
}

fn two_cell_mesh() -> CellCloudPartition {
    CellCloudPartition::uniform_box(DVec3::new(-0.5, -0.5, -0.5), DVec3::ONE, 2, 1, 1)
}

#[test]
fn test_end_to_end_projection_matches_reference_numbers() {
    let mesh = two_cell_mesh();
    assert_eq!(mesh.cell_center(0), DVec3::ZERO);
    assert_eq!(mesh.cell_center(1), DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(mesh.cell_volume(0), 1.0);

    let model = ScriptedModel::new(
        SamplingMode::Point,
        vec![DVec3::ZERO],
        step_weight,
        DVec3::new(10.0, 0.0, 0.0),
    );

    let config = CouplingConfig {
        sampling: SamplingMode::Point,
        projection_weight_limit: 0.1,
        ..CouplingConfig::default()
    };

    let mut coupling =
        ActuatorLineCoupling::new(model, SerialComm, config, mesh.n_cells()).unwrap();

    let mut velocity = CellVectorField::zeros(2);
    velocity[0] = DVec3::new(1.0, 0.0, 0.0);
    velocity[1] = DVec3::new(1.0, 0.0, 0.0);
    let mut source = CellVectorField::zeros(2);

    coupling.step(&mesh, &velocity, &mut source, 0.0, 0.1);

    // 投影缓存恰好一条记录
    let projection = coupling.projection_set().unwrap();
    assert_eq!(projection.len(), 1);
    let entry = &projection.entries()[0];
    assert_eq!(entry.cell, 0);
    assert_eq!(entry.line, 0);
    assert_eq!(entry.weight, 0.5);

    // 权重诊断场
    assert_eq!(coupling.body_force_weight().as_slice(), &[0.5, 0.0]);

    // 动量源项：力 × 权重 × 体积
    assert_eq!(source[0], DVec3::new(5.0, 0.0, 0.0));
    assert_eq!(source[1], DVec3::ZERO);

    // 体积力诊断场：力 × 权重
    assert_eq!(coupling.body_force()[0], DVec3::new(5.0, 0.0, 0.0));
    assert_eq!(coupling.body_force()[1], DVec3::ZERO);
}

#[test]
fn test_end_to_end_point_sampling_feeds_model() {
    let mesh = two_cell_mesh();

    let model = ScriptedModel::new(
        SamplingMode::Point,
        vec![DVec3::ZERO],
        step_weight,
        DVec3::new(10.0, 0.0, 0.0),
    );

    let config = CouplingConfig {
        sampling: SamplingMode::Point,
        ..CouplingConfig::default()
    };

    let mut coupling =
        ActuatorLineCoupling::new(model, SerialComm, config, mesh.n_cells()).unwrap();

    let mut velocity = CellVectorField::zeros(2);
    velocity[0] = DVec3::new(3.0, -1.0, 0.5);
    let mut source = CellVectorField::zeros(2);

    coupling.step(&mesh, &velocity, &mut source, 0.0, 0.1);

    // 控制点正好在单元 0 中心，插值取该单元的值
    assert_eq!(coupling.model().velocities[0], DVec3::new(3.0, -1.0, 0.5));
}
