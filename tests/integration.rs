use coplanar_engine::geom::{Axis, EulerRotation, RotationOrder, Tolerance, Vec3};
use coplanar_engine::modes::PlaneMode;
use coplanar_engine::orient::ReorientStatus;
use coplanar_engine::scene::SceneGraph;
use coplanar_engine::scene::memory::MemoryScene;
use coplanar_engine::{ApplyError, Coplanarizer};

fn assert_vec_close(actual: Vec3, expected: Vec3) {
    assert!(
        Tolerance::LOOSE.approx_eq_vec3(actual, expected),
        "verwachtte {expected:?}, kreeg {actual:?}"
    );
}

/// Drie joints recht boven elkaar langs +Y, allemaal identiteitsgeorienteerd.
fn straight_leg(scene: &mut MemoryScene) -> [coplanar_engine::scene::NodeId; 3] {
    let hip = scene.add_joint("heup", None, Vec3::ZERO).unwrap();
    let knee = scene
        .add_joint("knie", Some(hip), Vec3::new(0.0, 5.0, 0.0))
        .unwrap();
    let ankle = scene
        .add_joint("enkel", Some(knee), Vec3::new(0.0, 5.0, 0.0))
        .unwrap();
    [hip, knee, ankle]
}

#[test]
fn explicit_plane_reorients_a_chain_end_to_end() {
    let mut scene = MemoryScene::new();
    let [hip, knee, ankle] = straight_leg(&mut scene);

    let mut tool = Coplanarizer::new();
    // Selectie in omgekeerde volgorde: de voorouder wordt alsnog de wortel.
    let chain = tool.select_joints(&scene, ankle, hip).expect("keten geldig");
    assert_eq!(chain.chain_root, hip);
    assert_eq!(chain.chain_end, ankle);

    tool.set_plane_mode(PlaneMode::ExplicitVector {
        normal: Vec3::Z,
        position: Vec3::ZERO,
    });

    let status = tool.apply(&mut scene).expect("apply slaagt");
    assert_eq!(status, ReorientStatus::Applied { joints: 3 });

    // De joints lagen al op het XY-vlak en zijn niet verschoven.
    assert_vec_close(scene.world_position(hip).unwrap(), Vec3::ZERO);
    assert_vec_close(scene.world_position(knee).unwrap(), Vec3::new(0.0, 5.0, 0.0));
    assert_vec_close(scene.world_position(ankle).unwrap(), Vec3::new(0.0, 10.0, 0.0));

    // Heup en knie mikken met +X naar hun kind, met +Z langs de normaal.
    for joint in [hip, knee] {
        let orientation = scene.world_orientation(joint).unwrap();
        assert_vec_close(orientation.direction_along(Axis::X), Vec3::Y);
        assert_vec_close(orientation.direction_along(Axis::Z), Vec3::Z);
    }

    // De enkel hield zijn oude kijkrichting, op het vlak geprojecteerd.
    let ankle_orientation = scene.world_orientation(ankle).unwrap();
    assert_vec_close(ankle_orientation.direction_along(Axis::X), Vec3::X);
}

#[test]
fn automatic_plane_flattens_a_bent_arm() {
    let mut scene = MemoryScene::new();
    // Een arm die uit het vlak van zijn eigen knik gebogen staat.
    let shoulder = scene.add_joint("schouder", None, Vec3::ZERO).unwrap();
    let elbow = scene
        .add_joint("elleboog", Some(shoulder), Vec3::new(4.0, 1.0, 0.5))
        .unwrap();
    let wrist = scene
        .add_joint("pols", Some(elbow), Vec3::new(4.0, -1.0, -0.2))
        .unwrap();
    // Vinger onder de pols, buiten de keten.
    let finger = scene
        .add_joint("vinger", Some(wrist), Vec3::new(1.0, 0.0, 0.0))
        .unwrap();
    scene
        .set_local_rotation(
            finger,
            EulerRotation::new(0.2, 0.4, -0.1, RotationOrder::Xyz),
        )
        .unwrap();

    let finger_position = scene.world_position(finger).unwrap();

    let mut tool = Coplanarizer::new();
    tool.select_joints(&scene, shoulder, wrist).expect("keten geldig");
    assert!(matches!(
        tool.plane_mode(),
        PlaneMode::AutomaticFromPositions
    ));

    let solution = tool.compute_plane(&scene).expect("vlak berekend");
    let status = tool.apply(&mut scene).expect("apply slaagt");
    assert_eq!(status, ReorientStatus::Applied { joints: 3 });

    // Elke joint van de keten ligt nu op het berekende vlak.
    for joint in [shoulder, elbow, wrist] {
        let position = scene.world_position(joint).unwrap();
        assert!(
            Tolerance::LOOSE.approx_eq_f64(solution.plane.signed_distance_to(position), 0.0),
            "joint {joint:?} ligt niet op het vlak"
        );
    }

    // De vinger is in wereldruimte blijven staan.
    assert_vec_close(scene.world_position(finger).unwrap(), finger_position);

    // Schouder en elleboog mikken naar hun kind in de keten.
    let elbow_position = scene.world_position(elbow).unwrap();
    let wrist_position = scene.world_position(wrist).unwrap();
    let shoulder_aim = scene
        .world_orientation(shoulder)
        .unwrap()
        .direction_along(Axis::X);
    assert_vec_close(shoulder_aim, elbow_position.normalized().unwrap());
    let elbow_aim = scene
        .world_orientation(elbow)
        .unwrap()
        .direction_along(Axis::X);
    assert_vec_close(
        elbow_aim,
        (wrist_position - elbow_position).normalized().unwrap(),
    );
}

#[test]
fn axis_aligned_plane_moves_the_chain_to_the_offset() {
    let mut scene = MemoryScene::new();
    let [hip, knee, ankle] = straight_leg(&mut scene);

    let mut tool = Coplanarizer::new();
    tool.select_joints(&scene, hip, ankle).expect("keten geldig");
    tool.set_plane_mode(PlaneMode::AxisAligned {
        axis: Axis::Z,
        offset: 2.0,
    });

    tool.apply(&mut scene).expect("apply slaagt");

    for joint in [hip, knee, ankle] {
        let position = scene.world_position(joint).unwrap();
        assert!(Tolerance::LOOSE.approx_eq_f64(position.z, 2.0));
    }
}

#[test]
fn degenerate_automatic_plane_leaves_the_scene_untouched() {
    let mut scene = MemoryScene::new();
    let [hip, knee, ankle] = straight_leg(&mut scene);

    let mut tool = Coplanarizer::new();
    tool.select_joints(&scene, hip, ankle).expect("keten geldig");

    // Een gestrekte keten spant geen vlak uit zijn posities.
    let result = tool.apply(&mut scene);
    assert!(matches!(result, Err(ApplyError::Plane(_))));

    assert_vec_close(scene.world_position(knee).unwrap(), Vec3::new(0.0, 5.0, 0.0));
    let orientation = scene.world_orientation(knee).unwrap();
    assert_vec_close(orientation.direction_along(Axis::X), Vec3::X);
}

#[test]
fn plane_preview_follows_the_active_mode() {
    let mut scene = MemoryScene::new();
    let [hip, _, ankle] = straight_leg(&mut scene);

    let mut tool = Coplanarizer::new();
    tool.select_joints(&scene, hip, ankle).expect("keten geldig");

    tool.set_plane_mode(PlaneMode::ExplicitVector {
        normal: Vec3::new(0.0, 0.0, 2.0),
        position: Vec3::new(1.0, 2.0, 3.0),
    });
    let preview = tool.plane_preview(&scene).expect("vlak berekend");
    assert_eq!(preview.normal, [0.0, 0.0, 1.0]);
    assert_eq!(preview.anchor, [1.0, 2.0, 3.0]);

    tool.set_plane_mode(PlaneMode::AxisAligned {
        axis: Axis::X,
        offset: -4.0,
    });
    let preview = tool.plane_preview(&scene).expect("vlak berekend");
    assert_eq!(preview.normal, [1.0, 0.0, 0.0]);
    assert_eq!(preview.anchor, [-4.0, 0.0, 0.0]);
}
