use std::collections::HashSet;

use assert_approx_eq::assert_approx_eq;
use k::nalgebra as na;
use scene_kit::*;

fn assert_pairs_are_well_formed(scene: &Scene) {
    let mut seen = HashSet::new();
    for pair in &scene.collision_pairs {
        assert_ne!(pair.first(), pair.second());
        assert!(pair.first() < pair.second());
        assert!(pair.second() < scene.geometries.len());
        assert!(seen.insert((pair.first(), pair.second())), "{pair:?}");
    }
    assert_eq!(seen.len(), scene.collision_pairs.len());
}

#[test]
fn test_dense_scene_is_reproducible() {
    let a = build_from_dense_pool(20, 4.0, 12, true, false).unwrap();
    let b = build_from_dense_pool(20, 4.0, 12, true, false).unwrap();
    assert_eq!(a.geometries, b.geometries);
    assert_eq!(a.collision_pairs, b.collision_pairs);
    for (body_a, body_b) in a.bodies.iter().zip(&b.bodies) {
        assert_eq!(body_a.name, body_b.name);
        assert_eq!(body_a.mass, body_b.mass);
    }

    let c = build_from_dense_pool(20, 4.0, 13, true, false).unwrap();
    assert_ne!(a.geometries, c.geometries);
}

#[test]
fn test_pairs_have_no_self_pair_nor_duplicate() {
    let mut scenes = vec![
        build_from_dense_pool(12, 3.0, 0, true, false).unwrap(),
        build_three_bodies(0, 1.0).unwrap(),
        build_cubes_with_corners(
            &[CubeSpec::new(0.2, 1.0), CubeSpec::new(0.3, 2.0)],
            CubeCollisionToggles {
                corner_collisions: true,
                cube_collisions: true,
                floor: true,
            },
            false,
            0,
        )
        .unwrap(),
    ];
    let mut scene = build_three_bodies(1, 1.0).unwrap();
    scene.add_enclosing_box(2.0, DEFAULT_WALL_TINT).unwrap();
    scene.add_floor(-1.0, DEFAULT_FLOOR_TINT).unwrap();
    scene.add_all_collision_pairs();
    scenes.push(scene);

    for scene in &scenes {
        assert_pairs_are_well_formed(scene);
    }
}

#[test]
fn test_walls_are_paired_with_objects_only() {
    let mut scene = build_random_objects(
        5,
        &dense_shape_pool(),
        3,
        PlacementPolicy::UniformRandom,
        1.0,
    )
    .unwrap();
    scene.add_enclosing_box(3.0, DEFAULT_WALL_TINT).unwrap();
    let is_wall = |i: usize| scene.geometries[i].kind == GeometryKind::Wall;
    for a in 0..scene.geometries.len() {
        for b in (a + 1)..scene.geometries.len() {
            assert_eq!(scene.collision_pairs.contains(a, b), is_wall(a) ^ is_wall(b));
        }
    }
    assert_eq!(scene.collision_pairs.len(), 5 * 6);
}

#[test]
fn test_three_cubes_corner_pairs() {
    let scene = build_cubes_with_corners(
        &[CubeSpec::new(0.2, 1.0); 3],
        CubeCollisionToggles {
            corner_collisions: true,
            cube_collisions: false,
            floor: false,
        },
        true,
        0,
    )
    .unwrap();
    assert_eq!(scene.geometries.len(), 27);
    assert_eq!(scene.collision_pairs.len(), 192);
    for pair in &scene.collision_pairs {
        let kinds = [
            scene.geometries[pair.first()].kind,
            scene.geometries[pair.second()].kind,
        ];
        match kinds {
            [GeometryKind::CubeCorner { cube: a, .. }, GeometryKind::CubeCorner { cube: b, .. }] => {
                assert_ne!(a, b)
            }
            _ => panic!("unexpected pair {kinds:?}"),
        }
    }
}

#[test]
fn test_floor_on_free_bodies() {
    let mut scene = build_random_objects(
        3,
        &dense_shape_pool(),
        0,
        PlacementPolicy::Cyclic,
        1.0,
    )
    .unwrap();
    let floor = scene.add_floor(0.0, DEFAULT_FLOOR_TINT).unwrap();
    assert_eq!(scene.geometries.len(), 4);
    assert_eq!(scene.collision_pairs.len(), 3);
    for index in 0..3 {
        assert!(scene.collision_pairs.contains(index, floor));
    }
}

#[test]
fn test_objects_are_centered_on_their_body() {
    let scene = build_from_dense_pool(9, 4.0, 5, false, true).unwrap();
    for object in &scene.geometries {
        let com = object.geometry.center_of_mass().unwrap();
        let centroid = object.placement * com;
        assert_approx_eq!(centroid.coords.norm(), 0.0, 1e-9);
        assert_eq!(scene.bodies[object.body.0].com, na::Point3::origin());
    }
}

#[test]
fn test_find_collision_in_dense_scene() {
    let scene = build_from_dense_pool(10, 1.0, 0, true, false).unwrap();
    let (configuration, pairs) =
        find_colliding_configuration(&scene, CollisionCheckerConfig::default(), 0, 100)
            .unwrap()
            .unwrap();
    assert_eq!(configuration.len(), scene.bodies.len());
    assert!(!pairs.is_empty());
    let checker = SceneCollisionChecker::new(&scene, CollisionCheckerConfig::default());
    assert_eq!(checker.colliding_pairs(&configuration).unwrap(), pairs);
}
