use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use super::random_objects::add_random_objects;
use crate::{
    builder::{PlacementPolicy, DEFAULT_WALL_TINT},
    errors::*,
    geometry::ShapeTemplate,
    scene::Scene,
};

/// The objects stay inside this fraction of the wall size
const WORLD_SIZE_RATIO: f64 = 0.45;

/// Shapes of the dense demo scenes: a convex mesh, an ellipsoid and a capsule
pub fn dense_shape_pool() -> Vec<ShapeTemplate> {
    vec![
        ShapeTemplate::SampleMesh,
        ShapeTemplate::Ellipsoid {
            radii: [0.05, 0.15, 0.2],
        },
        ShapeTemplate::Capsule {
            radius: 0.1,
            length: 0.2,
        },
    ]
}

/// Build `nobj` small objects, optionally enclosed in a box of 6 walls
///
/// Every pair of objects is checked for collision. With `include_walls`, the walls are
/// paired with every object. `exhaustive` cycles through the pool instead of drawing
/// the shapes at random.
pub fn build_from_dense_pool(
    nobj: usize,
    wall_size: f64,
    seed: u64,
    include_walls: bool,
    exhaustive: bool,
) -> Result<Scene> {
    ensure_positive("wall size", wall_size)?;
    let placement = if exhaustive {
        PlacementPolicy::Cyclic
    } else {
        PlacementPolicy::UniformRandom
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new();
    add_random_objects(
        &mut scene,
        nobj,
        &dense_shape_pool(),
        placement,
        WORLD_SIZE_RATIO * wall_size,
        &mut rng,
    )?;
    scene.add_all_collision_pairs();
    if include_walls {
        scene.add_enclosing_box(wall_size, DEFAULT_WALL_TINT)?;
    }
    debug!(
        "dense scene: {} objects, {} pairs",
        scene.geometries.len(),
        scene.collision_pairs.len()
    );
    Ok(scene)
}

/// Three floating objects, one of each shape of [`dense_shape_pool`]
pub fn build_three_bodies(seed: u64, size: f64) -> Result<Scene> {
    build_from_dense_pool(3, size, seed, false, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::GeometryKind;

    #[test]
    fn test_dense_pool_pairs() {
        let scene = build_from_dense_pool(10, 4.0, 0, true, false).unwrap();
        assert_eq!(scene.geometries.len(), 10 + 6);
        assert_eq!(scene.collision_pairs.len(), 10 * 9 / 2 + 10 * 6);
        for pair in &scene.collision_pairs {
            let walls = [pair.first(), pair.second()]
                .iter()
                .filter(|&&i| scene.geometries[i].kind == GeometryKind::Wall)
                .count();
            assert!(walls <= 1);
        }
    }

    #[test]
    fn test_world_bounds() {
        let scene = build_from_dense_pool(4, 2.0, 1, false, false).unwrap();
        for body in &scene.bodies[1..] {
            for limit in &body.translation_limits {
                let limit = limit.as_ref().unwrap();
                assert_eq!(limit.max, 0.9);
            }
        }
    }

    #[test]
    fn test_three_bodies() {
        let scene = build_three_bodies(0, 1.0).unwrap();
        let names = scene
            .geometries
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Convex_1", "Ellipsoid_2", "Capsule_3"]);
        assert_eq!(scene.collision_pairs.len(), 3);
    }

    #[test]
    fn test_three_bodies_with_floor() {
        let mut scene = build_three_bodies(0, 1.0).unwrap();
        scene.add_floor(0.0, crate::builder::DEFAULT_FLOOR_TINT).unwrap();
        assert_eq!(scene.geometries.len(), 4);
        assert_eq!(scene.collision_pairs.len(), 6);
    }
}
