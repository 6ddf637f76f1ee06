use k::nalgebra as na;
use rand::{rngs::StdRng, Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    builder::DEFAULT_FLOOR_TINT,
    config::default_true,
    errors::*,
    funcs::random_rotation,
    geometry::{Geometry, MassProperties},
    scene::{Body, BodyId, CollisionPair, GeometryKind, GeometryObject, Scene, Tint},
};

/// Corner sphere radius relative to the cube size
const BALL_FACTOR_SIZE: f64 = 1.0 / 50.0;
const CUBE_TINT: Tint = [0.0, 0.0, 1.0, 0.6];
const CORNER_TINT: Tint = [1.0, 0.2, 0.2, 1.0];
/// Name of the reference configuration computed by [`build_cubes_with_corners`]
pub const DEFAULT_CONFIGURATION_NAME: &str = "default";

/// Edge length and mass of one cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeSpec {
    pub size: f64,
    pub mass: f64,
}

impl CubeSpec {
    pub fn new(size: f64, mass: f64) -> Self {
        Self { size, mass }
    }
}

/// Which pair categories of a cube scene are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CubeCollisionToggles {
    /// Pair the corner spheres of different cubes
    #[serde(default = "default_true")]
    pub corner_collisions: bool,
    /// Pair the boxes of different cubes
    #[serde(default)]
    pub cube_collisions: bool,
    /// Add a floor at altitude 0
    #[serde(default)]
    pub floor: bool,
}

impl Default for CubeCollisionToggles {
    fn default() -> Self {
        Self {
            corner_collisions: true,
            cube_collisions: false,
            floor: false,
        }
    }
}

/// Build a scene of cubes, each carrying a small sphere at each of its 8 corners
///
/// `corners_inside` pulls the spheres inward by their radius so that they stay inside the
/// cube. The pair set follows `toggles`:
///
/// 1. corner/corner pairs between different cubes if `corner_collisions`
/// 2. cube/cube pairs if `cube_collisions`
/// 3. cube/corner pairs of different cubes if both
/// 4. if `floor`, the floor is paired with everything, then the floor/corner and floor/cube
///    pairs disabled by the toggles above are removed
///
/// A `"default"` reference configuration stacks the cubes vertically, with a small random
/// horizontal offset and a random orientation drawn from `seed`.
pub fn build_cubes_with_corners(
    cube_specs: &[CubeSpec],
    toggles: CubeCollisionToggles,
    corners_inside: bool,
    seed: u64,
) -> Result<Scene> {
    if cube_specs.is_empty() {
        return Err(Error::InvalidConfiguration(
            "at least one cube is required".to_owned(),
        ));
    }
    for spec in cube_specs {
        ensure_positive("cube size", spec.size)?;
        ensure_positive("cube mass", spec.mass)?;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let world_bound = cube_specs.iter().map(|s| s.size).fold(0.0, f64::max) * 5.0;

    let mut scene = Scene::new();
    for (n_cube, spec) in cube_specs.iter().enumerate() {
        let size = spec.size;
        // keeps random configurations above the floor
        let z_min = size * 3f64.sqrt() / 2.0;
        let body = scene.add_body(Body::free_flyer(
            format!("cube_{n_cube}"),
            [
                k::joint::Range::new(-world_bound, world_bound),
                k::joint::Range::new(-world_bound, world_bound),
                k::joint::Range::new(z_min, world_bound),
            ],
            &MassProperties::from_box(spec.mass, size, size, size),
        ));
        scene.add_geometry_object(GeometryObject {
            name: format!("cube:{n_cube}"),
            kind: GeometryKind::Cube { cube: n_cube },
            body,
            placement: na::Isometry3::identity(),
            geometry: Geometry::cuboid(size, size, size),
            tint: CUBE_TINT,
        })?;
        add_corners(&mut scene, body, n_cube, size, corners_inside)?;
    }

    add_cube_collision_pairs(&mut scene, toggles)?;

    let configuration = stacked_configuration(&scene, cube_specs, &mut rng);
    scene
        .reference_configurations
        .insert(DEFAULT_CONFIGURATION_NAME.to_owned(), configuration);
    Ok(scene)
}

fn add_corners(
    scene: &mut Scene,
    body: BodyId,
    n_cube: usize,
    size: f64,
    corners_inside: bool,
) -> Result<()> {
    let radius = size * BALL_FACTOR_SIZE;
    let offset = size / 2.0 - if corners_inside { radius } else { 0.0 };
    let mut n_corner = 0;
    for x in [1.0, -1.0] {
        for z in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                scene.add_geometry_object(GeometryObject {
                    name: format!("cube_corner:{n_cube}:{n_corner}"),
                    kind: GeometryKind::CubeCorner {
                        cube: n_cube,
                        corner: n_corner,
                    },
                    body,
                    placement: na::Isometry3::translation(x * offset, y * offset, z * offset),
                    geometry: Geometry::Sphere { radius },
                    tint: CORNER_TINT,
                })?;
                n_corner += 1;
            }
        }
    }
    Ok(())
}

fn add_cube_collision_pairs(scene: &mut Scene, toggles: CubeCollisionToggles) -> Result<()> {
    let kinds = scene.geometries.iter().map(|g| g.kind).collect::<Vec<_>>();
    let n = kinds.len();
    let mut pairs_of = |accept: &dyn Fn(GeometryKind, GeometryKind) -> bool| {
        for a in 0..n {
            for b in (a + 1)..n {
                if accept(kinds[a], kinds[b]) || accept(kinds[b], kinds[a]) {
                    scene.collision_pairs.insert(a, b);
                }
            }
        }
    };

    if toggles.corner_collisions {
        pairs_of(&|g1, g2| match (g1, g2) {
            (GeometryKind::CubeCorner { cube: c1, .. }, GeometryKind::CubeCorner { cube: c2, .. }) => {
                c1 != c2
            }
            _ => false,
        });
    }
    if toggles.cube_collisions {
        pairs_of(&|g1, g2| match (g1, g2) {
            (GeometryKind::Cube { cube: c1 }, GeometryKind::Cube { cube: c2 }) => c1 != c2,
            _ => false,
        });
    }
    if toggles.cube_collisions && toggles.corner_collisions {
        pairs_of(&|g1, g2| match (g1, g2) {
            (GeometryKind::Cube { cube: c1 }, GeometryKind::CubeCorner { cube: c2, .. }) => {
                c1 != c2
            }
            _ => false,
        });
    }
    debug!("cube pairs before floor: {}", scene.collision_pairs.len());

    if toggles.floor {
        scene.add_floor(0.0, DEFAULT_FLOOR_TINT)?;
        let geometries = &scene.geometries;
        let keep = |pair: &CollisionPair| {
            let (g1, g2) = (geometries[pair.first()].kind, geometries[pair.second()].kind);
            let other = match (g1, g2) {
                (GeometryKind::Floor, other) | (other, GeometryKind::Floor) => other,
                _ => return true,
            };
            match other {
                GeometryKind::CubeCorner { .. } => toggles.corner_collisions,
                GeometryKind::Cube { .. } => toggles.cube_collisions,
                _ => true,
            }
        };
        scene.collision_pairs.retain(keep);
    }
    Ok(())
}

fn stacked_configuration<R>(
    scene: &Scene,
    cube_specs: &[CubeSpec],
    rng: &mut R,
) -> Vec<na::Isometry3<f64>>
where
    R: Rng + ?Sized,
{
    let xy = cube_specs
        .iter()
        .map(|spec| {
            let x = (rng.gen::<f64>() * 2.0 - 1.0) * spec.size / 4.0;
            let y = (rng.gen::<f64>() * 2.0 - 1.0) * spec.size / 4.0;
            (x, y)
        })
        .collect::<Vec<_>>();
    let rotations = cube_specs
        .iter()
        .map(|_| random_rotation(rng))
        .collect::<Vec<_>>();

    let mut configuration = scene.neutral_configuration();
    let mut height = 0.0;
    for (n_cube, spec) in cube_specs.iter().enumerate() {
        height += spec.size;
        let (x, y) = xy[n_cube];
        // cube bodies directly follow the world body
        configuration[n_cube + 1] = na::Isometry3::from_parts(
            na::Translation3::new(x, y, height * 1.75),
            rotations[n_cube],
        );
    }
    configuration
}
