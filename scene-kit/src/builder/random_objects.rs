use k::nalgebra as na;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    errors::*,
    funcs::random_tint,
    geometry::{Geometry, MassProperties, ShapeTemplate},
    scene::{Body, GeometryKind, GeometryObject, Scene},
};

/// Density of wood, in kg/m3
pub const WOOD_DENSITY: f64 = 700.0;

/// How shapes are drawn from a shape pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Each draw picks a pool entry uniformly at random, with replacement
    #[default]
    UniformRandom,
    /// Cycle through the pool in order, wrapping around until the requested count
    Cyclic,
}

impl PlacementPolicy {
    /// Draw `count` entries of `pool`
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use scene_kit::PlacementPolicy;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    /// let drawn = PlacementPolicy::Cyclic.sample(&["a", "b", "c"], 5, &mut rng);
    /// assert_eq!(drawn, vec![&"a", &"b", &"c", &"a", &"b"]);
    /// ```
    pub fn sample<'a, T, R>(&self, pool: &'a [T], count: usize, rng: &mut R) -> Vec<&'a T>
    where
        R: Rng + ?Sized,
    {
        if pool.is_empty() {
            return Vec::new();
        }
        match self {
            PlacementPolicy::UniformRandom => (0..count)
                .filter_map(|_| pool.choose(rng))
                .collect(),
            PlacementPolicy::Cyclic => pool.iter().cycle().take(count).collect(),
        }
    }
}

/// Build a scene of `count` free-floating objects drawn from `shape_pool`
///
/// Every object gets its own free-flyer body whose translation is bounded by
/// `[-world_size, world_size]` on each axis. The shape is re-centered so that its
/// center of mass is the body origin. No collision pair is added.
///
/// A draw whose shape is unsupported (e.g. a mesh that can not be loaded) is logged and
/// omitted, so the scene may hold fewer than `count` objects.
pub fn build_random_objects(
    count: usize,
    shape_pool: &[ShapeTemplate],
    seed: u64,
    placement: PlacementPolicy,
    world_size: f64,
) -> Result<Scene> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new();
    add_random_objects(
        &mut scene,
        count,
        shape_pool,
        placement,
        world_size,
        &mut rng,
    )?;
    Ok(scene)
}

/// Append random objects to `scene` and return the indices of the new geometries
pub(crate) fn add_random_objects<R>(
    scene: &mut Scene,
    count: usize,
    shape_pool: &[ShapeTemplate],
    placement: PlacementPolicy,
    world_size: f64,
    rng: &mut R,
) -> Result<Vec<usize>>
where
    R: Rng + ?Sized,
{
    ensure_positive("world size", world_size)?;
    if shape_pool.is_empty() {
        return Err(Error::InvalidConfiguration(
            "shape pool must not be empty".to_owned(),
        ));
    }
    let shapes = resolve_shape_pool(shape_pool, WOOD_DENSITY)?;

    let limits = [0, 1, 2].map(|_| k::joint::Range::new(-world_size, world_size));
    let samples = placement.sample(&shapes, count, rng);
    let mut indices = Vec::with_capacity(samples.len());
    for (template, resolved) in samples {
        let (geometry, mass_properties) = match resolved {
            Ok(shape) => shape,
            Err(reason) => {
                warn!("omit {template:?}: {reason}");
                continue;
            }
        };
        let body_id = scene.add_body(Body::free_flyer(
            format!("object_{}", scene.bodies.len()),
            limits,
            &MassProperties {
                local_com: na::Point3::origin(),
                ..*mass_properties
            },
        ));
        let com = mass_properties.local_com;
        let object = GeometryObject {
            name: format!("{}_{body_id}", geometry.type_name()),
            kind: GeometryKind::Object,
            body: body_id,
            placement: na::Isometry3::translation(-com.x, -com.y, -com.z),
            geometry: geometry.clone(),
            tint: random_tint(rng),
        };
        debug!("add {} mass={}", object.name, mass_properties.mass);
        indices.push(scene.add_geometry_object(object)?);
    }
    Ok(indices)
}

type ResolvedShape<'a> = (
    &'a ShapeTemplate,
    std::result::Result<(Geometry, MassProperties), String>,
);

/// Convert each template once, keeping the reason why unsupported ones can not be used
///
/// Errors other than `Error::UnsupportedShape` abort the build.
fn resolve_shape_pool(
    shape_pool: &[ShapeTemplate],
    density: f64,
) -> Result<Vec<ResolvedShape<'_>>> {
    shape_pool
        .iter()
        .map(|template| {
            let resolved = template.to_geometry().and_then(|geometry| {
                let mass_properties = geometry.mass_properties(density)?;
                Ok((geometry, mass_properties))
            });
            match resolved {
                Ok(shape) => Ok((template, Ok(shape))),
                Err(Error::UnsupportedShape(reason)) => Ok((template, Err(reason))),
                Err(e) => Err(e),
            }
        })
        .collect()
}
