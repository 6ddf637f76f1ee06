use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    builder::{
        build_cubes_with_corners, build_from_dense_pool, build_random_objects,
        CubeCollisionToggles, CubeSpec, PlacementPolicy, DEFAULT_FLOOR_TINT, DEFAULT_WALL_TINT,
    },
    errors::*,
    geometry::ShapeTemplate,
    scene::Scene,
};

/// Description of a scene, one variant per scene family
///
/// The variant is selected by the `kind` key:
///
/// ```
/// let config: scene_kit::SceneConfig = toml::from_str(
///     r#"
/// kind = "dense"
/// nobj = 5
/// include_walls = false
/// "#,
/// )
/// .unwrap();
/// let scene = config.build().unwrap();
/// assert_eq!(scene.geometries.len(), 5);
/// assert_eq!(scene.collision_pairs.len(), 10);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneConfig {
    Dense(DenseSceneConfig),
    Cubes(CubesSceneConfig),
    RandomObjects(RandomObjectsConfig),
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig::Dense(DenseSceneConfig::default())
    }
}

impl SceneConfig {
    pub fn build(&self) -> Result<Scene> {
        match self {
            SceneConfig::Dense(config) => config.build(),
            SceneConfig::Cubes(config) => config.build(),
            SceneConfig::RandomObjects(config) => config.build(),
        }
    }
}

fn default_nobj() -> usize {
    30
}

fn default_wall_size() -> f64 {
    4.0
}

pub(crate) fn default_true() -> bool {
    true
}

/// Objects drawn from the dense pool (convex mesh, ellipsoid, capsule), all pairs checked
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DenseSceneConfig {
    #[serde(default = "default_nobj")]
    pub nobj: usize,
    #[serde(default = "default_wall_size")]
    pub wall_size: f64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_true")]
    pub include_walls: bool,
    /// Take one object of each shape in turn instead of random shapes
    #[serde(default)]
    pub exhaustive: bool,
}

impl Default for DenseSceneConfig {
    fn default() -> Self {
        Self {
            nobj: default_nobj(),
            wall_size: default_wall_size(),
            seed: 0,
            include_walls: true,
            exhaustive: false,
        }
    }
}

impl DenseSceneConfig {
    pub fn build(&self) -> Result<Scene> {
        build_from_dense_pool(
            self.nobj,
            self.wall_size,
            self.seed,
            self.include_walls,
            self.exhaustive,
        )
    }
}

/// A single value applied to every item, or one value per item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    /// Expand to exactly `len` values
    pub fn expand(&self, what: &str, len: usize) -> Result<Vec<T>> {
        match self {
            OneOrMany::One(v) => Ok(vec![v.clone(); len]),
            OneOrMany::Many(v) if v.len() == len => Ok(v.clone()),
            OneOrMany::Many(v) => Err(Error::InvalidConfiguration(format!(
                "{} {what} given for {len} cubes",
                v.len()
            ))),
        }
    }
}

fn default_number_of_cubes() -> usize {
    3
}

fn default_cube_size() -> OneOrMany<f64> {
    OneOrMany::One(0.2)
}

fn default_cube_mass() -> OneOrMany<f64> {
    OneOrMany::One(1.0)
}

/// Cubes with a small sphere at each corner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CubesSceneConfig {
    #[serde(default = "default_number_of_cubes")]
    pub number_of_cubes: usize,
    #[serde(default = "default_cube_size")]
    pub sizes: OneOrMany<f64>,
    #[serde(default = "default_cube_mass")]
    pub masses: OneOrMany<f64>,
    /// Keep the corner spheres inside the cube surface
    #[serde(default = "default_true")]
    pub corners_inside: bool,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub collisions: CubeCollisionToggles,
}

impl Default for CubesSceneConfig {
    fn default() -> Self {
        Self {
            number_of_cubes: default_number_of_cubes(),
            sizes: default_cube_size(),
            masses: default_cube_mass(),
            corners_inside: true,
            seed: 0,
            collisions: CubeCollisionToggles::default(),
        }
    }
}

impl CubesSceneConfig {
    pub fn cube_specs(&self) -> Result<Vec<CubeSpec>> {
        let sizes = self.sizes.expand("sizes", self.number_of_cubes)?;
        let masses = self.masses.expand("masses", self.number_of_cubes)?;
        Ok(sizes
            .into_iter()
            .zip(masses)
            .map(|(size, mass)| CubeSpec::new(size, mass))
            .collect())
    }

    pub fn build(&self) -> Result<Scene> {
        build_cubes_with_corners(
            &self.cube_specs()?,
            self.collisions,
            self.corners_inside,
            self.seed,
        )
    }
}

fn default_world_size() -> f64 {
    default_wall_size() * 0.45
}

/// Objects drawn from a custom shape pool, with an optional floor and enclosing box
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RandomObjectsConfig {
    pub count: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub placement: PlacementPolicy,
    #[serde(default = "default_world_size")]
    pub world_size: f64,
    /// Pair every object with every other one
    #[serde(default)]
    pub all_pairs: bool,
    /// Size of the enclosing box, no box if unset
    #[serde(default)]
    pub wall_size: Option<f64>,
    /// Altitude of the floor, no floor if unset
    #[serde(default)]
    pub floor_altitude: Option<f64>,
    pub shapes: Vec<ShapeTemplate>,
}

impl RandomObjectsConfig {
    pub fn build(&self) -> Result<Scene> {
        let mut scene = build_random_objects(
            self.count,
            &self.shapes,
            self.seed,
            self.placement,
            self.world_size,
        )?;
        if self.all_pairs {
            scene.add_all_collision_pairs();
        }
        if let Some(wall_size) = self.wall_size {
            scene.add_enclosing_box(wall_size, DEFAULT_WALL_TINT)?;
        }
        if let Some(altitude) = self.floor_altitude {
            scene.add_floor(altitude, DEFAULT_FLOOR_TINT)?;
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip_through_toml() {
        let configs = [
            SceneConfig::default(),
            SceneConfig::Cubes(CubesSceneConfig::default()),
            SceneConfig::RandomObjects(RandomObjectsConfig {
                count: 2,
                seed: 1,
                placement: PlacementPolicy::Cyclic,
                world_size: 1.0,
                all_pairs: true,
                wall_size: Some(2.0),
                floor_altitude: None,
                shapes: vec![ShapeTemplate::SampleMesh],
            }),
        ];
        for config in configs {
            let s = toml::to_string(&config).unwrap();
            let parsed: SceneConfig = toml::from_str(&s).unwrap();
            assert_eq!(parsed, config);
        }
    }

    #[test]
    fn test_cubes_config() {
        let config: SceneConfig = toml::from_str(
            r#"
kind = "cubes"
number_of_cubes = 2
sizes = [0.2, 0.3]
masses = 2.0

[collisions]
corner_collisions = false
cube_collisions = true
"#,
        )
        .unwrap();
        let SceneConfig::Cubes(cubes) = &config else {
            panic!("unexpected config {config:?}");
        };
        assert_eq!(
            cubes.cube_specs().unwrap(),
            vec![CubeSpec::new(0.2, 2.0), CubeSpec::new(0.3, 2.0)]
        );
        assert!(!cubes.collisions.floor);
        let scene = config.build().unwrap();
        assert_eq!(scene.geometries.len(), 18);
        assert_eq!(scene.collision_pairs.len(), 1);
    }

    #[test]
    fn test_mismatched_cube_lists() {
        let config = CubesSceneConfig {
            number_of_cubes: 3,
            sizes: OneOrMany::Many(vec![0.2, 0.3]),
            ..Default::default()
        };
        assert!(matches!(
            config.build(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = toml::from_str::<SceneConfig>(
            r#"
kind = "dense"
nobj = 3
walls = true
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_random_objects_config() {
        let config: SceneConfig = toml::from_str(
            r#"
kind = "random_objects"
count = 3
placement = "cyclic"
floor_altitude = 0.0
shapes = [
    { type = "sphere", radius = 0.1 },
    { type = "box", size = [0.1, 0.1, 0.2] },
]
"#,
        )
        .unwrap();
        let scene = config.build().unwrap();
        assert_eq!(scene.geometries.len(), 4);
        assert_eq!(scene.collision_pairs.len(), 3);
    }
}
