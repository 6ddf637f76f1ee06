/*
Copyright 2017 Takashi Ogura

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/
use std::fmt;

use k::nalgebra as na;
use ncollide3d::{
    query::{self, Contact},
    shape::ShapeHandle,
};
use rand::{rngs::StdRng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    errors::*,
    funcs::random_configuration,
    scene::{CollisionPair, Configuration, Scene},
};

fn default_prediction() -> f64 {
    0.0
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CollisionCheckerConfig {
    /// Margin length for collision detection
    #[serde(default = "default_prediction")]
    pub prediction: f64,
}

impl Default for CollisionCheckerConfig {
    fn default() -> Self {
        Self {
            prediction: default_prediction(),
        }
    }
}

/// Narrow phase check of the collision pairs of a [`Scene`]
pub struct SceneCollisionChecker<'a> {
    scene: &'a Scene,
    shapes: Vec<Option<ShapeHandle<f64>>>,
    /// margin length for collision detection
    pub prediction: f64,
}

impl fmt::Debug for SceneCollisionChecker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneCollisionChecker")
            .field("num_shapes", &self.shapes.iter().flatten().count())
            .field("prediction", &self.prediction)
            .finish_non_exhaustive()
    }
}

impl<'a> SceneCollisionChecker<'a> {
    /// Convert every geometry of `scene` once
    ///
    /// Geometries without a collision shape are skipped, and so are their pairs.
    pub fn new(scene: &'a Scene, config: CollisionCheckerConfig) -> Self {
        let shapes = scene
            .geometries
            .iter()
            .map(|object| match object.geometry.to_shape_handle() {
                Ok(shape) => Some(shape),
                Err(e) => {
                    warn!("skip geometry {}: {e}", object.name);
                    None
                }
            })
            .collect();
        Self {
            scene,
            shapes,
            prediction: config.prediction,
        }
    }

    /// Pairs closer than the prediction margin, touching pairs included
    pub fn colliding_pairs(
        &self,
        configuration: &[na::Isometry3<f64>],
    ) -> Result<Vec<CollisionPair>> {
        if configuration.len() != self.scene.bodies.len() {
            return Err(Error::DofMismatch(
                configuration.len(),
                self.scene.bodies.len(),
            ));
        }
        let mut colliding = Vec::new();
        for pair in &self.scene.collision_pairs {
            let (Some(shape1), Some(shape2)) =
                (self.shape(pair.first())?, self.shape(pair.second())?)
            else {
                continue;
            };
            let pose1 = self.scene.geometry_pose(configuration, pair.first())?;
            let pose2 = self.scene.geometry_pose(configuration, pair.second())?;
            let dist = query::distance(&pose1, &**shape1, &pose2, &**shape2);
            if dist <= self.prediction {
                let (name1, name2) = self.scene.pair_names(pair)?;
                debug!("name: {name1}, name: {name2} dist={dist}");
                colliding.push(*pair);
            }
        }
        Ok(colliding)
    }

    /// Contact points, normal and depth of `pair`, `None` if the shapes are apart
    pub fn contact(
        &self,
        configuration: &[na::Isometry3<f64>],
        pair: &CollisionPair,
    ) -> Result<Option<Contact<f64>>> {
        let (Some(shape1), Some(shape2)) =
            (self.shape(pair.first())?, self.shape(pair.second())?)
        else {
            return Ok(None);
        };
        let pose1 = self.scene.geometry_pose(configuration, pair.first())?;
        let pose2 = self.scene.geometry_pose(configuration, pair.second())?;
        Ok(query::contact(
            &pose1,
            &**shape1,
            &pose2,
            &**shape2,
            self.prediction,
        ))
    }

    fn shape(&self, index: usize) -> Result<Option<&ShapeHandle<f64>>> {
        self.shapes
            .get(index)
            .map(Option::as_ref)
            .ok_or(Error::GeometryNotFound(index))
    }

    pub fn is_collision_detected(&self, configuration: &[na::Isometry3<f64>]) -> Result<bool> {
        Ok(!self.colliding_pairs(configuration)?.is_empty())
    }
}

/// Draw random configurations until one of them has a colliding pair
///
/// Returns the configuration and its colliding pairs, or `None` after `max_trials`
/// collision free draws.
pub fn find_colliding_configuration(
    scene: &Scene,
    config: CollisionCheckerConfig,
    seed: u64,
    max_trials: usize,
) -> Result<Option<(Configuration, Vec<CollisionPair>)>> {
    let checker = SceneCollisionChecker::new(scene, config);
    let mut rng = StdRng::seed_from_u64(seed);
    for trial in 0..max_trials {
        let configuration = random_configuration(scene, &mut rng);
        let pairs = checker.colliding_pairs(&configuration)?;
        if !pairs.is_empty() {
            info!("found {} colliding pairs at trial {trial}", pairs.len());
            return Ok(Some((configuration, pairs)));
        }
    }
    info!("no collision found in {max_trials} trials");
    Ok(None)
}
