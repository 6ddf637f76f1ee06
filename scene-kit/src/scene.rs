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
use std::{collections::BTreeMap, fmt};

use indexmap::IndexSet;
use k::nalgebra as na;
use tracing::debug;

use crate::{
    errors::*,
    geometry::{Geometry, MassProperties},
};

/// Index of a body inside [`Scene::bodies`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

impl BodyId {
    /// The fixed world body, always the first body of a scene
    pub const WORLD: BodyId = BodyId(0);
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    /// Welded to the world
    Fixed,
    /// Six degrees of freedom: free translation (within limits) and free rotation
    FreeFlyer,
}

/// Rigid object of a scene
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub joint: JointKind,
    /// Translation limits along x, y and z. `None` means unbounded, empty for fixed bodies.
    pub translation_limits: Vec<Option<k::joint::Range<f64>>>,
    pub mass: f64,
    /// Center of mass in the body frame
    pub com: na::Point3<f64>,
    /// Rotational inertia about the center of mass
    pub inertia: na::Matrix3<f64>,
}

impl Body {
    /// The massless body every static geometry is attached to
    pub fn world() -> Self {
        Self {
            name: "world".to_owned(),
            joint: JointKind::Fixed,
            translation_limits: Vec::new(),
            mass: 0.0,
            com: na::Point3::origin(),
            inertia: na::Matrix3::zeros(),
        }
    }

    pub fn free_flyer(
        name: impl Into<String>,
        translation_limits: [k::joint::Range<f64>; 3],
        mass_properties: &MassProperties,
    ) -> Self {
        Self {
            name: name.into(),
            joint: JointKind::FreeFlyer,
            translation_limits: translation_limits.into_iter().map(Some).collect(),
            mass: mass_properties.mass,
            com: mass_properties.local_com,
            inertia: mass_properties.angular_inertia,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.joint == JointKind::Fixed
    }
}

/// Class of a geometry object, used to decide which pairs are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Generic free-floating object
    Object,
    /// Box of the `cube`-th cube
    Cube { cube: usize },
    /// Small sphere at a corner of the `cube`-th cube
    CubeCorner { cube: usize, corner: usize },
    Wall,
    Floor,
}

impl GeometryKind {
    /// Index of the cube this geometry belongs to, if any
    pub fn cube_index(&self) -> Option<usize> {
        match *self {
            GeometryKind::Cube { cube } | GeometryKind::CubeCorner { cube, .. } => Some(cube),
            _ => None,
        }
    }
}

/// RGBA color, each channel in `[0, 1]`
pub type Tint = [f64; 4];

/// Collidable shape attached to a body
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryObject {
    pub name: String,
    pub kind: GeometryKind,
    pub body: BodyId,
    /// Pose of the shape in the body frame
    pub placement: na::Isometry3<f64>,
    pub geometry: Geometry,
    pub tint: Tint,
}

/// Unordered pair of distinct geometry indices, stored with `first < second`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    first: usize,
    second: usize,
}

impl CollisionPair {
    /// Returns `None` for a self-pair
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a,
                second: b,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b,
                second: a,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn second(&self) -> usize {
        self.second
    }

    pub fn contains(&self, index: usize) -> bool {
        self.first == index || self.second == index
    }
}

/// Insertion-ordered set of collision pairs without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionPairs {
    pairs: IndexSet<CollisionPair>,
}

impl CollisionPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the pair was already present or `a == b`
    pub fn insert(&mut self, a: usize, b: usize) -> bool {
        match CollisionPair::new(a, b) {
            Some(pair) => self.pairs.insert(pair),
            None => {
                debug!("ignore self collision pair ({a}, {a})");
                false
            }
        }
    }

    pub fn remove(&mut self, a: usize, b: usize) -> bool {
        CollisionPair::new(a, b).is_some_and(|pair| self.pairs.shift_remove(&pair))
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        CollisionPair::new(a, b).is_some_and(|pair| self.pairs.contains(&pair))
    }

    /// Keep only the pairs for which `f` returns `true`, preserving order
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&CollisionPair) -> bool,
    {
        self.pairs.retain(f);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollisionPair> + '_ {
        self.pairs.iter()
    }
}

impl<'a> IntoIterator for &'a CollisionPairs {
    type Item = &'a CollisionPair;
    type IntoIter = indexmap::set::Iter<'a, CollisionPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// One world pose per body, indexed by [`BodyId`]
pub type Configuration = Vec<na::Isometry3<f64>>;

/// Bodies, geometry objects and the collision pairs to check between them
#[derive(Debug, Clone)]
pub struct Scene {
    pub bodies: Vec<Body>,
    pub geometries: Vec<GeometryObject>,
    pub collision_pairs: CollisionPairs,
    /// Named configurations, e.g. `"default"` for the cube scenes
    pub reference_configurations: BTreeMap<String, Configuration>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene holding only the world body
    pub fn new() -> Self {
        Self {
            bodies: vec![Body::world()],
            geometries: Vec::new(),
            collision_pairs: CollisionPairs::new(),
            reference_configurations: BTreeMap::new(),
        }
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.push(body);
        BodyId(self.bodies.len() - 1)
    }

    /// Append a geometry object and return its index
    pub fn add_geometry_object(&mut self, object: GeometryObject) -> Result<usize> {
        if object.body.0 >= self.bodies.len() {
            return Err(Error::InvalidConfiguration(format!(
                "geometry {} references unknown body {}",
                object.name, object.body
            )));
        }
        self.geometries.push(object);
        Ok(self.geometries.len() - 1)
    }

    /// Add a pair of geometry indices, returns `false` if nothing was added
    pub fn add_collision_pair(&mut self, a: usize, b: usize) -> Result<bool> {
        for index in [a, b] {
            if index >= self.geometries.len() {
                return Err(Error::GeometryNotFound(index));
            }
        }
        Ok(self.collision_pairs.insert(a, b))
    }

    /// Add every pair of geometries, excluding self-pairs
    pub fn add_all_collision_pairs(&mut self) {
        let n = self.geometries.len();
        for a in 0..n {
            for b in (a + 1)..n {
                self.collision_pairs.insert(a, b);
            }
        }
    }

    pub fn geometry_index(&self, name: &str) -> Option<usize> {
        self.geometries.iter().position(|g| g.name == name)
    }

    /// Names of the two geometries of `pair`
    pub fn pair_names(&self, pair: &CollisionPair) -> Result<(&str, &str)> {
        let name = |index: usize| {
            self.geometries
                .get(index)
                .map(|g| g.name.as_str())
                .ok_or(Error::GeometryNotFound(index))
        };
        Ok((name(pair.first())?, name(pair.second())?))
    }

    /// Number of free-flyer bodies
    pub fn num_free_bodies(&self) -> usize {
        self.bodies.iter().filter(|b| !b.is_fixed()).count()
    }

    /// Configuration with every body at the world origin
    pub fn neutral_configuration(&self) -> Configuration {
        vec![na::Isometry3::identity(); self.bodies.len()]
    }

    /// World pose of a geometry object for `configuration`
    pub fn geometry_pose(
        &self,
        configuration: &[na::Isometry3<f64>],
        index: usize,
    ) -> Result<na::Isometry3<f64>> {
        if configuration.len() != self.bodies.len() {
            return Err(Error::DofMismatch(configuration.len(), self.bodies.len()));
        }
        let object = self
            .geometries
            .get(index)
            .ok_or(Error::GeometryNotFound(index))?;
        Ok(configuration[object.body.0] * object.placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(name: &str, body: BodyId) -> GeometryObject {
        GeometryObject {
            name: name.to_owned(),
            kind: GeometryKind::Object,
            body,
            placement: na::Isometry3::identity(),
            geometry: Geometry::Sphere { radius: 0.1 },
            tint: [1.0; 4],
        }
    }

    #[test]
    fn test_collision_pair_is_unordered() {
        assert_eq!(CollisionPair::new(3, 1), CollisionPair::new(1, 3));
        assert!(CollisionPair::new(2, 2).is_none());
        let pair = CollisionPair::new(5, 4).unwrap();
        assert_eq!(pair.first(), 4);
        assert_eq!(pair.second(), 5);
        assert!(pair.contains(5));
        assert!(!pair.contains(3));
    }

    #[test]
    fn test_collision_pairs_dedup() {
        let mut pairs = CollisionPairs::new();
        assert!(pairs.insert(0, 1));
        assert!(!pairs.insert(1, 0));
        assert!(!pairs.insert(2, 2));
        assert!(pairs.insert(2, 0));
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(0, 2));
        assert!(pairs.remove(2, 0));
        assert!(!pairs.remove(2, 0));
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_add_collision_pair_checks_indices() {
        let mut scene = Scene::new();
        scene.add_geometry_object(sphere("a", BodyId::WORLD)).unwrap();
        scene.add_geometry_object(sphere("b", BodyId::WORLD)).unwrap();
        assert!(scene.add_collision_pair(0, 1).unwrap());
        assert!(!scene.add_collision_pair(1, 0).unwrap());
        assert!(matches!(
            scene.add_collision_pair(0, 2),
            Err(Error::GeometryNotFound(2))
        ));
        assert!(scene.add_geometry_object(sphere("c", BodyId(4))).is_err());
    }

    #[test]
    fn test_add_all_collision_pairs() {
        let mut scene = Scene::new();
        for name in ["a", "b", "c", "d"] {
            scene.add_geometry_object(sphere(name, BodyId::WORLD)).unwrap();
        }
        scene.add_all_collision_pairs();
        assert_eq!(scene.collision_pairs.len(), 6);
        let pair = scene.collision_pairs.iter().next().unwrap();
        assert_eq!(scene.pair_names(pair).unwrap(), ("a", "b"));
    }

    #[test]
    fn test_pair_names_of_unknown_geometry() {
        let mut scene = Scene::new();
        scene.add_geometry_object(sphere("a", BodyId::WORLD)).unwrap();
        scene.collision_pairs.insert(0, 3);
        let pair = scene.collision_pairs.iter().next().unwrap();
        assert!(matches!(
            scene.pair_names(pair),
            Err(Error::GeometryNotFound(3))
        ));
    }

    #[test]
    fn test_geometry_pose() {
        let mut scene = Scene::new();
        let mut object = sphere("a", BodyId::WORLD);
        object.placement = na::Isometry3::translation(0.0, 0.0, 1.0);
        scene.add_geometry_object(object).unwrap();
        let mut q = scene.neutral_configuration();
        q[0] = na::Isometry3::translation(1.0, 0.0, 0.0);
        let pose = scene.geometry_pose(&q, 0).unwrap();
        assert_eq!(pose.translation.vector, na::Vector3::new(1.0, 0.0, 1.0));
        assert!(matches!(
            scene.geometry_pose(&[], 0),
            Err(Error::DofMismatch(0, 1))
        ));
    }
}
