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
//! # Collision Scene Builder
//!
//! Build teaching scenes of free-floating objects, walls, a floor and cubes with
//! corner spheres, together with the set of geometry pairs to check for collision.
//! `ncollide3d` is used to check the pairs for a given configuration.
//!

#![warn(rust_2018_idioms)]

mod errors;

pub mod builder;

pub mod collision;

mod config;

mod funcs;

pub mod geometry;

mod mesh;

pub mod scene;

pub use crate::{
    builder::*,
    collision::{find_colliding_configuration, CollisionCheckerConfig, SceneCollisionChecker},
    config::*,
    errors::{Error, Result},
    funcs::*,
    geometry::{ConvexPolyhedron, Geometry, MassProperties, ShapeTemplate},
    mesh::{load_convex_mesh, sample_convex_mesh},
    scene::*,
};
