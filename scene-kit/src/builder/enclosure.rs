use k::nalgebra as na;
use tracing::debug;

use crate::{
    errors::*,
    geometry::Geometry,
    scene::{BodyId, GeometryKind, GeometryObject, Scene, Tint},
};

/// Default color of the walls added by [`Scene::add_enclosing_box`]
pub const DEFAULT_WALL_TINT: Tint = [1.0, 1.0, 1.0, 0.2];
/// Default color of the floor added by [`Scene::add_floor`]
pub const DEFAULT_FLOOR_TINT: Tint = [0.9, 0.6, 0.0, 0.2];

impl Scene {
    /// Add a box made of 6 static walls forming a cube of edge `wall_size`
    ///
    /// Each wall is `0.05 * wall_size` thick. Collision pairs are then added between every
    /// wall and every non-wall geometry of the scene, never between two walls.
    pub fn add_enclosing_box(&mut self, wall_size: f64, tint: Tint) -> Result<()> {
        ensure_positive("wall size", wall_size)?;
        let thickness = wall_size * 0.05;
        let half = wall_size / 2.0;

        let walls = [
            (
                "wall_X-",
                na::Vector3::new(-(wall_size + thickness) / 2.0, 0.0, 0.0),
                Geometry::cuboid(thickness, wall_size, wall_size),
            ),
            (
                "wall_X+",
                na::Vector3::new(half, 0.0, 0.0),
                Geometry::cuboid(thickness, wall_size, wall_size),
            ),
            (
                "wall_Y-",
                na::Vector3::new(0.0, -half, 0.0),
                Geometry::cuboid(wall_size, thickness, wall_size),
            ),
            (
                "wall_Y+",
                na::Vector3::new(0.0, half, 0.0),
                Geometry::cuboid(wall_size, thickness, wall_size),
            ),
            (
                "wall_Z-",
                na::Vector3::new(0.0, 0.0, -half),
                Geometry::cuboid(wall_size, wall_size, thickness),
            ),
            (
                "wall_Z+",
                na::Vector3::new(0.0, 0.0, half),
                Geometry::cuboid(wall_size, wall_size, thickness),
            ),
        ];
        for (name, translation, geometry) in walls {
            self.add_geometry_object(GeometryObject {
                name: name.to_owned(),
                kind: GeometryKind::Wall,
                body: BodyId::WORLD,
                placement: na::Isometry3::from_parts(
                    translation.into(),
                    na::UnitQuaternion::identity(),
                ),
                geometry,
                tint,
            })?;
        }

        let n = self.geometries.len();
        for a in 0..n {
            for b in (a + 1)..n {
                let wall_a = self.geometries[a].kind == GeometryKind::Wall;
                let wall_b = self.geometries[b].kind == GeometryKind::Wall;
                if wall_a ^ wall_b {
                    self.collision_pairs.insert(a, b);
                }
            }
        }
        debug!(
            "enclosing box of size {wall_size}: {} pairs",
            self.collision_pairs.len()
        );
        Ok(())
    }

    /// Add an infinite horizontal floor at `altitude` and pair it with every other geometry
    ///
    /// Returns the index of the floor geometry.
    pub fn add_floor(&mut self, altitude: f64, tint: Tint) -> Result<usize> {
        if !altitude.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "floor altitude must be finite but {altitude}"
            )));
        }
        let floor = self.add_geometry_object(GeometryObject {
            name: "floor".to_owned(),
            kind: GeometryKind::Floor,
            body: BodyId::WORLD,
            placement: na::Isometry3::translation(0.0, 0.0, altitude),
            geometry: Geometry::HalfSpace {
                normal: na::Vector3::z_axis(),
            },
            tint,
        })?;
        for index in 0..self.geometries.len() {
            if self.geometries[index].kind != GeometryKind::Floor {
                self.collision_pairs.insert(index, floor);
            }
        }
        Ok(floor)
    }
}
