use std::{f64::consts::PI, path::PathBuf};

use k::nalgebra as na;
use ncollide3d::{
    procedural::IndexBuffer::{Split, Unified},
    shape::{Ball, Capsule, ConvexHull, Cuboid, Plane, ShapeHandle},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    errors::*,
    mesh::{load_convex_mesh, sample_convex_mesh},
};

/// Number of longitude samples used to approximate an ellipsoid by a convex hull
const ELLIPSOID_LONGITUDES: usize = 16;
/// Number of latitude samples used to approximate an ellipsoid by a convex hull
const ELLIPSOID_LATITUDES: usize = 8;

/// Collidable shape expressed in its own local frame
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Box { half_extents: na::Vector3<f64> },
    Sphere { radius: f64 },
    /// Capsule aligned with the local y axis
    Capsule { half_height: f64, radius: f64 },
    Ellipsoid { radii: na::Vector3<f64> },
    /// Infinite half-space whose solid part lies below the plane through the origin
    HalfSpace { normal: na::Unit<na::Vector3<f64>> },
    Convex(ConvexPolyhedron),
}

impl Geometry {
    /// Short class name used to build geometry names
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Box { .. } => "Box",
            Geometry::Sphere { .. } => "Sphere",
            Geometry::Capsule { .. } => "Capsule",
            Geometry::Ellipsoid { .. } => "Ellipsoid",
            Geometry::HalfSpace { .. } => "Halfspace",
            Geometry::Convex(_) => "Convex",
        }
    }

    /// Box with full edge lengths `x`, `y` and `z`
    pub fn cuboid(x: f64, y: f64, z: f64) -> Self {
        Geometry::Box {
            half_extents: na::Vector3::new(x, y, z) * 0.5,
        }
    }

    pub fn volume(&self) -> Option<f64> {
        let volume = match self {
            Geometry::Box { half_extents } => 8.0 * half_extents.x * half_extents.y * half_extents.z,
            Geometry::Sphere { radius } => 4.0 / 3.0 * PI * radius.powi(3),
            Geometry::Capsule {
                half_height,
                radius,
            } => PI * radius.powi(2) * 2.0 * half_height + 4.0 / 3.0 * PI * radius.powi(3),
            Geometry::Ellipsoid { radii } => 4.0 / 3.0 * PI * radii.x * radii.y * radii.z,
            Geometry::HalfSpace { .. } => return None,
            Geometry::Convex(convex) => convex.unit_mass_properties().0,
        };
        Some(volume)
    }

    /// Center of mass in the local frame of the shape
    pub fn center_of_mass(&self) -> Option<na::Point3<f64>> {
        match self {
            Geometry::HalfSpace { .. } => None,
            Geometry::Convex(convex) => Some(convex.unit_mass_properties().1),
            _ => Some(na::Point3::origin()),
        }
    }

    /// Mass, center of mass and inertia about the center of mass for a uniform `density`
    ///
    /// Returns `Error::UnsupportedShape` for unbounded shapes.
    pub fn mass_properties(&self, density: f64) -> Result<MassProperties> {
        ensure_positive("density", density)?;
        let (volume, local_com, unit_inertia) = match self {
            Geometry::Box { half_extents } => {
                let size = half_extents * 2.0;
                let volume = size.x * size.y * size.z;
                let inertia = na::Matrix3::from_diagonal(&na::Vector3::new(
                    size.y.powi(2) + size.z.powi(2),
                    size.x.powi(2) + size.z.powi(2),
                    size.x.powi(2) + size.y.powi(2),
                )) * (volume / 12.0);
                (volume, na::Point3::origin(), inertia)
            }
            Geometry::Sphere { radius } => {
                let volume = 4.0 / 3.0 * PI * radius.powi(3);
                let inertia = na::Matrix3::identity() * (0.4 * volume * radius.powi(2));
                (volume, na::Point3::origin(), inertia)
            }
            Geometry::Capsule {
                half_height,
                radius,
            } => {
                let r2 = radius.powi(2);
                let height = 2.0 * half_height;
                let cylinder = PI * r2 * height;
                let caps = 4.0 / 3.0 * PI * radius.powi(3);
                let axial = cylinder * r2 / 2.0 + caps * 0.4 * r2;
                let transverse = cylinder * (height.powi(2) / 12.0 + r2 / 4.0)
                    + caps * (0.4 * r2 + height.powi(2) / 4.0 + 3.0 * height * radius / 8.0);
                let inertia =
                    na::Matrix3::from_diagonal(&na::Vector3::new(transverse, axial, transverse));
                (cylinder + caps, na::Point3::origin(), inertia)
            }
            Geometry::Ellipsoid { radii } => {
                let volume = 4.0 / 3.0 * PI * radii.x * radii.y * radii.z;
                let inertia = na::Matrix3::from_diagonal(&na::Vector3::new(
                    radii.y.powi(2) + radii.z.powi(2),
                    radii.x.powi(2) + radii.z.powi(2),
                    radii.x.powi(2) + radii.y.powi(2),
                )) * (volume / 5.0);
                (volume, na::Point3::origin(), inertia)
            }
            Geometry::HalfSpace { .. } => {
                return Err(Error::UnsupportedShape(
                    "a half-space has no finite mass".to_owned(),
                ))
            }
            Geometry::Convex(convex) => convex.unit_mass_properties(),
        };
        if volume.is_nan() || volume <= 0.0 {
            return Err(Error::UnsupportedShape(format!(
                "{} has a degenerate volume {volume}",
                self.type_name()
            )));
        }
        Ok(MassProperties {
            mass: volume * density,
            local_com,
            angular_inertia: unit_inertia * density,
        })
    }

    /// Convert into a `ncollide3d` shape usable by the narrow phase
    pub fn to_shape_handle(&self) -> Result<ShapeHandle<f64>> {
        let handle = match self {
            Geometry::Box { half_extents } => ShapeHandle::new(Cuboid::new(*half_extents)),
            Geometry::Sphere { radius } => ShapeHandle::new(Ball::new(*radius)),
            Geometry::Capsule {
                half_height,
                radius,
            } => ShapeHandle::new(Capsule::new(*half_height, *radius)),
            Geometry::Ellipsoid { radii } => {
                let points = ellipsoid_surface_points(radii);
                ShapeHandle::new(ConvexHull::try_from_points(&points).ok_or_else(|| {
                    Error::UnsupportedShape(format!("degenerate ellipsoid {radii:?}"))
                })?)
            }
            Geometry::HalfSpace { normal } => ShapeHandle::new(Plane::new(*normal)),
            Geometry::Convex(convex) => {
                ShapeHandle::new(ConvexHull::try_from_points(&convex.vertices).ok_or_else(
                    || Error::UnsupportedShape("degenerate convex polyhedron".to_owned()),
                )?)
            }
        };
        Ok(handle)
    }
}

fn ellipsoid_surface_points(radii: &na::Vector3<f64>) -> Vec<na::Point3<f64>> {
    let mut points = vec![
        na::Point3::new(0.0, 0.0, radii.z),
        na::Point3::new(0.0, 0.0, -radii.z),
    ];
    for i in 1..ELLIPSOID_LATITUDES {
        let theta = PI * i as f64 / ELLIPSOID_LATITUDES as f64;
        for j in 0..ELLIPSOID_LONGITUDES {
            let phi = 2.0 * PI * j as f64 / ELLIPSOID_LONGITUDES as f64;
            points.push(na::Point3::new(
                radii.x * theta.sin() * phi.cos(),
                radii.y * theta.sin() * phi.sin(),
                radii.z * theta.cos(),
            ));
        }
    }
    points
}

/// Mass properties of a rigid shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f64,
    /// Center of mass in the local frame of the shape
    pub local_com: na::Point3<f64>,
    /// Rotational inertia about the center of mass
    pub angular_inertia: na::Matrix3<f64>,
}

impl MassProperties {
    /// Solid box of full edge lengths `x`, `y`, `z` centered at the origin
    pub fn from_box(mass: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            mass,
            local_com: na::Point3::origin(),
            angular_inertia: na::Matrix3::from_diagonal(&na::Vector3::new(
                y * y + z * z,
                x * x + z * z,
                x * x + y * y,
            )) * (mass / 12.0),
        }
    }
}

/// Closed convex polyhedron given by its hull vertices and outward triangles
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolyhedron {
    vertices: Vec<na::Point3<f64>>,
    faces: Vec<[usize; 3]>,
}

impl ConvexPolyhedron {
    /// Compute the convex hull of `points`
    pub fn from_points(points: &[na::Point3<f64>]) -> Result<Self> {
        if points.len() < 4 {
            return Err(Error::UnsupportedShape(format!(
                "a convex hull needs at least 4 points but {} given",
                points.len()
            )));
        }
        let hull = ncollide3d::transformation::convex_hull(points);
        let faces = match hull.indices {
            Unified(ind) => ind
                .into_iter()
                .map(|p| [p[0] as usize, p[1] as usize, p[2] as usize])
                .collect(),
            Split(_) => {
                return Err(Error::UnsupportedShape(
                    "convex hull with split index buffer".to_owned(),
                ))
            }
        };
        Ok(Self {
            vertices: hull.coords,
            faces,
        })
    }

    pub fn vertices(&self) -> &[na::Point3<f64>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Volume, centroid and inertia about the centroid for a unit density
    ///
    /// The hull is split into tetrahedra sharing the vertex mean, which lies inside the hull, so
    /// the face winding does not matter.
    fn unit_mass_properties(&self) -> (f64, na::Point3<f64>, na::Matrix3<f64>) {
        let canonical = na::Matrix3::new(2.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0) / 120.0;
        let reference = self
            .vertices
            .iter()
            .fold(na::Vector3::zeros(), |acc, p| acc + p.coords)
            / self.vertices.len().max(1) as f64;

        let mut volume = 0.0;
        let mut first_moment = na::Vector3::zeros();
        let mut covariance = na::Matrix3::zeros();
        for face in &self.faces {
            let a = self.vertices[face[0]].coords - reference;
            let b = self.vertices[face[1]].coords - reference;
            let c = self.vertices[face[2]].coords - reference;
            let edges = na::Matrix3::from_columns(&[a, b, c]);
            let det = edges.determinant().abs();
            volume += det / 6.0;
            first_moment += (a + b + c) * (det / 24.0);
            covariance += edges * canonical * edges.transpose() * det;
        }
        if volume <= 0.0 {
            return (0.0, reference.into(), na::Matrix3::zeros());
        }
        let offset = first_moment / volume;
        // second moment about the centroid
        let covariance = covariance - offset * offset.transpose() * volume;
        let inertia = na::Matrix3::identity() * covariance.trace() - covariance;
        (volume, (reference + offset).into(), inertia)
    }
}

fn default_mesh_scale() -> [f64; 3] {
    [1.0; 3]
}

/// Declarative description of a shape used to populate a scene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeTemplate {
    /// Box with full edge lengths
    Box { size: [f64; 3] },
    Sphere { radius: f64 },
    /// Capsule along the y axis, `length` being the distance between the two cap centers
    Capsule { radius: f64, length: f64 },
    Ellipsoid { radii: [f64; 3] },
    /// Convex hull of a STL or COLLADA mesh file
    Mesh {
        filename: PathBuf,
        #[serde(default = "default_mesh_scale")]
        scale: [f64; 3],
    },
    /// Convex hull of the sample mesh shipped with this crate
    SampleMesh,
}

impl ShapeTemplate {
    /// Build the geometry described by this template
    ///
    /// Bad dimensions are reported as `Error::InvalidConfiguration`, meshes that can not be loaded
    /// as `Error::UnsupportedShape`.
    pub fn to_geometry(&self) -> Result<Geometry> {
        match self {
            ShapeTemplate::Box { size } => {
                for v in size {
                    ensure_positive("box size", *v)?;
                }
                Ok(Geometry::cuboid(size[0], size[1], size[2]))
            }
            ShapeTemplate::Sphere { radius } => {
                ensure_positive("sphere radius", *radius)?;
                Ok(Geometry::Sphere { radius: *radius })
            }
            ShapeTemplate::Capsule { radius, length } => {
                ensure_positive("capsule radius", *radius)?;
                ensure_positive("capsule length", *length)?;
                Ok(Geometry::Capsule {
                    half_height: length * 0.5,
                    radius: *radius,
                })
            }
            ShapeTemplate::Ellipsoid { radii } => {
                for v in radii {
                    ensure_positive("ellipsoid radius", *v)?;
                }
                Ok(Geometry::Ellipsoid {
                    radii: na::Vector3::from(*radii),
                })
            }
            ShapeTemplate::Mesh { filename, scale } => {
                for v in scale {
                    ensure_positive("mesh scale", *v)?;
                }
                load_convex_mesh(filename, scale)
                    .map(Geometry::Convex)
                    .map_err(|e| match e {
                        Error::UnsupportedShape(_) => e,
                        e => Error::UnsupportedShape(format!("failed to load {filename:?}: {e}")),
                    })
            }
            ShapeTemplate::SampleMesh => sample_convex_mesh().map(Geometry::Convex),
        }
    }
}
