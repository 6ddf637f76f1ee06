use std::{ffi::OsStr, path::Path};

use fs_err as fs;
use k::nalgebra as na;
use tracing::debug;

use crate::{errors::*, geometry::ConvexPolyhedron};

/// Irregular convex "potato" used by the dense demo scenes
const SAMPLE_MESH_STL: &[u8] = include_bytes!("../assets/mesh.stl");

/// Load a STL or COLLADA file and return the convex hull of its vertices
pub fn load_convex_mesh<P>(filename: P, scale: &[f64; 3]) -> Result<ConvexPolyhedron>
where
    P: AsRef<Path>,
{
    let filename = filename.as_ref();
    let points = match filename.extension().and_then(OsStr::to_str) {
        Some("stl" | "STL") => load_stl_points(&fs::read(filename)?, scale)?,
        Some("dae" | "DAE") => load_collada_points(filename, scale)?,
        _ => {
            return Err(Error::UnsupportedShape(format!(
                "could not parse {filename:?}: only stl and dae meshes are supported"
            )))
        }
    };
    debug!("loaded {} vertices from {filename:?}", points.len());
    ConvexPolyhedron::from_points(&points)
}

/// Convex hull of the mesh embedded in this crate
pub fn sample_convex_mesh() -> Result<ConvexPolyhedron> {
    ConvexPolyhedron::from_points(&load_stl_points(SAMPLE_MESH_STL, &[1.0; 3])?)
}

fn load_stl_points(bytes: &[u8], scale: &[f64; 3]) -> Result<Vec<na::Point3<f64>>> {
    let mesh =
        mesh_loader::stl::from_slice(bytes).map_err(|e| Error::MeshError(e.to_string()))?;
    Ok(mesh
        .meshes
        .iter()
        .flat_map(|m| m.vertices.iter().map(|v| scaled_point(v, scale)))
        .collect())
}

fn load_collada_points<P>(filename: P, scale: &[f64; 3]) -> Result<Vec<na::Point3<f64>>>
where
    P: AsRef<Path>,
{
    let scene = mesh_loader::collada::from_str(&fs::read_to_string(filename)?)
        .map_err(|e| Error::MeshError(e.to_string()))?;
    Ok(scene
        .meshes
        .iter()
        .flat_map(|mesh| mesh.vertices.iter().map(|v| scaled_point(v, scale)))
        .collect())
}

fn scaled_point(v: &[f32; 3], scale: &[f64; 3]) -> na::Point3<f64> {
    na::Point3::new(
        v[0] as f64 * scale[0],
        v[1] as f64 * scale[1],
        v[2] as f64 * scale[2],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;

    #[test]
    fn test_sample_mesh_is_off_center() {
        let convex = sample_convex_mesh().unwrap();
        assert!(convex.vertices().len() >= 4);
        let com = Geometry::Convex(convex).center_of_mass().unwrap();
        // the sample mesh is not centered on its origin
        assert!(com.coords.norm() > 0.01, "{com:?}");
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            load_convex_mesh("mesh.obj", &[1.0; 3]),
            Err(Error::UnsupportedShape(_))
        ));
    }

    #[test]
    fn test_broken_stl() {
        assert!(matches!(
            load_stl_points(b"solid broken\nfacet", &[1.0; 3]),
            Err(Error::MeshError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_convex_mesh("does/not/exist.stl", &[1.0; 3]),
            Err(Error::Io { .. })
        ));
    }
}
