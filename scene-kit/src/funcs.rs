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
use std::f64::consts::PI;

use k::nalgebra as na;
use rand::Rng;

use crate::scene::{Configuration, Scene, Tint};

type Limits = [Option<k::joint::Range<f64>>];

/// Generate random positions from the optional limits
///
/// If the limit is None, -PI <-> PI is used.
///
/// ```
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let limits = vec![Some(k::joint::Range::new(0.0, 0.2)), None];
/// let positions = scene_kit::generate_random_positions_from_limits(&limits, &mut rng);
/// assert!(positions[0] >= 0.0 && positions[0] < 0.2);
/// assert!(positions[1].abs() <= std::f64::consts::PI);
/// ```
pub fn generate_random_positions_from_limits<R>(limits: &Limits, rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    limits
        .iter()
        .map(|range| match *range {
            Some(ref range) => (range.max - range.min) * rng.gen::<f64>() + range.min,
            None => (rng.gen::<f64>() - 0.5) * 2.0 * PI,
        })
        .collect()
}

/// Uniformly distributed rotation (Shoemake's subgroup algorithm)
pub fn random_rotation<R>(rng: &mut R) -> na::UnitQuaternion<f64>
where
    R: Rng + ?Sized,
{
    let u1: f64 = rng.gen();
    let u2 = rng.gen::<f64>() * 2.0 * PI;
    let u3 = rng.gen::<f64>() * 2.0 * PI;
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    na::UnitQuaternion::from_quaternion(na::Quaternion::new(
        b * u3.cos(),
        a * u2.sin(),
        a * u2.cos(),
        b * u3.sin(),
    ))
}

/// Random opaque color
pub fn random_tint<R>(rng: &mut R) -> Tint
where
    R: Rng + ?Sized,
{
    [rng.gen(), rng.gen(), rng.gen(), 1.0]
}

/// Random configuration: translations inside the body limits, uniform orientations
///
/// Fixed bodies keep the identity pose.
pub fn random_configuration<R>(scene: &Scene, rng: &mut R) -> Configuration
where
    R: Rng + ?Sized,
{
    scene
        .bodies
        .iter()
        .map(|body| {
            if body.is_fixed() {
                return na::Isometry3::identity();
            }
            let mut translation = na::Vector3::zeros();
            let positions = generate_random_positions_from_limits(&body.translation_limits, rng);
            for (axis, position) in positions.into_iter().take(3).enumerate() {
                translation[axis] = position;
            }
            na::Isometry3::from_parts(translation.into(), random_rotation(rng))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_random_positions_inside_limits() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let limits = vec![
            None,
            Some(k::joint::Range::new(-1.0, 1.0)),
            Some(k::joint::Range::new(0.0, 0.1)),
        ];
        for _ in 0..1000 {
            let positions = generate_random_positions_from_limits(&limits, &mut rng);
            assert_eq!(positions.len(), limits.len());
            assert!(positions[0] >= -PI && positions[0] < PI);
            assert!(positions[1] >= -1.0 && positions[1] < 1.0);
            assert!(positions[2] >= 0.0 && positions[2] < 0.1);
        }
    }

    #[test]
    fn test_random_rotation_is_normalized() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let q = random_rotation(&mut rng);
            assert_approx_eq!(q.quaternion().norm(), 1.0, 1e-12);
        }
    }

    #[test]
    fn test_random_tint() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let tint = random_tint(&mut rng);
        assert_eq!(tint[3], 1.0);
        assert!(tint[..3].iter().all(|c| (0.0..1.0).contains(c)));
    }
}
