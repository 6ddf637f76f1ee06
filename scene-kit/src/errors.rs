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

use std::io;

use thiserror::Error;

/// Error for `scene_kit`
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Invalid configuration: {}", .0)]
    InvalidConfiguration(String),
    #[error("Unsupported shape: {}", .0)]
    UnsupportedShape(String),
    #[error("Geometry object {} not found", .0)]
    GeometryNotFound(usize),
    #[error("DoF mismatch {} != {}", .0, .1)]
    DofMismatch(usize, usize),
    #[error("IO error {:?}", source)]
    Io {
        #[from]
        source: io::Error,
    },
    #[error("Mesh error {}", .0)]
    MeshError(String),
}

/// Result for `scene_kit`
pub type Result<T> = ::std::result::Result<T, Error>;

/// Fails with [`Error::InvalidConfiguration`] unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration(format!(
            "{what} must be a positive finite number but {value}"
        )))
    }
}
