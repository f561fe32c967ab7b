//! Error types for scene construction, rendering and asset loading.
//!
//! None of these are fatal to the host application: a [`SceneError`] raised
//! while acquiring the surface degrades the hero scene to an empty surface,
//! and an [`AssetError`] simply leaves the model out of the scene.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while acquiring or driving the rendering surface.
#[derive(Error, Debug)]
pub enum SceneError {
    /// No adapter compatible with the window surface.
    #[error("no compatible graphics adapter: {0}")]
    AdapterUnavailable(String),

    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to create graphics device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Frame acquisition failed (lost or outdated surface, timeout, ...).
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("invalid scene configuration: {0}")]
    InvalidConfig(String),
}

impl SceneError {
    /// True when the surface only needs to be reconfigured before the next frame.
    pub fn is_surface_lost(&self) -> bool {
        matches!(
            self,
            SceneError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }
}

/// Failures while loading an optional model asset.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to import model {path:?}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("model {0:?} contains no triangle geometry")]
    NoGeometry(PathBuf),

    #[error("mesh {mesh:?} has a primitive without positions")]
    MissingPositions { mesh: Option<String> },
}

/// Malformed `#RRGGBB` colour literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid colour {0:?}, expected #RRGGBB")]
pub struct ColorError(pub String);
