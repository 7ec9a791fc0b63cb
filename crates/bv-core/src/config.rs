use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::camera::{Projection, WORLD_UP};
use crate::error::{Error, Result};

pub const CONFIG_ENV_VAR: &str = "BIVOUAC_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "bivouac.toml";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub shadow: ShadowConfig,
    pub assets: AssetConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Bivouac".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub speed: f32,
    pub sensitivity: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.0, 3.0],
            target: [0.0, 0.0, -10.0],
            speed: 0.1,
            sensitivity: 0.1,
            fov_degrees: 45.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

impl CameraConfig {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.target)
    }

    pub fn projection(&self, width: u32, height: u32) -> Projection {
        let mut projection = Projection {
            fov_degrees: self.fov_degrees,
            aspect_ratio: 1.0,
            near: self.near,
            far: self.far,
        };
        projection.resize(width, height);
        projection
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub resolution: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self { resolution: 2048 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
    /// Substitute procedural stand-ins for missing meshes and skybox faces.
    pub placeholders: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            placeholders: false,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// `$BIVOUAC_CONFIG`, then `./bivouac.toml`, then built-in defaults.
    pub fn discover() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            log::info!("Loading config from {path} (via {CONFIG_ENV_VAR})");
            return Self::load(Path::new(&path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            log::info!("Loading config from {}", local.display());
            return Self::load(local);
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));

        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window size must be non-zero");
        }
        if self.shadow.resolution == 0 {
            return invalid("shadow resolution must be non-zero");
        }

        let camera = &self.camera;
        if camera.speed <= 0.0 || camera.sensitivity <= 0.0 {
            return invalid("camera speed and sensitivity must be positive");
        }
        if camera.near <= 0.0 || camera.near >= camera.far {
            return invalid("camera near plane must be positive and closer than far");
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return invalid("camera fov must lie in (0, 180) degrees");
        }
        if camera.position == camera.target {
            return invalid("camera target must differ from its position");
        }
        let front = (camera.target() - camera.position()).normalize();
        if front.cross(WORLD_UP).length_squared() < 1e-6 {
            return invalid("camera must not look straight up or down");
        }

        Ok(())
    }
}
