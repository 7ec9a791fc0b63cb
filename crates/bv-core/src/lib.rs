//! Scene model for the bivouac viewer: camera, placements, light, patrols
//! and collision. Nothing here touches the GPU.

pub mod animation;
pub mod camera;
pub mod collision;
pub mod config;
pub mod error;
pub mod frame;
pub mod light;
pub mod look;
pub mod pass;
pub mod scene;
pub mod transform;

mod tests;

pub use error::{Error, Result};
