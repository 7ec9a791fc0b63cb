//! wgpu backend for the bivouac viewer: a depth pass from the light, a lit
//! pass from the camera that samples it, the light marker and the skybox.

pub mod assets;
pub mod color;
pub mod gpu;
pub mod mesh;
pub mod renderer;
pub mod shadow;
pub mod skybox;
pub mod texture;
pub mod uniforms;
pub mod vertex;

mod tests;

pub use gpu::Gpu;
pub use renderer::SceneRenderer;
