//! Opaque GPU-side image resources.
//!
//! Each image buffer owns exactly one [`TextureHandle`]. The registry only hands
//! out and retires handles; the wgpu renderer materializes a texture for every
//! live handle on the next frame and drops textures for retired ones.

mod registry;

pub use registry::{TextureHandle, TextureRegistry};
