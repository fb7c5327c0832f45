//! Tessera engine crate.
//!
//! A small pixel compositor: CPU-side RGBA8 images, placed any number of
//! times in a window, drawn back-to-front by a wgpu renderer every frame.
//!
//! The core ([`compositor`], [`image`], [`codec`], [`scene`]) has no window or
//! GPU dependency and is usable headless; [`window::Runtime`] adds the window.

pub mod codec;
pub mod compositor;
pub mod device;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod hooks;
pub mod image;
pub mod logging;
pub mod render;
pub mod resource;
pub mod scene;
pub mod time;
pub mod window;

pub use compositor::{Compositor, DrawItem, ImageState};
pub use engine::Engine;
pub use error::{DecodeError, ImageError, ImageFormat};
pub use hooks::{HookCtx, LoopControl};
pub use crate::image::{ImageBuffer, ImageId, Instance, InstanceId, Texture};
