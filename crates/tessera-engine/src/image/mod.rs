//! CPU-side image data model.
//!
//! - [`Texture`]: transient decoded bitmap produced by `codec`
//! - [`ImageBuffer`]: persistent RGBA8 surface with a fixed size
//! - [`Instance`]: one positioned placement of an image buffer
//!
//! Data flow: decoder → `Texture` → [`blit`] → `ImageBuffer` → render queue.

mod blit;
mod buffer;
mod color;
mod instance;
mod texture;

pub use blit::blit;
pub use buffer::ImageBuffer;
pub use color::{pack_rgba, unpack_rgba};
pub use instance::{ImageId, Instance, InstanceId};
pub use texture::{ColorMode, PaletteInfo, Texture};
