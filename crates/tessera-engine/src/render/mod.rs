//! GPU drawing of the compositor's render queue.
//!
//! Conventions: positions are physical pixels, origin top-left, +Y down. The
//! vertex shader converts to NDC through a viewport uniform.

mod ctx;
mod image;
mod quad;

pub use ctx::{RenderCtx, RenderTarget};
pub use self::image::ImageRenderer;
