//! Format decoders.
//!
//! Pure functions from file bytes to a [`Texture`](crate::image::Texture);
//! no window or GPU state is touched.

mod png;
mod xpm42;

pub use png::{decode_png, load_png};
pub use xpm42::{decode_xpm42, load_xpm42};
