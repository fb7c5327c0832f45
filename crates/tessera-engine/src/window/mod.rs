//! Window and main loop.
//!
//! Owns the `winit` event loop and the single window, and wires them to the
//! GPU layer and the engine.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
