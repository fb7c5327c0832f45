//! Frame timing for the main loop.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
