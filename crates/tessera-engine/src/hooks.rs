//! Per-frame loop hooks.

use crate::compositor::Compositor;
use crate::time::FrameTime;

/// Directive returned after running the hooks of one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// A callback run once per frame, before drawing.
pub type Hook = Box<dyn FnMut(&mut HookCtx<'_>)>;

/// What a hook may touch during one frame.
pub struct HookCtx<'a> {
    pub compositor: &'a mut Compositor,
    pub time: FrameTime,
    quit: &'a mut bool,
}

impl<'a> HookCtx<'a> {
    pub(crate) fn new(compositor: &'a mut Compositor, time: FrameTime, quit: &'a mut bool) -> Self {
        Self { compositor, time, quit }
    }

    /// Asks the loop to stop after this frame. Remaining hooks still run.
    pub fn quit(&mut self) {
        *self.quit = true;
    }

    /// Seconds since the previous frame.
    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.time.dt
    }
}
