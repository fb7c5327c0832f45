//! The runtime context handed to applications.

use crate::compositor::Compositor;
use crate::hooks::{Hook, HookCtx, LoopControl};
use crate::resource::ResourceList;
use crate::time::FrameTime;

/// Owns every image and every registered loop hook.
///
/// Dropping the engine terminates it.
#[derive(Default)]
pub struct Engine {
    compositor: Compositor,
    hooks: ResourceList<Hook>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    #[inline]
    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    /// Registers a hook to run every frame.
    ///
    /// Hooks run most recently registered first.
    pub fn loop_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut HookCtx<'_>) + 'static,
    {
        self.hooks.register(Box::new(hook));
        log::debug!("loop hook registered ({} total)", self.hooks.len());
    }

    #[inline]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Runs every hook once for the frame described by `time`.
    pub fn run_hooks(&mut self, time: FrameTime) -> LoopControl {
        let mut quit = false;
        for hook in self.hooks.iter_mut() {
            let mut ctx = HookCtx::new(&mut self.compositor, time, &mut quit);
            hook(&mut ctx);
        }

        if quit {
            log::info!("quit requested at frame {}", time.frame_index);
            LoopControl::Exit
        } else {
            LoopControl::Continue
        }
    }

    /// Drops every hook and releases every image. Outstanding image handles
    /// become stale. The engine stays usable afterwards.
    pub fn terminate(&mut self) {
        if self.hooks.is_empty() && self.compositor.image_count() == 0 {
            return;
        }
        let hooks = self.hooks.len();
        self.hooks.clear(drop);
        self.compositor.terminate();
        log::debug!("engine terminated ({hooks} hooks dropped)");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    // ── hooks ─────────────────────────────────────────────────────────────

    #[test]
    fn hooks_run_newest_first() {
        let mut engine = Engine::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            engine.loop_hook(move |_| log.borrow_mut().push(tag));
        }

        assert_eq!(engine.run_hooks(FrameTime::ZERO), LoopControl::Continue);
        assert_eq!(*log.borrow(), vec!["c", "b", "a"]);
    }

    #[test]
    fn quit_finishes_the_frame() {
        let mut engine = Engine::new();
        let ran = Rc::new(RefCell::new(0));
        {
            let ran = Rc::clone(&ran);
            engine.loop_hook(move |_| *ran.borrow_mut() += 1);
        }
        engine.loop_hook(|ctx| ctx.quit());

        assert_eq!(engine.run_hooks(FrameTime::ZERO), LoopControl::Exit);
        assert_eq!(*ran.borrow(), 1);
    }

    #[test]
    fn hooks_can_draw() {
        let mut engine = Engine::new();
        let id = engine.compositor_mut().new_image(4, 4).unwrap();
        engine.loop_hook(move |ctx| {
            let x = ctx.time.frame_index as u32;
            if let Some(img) = ctx.compositor.image_mut(id) {
                img.put_pixel(x, 0, 0xFFFFFFFF);
            }
        });

        for frame_index in 0..4 {
            engine.run_hooks(FrameTime { frame_index, ..FrameTime::ZERO });
        }
        let img = engine.compositor().image(id).unwrap();
        assert!((0..4).all(|x| img.pixel(x, 0) == Some(0xFFFFFFFF)));
        assert_eq!(img.pixel(0, 1), Some(0));
    }

    // ── terminate ─────────────────────────────────────────────────────────

    #[test]
    fn terminate_drops_hooks_and_images() {
        let mut engine = Engine::new();
        let captured = Rc::new(());
        {
            let captured = Rc::clone(&captured);
            engine.loop_hook(move |_| {
                let _ = &captured;
            });
        }
        let id = engine.compositor_mut().new_image(2, 2).unwrap();
        engine.compositor_mut().image_to_window(id, 0, 0).unwrap();

        engine.terminate();
        assert_eq!(Rc::strong_count(&captured), 1);
        assert_eq!(engine.hook_count(), 0);
        assert_eq!(engine.compositor().image_count(), 0);
        assert!(engine.compositor().render_queue().is_empty());

        engine.terminate();
    }
}
