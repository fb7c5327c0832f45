use std::collections::HashSet;

/// Opaque handle to the GPU resource backing one image buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle(u64);

impl TextureHandle {
    #[cfg(test)]
    #[inline]
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Issues and retires [`TextureHandle`]s for one compositor.
///
/// A handle becomes resident once the renderer has created its GPU texture.
/// Only resident handles are queued on release, for the renderer to collect
/// with [`take_released`](Self::take_released); a handle that never reached
/// the GPU is forgotten at once, so headless use queues nothing.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    next: u64,
    live: HashSet<TextureHandle>,
    resident: HashSet<TextureHandle>,
    released: Vec<TextureHandle>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> TextureHandle {
        self.next = self.next.wrapping_add(1);
        let handle = TextureHandle(self.next);
        self.live.insert(handle);
        log::trace!("texture handle {} allocated", handle.0);
        handle
    }

    /// Records that the renderer now holds a GPU texture for `handle`.
    pub(crate) fn mark_resident(&mut self, handle: TextureHandle) {
        if self.live.contains(&handle) {
            self.resident.insert(handle);
        }
    }

    /// Retires `handle`. Returns `false` if it was not live.
    pub fn release(&mut self, handle: TextureHandle) -> bool {
        if !self.live.remove(&handle) {
            log::warn!("texture handle {} released twice", handle.0);
            return false;
        }
        if self.resident.remove(&handle) {
            self.released.push(handle);
        }
        true
    }

    #[inline]
    pub fn is_live(&self, handle: TextureHandle) -> bool {
        self.live.contains(&handle)
    }

    /// Number of handles currently owned by image buffers.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Released handles the renderer has not collected yet.
    #[inline]
    pub fn pending_released(&self) -> usize {
        self.released.len()
    }

    /// Drains handles retired since the last call.
    pub fn take_released(&mut self) -> Vec<TextureHandle> {
        std::mem::take(&mut self.released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_issues_distinct_live_handles() {
        let mut reg = TextureRegistry::new();
        let a = reg.allocate();
        let b = reg.allocate();
        assert_ne!(a, b);
        assert!(reg.is_live(a) && reg.is_live(b));
        assert_eq!(reg.live_count(), 2);
    }

    #[test]
    fn release_queues_resident_handles_once() {
        let mut reg = TextureRegistry::new();
        let a = reg.allocate();
        reg.mark_resident(a);
        assert!(reg.release(a));
        assert!(!reg.release(a));
        assert_eq!(reg.live_count(), 0);
        assert_eq!(reg.take_released(), vec![a]);
        assert!(reg.take_released().is_empty());
    }

    #[test]
    fn release_forgets_handles_never_uploaded() {
        let mut reg = TextureRegistry::new();
        let a = reg.allocate();
        let b = reg.allocate();
        reg.mark_resident(a);
        assert!(reg.release(a));
        assert!(reg.release(b));
        assert_eq!(reg.live_count(), 0);
        assert_eq!(reg.take_released(), vec![a]);
    }

    #[test]
    fn retired_handles_cannot_become_resident() {
        let mut reg = TextureRegistry::new();
        let a = reg.allocate();
        reg.release(a);
        reg.mark_resident(a);
        assert_eq!(reg.pending_released(), 0);
    }
}
