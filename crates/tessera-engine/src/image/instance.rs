use crate::scene::ZIndex;

/// Generational handle to an image owned by a [`Compositor`](crate::compositor::Compositor).
///
/// Deleting an image bumps the slot generation, so a handle kept past
/// deletion is recognized as stale even after the slot is reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Handle to one placement of an image.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct InstanceId {
    pub image: ImageId,
    pub(crate) index: u32,
}

impl InstanceId {
    /// Position of this placement in its image's instance list.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// One placement of an image in the window.
///
/// Coordinates are window-relative logical pixels, origin top-left, +Y down.
/// Higher `z` draws later (on top).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Instance {
    pub x: i32,
    pub y: i32,
    pub(crate) z: ZIndex,
}

impl Instance {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z: ZIndex::new(z) }
    }

    /// Depth. Change it through `Compositor::set_instance_depth` so the render
    /// queue re-sorts.
    #[inline]
    pub fn z(&self) -> i32 {
        self.z.0
    }
}
