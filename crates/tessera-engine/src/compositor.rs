//! Image ownership and placement.
//!
//! The [`Compositor`] owns every [`ImageBuffer`], hands out generational
//! [`ImageId`]s, tracks allocations in a [`ResourceList`] for bulk teardown and
//! maintains the [`RenderQueue`] the draw step consumes each frame.

use std::path::Path;

use crate::codec;
use crate::error::ImageError;
use crate::gpu::TextureRegistry;
use crate::image::{ImageBuffer, ImageId, Instance, InstanceId, Texture, blit};
use crate::resource::ResourceList;
use crate::scene::{RenderQueue, ZIndex};

/// Lifecycle state of an image handle.
///
/// `Disabled` keeps pixels, instances and queue entries; only drawing is
/// skipped. `Destroyed` is terminal for that handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ImageState {
    Active,
    Disabled,
    Destroyed,
}

#[derive(Debug)]
enum Slot {
    Vacant { generation: u32 },
    Occupied { generation: u32, image: ImageBuffer },
}

impl Slot {
    #[inline]
    fn generation(&self) -> u32 {
        match self {
            Slot::Vacant { generation } | Slot::Occupied { generation, .. } => *generation,
        }
    }
}

/// One visible placement produced by [`Compositor::visible_in_paint_order`].
#[derive(Debug, Copy, Clone)]
pub struct DrawItem<'a> {
    pub id: ImageId,
    pub image: &'a ImageBuffer,
    pub instance: &'a Instance,
}

/// Owner of all image buffers of one runtime context.
#[derive(Debug, Default)]
pub struct Compositor {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Every live image, for teardown.
    images: ResourceList<ImageId>,
    queue: RenderQueue,
    textures: TextureRegistry,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Allocates a zeroed `width` x `height` RGBA8 image with a fresh GPU handle.
    ///
    /// The image starts enabled with no instances (allocated but invisible).
    pub fn new_image(&mut self, width: u16, height: u16) -> Result<ImageId, ImageError> {
        if width == 0 || height == 0 {
            log::warn!("new_image: refusing {width}x{height} image");
            return Err(ImageError::InvalidArgument("image dimensions must be non-zero"));
        }

        let texture = self.textures.allocate();
        let image = match ImageBuffer::allocate(width, height, texture) {
            Ok(image) => image,
            Err(e) => {
                log::error!("new_image: {e}");
                self.textures.release(texture);
                return Err(e);
            }
        };

        let id = self.insert(image);
        self.images.register(id);
        log::debug!("image {id:?} created ({width}x{height})");
        Ok(id)
    }

    /// Deletes an image: its pixels, instances, queue entries and GPU handle.
    ///
    /// Deleting an already deleted handle is rejected with
    /// [`ImageError::StaleHandle`] and has no other effect.
    pub fn delete_image(&mut self, id: ImageId) -> Result<(), ImageError> {
        let Some(image) = self.vacate(id) else {
            log::warn!("delete_image: image {id:?} is not live");
            return Err(ImageError::StaleHandle);
        };

        self.images.remove_first(|&tracked| tracked == id);
        let unqueued = self.queue.remove_image(id);
        self.textures.release(image.texture_handle());
        log::debug!("image {id:?} deleted ({unqueued} queued instances removed)");
        Ok(())
    }

    /// Releases every image and empties the render queue.
    ///
    /// All outstanding handles become stale.
    pub fn terminate(&mut self) {
        let mut images = std::mem::take(&mut self.images);
        let mut released = 0usize;
        images.clear(|id| {
            if let Some(image) = self.vacate(id) {
                self.textures.release(image.texture_handle());
                released += 1;
            }
        });
        self.queue.clear();
        log::debug!("compositor terminated ({released} images released)");
    }

    // ── placement ─────────────────────────────────────────────────────────

    /// Places `id` in the window at `(x, y)` with depth 0.
    pub fn image_to_window(&mut self, id: ImageId, x: i32, y: i32) -> Result<InstanceId, ImageError> {
        self.place(id, x, y, 0)
    }

    /// Adds a new instance of `id` at `(x, y, z)` and queues it for drawing.
    ///
    /// The same image may be placed any number of times; all instances share
    /// its pixels.
    pub fn place(&mut self, id: ImageId, x: i32, y: i32, z: i32) -> Result<InstanceId, ImageError> {
        let Some(image) = self.get_mut(id) else {
            log::warn!("place: image {id:?} is not live");
            return Err(ImageError::StaleHandle);
        };

        let index = image.push_instance(Instance::new(x, y, z))?;
        let instance = InstanceId { image: id, index };
        self.queue.push(instance, ZIndex(z));
        Ok(instance)
    }

    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.image(id.image)?.instances().get(id.index())
    }

    /// Mutable access to an instance's position.
    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.get_mut(id.image)?.instance_mut(id.index())
    }

    /// Changes the draw depth of one instance.
    pub fn set_instance_depth(&mut self, id: InstanceId, z: i32) -> Result<(), ImageError> {
        let Some(instance) = self.instance_mut(id) else {
            log::warn!("set_instance_depth: instance {id:?} is not live");
            return Err(ImageError::StaleHandle);
        };
        instance.z = ZIndex(z);
        self.queue.set_depth(id, ZIndex(z));
        Ok(())
    }

    /// Shows or hides every instance of an image without deallocating it.
    pub fn set_enabled(&mut self, id: ImageId, enabled: bool) -> Result<(), ImageError> {
        let image = self.get_mut(id).ok_or(ImageError::StaleHandle)?;
        image.set_enabled(enabled);
        Ok(())
    }

    // ── texture pipeline ──────────────────────────────────────────────────

    /// Allocates an image sized exactly to `texture` and blits it at (0, 0).
    ///
    /// On failure no image is left behind.
    pub fn texture_to_image(&mut self, texture: &Texture) -> Result<ImageId, ImageError> {
        let (Ok(width), Ok(height)) = (u16::try_from(texture.width()), u16::try_from(texture.height()))
        else {
            log::error!(
                "texture_to_image: {}x{} texture exceeds the maximum image size",
                texture.width(),
                texture.height()
            );
            return Err(ImageError::InvalidArgument("texture exceeds the maximum image size"));
        };

        let id = self.new_image(width, height)?;
        let result = match self.get_mut(id) {
            Some(image) => blit(image, texture, 0, 0),
            None => Err(ImageError::StaleHandle),
        };

        if let Err(e) = result {
            let _ = self.delete_image(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Decodes a PNG file straight into a new image.
    pub fn load_png_image(&mut self, path: impl AsRef<Path>) -> Result<ImageId, ImageError> {
        let texture = codec::load_png(path)?;
        self.texture_to_image(&texture)
    }

    /// Decodes an XPM42 file straight into a new image.
    pub fn load_xpm42_image(&mut self, path: impl AsRef<Path>) -> Result<ImageId, ImageError> {
        let texture = codec::load_xpm42(path)?;
        self.texture_to_image(&texture)
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn image(&self, id: ImageId) -> Option<&ImageBuffer> {
        match self.slots.get(id.index as usize)? {
            Slot::Occupied { generation, image } if *generation == id.generation => Some(image),
            _ => None,
        }
    }

    pub fn image_mut(&mut self, id: ImageId) -> Option<&mut ImageBuffer> {
        self.get_mut(id)
    }

    pub fn state(&self, id: ImageId) -> ImageState {
        match self.image(id) {
            Some(image) if image.is_enabled() => ImageState::Active,
            Some(_) => ImageState::Disabled,
            None => ImageState::Destroyed,
        }
    }

    /// Number of live images.
    #[inline]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Live images, most recently created first.
    pub fn images(&self) -> impl Iterator<Item = (ImageId, &ImageBuffer)> {
        self.images
            .iter()
            .filter_map(|&id| self.image(id).map(|image| (id, image)))
    }

    /// Live images in slot order, mutably.
    pub fn images_mut(&mut self) -> impl Iterator<Item = (ImageId, &mut ImageBuffer)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Occupied { generation, image } => {
                Some((ImageId { index: index as u32, generation: *generation }, image))
            }
            Slot::Vacant { .. } => None,
        })
    }

    #[inline]
    pub fn render_queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Queued instances of enabled images, back-to-front.
    pub fn visible_in_paint_order(&mut self) -> impl Iterator<Item = DrawItem<'_>> {
        let slots = &self.slots;
        self.queue.iter_in_paint_order().filter_map(move |entry| {
            let id = entry.image();
            let image = match slots.get(id.index as usize)? {
                Slot::Occupied { generation, image } if *generation == id.generation => image,
                _ => return None,
            };
            if !image.is_enabled() {
                return None;
            }
            let instance = image.instances().get(entry.instance.index())?;
            Some(DrawItem { id, image, instance })
        })
    }

    #[inline]
    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    #[inline]
    pub fn textures_mut(&mut self) -> &mut TextureRegistry {
        &mut self.textures
    }

    // ── slots ─────────────────────────────────────────────────────────────

    fn get_mut(&mut self, id: ImageId) -> Option<&mut ImageBuffer> {
        match self.slots.get_mut(id.index as usize)? {
            Slot::Occupied { generation, image } if *generation == id.generation => Some(image),
            _ => None,
        }
    }

    fn insert(&mut self, image: ImageBuffer) -> ImageId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let generation = slot.generation();
            *slot = Slot::Occupied { generation, image };
            return ImageId { index, generation };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot::Occupied { generation: 0, image });
        ImageId { index, generation: 0 }
    }

    fn vacate(&mut self, id: ImageId) -> Option<ImageBuffer> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if !matches!(slot, Slot::Occupied { generation, .. } if *generation == id.generation) {
            return None;
        }

        let vacant = Slot::Vacant { generation: id.generation.wrapping_add(1) };
        let Slot::Occupied { image, .. } = std::mem::replace(slot, vacant) else {
            return None;
        };
        self.free.push(id.index);
        Some(image)
    }
}
