use crate::image::{ImageId, InstanceId};

use super::{SortKey, ZIndex};

/// One placed instance waiting to be drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct QueueEntry {
    pub instance: InstanceId,
    pub key: SortKey,
}

impl QueueEntry {
    #[inline]
    pub fn image(&self) -> ImageId {
        self.instance.image
    }
}

/// Every currently placed instance, across all images.
///
/// Entries are kept in placement order; paint order is derived lazily by
/// sorting indices on [`SortKey`]. The `enabled` flag of an image is not
/// consulted here: the draw step filters disabled images while iterating.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `remove_image()` is O(n)
/// - paint-order iteration reuses an internal index buffer; no per-frame
///   allocation once warmed
#[derive(Debug, Default)]
pub struct RenderQueue {
    entries: Vec<QueueEntry>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl RenderQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in placement order.
    #[inline]
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Entries belonging to `image`, in placement order.
    pub fn entries_for(&self, image: ImageId) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter().filter(move |e| e.image() == image)
    }

    /// Queues a placement.
    pub fn push(&mut self, instance: InstanceId, z: ZIndex) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.entries.push(QueueEntry {
            instance,
            key: SortKey::new(z, order),
        });
        self.sorted_dirty = true;
    }

    /// Removes every entry of `image`. Returns how many were removed.
    pub fn remove_image(&mut self, image: ImageId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.image() != image);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.sorted_dirty = true;
        }
        removed
    }

    /// Moves an instance to a new depth, keeping its placement order for ties.
    pub fn set_depth(&mut self, instance: InstanceId, z: ZIndex) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.instance == instance) else {
            return false;
        };
        if entry.key.z != z {
            entry.key.z = z;
            self.sorted_dirty = true;
        }
        true
    }

    /// Drops every entry. Keeps allocated capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_order = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = true;
    }

    /// Iterates entries in paint order (back-to-front).
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &QueueEntry> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.entries[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.entries.len());

        // Keys are unique (order is a counter), so an unstable sort is deterministic.
        let entries = &self.entries;
        self.sorted_indices
            .sort_unstable_by_key(|&i| entries[i].key);

        self.sorted_dirty = false;
    }
}
