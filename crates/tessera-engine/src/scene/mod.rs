//! Render queue.
//!
//! Responsibilities:
//! - record every placed (image, instance) pair
//! - provide deterministic paint order (z-index + placement order)
//! - drop all entries of an image when it is deleted

mod key;
mod queue;
mod z_index;

pub use key::SortKey;
pub use queue::{QueueEntry, RenderQueue};
pub use z_index::ZIndex;
