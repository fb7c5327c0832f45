/// Singly-linked ownership list.
///
/// Every allocated resource that must be torn down en masse (images, loop hooks)
/// is registered here. The list owns its payloads; [`clear`](Self::clear) hands
/// each one to a finalizer before the nodes are released.
///
/// Performance characteristics:
/// - `register()` is O(1) (prepend)
/// - `remove_first()` and traversal are O(n)
///
/// Traversal visits every node exactly once, most recently registered first.
pub struct ResourceList<T> {
    head: Option<Box<Node<T>>>,
    len: usize,
}

struct Node<T> {
    value: T,
    next: Option<Box<Node<T>>>,
}

impl<T> ResourceList<T> {
    #[inline]
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Prepends `value`.
    ///
    /// Node allocation failure aborts the process through the global allocator's
    /// out-of-memory handler; there is no recoverable error path.
    #[inline]
    pub fn register(&mut self, value: T) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { value, next }));
        self.len += 1;
    }

    /// Unlinks and returns the first payload matching `pred`.
    pub fn remove_first<P>(&mut self, mut pred: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| !pred(&node.value)) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let mut node = cursor.take()?;
        *cursor = node.next.take();
        self.len -= 1;
        Some(node.value)
    }

    /// Runs `finalizer` on every payload, then releases all nodes.
    ///
    /// The list is empty afterwards and may be reused. Clearing an empty list
    /// is a no-op.
    pub fn clear<F>(&mut self, mut finalizer: F)
    where
        F: FnMut(T),
    {
        let mut cur = self.head.take();
        while let Some(node) = cur {
            let Node { value, next } = *node;
            finalizer(value);
            cur = next;
        }
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { next: self.head.as_deref() }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut { next: self.head.as_deref_mut() }
    }
}

impl<T> Default for ResourceList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ResourceList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// Unlink iteratively; the default recursive drop overflows the stack on long lists.
impl<T> Drop for ResourceList<T> {
    fn drop(&mut self) {
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}

pub struct IterMut<'a, T> {
    next: Option<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.take().map(|node| {
            self.next = node.next.as_deref_mut();
            &mut node.value
        })
    }
}

impl<'a, T> IntoIterator for &'a ResourceList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
