//! Recency list: a circular doubly-linked list over an arena of nodes.
//!
//! Slot 0 is a sentinel that sits both before the front and after the back,
//! so linking and unlinking never branch on "empty" or "at an end".
//! Front is most recently used, back is least recently used.

use std::sync::atomic::{AtomicU32, Ordering};

/// Arena slot reserved for the sentinel
const SENTINEL: usize = 0;

static NEXT_LIST_ID: AtomicU32 = AtomicU32::new(1);

fn next_list_id() -> u32 {
    NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a node in a [`RecencyList`].
///
/// A handle is only honoured by the list instance that issued it, and only
/// until that node is removed or the list is re-initialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    list: u32,
    slot: usize,
    generation: u32,
}

/// Node in the recency list arena
struct Node<K, V> {
    entry: Option<(K, V)>,
    generation: u32,
    prev: usize,
    next: usize,
}

impl<K, V> Node<K, V> {
    fn vacant() -> Self {
        Self {
            entry: None,
            generation: 0,
            prev: SENTINEL,
            next: SENTINEL,
        }
    }
}

/// Ordering structure tracking recency of key/value pairs
pub struct RecencyList<K, V> {
    id: u32,
    nodes: Vec<Node<K, V>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        let mut list = Self {
            id: 0,
            nodes: Vec::with_capacity(capacity + 1),
            free_list: Vec::new(),
            len: 0,
        };
        list.init();
        list
    }

    /// Reset to the empty state, dropping every entry.
    ///
    /// Handles issued before the reset stop resolving.
    pub fn init(&mut self) -> &mut Self {
        self.id = next_list_id();
        self.nodes.clear();
        self.nodes.push(Node::vacant());
        self.free_list.clear();
        self.len = 0;
        self
    }

    /// Number of linked nodes, O(1)
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list has no nodes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently used node
    pub fn front(&self) -> Option<NodeRef> {
        if self.len == 0 {
            return None;
        }
        Some(self.handle(self.nodes[SENTINEL].next))
    }

    /// Least recently used node
    pub fn back(&self) -> Option<NodeRef> {
        if self.len == 0 {
            return None;
        }
        Some(self.handle(self.nodes[SENTINEL].prev))
    }

    /// Link a new node at the front and return its handle
    pub fn push_front(&mut self, key: K, value: V) -> NodeRef {
        let idx = self.alloc_node();
        self.nodes[idx].entry = Some((key, value));
        self.link_after(idx, SENTINEL);
        self.len += 1;
        self.handle(idx)
    }

    /// Move a node to the front.
    ///
    /// No-op if it is already the front or the handle is not live in this list.
    pub fn move_to_front(&mut self, node: NodeRef) {
        let Some(idx) = self.resolve(node) else {
            return;
        };
        if self.nodes[SENTINEL].next == idx {
            return;
        }
        self.unlink(idx);
        self.link_after(idx, SENTINEL);
    }

    /// Unlink a node and hand back its key and value.
    ///
    /// The handle is dead afterwards; its slot is recycled by later pushes.
    pub fn remove(&mut self, node: NodeRef) -> Option<(K, V)> {
        let idx = self.resolve(node)?;
        self.unlink(idx);
        let entry = {
            let slot = &mut self.nodes[idx];
            slot.prev = SENTINEL;
            slot.next = SENTINEL;
            slot.generation = slot.generation.wrapping_add(1);
            slot.entry.take()
        };
        self.free_list.push(idx);
        self.len -= 1;
        entry
    }

    /// Borrow the key and value behind a handle
    pub fn get(&self, node: NodeRef) -> Option<(&K, &V)> {
        let idx = self.resolve(node)?;
        self.nodes[idx].entry.as_ref().map(|(k, v)| (k, v))
    }

    /// Mutably borrow the value behind a handle
    pub fn get_mut(&mut self, node: NodeRef) -> Option<&mut V> {
        let idx = self.resolve(node)?;
        self.nodes[idx].entry.as_mut().map(|(_, v)| v)
    }

    /// Step towards the front. `None` once the sentinel is reached.
    pub fn prev(&self, node: NodeRef) -> Option<NodeRef> {
        let idx = self.resolve(node)?;
        match self.nodes[idx].prev {
            SENTINEL => None,
            prev => Some(self.handle(prev)),
        }
    }

    /// Iterate from back (oldest) to front (newest)
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.nodes[SENTINEL].prev,
            remaining: self.len,
        }
    }

    fn handle(&self, idx: usize) -> NodeRef {
        NodeRef {
            list: self.id,
            slot: idx,
            generation: self.nodes[idx].generation,
        }
    }

    fn resolve(&self, node: NodeRef) -> Option<usize> {
        if node.list != self.id || node.slot == SENTINEL {
            return None;
        }
        let slot = self.nodes.get(node.slot)?;
        (slot.generation == node.generation && slot.entry.is_some()).then_some(node.slot)
    }

    fn link_after(&mut self, idx: usize, at: usize) {
        let next = self.nodes[at].next;
        self.nodes[idx].prev = at;
        self.nodes[idx].next = next;
        self.nodes[at].next = idx;
        self.nodes[next].prev = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Node::vacant());
            idx
        }
    }
}

/// Back-to-front iterator over a [`RecencyList`]
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == SENTINEL {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.prev;
        self.remaining -= 1;
        node.entry.as_ref().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<K: Clone, V>(list: &RecencyList<K, V>) -> Vec<K> {
        list.iter().map(|(k, _)| k.clone()).collect()
    }

    #[test]
    fn test_list_empty() {
        let list: RecencyList<u32, &str> = RecencyList::new();

        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert!(list.front().is_none());
        assert!(list.back().is_none());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_list_push_front() {
        let mut list = RecencyList::new();

        let a = list.push_front(1, "a");
        let b = list.push_front(2, "b");
        let c = list.push_front(3, "c");

        assert_eq!(list.len(), 3);
        assert_eq!(list.front(), Some(c));
        assert_eq!(list.back(), Some(a));
        assert_eq!(list.get(b), Some((&2, &"b")));
        // Back to front
        assert_eq!(keys(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_list_move_to_front() {
        let mut list = RecencyList::new();

        let a = list.push_front(1, "a");
        let b = list.push_front(2, "b");
        list.push_front(3, "c");

        list.move_to_front(a);
        assert_eq!(list.front(), Some(a));
        assert_eq!(keys(&list), vec![2, 3, 1]);

        list.move_to_front(b);
        assert_eq!(keys(&list), vec![3, 1, 2]);

        // Already at front
        list.move_to_front(b);
        assert_eq!(keys(&list), vec![3, 1, 2]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_list_remove() {
        let mut list = RecencyList::new();

        let a = list.push_front(1, "a");
        let b = list.push_front(2, "b");
        let c = list.push_front(3, "c");

        assert_eq!(list.remove(b), Some((2, "b")));
        assert_eq!(list.len(), 2);
        assert_eq!(keys(&list), vec![1, 3]);

        // Handle is dead
        assert_eq!(list.remove(b), None);
        assert_eq!(list.get(b), None);
        assert_eq!(list.len(), 2);

        assert_eq!(list.remove(a), Some((1, "a")));
        assert_eq!(list.remove(c), Some((3, "c")));
        assert!(list.is_empty());
        assert!(list.front().is_none());
    }

    #[test]
    fn test_list_slot_reuse_invalidates_old_handle() {
        let mut list = RecencyList::new();

        let a = list.push_front(1, "a");
        list.remove(a);
        let b = list.push_front(2, "b");

        assert_ne!(a, b);
        assert_eq!(list.get(a), None);
        list.move_to_front(a);
        assert_eq!(list.get(b), Some((&2, &"b")));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_list_foreign_handle_ignored() {
        let mut ours = RecencyList::new();
        let mut theirs = RecencyList::new();

        let a = ours.push_front(1, "a");
        ours.push_front(2, "b");
        let foreign = theirs.push_front(9, "z");

        ours.move_to_front(foreign);
        assert_eq!(ours.remove(foreign), None);
        assert_eq!(ours.get(foreign), None);
        assert_eq!(keys(&ours), vec![1, 2]);
        assert_eq!(ours.back(), Some(a));
        assert_eq!(theirs.len(), 1);
    }

    #[test]
    fn test_list_init_resets() {
        let mut list = RecencyList::new();

        let a = list.push_front(1, "a");
        list.push_front(2, "b");
        list.init();

        assert!(list.is_empty());
        assert_eq!(list.get(a), None);

        let c = list.push_front(3, "c");
        assert_eq!(list.front(), Some(c));
        assert_eq!(list.back(), Some(c));
    }

    #[test]
    fn test_list_prev_walk() {
        let mut list = RecencyList::new();

        list.push_front(1, "a");
        list.push_front(2, "b");
        let c = list.push_front(3, "c");

        let mut walked = Vec::new();
        let mut cursor = list.back();
        while let Some(node) = cursor {
            walked.push(*list.get(node).unwrap().0);
            cursor = list.prev(node);
        }
        assert_eq!(walked, vec![1, 2, 3]);
        assert_eq!(list.prev(c), None);
    }

    #[test]
    fn test_list_get_mut() {
        let mut list = RecencyList::new();

        let a = list.push_front(1, String::from("a"));
        list.get_mut(a).unwrap().push('!');

        assert_eq!(list.get(a).map(|(_, v)| v.as_str()), Some("a!"));
    }

    #[test]
    fn test_list_iter_len() {
        let mut list = RecencyList::new();
        for i in 0..5 {
            list.push_front(i, i * 10);
        }

        let iter = list.iter();
        assert_eq!(iter.len(), 5);
        let values: Vec<_> = iter.map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 10, 20, 30, 40]);
    }
}
