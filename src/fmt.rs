//! Formatting implementation for the IpSet

use std::fmt::{Debug, Formatter, Result};

use crate::arena::{NodeId, ROOT};
use crate::IpSet;

/// Renders the trie as nested maps. Each node shows its `value` (if any), and its children under
/// the keys `"0"` (left) and `"1"` (right).
impl<T: Debug> Debug for IpSet<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("IpSet")
            .field("len", &self.len())
            .field("root", &DebugNode(self, ROOT))
            .finish()
    }
}

struct DebugNode<'a, T>(&'a IpSet<T>, NodeId);

impl<T: Debug> Debug for DebugNode<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let set = self.0;
        let node = &set.arena[self.1];
        let mut map = f.debug_map();
        if let Some(v) = node.value.as_ref() {
            map.entry(&"value", v);
        }
        if let Some(left) = node.left {
            map.entry(&"0", &Self(set, left));
        }
        if let Some(right) = node.right {
            map.entry(&"1", &Self(set, right));
        }
        map.finish()
    }
}
