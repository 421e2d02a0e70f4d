//! Code to remove entries from the set.

use super::*;

impl<T> IpSet<T> {
    /// Remove the value stored for exactly `prefix` and return it. Values of more specific
    /// prefixes stay in the set. Nodes that are no longer needed are returned to the node pool.
    ///
    /// Fails with [`Error::NotFound`] if `prefix` holds no value.
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # use std::net::Ipv4Addr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: IpSet<_> = IpSet::new();
    /// set.add(&"10.0.0.0/8".parse::<Ipv4Net>()?, "A")?;
    /// set.add(&"10.1.0.0/16".parse::<Ipv4Net>()?, "B")?;
    /// assert_eq!(set.remove(&"10.0.0.0/8".parse::<Ipv4Net>()?), Ok("A"));
    /// assert_eq!(set.remove(&"10.0.0.0/8".parse::<Ipv4Net>()?), Err(Error::NotFound));
    /// assert_eq!(set.get_by_addr(Ipv4Addr::new(10, 2, 0, 0)), None);
    /// assert_eq!(set.get_by_addr(Ipv4Addr::new(10, 1, 0, 0)), Some(&"B"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove<P: Prefix>(&mut self, prefix: &P) -> Result<T> {
        let idx = self.find_node(prefix)?.ok_or(Error::NotFound)?;
        let node = &mut self.arena[idx];
        let value = if idx == ROOT || node.has_children() {
            // keep the node, it is still needed as a branch
            node.value.take().ok_or(Error::NotFound)?
        } else {
            if node.value.is_none() {
                return Err(Error::NotFound);
            }
            self.prune(idx).ok_or(Error::NotFound)?
        };
        self.len -= 1;
        Ok(value)
    }

    /// Remove `prefix` together with all prefixes it contains, and return the number of values
    /// that were dropped. The root prefix (`/0`) is cleared but never removed.
    ///
    /// Fails with [`Error::NotFound`] if the trie has no node for `prefix`, i.e., neither
    /// `prefix` nor any more specific prefix was inserted.
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # use std::net::Ipv4Addr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: IpSet<_> = IpSet::new();
    /// set.add(&"10.0.0.0/8".parse::<Ipv4Net>()?, "A")?;
    /// set.add(&"10.1.0.0/16".parse::<Ipv4Net>()?, "B")?;
    /// set.add(&"11.0.0.0/8".parse::<Ipv4Net>()?, "C")?;
    /// assert_eq!(set.remove_subtree(&"10.0.0.0/8".parse::<Ipv4Net>()?), Ok(2));
    /// assert_eq!(set.get_by_addr(Ipv4Addr::new(10, 1, 5, 5)), None);
    /// assert_eq!(set.get_by_addr(Ipv4Addr::new(11, 1, 5, 5)), Some(&"C"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove_subtree<P: Prefix>(&mut self, prefix: &P) -> Result<usize> {
        let idx = self.find_node(prefix)?.ok_or(Error::NotFound)?;
        let mut removed = self.discard_descendants(idx);
        let value = if idx == ROOT {
            self.arena[ROOT].value.take()
        } else {
            self.prune(idx)
        };
        if value.is_some() {
            removed += 1;
        }
        self.len -= removed;
        tracing::debug!(removed, nodes = self.arena.live(), "removed subtree");
        Ok(removed)
    }

    /// Remove all values from the set. All nodes except the root are returned to the node pool.
    pub fn clear(&mut self) {
        self.discard_descendants(ROOT);
        self.arena[ROOT].value = None;
        self.len = 0;
    }

    /// Release all nodes below `idx` and return how many of them held a value. The node `idx`
    /// itself stays in the tree, without children.
    fn discard_descendants(&mut self, idx: NodeId) -> usize {
        let node = &mut self.arena[idx];
        let mut stack: Vec<NodeId> = node.left.take().into_iter().collect();
        stack.extend(node.right.take());
        let mut removed = 0;
        while let Some(cur) = stack.pop() {
            let node = &mut self.arena[cur];
            stack.extend(node.left.take());
            stack.extend(node.right.take());
            if self.arena.release(cur).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Detach the node `idx`, which must not have any children, and release it. Then, walk up
    /// and release every ancestor that is left without a value and without children. The root
    /// always stays. Returns the value of `idx`.
    fn prune(&mut self, idx: NodeId) -> Option<T> {
        debug_assert!(!self.arena[idx].has_children());
        let mut parent = self.arena.detach(idx)?;
        let value = self.arena.release(idx);
        while parent != ROOT && self.arena[parent].is_empty() {
            let cur = parent;
            // only the root lacks a parent
            parent = self.arena.detach(cur).unwrap_or(ROOT);
            self.arena.release(cur);
        }
        value
    }
}
