//! Implementation of the IP set.

use std::net::IpAddr;

use crate::arena::{Arena, NodeId, ROOT};
use crate::bits::Bits;
use crate::prefix::Octets;
use crate::{Error, Prefix, Result};

mod insert;
mod remove;

/// Mask of a host route, long enough for both address families.
static HOST_MASK: [u8; 16] = [0xff; 16];

/// Set of IP prefixes, each mapped to a value, implemented as a bitwise radix trie.
///
/// Every node of the trie sits at the depth given by the number of bits of its prefix, and the
/// path from the root spells the prefix, one bit per level (`0` on the left, `1` on the right).
/// All lookups perform longest-prefix match.
///
/// IPv4 and IPv6 prefixes are walked through the same tree. An IPv4 prefix therefore shares its
/// nodes with the IPv6 prefix that has the same leading bits; keep one address family per set.
#[derive(Clone)]
pub struct IpSet<T> {
    pub(crate) arena: Arena<T>,
    len: usize,
}

impl<T> Default for IpSet<T> {
    fn default() -> Self {
        let mut arena = Arena::new();
        let root = arena.acquire();
        debug_assert_eq!(root, ROOT);
        Self { arena, len: 0 }
    }
}

impl<T> IpSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of prefixes that hold a value.
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set = IpSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.add(&"10.0.0.0/8".parse::<Ipv4Net>()?, 1)?;
    /// set.add(&"10.1.0.0/16".parse::<Ipv4Net>()?, 2)?;
    /// assert_eq!(set.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if no prefix holds a value.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes currently in the trie, including the root and all branching nodes.
    pub fn node_count(&self) -> usize {
        self.arena.live()
    }

    /// Number of nodes ever carved from the node pool. This never decreases; nodes that were
    /// removed are kept for later insertions.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Get the value of the longest prefix that contains `prefix`. A prefix without a value of
    /// its own yields the value of its closest covering prefix; use [`IpSet::get_exact`] to only
    /// match the prefix itself.
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: IpSet<_> = IpSet::new();
    /// set.add(&"192.168.1.0/24".parse::<Ipv4Net>()?, 1)?;
    /// set.add(&"192.168.0.0/23".parse::<Ipv4Net>()?, 2)?;
    /// assert_eq!(set.get(&"192.168.1.1/32".parse::<Ipv4Net>()?)?, Some(&1));
    /// assert_eq!(set.get(&"192.168.1.0/24".parse::<Ipv4Net>()?)?, Some(&1));
    /// assert_eq!(set.get(&"192.168.0.0/24".parse::<Ipv4Net>()?)?, Some(&2));
    /// assert_eq!(set.get(&"192.168.2.0/24".parse::<Ipv4Net>()?)?, None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get<P: Prefix>(&self, prefix: &P) -> Result<Option<&T>> {
        let (address, mask) = (prefix.address(), prefix.mask());
        let best = self.find(Bits::new(address.as_ref(), mask.as_ref())?);
        Ok(best.and_then(|idx| self.arena[idx].value.as_ref()))
    }

    /// Get a mutable reference to the value of the longest prefix that contains `prefix`.
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: IpSet<_> = IpSet::new();
    /// set.add(&"192.168.0.0/23".parse::<Ipv4Net>()?, 1)?;
    /// if let Some(x) = set.get_mut(&"192.168.1.64/26".parse::<Ipv4Net>()?)? {
    ///     *x += 1;
    /// }
    /// assert_eq!(set.get(&"192.168.0.0/23".parse::<Ipv4Net>()?)?, Some(&2));
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_mut<P: Prefix>(&mut self, prefix: &P) -> Result<Option<&mut T>> {
        let (address, mask) = (prefix.address(), prefix.mask());
        let best = self.find(Bits::new(address.as_ref(), mask.as_ref())?);
        Ok(match best {
            Some(idx) => self.arena[idx].value.as_mut(),
            None => None,
        })
    }

    /// Get the value of the longest prefix that contains the single address `addr`.
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # use std::net::Ipv4Addr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: IpSet<_> = IpSet::new();
    /// set.add(&"10.0.0.0/8".parse::<Ipv4Net>()?, "A")?;
    /// set.add(&"10.1.0.0/16".parse::<Ipv4Net>()?, "B")?;
    /// assert_eq!(set.get_by_addr(Ipv4Addr::new(10, 1, 5, 5)), Some(&"B"));
    /// assert_eq!(set.get_by_addr(Ipv4Addr::new(10, 2, 5, 5)), Some(&"A"));
    /// assert_eq!(set.get_by_addr(Ipv4Addr::new(11, 0, 0, 0)), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_by_addr(&self, addr: impl Into<IpAddr>) -> Option<&T> {
        let address = Octets::from(addr.into());
        // an IpAddr always has a valid length
        self.get_by_octets(address.as_ref()).unwrap_or(None)
    }

    /// Get the value of the longest prefix that contains the address given as raw bytes. The
    /// address is looked up with a full-length mask derived from its length, which must be 4 or
    /// 16. Otherwise, this function returns [`Error::BadAddress`].
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: IpSet<_> = IpSet::new();
    /// set.add(&"10.0.0.0/8".parse::<Ipv4Net>()?, 1)?;
    /// assert_eq!(set.get_by_octets(&[10, 1, 2, 3])?, Some(&1));
    /// assert_eq!(set.get_by_octets(&[10, 1, 2]), Err(Error::BadAddress));
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_by_octets(&self, address: &[u8]) -> Result<Option<&T>> {
        let mask = HOST_MASK.get(..address.len()).ok_or(Error::BadAddress)?;
        let best = self.find(Bits::new(address, mask)?);
        Ok(best.and_then(|idx| self.arena[idx].value.as_ref()))
    }

    /// Get the value of an element by matching exactly on the prefix.
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: IpSet<_> = IpSet::new();
    /// set.add(&"192.168.1.0/24".parse::<Ipv4Net>()?, 1)?;
    /// assert_eq!(set.get_exact(&"192.168.1.0/24".parse::<Ipv4Net>()?)?, Some(&1));
    /// assert_eq!(set.get_exact(&"192.168.2.0/24".parse::<Ipv4Net>()?)?, None);
    /// assert_eq!(set.get_exact(&"192.168.0.0/23".parse::<Ipv4Net>()?)?, None);
    /// assert_eq!(set.get_exact(&"192.168.1.128/25".parse::<Ipv4Net>()?)?, None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_exact<P: Prefix>(&self, prefix: &P) -> Result<Option<&T>> {
        Ok(self
            .find_node(prefix)?
            .and_then(|idx| self.arena[idx].value.as_ref()))
    }

    /// Check if the exact prefix holds a value.
    pub fn contains_key<P: Prefix>(&self, prefix: &P) -> Result<bool> {
        Ok(self.get_exact(prefix)?.is_some())
    }

    /// Walk down along `bits`, and return the deepest node on the path that holds a value.
    fn find(&self, bits: Bits<'_>) -> Option<NodeId> {
        let mut idx = ROOT;
        let mut best_match = self.arena[ROOT].value.as_ref().map(|_| ROOT);
        for right in bits {
            match self.arena.child(idx, right) {
                Some(next) => idx = next,
                None => break,
            }
            if self.arena[idx].value.is_some() {
                best_match = Some(idx);
            }
        }
        best_match
    }

    /// Walk down to the node that exactly represents `prefix`. Returns `None` if the path does
    /// not exist.
    fn find_node<P: Prefix>(&self, prefix: &P) -> Result<Option<NodeId>> {
        let (address, mask) = (prefix.address(), prefix.mask());
        let mut idx = ROOT;
        for right in Bits::new(address.as_ref(), mask.as_ref())? {
            match self.arena.child(idx, right) {
                Some(next) => idx = next,
                None => return Ok(None),
            }
        }
        Ok(Some(idx))
    }
}

#[cfg(test)]
impl<T> IpSet<T> {
    /// Panic if a parent link does not match its child link, if a node other than the root
    /// neither holds a value nor has a child, or if the counters disagree with the tree.
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.arena[ROOT].parent, None);
        let mut stack = vec![(ROOT, 0usize)];
        let mut nodes = 0;
        let mut values = 0;
        while let Some((idx, depth)) = stack.pop() {
            let node = &self.arena[idx];
            nodes += 1;
            if node.value.is_some() {
                values += 1;
            }
            assert!(depth <= 128, "node {idx} is too deep");
            assert!(
                idx == ROOT || !node.is_empty(),
                "empty node {idx} at depth {depth}"
            );
            for child in [node.left, node.right].into_iter().flatten() {
                assert_eq!(self.arena[child].parent, Some(idx));
                stack.push((child, depth + 1));
            }
        }
        assert_eq!(nodes, self.arena.live());
        assert_eq!(values, self.len);
    }
}
