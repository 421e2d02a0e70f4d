//! This crate provides a bitwise radix trie for IP prefixes, where each prefix maps to a value.
//! Any lookup performs longest-prefix match in time proportional to the address length (32 bits
//! for IPv4, 128 bits for IPv6), independent of the number of stored prefixes.
//!
//! Keys are anything implementing [`Prefix`]: prefixes from [ipnet](https://docs.rs/ipnet) or
//! [ipnetwork](https://crates.io/crates/ipnetwork), tuples `(addr, len)` of standard library
//! addresses, or raw `(&[u8], &[u8])` pairs of address and mask bytes.
//!
//! ```
//! # use ipset_trie::*;
//! # use ipnet::Ipv4Net;
//! # use std::net::Ipv4Addr;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut set = IpSet::new();
//! set.add(&"10.0.0.0/8".parse::<Ipv4Net>()?, "A")?;
//! set.add(&"10.1.0.0/16".parse::<Ipv4Net>()?, "B")?;
//! assert_eq!(set.get_by_addr(Ipv4Addr::new(10, 1, 5, 5)), Some(&"B"));
//! assert_eq!(set.get_by_addr(Ipv4Addr::new(10, 2, 5, 5)), Some(&"A"));
//! assert_eq!(set.get_by_addr(Ipv4Addr::new(11, 0, 0, 0)), None);
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! The tree consumes one bit per level, most significant bit first. At depth `d`, the node
//! branches on bit `d` of the address: if it is not set, we take the left branch, and otherwise,
//! we take the right one. A walk stops at the first bit that is not set in the mask. A node that
//! holds a value represents a stored prefix; all other nodes only exist as branching points on
//! the way to more specific prefixes.
//!
//! Nodes are stored in page-sized blocks and referenced by index. Removed nodes go to a free
//! list and are handed out again by later insertions, so the memory footprint follows the peak
//! number of nodes.
//!
//! # Operations on the tree
//!
//! | Operation                                | Complexity |
//! |------------------------------------------|------------|
//! | `add`, `set`                             | `O(w)`     |
//! | `remove`                                 | `O(w)`     |
//! | `remove_subtree` (calling `drop` on `T`) | `O(w + m)` |
//! | `get`, `get_mut`, `get_by_addr`          | `O(w)`     |
//! | `get_exact`, `contains_key`              | `O(w)`     |
//! | `clear` (calling `drop` on `T`)          | `O(n)`     |
//! | `len` and `is_empty`                     | `O(1)`     |
//!
//! Here, `w` is the address length in bits, `m` is the number of nodes below the removed prefix,
//! and `n` is the number of nodes in the tree.
//!
//! There are two kinds of removals:
//!
//! - [`IpSet::remove`] only removes the value of exactly that prefix. More specific prefixes stay
//!   in the set, and lookups that hit the removed prefix fall back to the next covering prefix.
//! - [`IpSet::remove_subtree`] removes the prefix and every more specific prefix below it.
//!
//! # Concurrency
//!
//! Modifications require `&mut self`, and lookups `&self`. An [`IpSet`] does not synchronize
//! anything by itself; wrap it in a lock to share it between threads.

#![deny(missing_docs)]

mod arena;
mod bits;
mod error;
mod fmt;
mod prefix;
#[cfg(test)]
mod fuzzing;

pub mod set;

pub use error::{Error, Result};
pub use prefix::{Octets, Prefix};
pub use set::IpSet;
