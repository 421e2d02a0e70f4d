//! Errors returned by the operations on an [`IpSet`](crate::IpSet).

use thiserror::Error;

/// Result type alias for operations on an [`IpSet`](crate::IpSet).
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur when modifying or querying an [`IpSet`](crate::IpSet). None of them
/// indicates a corrupted structure; a failing operation never changes the set.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The address and the mask differ in length, or the length is neither 4 (IPv4) nor 16
    /// (IPv6) bytes.
    #[error("bad IP address or mask")]
    BadAddress,

    /// The prefix already holds a value, and the operation may not overwrite it.
    #[error("node is busy")]
    NodeBusy,

    /// The prefix holds no value, or the path to it does not exist.
    #[error("no such node")]
    NotFound,
}
