//! Description of the generic type `Prefix`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[cfg(feature = "ipnet")]
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
#[cfg(feature = "ipnetwork")]
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use num_traits::{PrimInt, Zero};

/// Trait for anything that can be used as a key of an [`IpSet`](crate::IpSet): an address and a
/// mask, both given as network-order bytes.
///
/// Only the leading one-bits of the mask are significant. Walking stops at the first zero bit of
/// the mask, so any bits after it (in the mask or in the address) are ignored.
pub trait Prefix {
    /// Byte buffer holding the address or the mask.
    type Octets: AsRef<[u8]>;

    /// Address bytes, most significant byte first. Host bits need not be cleared.
    fn address(&self) -> Self::Octets;

    /// Mask bytes, most significant byte first. Must have the same length as
    /// [`Prefix::address`].
    fn mask(&self) -> Self::Octets;
}

/// Octets of either an IPv4 or an IPv6 address (or mask), stored inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Octets {
    /// Four bytes of an IPv4 address or mask.
    V4([u8; 4]),
    /// Sixteen bytes of an IPv6 address or mask.
    V6([u8; 16]),
}

impl AsRef<[u8]> for Octets {
    fn as_ref(&self) -> &[u8] {
        match self {
            Octets::V4(x) => x,
            Octets::V6(x) => x,
        }
    }
}

impl From<IpAddr> for Octets {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => Octets::V4(a.octets()),
            IpAddr::V6(a) => Octets::V6(a.octets()),
        }
    }
}

impl From<Ipv4Addr> for Octets {
    fn from(addr: Ipv4Addr) -> Self {
        Octets::V4(addr.octets())
    }
}

impl From<Ipv6Addr> for Octets {
    fn from(addr: Ipv6Addr) -> Self {
        Octets::V6(addr.octets())
    }
}

/// Mask with the `len` most significant bits set. Lengths beyond the width of `R` saturate to
/// the full mask.
pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 >= R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv4Net {
    type Octets = [u8; 4];

    fn address(&self) -> [u8; 4] {
        self.addr().octets()
    }

    fn mask(&self) -> [u8; 4] {
        self.netmask().octets()
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv6Net {
    type Octets = [u8; 16];

    fn address(&self) -> [u8; 16] {
        self.addr().octets()
    }

    fn mask(&self) -> [u8; 16] {
        self.netmask().octets()
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for IpNet {
    type Octets = Octets;

    fn address(&self) -> Octets {
        self.addr().into()
    }

    fn mask(&self) -> Octets {
        self.netmask().into()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv4Network {
    type Octets = [u8; 4];

    fn address(&self) -> [u8; 4] {
        self.ip().octets()
    }

    fn mask(&self) -> [u8; 4] {
        Ipv4Network::mask(*self).octets()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv6Network {
    type Octets = [u8; 16];

    fn address(&self) -> [u8; 16] {
        self.ip().octets()
    }

    fn mask(&self) -> [u8; 16] {
        Ipv6Network::mask(*self).octets()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for IpNetwork {
    type Octets = Octets;

    fn address(&self) -> Octets {
        self.ip().into()
    }

    fn mask(&self) -> Octets {
        IpNetwork::mask(*self).into()
    }
}

impl Prefix for (Ipv4Addr, u8) {
    type Octets = [u8; 4];

    fn address(&self) -> [u8; 4] {
        self.0.octets()
    }

    fn mask(&self) -> [u8; 4] {
        mask_from_prefix_len::<u32>(self.1).to_be_bytes()
    }
}

impl Prefix for (Ipv6Addr, u8) {
    type Octets = [u8; 16];

    fn address(&self) -> [u8; 16] {
        self.0.octets()
    }

    fn mask(&self) -> [u8; 16] {
        mask_from_prefix_len::<u128>(self.1).to_be_bytes()
    }
}

impl Prefix for (IpAddr, u8) {
    type Octets = Octets;

    fn address(&self) -> Octets {
        self.0.into()
    }

    fn mask(&self) -> Octets {
        match self.0 {
            IpAddr::V4(_) => Octets::V4(mask_from_prefix_len::<u32>(self.1).to_be_bytes()),
            IpAddr::V6(_) => Octets::V6(mask_from_prefix_len::<u128>(self.1).to_be_bytes()),
        }
    }
}

/// Raw address and mask slices. This is the only key type that can carry mismatching lengths,
/// which every operation rejects with [`Error::BadAddress`](crate::Error::BadAddress).
impl<'a> Prefix for (&'a [u8], &'a [u8]) {
    type Octets = &'a [u8];

    fn address(&self) -> &'a [u8] {
        self.0
    }

    fn mask(&self) -> &'a [u8] {
        self.1
    }
}
