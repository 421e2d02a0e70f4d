//! Code to insert entries into the set.

use super::*;

impl<T> IpSet<T> {
    /// Insert a value for `prefix`, failing with [`Error::NodeBusy`] if the prefix already holds
    /// a value. Values stored for more or less specific prefixes are not affected.
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: IpSet<_> = IpSet::new();
    /// let prefix: Ipv4Net = "10.0.0.0/8".parse()?;
    /// set.add(&prefix, "A")?;
    /// assert_eq!(set.add(&prefix, "B"), Err(Error::NodeBusy));
    /// assert_eq!(set.get(&prefix)?, Some(&"A"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn add<P: Prefix>(&mut self, prefix: &P, value: T) -> Result<()> {
        self.insert(prefix, value, false).map(|_| ())
    }

    /// Insert a value for `prefix`, replacing and returning any value it held before.
    ///
    /// ```
    /// # use ipset_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: IpSet<_> = IpSet::new();
    /// let prefix: Ipv4Net = "10.0.0.0/8".parse()?;
    /// assert_eq!(set.set(&prefix, "A")?, None);
    /// assert_eq!(set.set(&prefix, "B")?, Some("A"));
    /// assert_eq!(set.get(&prefix)?, Some(&"B"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn set<P: Prefix>(&mut self, prefix: &P, value: T) -> Result<Option<T>> {
        self.insert(prefix, value, true)
    }

    fn insert<P: Prefix>(&mut self, prefix: &P, value: T, overwrite: bool) -> Result<Option<T>> {
        let (address, mask) = (prefix.address(), prefix.mask());
        let mut bits = Bits::new(address.as_ref(), mask.as_ref())?;
        let mut idx = ROOT;
        while let Some(right) = bits.next() {
            match self.arena.child(idx, right) {
                Some(next) => idx = next,
                None => {
                    // the path ends here; grow one node for each remaining bit
                    for right in std::iter::once(right).chain(bits.by_ref()) {
                        let new = self.arena.acquire();
                        self.arena.attach(idx, new, right);
                        idx = new;
                    }
                    self.arena[idx].value = Some(value);
                    self.len += 1;
                    return Ok(None);
                }
            }
        }

        let node = &mut self.arena[idx];
        if node.value.is_some() && !overwrite {
            return Err(Error::NodeBusy);
        }
        let old = node.value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        Ok(old)
    }
}
