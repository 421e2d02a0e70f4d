use std::net::Ipv4Addr;

use ipset_trie::*;

use ipnet::Ipv4Net;
use rand::prelude::*;

fn main() {
    let mut set = IpSet::<u32>::new();

    let mut rng = thread_rng();

    for _ in 0..1_000_000 {
        let prefix = Ipv4Net::new(Ipv4Addr::new(rng.gen(), 0, 0, 0), rng.gen_range(1..=8)).unwrap();

        if rng.gen_bool(0.7) {
            let value: u32 = rng.gen::<u8>() as u32;
            let _ = set.set(&prefix, value);
        } else if rng.gen_bool(0.1) {
            // remove all children of that prefix
            let _ = set.remove_subtree(&prefix);
        } else {
            let _ = set.remove(&prefix);
        }
        let _ = set.get_by_addr(Ipv4Addr::from(rng.gen::<u32>()));
    }

    println!(
        "{} prefixes in {} nodes ({} nodes allocated)",
        set.len(),
        set.node_count(),
        set.capacity()
    );
}
