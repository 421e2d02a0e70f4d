use std::net::Ipv4Addr;

use super::*;

/// Reference model: a plain list of prefixes, searched linearly.
#[derive(Default)]
struct Model(Vec<(TestPrefix, i32)>);

impl Model {
    fn position(&self, p: &TestPrefix) -> Option<usize> {
        self.0.iter().position(|(q, _)| q == p)
    }

    fn add(&mut self, p: TestPrefix, t: i32) -> Result<()> {
        if self.position(&p).is_some() {
            return Err(Error::NodeBusy);
        }
        self.0.push((p, t));
        Ok(())
    }

    fn set(&mut self, p: TestPrefix, t: i32) -> Result<Option<i32>> {
        match self.position(&p) {
            Some(i) => Ok(Some(std::mem::replace(&mut self.0[i].1, t))),
            None => {
                self.0.push((p, t));
                Ok(None)
            }
        }
    }

    fn remove(&mut self, p: TestPrefix) -> Result<i32> {
        let i = self.position(&p).ok_or(Error::NotFound)?;
        Ok(self.0.swap_remove(i).1)
    }

    fn remove_subtree(&mut self, p: TestPrefix) -> Result<usize> {
        let before = self.0.len();
        self.0.retain(|(q, _)| !p.contains(q));
        let removed = before - self.0.len();
        // the node exists only while something below it holds a value
        if removed == 0 && p.1 > 0 {
            return Err(Error::NotFound);
        }
        Ok(removed)
    }

    fn lpm(&self, addr: u32) -> Option<i32> {
        self.0
            .iter()
            .filter(|(p, _)| p.contains_addr(addr))
            .max_by_key(|(p, _)| p.1)
            .map(|(_, t)| *t)
    }
}

/// Apply all operations on both the set and the model, and check that every outcome matches.
fn build(ops: Vec<Operation<TestPrefix, i32>>) -> Option<(IpSet<i32>, Model)> {
    let mut set = IpSet::new();
    let mut model = Model::default();
    for op in ops {
        let same = match op {
            Operation::Add(p, t) => set.add(&p, t) == model.add(p, t),
            Operation::Set(p, t) => set.set(&p, t) == model.set(p, t),
            Operation::Remove(p) => set.remove(&p) == model.remove(p),
            Operation::RemoveSubtree(p) => set.remove_subtree(&p) == model.remove_subtree(p),
        };
        if !same {
            return None;
        }
        set.assert_invariants();
    }
    Some((set, model))
}

qc!(outcomes, _outcomes);
fn _outcomes(ops: Vec<Operation<TestPrefix, i32>>) -> bool {
    match build(ops) {
        Some((set, model)) => set.len() == model.0.len(),
        None => false,
    }
}

qc!(longest_prefix_match, _longest_prefix_match);
fn _longest_prefix_match((ops, addrs): (Vec<Operation<TestPrefix, i32>>, Vec<u32>)) -> bool {
    let Some((set, model)) = build(ops) else {
        return false;
    };
    addrs.into_iter().all(|addr| {
        set.get_by_addr(Ipv4Addr::from(addr)).copied() == model.lpm(addr)
            && set.get(&TestPrefix::new(addr, 32)) == Ok(model.lpm(addr).as_ref())
    })
}

qc!(lpm_of_prefix, _lpm_of_prefix);
fn _lpm_of_prefix((ops, queries): (Vec<Operation<TestPrefix, i32>>, Vec<TestPrefix>)) -> bool {
    let Some((set, model)) = build(ops) else {
        return false;
    };
    queries.into_iter().all(|q| {
        let expected = model
            .0
            .iter()
            .filter(|(p, _)| p.contains(&q))
            .max_by_key(|(p, _)| p.1)
            .map(|(_, t)| t);
        set.get(&q) == Ok(expected)
    })
}

qc!(exact_match, _exact_match);
fn _exact_match((ops, queries): (Vec<Operation<TestPrefix, i32>>, Vec<TestPrefix>)) -> bool {
    let Some((set, model)) = build(ops) else {
        return false;
    };
    queries.into_iter().all(|q| {
        let expected = model.position(&q).map(|i| &model.0[i].1);
        set.get_exact(&q) == Ok(expected)
    })
}

qc!(not_found_is_noop, _not_found_is_noop);
fn _not_found_is_noop((ops, p): (Vec<Operation<TestPrefix, i32>>, TestPrefix)) -> bool {
    let Some((mut set, model)) = build(ops) else {
        return false;
    };
    if model.position(&p).is_some() {
        return true;
    }
    let before = format!("{set:?}");
    let nodes = set.node_count();
    set.remove(&p) == Err(Error::NotFound)
        && format!("{set:?}") == before
        && set.node_count() == nodes
}

qc!(nodes_are_recycled, _nodes_are_recycled);
fn _nodes_are_recycled(ops: Vec<Operation<TestPrefix, i32>>) -> bool {
    let Some((mut set, _)) = build(ops.clone()) else {
        return false;
    };
    let capacity = set.capacity();
    set.clear();
    set.assert_invariants();
    if set.node_count() != 1 || set.capacity() != capacity {
        return false;
    }
    // replaying the same operations never needs more nodes than before
    let mut model = Model::default();
    for op in ops {
        match op {
            Operation::Add(p, t) => {
                let _ = (set.add(&p, t), model.add(p, t));
            }
            Operation::Set(p, t) => {
                let _ = (set.set(&p, t), model.set(p, t));
            }
            Operation::Remove(p) => {
                let _ = (set.remove(&p), model.remove(p));
            }
            Operation::RemoveSubtree(p) => {
                let _ = (set.remove_subtree(&p), model.remove_subtree(p));
            }
        }
    }
    set.assert_invariants();
    set.capacity() == capacity && set.len() == model.0.len()
}
