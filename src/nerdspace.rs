//! Nerd space: positions in a list where no-one ever really dies.
//!
//! A nerd list keeps its deleted children around as tombstones. A child's
//! *nerd* index is its position among live and dead children alike; once
//! assigned it only shifts when something new is inserted before it.
//! `NerdSpace` maps between nerd indices and space indices:
//!
//! ```text
//! n2s[n] = Some(s)   live child
//! n2s[n] = None      tombstone
//! s2n[s] = n
//! ```
//!
//! Insertions are expressed in space but must land somewhere in nerd space.
//! Any position between the same two live neighbours is correct; where to go
//! relative to the tombstones between them is a policy choice.

/// Where a new child goes relative to the tombstones between its live
/// neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InsertPolicy {
    /// Directly after the left live neighbour, i.e. before any tombstones.
    #[default]
    Left,
    /// Directly before the right live neighbour, i.e. after any tombstones.
    Right,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NerdSpace {
    pub n2s: Vec<Option<usize>>,
    pub s2n: Vec<usize>,
}

fn shift(values: &mut [Option<usize>], threshold: usize) {
    for value in values.iter_mut().flatten() {
        if *value >= threshold {
            *value += 1;
        }
    }
}

impl NerdSpace {
    /// The tables of a list that just came into being.
    pub fn new() -> NerdSpace {
        return NerdSpace::default();
    }

    /// The tables of a list without tombstones, where nerd and space agree.
    pub fn identity(len: usize) -> NerdSpace {
        return NerdSpace {
            n2s: (0..len).map(Some).collect(),
            s2n: (0..len).collect(),
        };
    }

    /// Number of live children.
    pub fn len(&self) -> usize {
        return self.s2n.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.s2n.is_empty();
    }

    /// Record the insertion of a new live child at space index `index`.
    /// Returns the nerd index at which the child must be inserted.
    pub fn insert(&mut self, index: usize, policy: InsertPolicy) -> usize {
        let index_in_n = match policy {
            InsertPolicy::Left if index == 0 => 0,
            InsertPolicy::Left => self.s2n[index - 1] + 1,
            InsertPolicy::Right if index == self.s2n.len() => self.n2s.len(),
            InsertPolicy::Right => self.s2n[index],
        };

        shift(&mut self.n2s, index);
        self.n2s.insert(index_in_n, Some(index));

        for n in self.s2n.iter_mut() {
            if *n >= index_in_n {
                *n += 1;
            }
        }
        self.s2n.insert(index, index_in_n);

        debug_assert!(self.is_consistent(), "{:?}", self);
        return index_in_n;
    }

    /// Record the deletion of the live child at space index `index`. Returns
    /// the nerd index of the child, which becomes a tombstone.
    pub fn delete(&mut self, index: usize) -> usize {
        let index_in_n = self.s2n.remove(index);
        self.n2s[index_in_n] = None;
        for s in self.n2s.iter_mut().flatten() {
            if *s > index {
                *s -= 1;
            }
        }
        debug_assert!(self.is_consistent(), "{:?}", self);
        return index_in_n;
    }

    /// The nerd index of the live child at `index`, whose content changes.
    pub fn replace(&self, index: usize) -> usize {
        return self.s2n[index];
    }

    pub fn s_for_n(&self, n: usize) -> Option<usize> {
        return self.n2s.get(n).copied().flatten();
    }

    pub fn n_for_s(&self, s: usize) -> Option<usize> {
        return self.s2n.get(s).copied();
    }

    /// Both directions agree with each other.
    pub fn is_consistent(&self) -> bool {
        let forward = self.n2s.iter().enumerate().all(|(n, s)| match s {
            None => true,
            Some(s) => self.s2n.get(*s) == Some(&n),
        });
        let backward = self
            .s2n
            .iter()
            .enumerate()
            .all(|(s, n)| self.n2s.get(*n) == Some(&Some(s)));
        return forward && backward;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use InsertPolicy::Left;
    use InsertPolicy::Right;

    fn tables(sn: &NerdSpace) -> (Vec<Option<usize>>, Vec<usize>) {
        return (sn.n2s.clone(), sn.s2n.clone());
    }

    #[test]
    fn walkthrough_with_payload() {
        // the payload stands in for the children of a nerd list
        let mut data: Vec<&str> = vec![];
        let mut sn = NerdSpace::new();

        let i = sn.insert(0, Left);
        assert_eq!((tables(&sn), i), ((vec![Some(0)], vec![0]), 0));
        data.insert(i, "a");

        let i = sn.delete(0);
        assert_eq!((tables(&sn), i), ((vec![None], vec![]), 0));
        data[i] = "NONE";

        // left insert at the head
        let i = sn.insert(0, Left);
        assert_eq!((tables(&sn), i), ((vec![Some(0), None], vec![0]), 0));
        data.insert(i, "b");

        // right insert at the end
        let i = sn.insert(1, Right);
        assert_eq!((tables(&sn), i), ((vec![Some(0), None, Some(1)], vec![0, 2]), 2));
        data.insert(i, "c");

        // left insert elsewhere
        let i = sn.insert(1, Left);
        assert_eq!((tables(&sn), i), ((vec![Some(0), Some(1), None, Some(2)], vec![0, 1, 3]), 1));
        data.insert(i, "d");

        // and again, past the tombstone
        let i = sn.insert(3, Right);
        assert_eq!(
            (tables(&sn), i),
            ((vec![Some(0), Some(1), None, Some(2), Some(3)], vec![0, 1, 3, 4]), 4)
        );
        data.insert(i, "e");
        assert_eq!(data, vec!["b", "d", "NONE", "c", "e"]);
        assert!(sn.is_consistent());

        let i = sn.delete(0);
        assert_eq!((tables(&sn), i), ((vec![None, Some(0), None, Some(1), Some(2)], vec![1, 3, 4]), 0));
        data[i] = "NONE";

        let i = sn.delete(1);
        assert_eq!((tables(&sn), i), ((vec![None, Some(0), None, None, Some(1)], vec![1, 4]), 3));
        data[i] = "NONE";

        assert_eq!(data, vec!["NONE", "d", "NONE", "NONE", "e"]);
        assert!(sn.is_consistent());
    }

    #[test]
    fn policies_bracket_the_tombstones() {
        // live "a", two tombstones, live "b"
        let mut sn = NerdSpace::identity(4);
        sn.delete(1);
        sn.delete(1);
        assert_eq!(tables(&sn), (vec![Some(0), None, None, Some(1)], vec![0, 3]));

        let mut left = sn.clone();
        assert_eq!(left.insert(1, Left), 1);

        let mut right = sn.clone();
        assert_eq!(right.insert(1, Right), 3);
    }

    #[test]
    fn replace_reports_nerd_index() {
        let mut sn = NerdSpace::identity(3);
        sn.delete(0);
        let before = sn.clone();
        assert_eq!(sn.replace(1), 2);
        assert_eq!(sn, before);
    }

    #[test]
    fn default_policy_is_left() {
        assert_eq!(InsertPolicy::default(), InsertPolicy::Left);
    }
}
