//! Addresses: paths from the root of a tree through its children.
//!
//! Which coordinate system an address is in (space, time or nerd) is a
//! matter of context; the type is the same for all three.

use smallvec::SmallVec;

use crate::error::AddressError;

/// A path of child indices, starting at the root. The empty address is the
/// root itself.
pub type Address = SmallVec<[usize; 8]>;

/// A tree node whose children can be walked generically.
pub trait Node: Sized {
    /// The children of a list node, `None` for a leaf.
    fn children(&self) -> Option<&[Self]>;
}

/// The node at `address`, or an error if the address leaves the tree.
pub fn node_for_address<'a, N: Node>(node: &'a N, address: &[usize]) -> Result<&'a N, AddressError> {
    return get_node_for_address(node, address).ok_or_else(|| AddressError::OutOfBounds(Address::from_slice(address)));
}

/// The node at `address`, if there is one.
pub fn get_node_for_address<'a, N: Node>(node: &'a N, address: &[usize]) -> Option<&'a N> {
    let mut current = node;
    for &index in address {
        current = current.children()?.get(index)?;
    }
    return Some(current);
}

/// All addresses of `node`, depth-first, parents before their children.
/// `prefix` is prepended to each of them.
pub fn dfs<N: Node>(node: &N, prefix: &[usize]) -> Vec<Address> {
    let mut result = Vec::new();
    let mut address = Address::from_slice(prefix);
    dfs_into(node, &mut address, &mut result);
    return result;
}

fn dfs_into<N: Node>(node: &N, address: &mut Address, result: &mut Vec<Address>) {
    result.push(address.clone());
    if let Some(children) = node.children() {
        for (i, child) in children.iter().enumerate() {
            address.push(i);
            dfs_into(child, address, result);
            address.pop();
        }
    }
}

pub fn longest_common_prefix(a: &[usize], b: &[usize]) -> Address {
    return a.iter().zip(b).take_while(|(x, y)| x == y).map(|(x, _)| *x).collect();
}

/// Walk down from `node`, translating one coordinate at a time.
///
/// `step` receives the node and the next coordinate and returns the index of
/// the child to descend into together with the translated coordinate, or
/// `None` when the walk cannot proceed. The longest translated prefix is
/// returned.
pub fn best_lookup<N: Node>(node: &N, address: &[usize], step: impl Fn(&N, usize) -> Option<(usize, usize)>) -> Address {
    let mut collected = Address::new();
    let mut current = node;
    for &coordinate in address {
        let Some(children) = current.children() else {
            break;
        };
        let Some((child_index, translated)) = step(current, coordinate) else {
            break;
        };
        let Some(child) = children.get(child_index) else {
            break;
        };
        collected.push(translated);
        current = child;
    }
    return collected;
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    struct TestNode {
        label: &'static str,
        children: Option<Vec<TestNode>>,
    }

    impl Node for TestNode {
        fn children(&self) -> Option<&[TestNode]> {
            return self.children.as_deref();
        }
    }

    fn leaf(label: &'static str) -> TestNode {
        return TestNode { label, children: None };
    }

    fn list(label: &'static str, children: Vec<TestNode>) -> TestNode {
        return TestNode {
            label,
            children: Some(children),
        };
    }

    fn sample() -> TestNode {
        return list("root", vec![list("0", vec![leaf("0.0"), list("0.1", vec![])])]);
    }

    #[test]
    fn lookup() {
        let tree = sample();
        assert_eq!(node_for_address(&tree, &[]).unwrap().label, "root");
        assert_eq!(node_for_address(&tree, &[0, 1]).unwrap().label, "0.1");
        assert_eq!(
            node_for_address(&tree, &[0, 1, 4]).err(),
            Some(AddressError::OutOfBounds(smallvec![0, 1, 4]))
        );
        assert!(get_node_for_address(&tree, &[0, 0, 0]).is_none());
        assert!(get_node_for_address(&tree, &[1]).is_none());
    }

    #[test]
    fn dfs_order() {
        let tree = sample();
        let addresses: Vec<Vec<usize>> = dfs(&tree, &[]).into_iter().map(|a| a.to_vec()).collect();
        assert_eq!(addresses, vec![vec![], vec![0], vec![0, 0], vec![0, 1]]);
    }

    #[test]
    fn dfs_with_prefix() {
        let addresses = dfs(&leaf("x"), &[3, 1]);
        assert_eq!(addresses, vec![Address::from_slice(&[3, 1])]);
    }

    #[test]
    fn common_prefix() {
        assert_eq!(longest_common_prefix(&[1, 2, 3], &[1, 2, 4]).as_slice(), &[1, 2]);
        assert_eq!(longest_common_prefix(&[1], &[2]).as_slice(), &[] as &[usize]);
        assert_eq!(longest_common_prefix(&[1, 2], &[1, 2, 3]).as_slice(), &[1, 2]);
    }

    #[test]
    fn best_lookup_stops_at_first_miss() {
        let tree = sample();
        let doubled = best_lookup(&tree, &[0, 1, 0], |node, i| {
            let len = node.children()?.len();
            return (i < len).then_some((i, i * 10));
        });
        assert_eq!(doubled.as_slice(), &[0, 10]);
    }
}
