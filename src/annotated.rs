//! Trees with an annotation on every node.

use crate::address::Node;

/// A copy of the shape of a tree of `N`, with an `A` on every node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotated<N, A> {
    pub node: N,
    pub annotation: A,
    pub children: Vec<Annotated<N, A>>,
}

impl<N: Node + Clone, A: Clone> Annotated<N, A> {
    /// Annotate every node of `node` with `annotation`.
    pub fn build(node: &N, annotation: A) -> Annotated<N, A> {
        let children = match node.children() {
            Some(children) => children.iter().map(|c| Annotated::build(c, annotation.clone())).collect(),
            None => Vec::new(),
        };
        return Annotated {
            node: node.clone(),
            annotation,
            children,
        };
    }
}

impl<N, A> Annotated<N, A> {
    /// The annotated node at `address`, for in-place changes.
    pub fn get_mut(&mut self, address: &[usize]) -> Option<&mut Annotated<N, A>> {
        let mut current = self;
        for &index in address {
            current = current.children.get_mut(index)?;
        }
        return Some(current);
    }
}

impl<N, A> Node for Annotated<N, A> {
    fn children(&self) -> Option<&[Annotated<N, A>]> {
        return Some(&self.children);
    }
}
