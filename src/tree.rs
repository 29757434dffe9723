//! The s-expression tree that playing a score produces.
//!
//! Nodes are immutable and reference counted, so replaying a note shares
//! every untouched subtree with the previous version of the tree.

use std::fmt;
use std::rc::Rc;

use crate::address::Node;
use crate::score::Score;
use crate::spacetime::SpaceTime;

#[derive(Debug)]
pub struct Atom {
    pub atom: String,
    /// The local history that produced this atom.
    pub score: Score,
}

#[derive(Debug)]
pub struct List {
    pub children: Vec<SExpr>,
    pub spacetime: SpaceTime,
    /// The local history that produced this list.
    pub score: Score,
}

/// A node in the tree: an atom of text or a list of children.
#[derive(Clone, Debug)]
pub enum SExpr {
    Atom(Rc<Atom>),
    List(Rc<List>),
}

impl SExpr {
    pub fn atom(atom: String, score: Score) -> SExpr {
        return SExpr::Atom(Rc::new(Atom { atom, score }));
    }

    pub fn list(children: Vec<SExpr>, spacetime: SpaceTime, score: Score) -> SExpr {
        return SExpr::List(Rc::new(List {
            children,
            spacetime,
            score,
        }));
    }

    pub fn score(&self) -> &Score {
        return match self {
            SExpr::Atom(atom) => &atom.score,
            SExpr::List(list) => &list.score,
        };
    }

    /// The same node, tagged with a different history.
    pub fn rescore(&self, score: Score) -> SExpr {
        return match self {
            SExpr::Atom(atom) => SExpr::atom(atom.atom.clone(), score),
            SExpr::List(list) => SExpr::list(list.children.clone(), list.spacetime.clone(), score),
        };
    }

    pub fn as_atom(&self) -> Option<&str> {
        return match self {
            SExpr::Atom(atom) => Some(&atom.atom),
            SExpr::List(_) => None,
        };
    }

    pub fn as_list(&self) -> Option<&List> {
        return match self {
            SExpr::Atom(_) => None,
            SExpr::List(list) => Some(list),
        };
    }

    pub fn is_list(&self) -> bool {
        return matches!(self, SExpr::List(_));
    }

    /// Structural equality: same shape and text, ignoring histories.
    pub fn same_shape(&self, other: &SExpr) -> bool {
        return match (self, other) {
            (SExpr::Atom(a), SExpr::Atom(b)) => a.atom == b.atom,
            (SExpr::List(a), SExpr::List(b)) => {
                a.children.len() == b.children.len()
                    && a.children.iter().zip(&b.children).all(|(a, b)| a.same_shape(b))
            }
            _ => false,
        };
    }
}

impl Node for SExpr {
    fn children(&self) -> Option<&[SExpr]> {
        return match self {
            SExpr::List(list) => Some(&list.children),
            SExpr::Atom(_) => None,
        };
    }
}

/// Two trees are equal if they were produced by the same history.
impl PartialEq for SExpr {
    fn eq(&self, other: &SExpr) -> bool {
        return self.score() == other.score();
    }
}

impl Eq for SExpr {}

/// Renders the tree on a single line, e.g. `(a (b c))`.
impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            SExpr::Atom(atom) => f.write_str(&atom.atom),
            SExpr::List(list) => {
                f.write_str("(")?;
                for (i, child) in list.children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        };
    }
}
