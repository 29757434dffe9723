//! The state an edit note is compiled against.

use std::rc::Rc;

use crate::address::Address;
use crate::pp::PpAnnotation;
use crate::pp::PpTree;
use crate::pp::construct_pp_tree;
use crate::tree::SExpr;

/// Everything an edit note is compiled against: the current tree, where the
/// cursor is, and the layout choices made so far.
#[derive(Clone, Debug)]
pub struct EditStructure {
    pub tree: SExpr,
    pub s_cursor: Address,
    pub pp_annotations: Vec<PpAnnotation>,
    pub pp_tree: Rc<PpTree>,
}

impl EditStructure {
    pub fn new(tree: SExpr, s_cursor: Address, pp_annotations: Vec<PpAnnotation>) -> EditStructure {
        let pp_tree = Rc::new(construct_pp_tree(&tree, &pp_annotations));
        return EditStructure {
            tree,
            s_cursor,
            pp_annotations,
            pp_tree,
        };
    }

    /// The same structure with the cursor moved. The layout is shared.
    pub fn with_s_cursor(&self, s_cursor: Address) -> EditStructure {
        return EditStructure {
            s_cursor,
            ..self.clone()
        };
    }
}
