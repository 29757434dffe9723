//! Edit notes: the commands an editor understands.
//!
//! Edit notes are not stored. They are compiled into score notes (see
//! `construct`), and only those are appended to the document's history.

use crate::address::Address;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn offset(self) -> isize {
        return match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        };
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SiblingPosition {
    Before,
    After,
}

impl SiblingPosition {
    /// Added to the cursor's index to get the index of the new sibling.
    pub fn offset(self) -> usize {
        return match self {
            SiblingPosition::Before => 0,
            SiblingPosition::After => 1,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditNote {
    CursorSet(Address),
    /// Move to the previous or next node in depth-first order.
    CursorDFS(Direction),
    CursorParent,
    /// Move to the first child of a non-empty list.
    CursorChild,

    /// Insert a new atom with `text` at `index` of the list at `parent`.
    TextInsert { parent: Address, index: usize, text: String },
    /// Set the text of the atom at `address`.
    TextReplace { address: Address, text: String },

    /// Insert an empty list next to the cursor.
    InsertNodeSibling(SiblingPosition),
    /// Append an empty list to the list at the cursor.
    InsertNodeChild,
    Delete,
    /// Exchange the node at the cursor with its neighbour.
    SwapSibling(Direction),

    MoveSelectionChild { edge_0: Address, edge_1: Address },
    MoveSelectionSibling { edge_0: Address, edge_1: Address, position: SiblingPosition },
    LeaveChildrenBehind,
    EncloseWithParent,
}

impl EditNote {
    pub fn name(&self) -> &'static str {
        return match self {
            EditNote::CursorSet(_) => "cursor-set",
            EditNote::CursorDFS(_) => "cursor-dfs",
            EditNote::CursorParent => "cursor-parent",
            EditNote::CursorChild => "cursor-child",
            EditNote::TextInsert { .. } => "text-insert",
            EditNote::TextReplace { .. } => "text-replace",
            EditNote::InsertNodeSibling(_) => "insert-node-sibling",
            EditNote::InsertNodeChild => "insert-node-child",
            EditNote::Delete => "delete",
            EditNote::SwapSibling(_) => "swap-sibling",
            EditNote::MoveSelectionChild { .. } => "move-selection-child",
            EditNote::MoveSelectionSibling { .. } => "move-selection-sibling",
            EditNote::LeaveChildrenBehind => "leave-children-behind",
            EditNote::EncloseWithParent => "enclose-with-parent",
        };
    }
}
