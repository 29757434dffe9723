//! Compiling edit notes into score notes.
//!
//! Each edit note is played against an `EditStructure` and yields the new
//! cursor plus the notes to append to the root's score, already bubbled up
//! to the root. Edits that make no sense at the cursor (deleting the root,
//! walking off the end of the tree) set `error` and produce no notes.

use log::debug;

use crate::address::Address;
use crate::address::dfs;
use crate::address::get_node_for_address;
use crate::address::node_for_address;
use crate::bubble::bubble_history_up;
use crate::bubble::insert_node_at;
use crate::bubble::insert_text_at;
use crate::bubble::replace_text_at;
use crate::editor::clef::EditNote;
use crate::editor::structure::EditStructure;
use crate::error::EditError;
use crate::note::Note;
use crate::tree::SExpr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    pub s_cursor: Address,
    pub notes: Vec<Note>,
    /// The edit was rejected; the cursor is unchanged and `notes` is empty.
    pub error: bool,
}

impl EditOutcome {
    fn new(s_cursor: Address, notes: Vec<Note>) -> EditOutcome {
        return EditOutcome {
            s_cursor,
            notes,
            error: false,
        };
    }

    fn rejected(structure: &EditStructure, note: &EditNote) -> EditOutcome {
        debug!("rejected {} at {:?}", note.name(), structure.s_cursor);
        return EditOutcome {
            s_cursor: structure.s_cursor.clone(),
            notes: Vec::new(),
            error: true,
        };
    }
}

fn child_count(node: &SExpr) -> Option<usize> {
    return node.as_list().map(|list| list.children.len());
}

/// Compile `note` against `structure`.
///
/// `Err` means the structure itself is inconsistent, e.g. its cursor points
/// outside its tree.
pub fn edit_note_play(structure: &EditStructure, note: &EditNote) -> Result<EditOutcome, EditError> {
    let tree = &structure.tree;
    let cursor = &structure.s_cursor;
    let cursor_node = node_for_address(tree, cursor)?;

    match note {
        EditNote::CursorSet(address) => {
            if get_node_for_address(tree, address).is_none() {
                return Ok(EditOutcome::rejected(structure, note));
            }
            return Ok(EditOutcome::new(address.clone(), Vec::new()));
        }

        EditNote::CursorDFS(direction) => {
            let addresses = dfs(tree, &[]);
            let Some(position) = addresses.iter().position(|a| a == cursor) else {
                return Ok(EditOutcome::rejected(structure, note));
            };
            return match position.checked_add_signed(direction.offset()).and_then(|p| addresses.get(p)) {
                Some(address) => Ok(EditOutcome::new(address.clone(), Vec::new())),
                None => Ok(EditOutcome::rejected(structure, note)),
            };
        }

        EditNote::CursorParent => {
            if cursor.is_empty() {
                return Ok(EditOutcome::rejected(structure, note));
            }
            return Ok(EditOutcome::new(Address::from_slice(&cursor[..cursor.len() - 1]), Vec::new()));
        }

        EditNote::CursorChild => {
            if !matches!(child_count(cursor_node), Some(len) if len > 0) {
                return Ok(EditOutcome::rejected(structure, note));
            }
            let mut s_cursor = cursor.clone();
            s_cursor.push(0);
            return Ok(EditOutcome::new(s_cursor, Vec::new()));
        }

        EditNote::TextInsert { parent, index, text } => {
            let parent_node = node_for_address(tree, parent)?;
            if !matches!(child_count(parent_node), Some(len) if *index <= len) {
                return Ok(EditOutcome::rejected(structure, note));
            }
            let mut s_cursor = parent.clone();
            s_cursor.push(*index);
            return Ok(EditOutcome::new(s_cursor, vec![insert_text_at(parent, *index, text)]));
        }

        EditNote::TextReplace { address, text } => {
            if node_for_address(tree, address)?.as_atom().is_none() {
                return Ok(EditOutcome::rejected(structure, note));
            }
            return Ok(EditOutcome::new(address.clone(), vec![replace_text_at(address, text)]));
        }

        EditNote::InsertNodeSibling(position) => {
            let Some((&last, parent)) = cursor.split_last() else {
                // a tree has exactly one root
                return Ok(EditOutcome::rejected(structure, note));
            };
            let index = last + position.offset();
            let mut s_cursor = Address::from_slice(parent);
            s_cursor.push(index);
            return Ok(EditOutcome::new(s_cursor, vec![insert_node_at(parent, index)]));
        }

        EditNote::InsertNodeChild => {
            let Some(len) = child_count(cursor_node) else {
                return Ok(EditOutcome::rejected(structure, note));
            };
            let mut s_cursor = cursor.clone();
            s_cursor.push(len);
            return Ok(EditOutcome::new(s_cursor, vec![insert_node_at(cursor, len)]));
        }

        EditNote::Delete => {
            let Some((&last, parent)) = cursor.split_last() else {
                return Ok(EditOutcome::rejected(structure, note));
            };
            let len = child_count(node_for_address(tree, parent)?).unwrap_or(0);
            let s_cursor = if last + 1 == len {
                // the last child is gone; nothing slides into its place
                Address::from_slice(parent)
            } else {
                cursor.clone()
            };
            return Ok(EditOutcome::new(s_cursor, vec![bubble_history_up(Note::Delete(last), parent)]));
        }

        EditNote::SwapSibling(direction) => {
            let Some((&last, parent)) = cursor.split_last() else {
                return Ok(EditOutcome::rejected(structure, note));
            };
            let len = child_count(node_for_address(tree, parent)?).unwrap_or(0);
            let Some(index) = last.checked_add_signed(direction.offset()).filter(|&i| i < len) else {
                return Ok(EditOutcome::rejected(structure, note));
            };
            let mut s_cursor = Address::from_slice(parent);
            s_cursor.push(index);
            return Ok(EditOutcome::new(s_cursor, swap_notes(cursor_node, parent, last, index)));
        }

        EditNote::MoveSelectionChild { .. } => return Err(EditError::NotImplemented(note.name())),
        EditNote::MoveSelectionSibling { .. } => return Err(EditError::NotImplemented(note.name())),
        EditNote::LeaveChildrenBehind => return Err(EditError::NotImplemented(note.name())),
        EditNote::EncloseWithParent => return Err(EditError::NotImplemented(note.name())),
    }
}

/// Remove the node at `from` and replay its local history at `to`.
fn swap_notes(node: &SExpr, parent: &[usize], from: usize, to: usize) -> Vec<Note> {
    let mut notes = vec![bubble_history_up(Note::Delete(from), parent)];
    for (i, local) in node.score().notes().into_iter().enumerate() {
        let note = if i == 0 {
            Note::insert(to, local.clone())
        } else {
            Note::extend(to, local.clone())
        };
        notes.push(bubble_history_up(note, parent));
    }
    return notes;
}
