//! Anchoring notes at the root.
//!
//! Only the root's score is ever appended to. An edit deep in the tree is
//! expressed by wrapping the note for the target node in one `Extend` per
//! level, from the target's parent back up to the root.

use crate::note::Note;

/// Wrap `note`, meant for the node at `s_address`, so it can be played on the root.
///
/// `s_address = [a, b, c]` gives `Extend(a, Extend(b, Extend(c, note)))`.
pub fn bubble_history_up(note: Note, s_address: &[usize]) -> Note {
    let mut note = note;
    for &index in s_address.iter().rev() {
        note = Note::extend(index, note);
    }
    return note;
}

/// A root note that inserts a new atom at `index` of the list at `parent_s_address`.
pub fn insert_text_at(parent_s_address: &[usize], index: usize, text: &str) -> Note {
    return bubble_history_up(Note::insert(index, Note::become_atom(text)), parent_s_address);
}

/// A root note that inserts a new empty list at `index` of the list at `parent_s_address`.
pub fn insert_node_at(parent_s_address: &[usize], index: usize) -> Note {
    return bubble_history_up(Note::insert(index, Note::BecomeList), parent_s_address);
}

/// A root note that sets the text of the atom at `s_address`.
pub fn replace_text_at(s_address: &[usize], text: &str) -> Note {
    return match s_address.split_last() {
        Some((&index, parent)) => bubble_history_up(Note::extend(index, Note::set_atom(text)), parent),
        // the root itself is the atom
        None => Note::set_atom(text),
    };
}
