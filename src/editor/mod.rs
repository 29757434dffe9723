//! The editor for a single document.
//!
//! An `Editor` keeps the document's score, the tree it plays to and the
//! cursor. Edit notes are compiled into score notes and appended; scores that
//! arrive from elsewhere replace the current one and the cursor is carried
//! over through its time address.

pub mod clef;
pub mod construct;
pub mod structure;

use log::debug;

use crate::address::Address;
use crate::error::Error;
use crate::error::PlayError;
use crate::note::Note;
use crate::play::Construct;
use crate::pp::PpAnnotation;
use crate::pp::PpNote;
use crate::pp::PpSetting;
use crate::score::Score;
use crate::selection::Selection;
use crate::selection::SelectionNote;
use crate::selection::selection_note_play;
use crate::session::Session;
use crate::spacetime::best_s_address_for_t_address;
use crate::spacetime::t_address_for_s_address;
use crate::tree::SExpr;

pub use clef::Direction;
pub use clef::EditNote;
pub use clef::SiblingPosition;
pub use construct::EditOutcome;
pub use construct::edit_note_play;
pub use structure::EditStructure;

/// The tree of `score`. A document always has a root, so an empty score
/// plays as a fresh empty list.
fn replay(session: &mut Session, score: &Score) -> Result<SExpr, PlayError> {
    if let Some(tree) = session.play(score)? {
        return Ok(tree);
    }
    return SExpr::play_note(&mut session.scores, &Note::BecomeList, None);
}

pub struct Editor {
    pub session: Session,
    selection: Selection,
}

impl Editor {
    /// An editor for a new, empty document.
    pub fn new() -> Result<Editor, Error> {
        let mut session = Session::new();
        let score = session.empty();
        return Editor::load(session, &score);
    }

    /// An editor for `score`, with the cursor at the root.
    pub fn load(mut session: Session, score: &Score) -> Result<Editor, Error> {
        let tree = replay(&mut session, score)?;
        let structure = EditStructure::new(tree, Address::new(), Vec::new());
        return Ok(Editor {
            session,
            selection: Selection::new(structure),
        });
    }

    pub fn structure(&self) -> &EditStructure {
        return &self.selection.context;
    }

    pub fn selection(&self) -> &Selection {
        return &self.selection;
    }

    pub fn tree(&self) -> &SExpr {
        return &self.selection.context.tree;
    }

    pub fn score(&self) -> &Score {
        return self.tree().score();
    }

    pub fn s_cursor(&self) -> &Address {
        return &self.selection.context.s_cursor;
    }

    /// Compile and apply `note`. The returned outcome holds the notes that
    /// were appended to the score, for forwarding to other collaborators.
    pub fn handle_edit_note(&mut self, note: &EditNote) -> Result<EditOutcome, Error> {
        let outcome = edit_note_play(self.structure(), note)?;
        if outcome.error {
            return Ok(outcome);
        }

        let mut score = self.score().clone();
        for played in &outcome.notes {
            score = self.session.slur(&score, played.clone());
        }
        let tree = replay(&mut self.session, &score)?;

        let structure = EditStructure::new(tree, outcome.s_cursor.clone(), self.structure().pp_annotations.clone());
        self.change_context(structure)?;
        return Ok(outcome);
    }

    /// Replace the document's score with one that was produced elsewhere.
    pub fn receive_score(&mut self, score: &Score) -> Result<(), Error> {
        let t_cursor = t_address_for_s_address(self.tree(), self.s_cursor())?;
        let tree = replay(&mut self.session, score)?;
        let s_cursor = best_s_address_for_t_address(&tree, &t_cursor);
        debug!("received {:?}, cursor {:?} -> {:?}", score, self.s_cursor(), s_cursor);

        let structure = EditStructure::new(tree, s_cursor, self.structure().pp_annotations.clone());
        return self.change_context(structure);
    }

    /// Lay out the node at the cursor with `setting` from now on.
    pub fn change_pp_style(&mut self, setting: PpSetting) -> Result<(), Error> {
        let structure = self.structure();
        let annotation = PpAnnotation {
            score: structure.tree.score().clone(),
            note: PpNote {
                t_address: t_address_for_s_address(&structure.tree, &structure.s_cursor)?,
                setting,
            },
        };
        let mut pp_annotations = structure.pp_annotations.clone();
        pp_annotations.push(annotation);

        let structure = EditStructure::new(structure.tree.clone(), structure.s_cursor.clone(), pp_annotations);
        return self.change_context(structure);
    }

    pub fn handle_selection_note(&mut self, note: &SelectionNote) -> Result<(), Error> {
        self.selection = selection_note_play(note, &self.selection)?;
        return Ok(());
    }

    fn change_context(&mut self, structure: EditStructure) -> Result<(), Error> {
        return self.handle_selection_note(&SelectionNote::ContextChange(structure));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pp::MultilineMode;
    use crate::pp::construct_iri_top_down;
    use crate::pp::render;
    use smallvec::smallvec;

    fn text(editor: &mut Editor, parent: Address, index: usize, text: &str) {
        let note = EditNote::TextInsert {
            parent,
            index,
            text: text.to_string(),
        };
        assert!(!editor.handle_edit_note(&note).unwrap().error);
    }

    #[test]
    fn new_document_is_an_empty_list() {
        let editor = Editor::new().unwrap();
        assert_eq!(editor.tree().to_string(), "()");
        assert_eq!(editor.score().len(), 1);
        assert!(editor.s_cursor().is_empty());
    }

    #[test]
    fn edits_append_to_the_score() {
        let mut editor = Editor::new().unwrap();
        text(&mut editor, smallvec![], 0, "a");
        text(&mut editor, smallvec![], 1, "b");
        assert_eq!(editor.tree().to_string(), "(a b)");
        assert_eq!(editor.s_cursor().as_slice(), &[1]);
        assert_eq!(editor.score().len(), 3);

        let outcome = editor.handle_edit_note(&EditNote::Delete).unwrap();
        assert_eq!(outcome.notes, vec![Note::Delete(1)]);
        assert_eq!(editor.tree().to_string(), "(a)");
        assert!(editor.s_cursor().is_empty());
    }

    #[test]
    fn rejected_edits_change_nothing() {
        let mut editor = Editor::new().unwrap();
        let before = editor.score().clone();
        let outcome = editor.handle_edit_note(&EditNote::Delete).unwrap();
        assert!(outcome.error);
        assert!(editor.score().ptr_eq(&before));
    }

    #[test]
    fn received_scores_keep_the_cursor_on_its_node() {
        let mut editor = Editor::new().unwrap();
        text(&mut editor, smallvec![], 0, "a");
        text(&mut editor, smallvec![], 1, "b");

        // someone else inserts in front of b
        let score = editor.score().clone();
        let score = editor.session.slur(&score, Note::insert(0, Note::become_atom("z")));
        editor.receive_score(&score).unwrap();
        assert_eq!(editor.tree().to_string(), "(z a b)");
        assert_eq!(editor.s_cursor().as_slice(), &[2]);

        // and then deletes it
        let score = editor.session.slur(&score, Note::Delete(2));
        editor.receive_score(&score).unwrap();
        assert!(editor.s_cursor().is_empty());
    }

    #[test]
    fn pp_style_sticks_to_the_node() {
        let mut editor = Editor::new().unwrap();
        for (i, word) in ["define", "x", "y"].iter().enumerate() {
            text(&mut editor, smallvec![], i, word);
        }
        editor.handle_edit_note(&EditNote::CursorParent).unwrap();
        editor.change_pp_style(PpSetting::MultiLineIndented).unwrap();
        text(&mut editor, smallvec![], 3, "z");

        let iri = construct_iri_top_down(&editor.structure().pp_tree, MultilineMode::MultiLineAligned);
        assert_eq!(render(&iri), "(define\n  x\n  y\n  z)");
    }

    #[test]
    fn selection_follows_edits() {
        let mut editor = Editor::new().unwrap();
        text(&mut editor, smallvec![], 0, "a");
        text(&mut editor, smallvec![], 1, "b");
        editor.handle_selection_note(&SelectionNote::AttachDetach).unwrap();
        editor.handle_edit_note(&EditNote::CursorSet(smallvec![0])).unwrap();

        let edges = editor.selection().edges.clone().unwrap();
        assert_eq!(edges.edge_0.as_slice(), &[0]);
        assert_eq!(edges.edge_1.as_slice(), &[1]);

        editor.handle_edit_note(&EditNote::CursorSet(smallvec![1])).unwrap();
        editor.handle_edit_note(&EditNote::Delete).unwrap();
        assert!(!editor.selection().exists());
    }
}
