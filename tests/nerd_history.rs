//! Histories shown in context: tombstones, nerd addresses and note addresses.

use smallvec::smallvec;

use nerf::editor::EditNote;
use nerf::editor::Editor;
use nerf::in_context::history_in_context;
use nerf::nerd::get_n_address_for_t_address;
use nerf::nerd::node_for_n_address;
use nerf::note_address::NoteAddress;
use nerf::note_address::NoteAddressPart;
use nerf::note_address::score_with_global_address;
use nerf::spacetime::t_address_for_s_address;

fn typed(words: &[&str]) -> Editor {
    let mut editor = Editor::new().unwrap();
    for (index, word) in words.iter().enumerate() {
        let note = EditNote::TextInsert {
            parent: smallvec![],
            index,
            text: word.to_string(),
        };
        editor.handle_edit_note(&note).unwrap();
    }
    return editor;
}

#[test]
fn deleted_nodes_keep_their_nerd_address() {
    let mut editor = typed(&["a", "b", "c"]);
    let t_b = t_address_for_s_address(editor.tree(), &[1]).unwrap();
    editor.handle_edit_note(&EditNote::CursorSet(smallvec![1])).unwrap();
    editor.handle_edit_note(&EditNote::Delete).unwrap();
    assert_eq!(editor.tree().to_string(), "(a c)");

    let score = editor.score().clone();
    let nerd = editor.session.play_nerd(&score).unwrap().unwrap();
    assert_eq!(nerd.to_string(), "+(«None»a «None»-b «None»c)");

    let n_b = get_n_address_for_t_address(&nerd, &t_b).unwrap();
    assert_eq!(n_b.as_slice(), &[1]);
    let b = node_for_n_address(&nerd, &n_b).unwrap();
    assert!(b.is_deleted());
    assert_eq!(b.as_atom().unwrap().atom, "b");
}

#[test]
fn history_of_an_editing_session() {
    let mut editor = typed(&["a", "b"]);
    editor.handle_edit_note(&EditNote::CursorSet(smallvec![0])).unwrap();
    editor.handle_edit_note(&EditNote::Delete).unwrap();

    let score = editor.score().clone();
    let items = history_in_context(&mut editor.session, &score).unwrap();
    let rendered: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    assert_eq!(rendered, vec!["+()", "(+a)", "(a +b)", "(-a b)"]);
}

#[test]
fn every_note_has_a_global_address() {
    let editor = typed(&["a"]);
    let notes = score_with_global_address(editor.score());
    assert_eq!(notes.len(), 2);

    let second = NoteAddress::root().plus(NoteAddressPart::InScore(1));
    let child = second.plus(NoteAddressPart::TheChild);
    let found = notes[1].find(&child).unwrap();
    assert_eq!(found.to_note().to_string(), "(become-atom \"a\")");
    assert_eq!(notes[1].to_note(), editor.score().notes()[1].clone());
}
