//! The note log: hashing, deduplication and the on-disk format.

use nerf::Note;
use nerf::Session;
use nerf::file::read_notes;
use nerf::score::hash;

#[test]
fn identical_histories_are_one_score() {
    let mut session = Session::new();
    let notes = [Note::BecomeList, Note::insert(0, Note::become_atom("a"))];
    let one = session.from_notes(notes.clone());
    let two = session.from_notes(notes);
    assert!(one.ptr_eq(&two));
    assert_eq!(session.scores.len(), 3);
}

#[test]
fn hash_covers_the_whole_chain() {
    let mut session = Session::new();
    let empty = session.empty();
    assert_eq!(empty.hash(), hash(&[0x00]));

    let list = session.slur(&empty, Note::BecomeList);
    let mut nout = vec![0x01];
    nout.extend(Note::BecomeList.to_bytes());
    nout.extend(empty.hash().0);
    assert_eq!(list.hash(), hash(&nout));
}

#[test]
fn prefixes_are_newest_first() {
    let mut session = Session::new();
    let score = session.from_notes([
        Note::BecomeList,
        Note::insert(0, Note::become_atom("a")),
        Note::Delete(0),
    ]);
    let lengths: Vec<usize> = score.scores().map(|s| s.len()).collect();
    assert_eq!(lengths, vec![3, 2, 1]);
    assert_eq!(score.last_note(), Some(&Note::Delete(0)));
    assert_eq!(score.notes()[0], &Note::BecomeList);
}

#[test]
fn log_bytes_are_concatenated_notes() {
    let mut session = Session::new();
    let score = session.from_notes([
        Note::BecomeList,
        Note::Chord(vec![
            Note::insert(0, Note::become_atom("héllo")),
            Note::extend(0, Note::set_atom("wörld")),
        ]),
    ]);
    let bytes = score.to_bytes();
    let notes = read_notes(&bytes).unwrap();
    assert_eq!(notes.len(), 2);
    assert!(session.load(&bytes).unwrap().ptr_eq(&score));
    assert_eq!(session.play(&score).unwrap().unwrap().to_string(), "(wörld)");
}
