//! A session owns the caches that make scores unique and replay cheap.
//!
//! Everything interned or memoized through a session lives as long as the
//! session does. Independent documents can use independent sessions.

use crate::error::DecodeError;
use crate::error::PlayError;
use crate::nerd::NerdSExpr;
use crate::note::Note;
use crate::note::NoteStream;
use crate::play::Memo;
use crate::play::play_score;
use crate::score::Score;
use crate::score::ScoreTable;
use crate::tree::SExpr;

#[derive(Default)]
pub struct Session {
    pub scores: ScoreTable,
    pub memo: Memo<SExpr>,
    pub nerd_memo: Memo<NerdSExpr>,
}

impl Session {
    pub fn new() -> Session {
        return Session::default();
    }

    pub fn empty(&mut self) -> Score {
        return self.scores.empty();
    }

    pub fn slur(&mut self, score: &Score, note: Note) -> Score {
        return self.scores.slur(score, note);
    }

    pub fn from_notes(&mut self, notes: impl IntoIterator<Item = Note>) -> Score {
        return self.scores.from_notes(notes);
    }

    /// The tree that `score` produces; `None` for the empty score.
    pub fn play(&mut self, score: &Score) -> Result<Option<SExpr>, PlayError> {
        return play_score(&mut self.memo, &mut self.scores, score);
    }

    /// The nerd tree that `score` produces; `None` for the empty score.
    pub fn play_nerd(&mut self, score: &Score) -> Result<Option<NerdSExpr>, PlayError> {
        return play_score(&mut self.nerd_memo, &mut self.scores, score);
    }

    /// The score of a concatenated note stream, i.e. the contents of a file.
    pub fn load(&mut self, bytes: &[u8]) -> Result<Score, DecodeError> {
        let mut score = self.scores.empty();
        for note in NoteStream::new(bytes) {
            score = self.scores.slur(&score, note?);
        }
        return Ok(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_round_trips_to_bytes() {
        let mut session = Session::new();
        let score = session.from_notes([Note::BecomeList, Note::insert(0, Note::become_atom("a"))]);
        let loaded = session.load(&score.to_bytes()).unwrap();
        assert!(loaded.ptr_eq(&score));
    }

    #[test]
    fn load_rejects_garbage() {
        let mut session = Session::new();
        assert_eq!(session.load(&[2, 0x7f]).err(), Some(DecodeError::UnknownTag(0x7f)));
    }

    #[test]
    fn plain_and_nerd_agree() {
        let mut session = Session::new();
        let score = session.from_notes([
            Note::BecomeList,
            Note::insert(0, Note::become_atom("a")),
            Note::insert(1, Note::BecomeList),
            Note::extend(1, Note::insert(0, Note::become_atom("b"))),
            Note::Delete(0),
        ]);
        let tree = session.play(&score).unwrap().unwrap();
        let nerd = session.play_nerd(&score).unwrap().unwrap();
        assert_eq!(tree.to_string(), "((b))");
        assert_eq!(nerd.live_flat(), tree.to_string());
    }

    #[test]
    fn separate_sessions_do_not_share() {
        let mut one = Session::new();
        let mut two = Session::new();
        let a = one.from_notes([Note::BecomeList]);
        let b = two.from_notes([Note::BecomeList]);
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }
}
