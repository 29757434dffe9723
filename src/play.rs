//! Replaying notes and scores.
//!
//! `play_note` is a pure function from a note and an optional structure to a
//! new structure. `play_score` plays a whole score, reusing whatever prefix
//! of it has been played before.

use rustc_hash::FxHashMap;

use crate::error::PlayError;
use crate::note::Note;
use crate::score::Hash;
use crate::score::Score;
use crate::score::ScoreTable;
use crate::spacetime::SpaceTime;
use crate::tree::SExpr;

/// A structure that can be built by playing notes.
pub trait Construct: Clone + Sized {
    /// Play a single note on `structure`; `None` is nothingness.
    fn play_note(table: &mut ScoreTable, note: &Note, structure: Option<&Self>) -> Result<Self, PlayError>;

    /// The local history that produced this structure.
    fn score(&self) -> &Score;
}

/// Memoized results of playing scores, keyed by score hash.
///
/// Entries are never evicted.
pub struct Memo<T> {
    entries: FxHashMap<Hash, T>,
}

impl<T> Default for Memo<T> {
    fn default() -> Memo<T> {
        return Memo {
            entries: FxHashMap::default(),
        };
    }
}

impl<T: Clone> Memo<T> {
    pub fn new() -> Memo<T> {
        return Memo::default();
    }

    pub fn get(&self, score: &Score) -> Option<&T> {
        return self.entries.get(&score.hash());
    }

    pub fn insert(&mut self, score: &Score, value: T) {
        self.entries.insert(score.hash(), value);
    }

    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

/// The score of `structure` after `note` is played on it.
pub fn next_score(table: &mut ScoreTable, note: &Note, score: Option<&Score>) -> Score {
    let previous = match score {
        Some(score) => score.clone(),
        None => table.empty(),
    };
    return table.slur(&previous, note.clone());
}

/// Play every note of a chord in order. An empty chord cannot be played on nothing.
pub fn play_chord<T: Construct>(table: &mut ScoreTable, notes: &[Note], structure: Option<&T>) -> Result<T, PlayError> {
    let mut current: Option<T> = structure.cloned();
    for note in notes {
        current = Some(T::play_note(table, note, current.as_ref())?);
    }
    return current.ok_or(PlayError::EmptyChord);
}

/// Check an index that must point at an existing child.
pub fn check_inside(note: &Note, index: usize, len: usize) -> Result<(), PlayError> {
    if index >= len {
        return Err(PlayError::OutOfBounds {
            note: note.name(),
            index,
            len,
        });
    }
    return Ok(());
}

/// Check an insertion index; inserting at `len` appends.
pub fn check_insertion(note: &Note, index: usize, len: usize) -> Result<(), PlayError> {
    if index > len {
        return Err(PlayError::OutOfBounds {
            note: note.name(),
            index,
            len,
        });
    }
    return Ok(());
}

impl Construct for SExpr {
    fn play_note(table: &mut ScoreTable, note: &Note, structure: Option<&SExpr>) -> Result<SExpr, PlayError> {
        let score = next_score(table, note, structure.map(SExpr::score));

        let list = match (note, structure) {
            (Note::Chord(notes), _) => {
                // played note by note, but tagged as the single chord step
                let played: SExpr = play_chord(table, notes, structure)?;
                return Ok(played.rescore(score));
            }
            (Note::BecomeAtom(text), None) => return Ok(SExpr::atom(text.clone(), score)),
            (Note::BecomeList, None) => return Ok(SExpr::list(Vec::new(), SpaceTime::new(), score)),
            (Note::BecomeAtom(_) | Note::BecomeList, Some(_)) => {
                return Err(PlayError::NotFromNothing { note: note.name() });
            }
            (Note::SetAtom(text), Some(SExpr::Atom(_))) => return Ok(SExpr::atom(text.clone(), score)),
            (Note::SetAtom(_), _) => return Err(PlayError::NotAnAtom),
            (_, Some(SExpr::List(list))) => list,
            (_, _) => return Err(PlayError::NotAList { note: note.name() }),
        };

        let len = list.children.len();
        let mut children = list.children.clone();
        let mut spacetime = list.spacetime.clone();

        match note {
            Note::Insert(index, child) => {
                check_insertion(note, *index, len)?;
                let child = SExpr::play_note(table, child, None)?;
                children.insert(*index, child);
                spacetime.insert(*index);
            }
            Note::Delete(index) => {
                check_inside(note, *index, len)?;
                children.remove(*index);
                spacetime.delete(*index);
            }
            Note::Extend(index, child) => {
                check_inside(note, *index, len)?;
                children[*index] = SExpr::play_note(table, child, Some(&list.children[*index]))?;
                spacetime.replace(*index);
            }
            // handled above
            Note::Chord(_) | Note::BecomeAtom(_) | Note::SetAtom(_) | Note::BecomeList => {}
        }

        return Ok(SExpr::list(children, spacetime, score));
    }

    fn score(&self) -> &Score {
        return SExpr::score(self);
    }
}

/// Play `score` from the beginning, reusing the longest memoized prefix.
///
/// Returns `None` for the empty score.
pub fn play_score<T: Construct>(memo: &mut Memo<T>, table: &mut ScoreTable, score: &Score) -> Result<Option<T>, PlayError> {
    let mut tree: Option<T> = None;
    let mut todo: Vec<&Score> = Vec::new();

    for prefix in score.scores() {
        if let Some(hit) = memo.get(prefix) {
            tree = Some(hit.clone());
            break;
        }
        todo.push(prefix);
    }

    log::debug!("playing {:?}: {} notes to go", score, todo.len());

    for prefix in todo.into_iter().rev() {
        let Some(note) = prefix.last_note() else {
            continue;
        };
        let played = T::play_note(table, note, tree.as_ref())?;
        memo.insert(prefix, played.clone());
        tree = Some(played);
    }

    return Ok(tree);
}

/// Play a sequence of notes without memoization, starting from nothing.
pub fn play_notes<'a, T: Construct>(
    table: &mut ScoreTable,
    notes: impl IntoIterator<Item = &'a Note>,
) -> Result<Option<T>, PlayError> {
    let mut tree: Option<T> = None;
    for note in notes {
        tree = Some(T::play_note(table, note, tree.as_ref())?);
    }
    return Ok(tree);
}
