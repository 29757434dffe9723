//! Scores: hash-consed, append-only logs of notes.
//!
//! A score is a backwards-linked chain of notes. Each score is identified by
//! the SHA-256 hash of its "nout" serialization:
//!
//! ```text
//! capo  [0x00]
//! slur  [0x01] ++ note bytes ++ hash of the previous score
//! ```
//!
//! Scores are created through a `ScoreTable`, which guarantees that two
//! scores with the same hash are the same object. That makes repeated
//! identical edits free and lets a score act as a memoization key.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use sha2::Digest;
use sha2::Sha256;

use crate::note::Note;

/// Type constant for the empty score.
pub const NOUT_CAPO: u8 = 0x00;

/// Type constant for a score that extends another one by a single note.
pub const NOUT_SLUR: u8 = 0x01;

/// A SHA-256 hash, 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(pub [u8; 32]);

/// Hash a message using SHA-256.
pub fn hash(message: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(message);
    return Hash(hasher.finalize().into());
}

fn hex(bytes: &[u8]) -> String {
    return bytes.iter().map(|b| format!("{:02x}", b)).collect();
}

impl Hash {
    /// The first 12 hex digits, enough to tell hashes apart on screen.
    pub fn short(&self) -> String {
        return hex(&self.0[..6]);
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "Hash({})", self.short());
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&hex(&self.0));
    }
}

enum Nout {
    Capo,
    Slur { note: Note, previous: Score },
}

struct ScoreNode {
    hash: Hash,
    len: usize,
    nout: Nout,
}

// Unlink the chain one node at a time, so a long history does not drop
// recursively.
impl Drop for ScoreNode {
    fn drop(&mut self) {
        let mut nout = std::mem::replace(&mut self.nout, Nout::Capo);
        while let Nout::Slur { previous, .. } = nout {
            match Rc::into_inner(previous.0) {
                Some(mut node) => nout = std::mem::replace(&mut node.nout, Nout::Capo),
                None => break,
            }
        }
    }
}

/// An immutable list of notes, linked backwards in time.
///
/// Cloning is cheap. Equality and hashing go through the content hash.
#[derive(Clone)]
pub struct Score(Rc<ScoreNode>);

impl Score {
    pub fn hash(&self) -> Hash {
        return self.0.hash;
    }

    pub fn len(&self) -> usize {
        return self.0.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.0.len == 0;
    }

    /// True if both handles point at the very same object.
    pub fn ptr_eq(&self, other: &Score) -> bool {
        return Rc::ptr_eq(&self.0, &other.0);
    }

    /// The score formed by appending `note`; see `ScoreTable::slur`.
    pub fn slur(&self, table: &mut ScoreTable, note: Note) -> Score {
        return table.slur(self, note);
    }

    /// The most recent note, or `None` for the empty score.
    pub fn last_note(&self) -> Option<&Note> {
        return match &self.0.nout {
            Nout::Capo => None,
            Nout::Slur { note, .. } => Some(note),
        };
    }

    /// The score without its last note.
    pub fn previous(&self) -> Option<&Score> {
        return match &self.0.nout {
            Nout::Capo => None,
            Nout::Slur { previous, .. } => Some(previous),
        };
    }

    /// All non-empty prefixes of this score, newest (i.e. this score) first.
    pub fn scores(&self) -> Scores<'_> {
        return Scores { current: Some(self) };
    }

    /// All notes, newest first.
    pub fn reversed_notes(&self) -> impl Iterator<Item = &Note> {
        return self.scores().filter_map(Score::last_note);
    }

    /// All notes, oldest first.
    pub fn notes(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.reversed_notes().collect();
        notes.reverse();
        return notes;
    }

    /// The concatenated binary encoding of all notes, oldest first.
    ///
    /// This is the on-disk format of a document.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for note in self.notes() {
            note.encode(&mut buf);
        }
        return buf;
    }
}

/// Iterator over the prefixes of a score, newest first.
pub struct Scores<'a> {
    current: Option<&'a Score>,
}

impl<'a> Iterator for Scores<'a> {
    type Item = &'a Score;

    fn next(&mut self) -> Option<&'a Score> {
        let score = self.current?;
        return match &score.0.nout {
            Nout::Capo => {
                self.current = None;
                None
            }
            Nout::Slur { previous, .. } => {
                self.current = Some(previous);
                Some(score)
            }
        };
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Score) -> bool {
        return self.0.hash == other.0.hash;
    }
}

impl Eq for Score {}

impl std::hash::Hash for Score {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash.hash(state);
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "Score({}, {} notes)", self.0.hash.short(), self.0.len);
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, note) in self.notes().into_iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", note)?;
        }
        return f.write_str(")");
    }
}

/// The interning table that makes scores unique.
///
/// Entries are never evicted; the table lives as long as the session that
/// owns it.
#[derive(Default)]
pub struct ScoreTable {
    scores: FxHashMap<Hash, Score>,
}

impl ScoreTable {
    pub fn new() -> ScoreTable {
        return ScoreTable {
            scores: FxHashMap::default(),
        };
    }

    /// Number of distinct scores interned so far.
    pub fn len(&self) -> usize {
        return self.scores.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.scores.is_empty();
    }

    /// Look up an interned score by hash.
    pub fn get(&self, hash: &Hash) -> Option<&Score> {
        return self.scores.get(hash);
    }

    /// The unique empty score.
    pub fn empty(&mut self) -> Score {
        let hash = hash(&[NOUT_CAPO]);
        return self.unique(hash, || ScoreNode {
            hash,
            len: 0,
            nout: Nout::Capo,
        });
    }

    /// The unique score formed by appending `note` to `previous`.
    pub fn slur(&mut self, previous: &Score, note: Note) -> Score {
        let mut bytes = vec![NOUT_SLUR];
        note.encode(&mut bytes);
        bytes.extend_from_slice(&previous.hash().0);
        let hash = hash(&bytes);

        return self.unique(hash, || ScoreNode {
            hash,
            len: previous.len() + 1,
            nout: Nout::Slur {
                note,
                previous: previous.clone(),
            },
        });
    }

    /// The score of the given notes, played in order from the beginning.
    pub fn from_notes(&mut self, notes: impl IntoIterator<Item = Note>) -> Score {
        let mut score = self.empty();
        for note in notes {
            score = self.slur(&score, note);
        }
        return score;
    }

    fn unique(&mut self, hash: Hash, build: impl FnOnce() -> ScoreNode) -> Score {
        if let Some(score) = self.scores.get(&hash) {
            return score.clone();
        }
        let score = Score(Rc::new(build()));
        log::trace!("interned {:?}", score);
        self.scores.insert(hash, score.clone());
        return score;
    }
}
