//! Notes: the edit primitives of an s-expression tree.
//!
//! A note describes one atomic change to a structure. Notes nest: `Insert`
//! and `Extend` carry the note to play on a child, and `Chord` bundles a
//! sequence of notes that is played as a single step.
//!
//! Binary format, one tag byte followed by the payload:
//!
//! ```text
//! BecomeAtom  0  VLQ(len) ++ utf-8
//! SetAtom     1  VLQ(len) ++ utf-8
//! BecomeList  2
//! Insert      3  VLQ(index) ++ note
//! Delete      4  VLQ(index)
//! Extend      5  VLQ(index) ++ note
//! Chord       6  VLQ(count) ++ count notes
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;
use crate::error::ParseError;
use crate::sexp::Sexp;
use crate::vlq;

/// How deeply `Insert`, `Extend` and `Chord` may nest in a decoded note.
pub const MAX_DEPTH: usize = 256;

pub const TAG_BECOME_ATOM: u8 = 0;
pub const TAG_SET_ATOM: u8 = 1;
pub const TAG_BECOME_LIST: u8 = 2;
pub const TAG_INSERT: u8 = 3;
pub const TAG_DELETE: u8 = 4;
pub const TAG_EXTEND: u8 = 5;
pub const TAG_CHORD: u8 = 6;

/// A single, immutable edit of an s-expression structure.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Note {
    /// Come into existence as an atom with the given text.
    BecomeAtom(String),
    /// Change the text of an existing atom.
    SetAtom(String),
    /// Come into existence as an empty list.
    BecomeList,
    /// Insert a child, built by playing the note on nothing, at a space index.
    /// Inserting at the length of the list appends.
    Insert(usize, Box<Note>),
    /// Delete the child at a space index.
    Delete(usize),
    /// Play the note on the child at a space index.
    Extend(usize, Box<Note>),
    /// Play all notes in order, as one step.
    Chord(Vec<Note>),
}

impl Note {
    pub fn become_atom(text: impl Into<String>) -> Note {
        return Note::BecomeAtom(text.into());
    }

    pub fn set_atom(text: impl Into<String>) -> Note {
        return Note::SetAtom(text.into());
    }

    pub fn insert(index: usize, child: Note) -> Note {
        return Note::Insert(index, Box::new(child));
    }

    pub fn extend(index: usize, child: Note) -> Note {
        return Note::Extend(index, Box::new(child));
    }

    /// The name of this note in the textual form.
    pub fn name(&self) -> &'static str {
        return match self {
            Note::BecomeAtom(_) => "become-atom",
            Note::SetAtom(_) => "set-atom",
            Note::BecomeList => "become-list",
            Note::Insert(..) => "insert",
            Note::Delete(_) => "delete",
            Note::Extend(..) => "extend",
            Note::Chord(_) => "chord",
        };
    }

    pub fn tag(&self) -> u8 {
        return match self {
            Note::BecomeAtom(_) => TAG_BECOME_ATOM,
            Note::SetAtom(_) => TAG_SET_ATOM,
            Note::BecomeList => TAG_BECOME_LIST,
            Note::Insert(..) => TAG_INSERT,
            Note::Delete(_) => TAG_DELETE,
            Note::Extend(..) => TAG_EXTEND,
            Note::Chord(_) => TAG_CHORD,
        };
    }

    /// Append the binary encoding of this note to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.tag());
        match self {
            Note::BecomeAtom(text) | Note::SetAtom(text) => {
                vlq::encode(text.len() as u64, buf);
                buf.extend_from_slice(text.as_bytes());
            }
            Note::BecomeList => {}
            Note::Insert(index, child) | Note::Extend(index, child) => {
                vlq::encode(*index as u64, buf);
                child.encode(buf);
            }
            Note::Delete(index) => {
                vlq::encode(*index as u64, buf);
            }
            Note::Chord(notes) => {
                vlq::encode(notes.len() as u64, buf);
                for note in notes {
                    note.encode(buf);
                }
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        return buf;
    }

    /// Decode one note from `data` at `*pos`, advancing it past the note.
    ///
    /// Notes nested more than `MAX_DEPTH` levels deep are rejected.
    pub fn decode(data: &[u8], pos: &mut usize) -> Result<Note, DecodeError> {
        return decode_nested(data, pos, 0);
    }

    /// Decode a buffer that holds exactly one note.
    pub fn from_bytes(data: &[u8]) -> Result<Note, DecodeError> {
        let mut pos = 0;
        let note = Note::decode(data, &mut pos)?;
        if pos != data.len() {
            return Err(DecodeError::TrailingBytes(data.len() - pos));
        }
        return Ok(note);
    }

    /// The textual s-expression form of this note.
    pub fn to_s_expression(&self) -> Sexp {
        let name = Sexp::word(self.name());
        return match self {
            Note::BecomeAtom(text) | Note::SetAtom(text) => Sexp::List(vec![name, Sexp::text(text.clone())]),
            Note::BecomeList => Sexp::List(vec![name]),
            Note::Insert(index, child) | Note::Extend(index, child) => {
                Sexp::List(vec![name, Sexp::word(index.to_string()), child.to_s_expression()])
            }
            Note::Delete(index) => Sexp::List(vec![name, Sexp::word(index.to_string())]),
            Note::Chord(notes) => Sexp::List(vec![
                name,
                Sexp::List(notes.iter().map(Note::to_s_expression).collect()),
            ]),
        };
    }

    /// Read a note back from its textual s-expression form.
    pub fn from_s_expression(sexp: &Sexp) -> Result<Note, ParseError> {
        return note_from_sexp(sexp, 0);
    }
}

fn decode_nested(data: &[u8], pos: &mut usize, depth: usize) -> Result<Note, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::TooDeep(MAX_DEPTH));
    }
    let tag = *data.get(*pos).ok_or(DecodeError::UnexpectedEnd)?;
    *pos += 1;

    return match tag {
        TAG_BECOME_ATOM => Ok(Note::BecomeAtom(decode_text(data, pos)?)),
        TAG_SET_ATOM => Ok(Note::SetAtom(decode_text(data, pos)?)),
        TAG_BECOME_LIST => Ok(Note::BecomeList),
        TAG_INSERT => {
            let index = vlq::decode_usize(data, pos)?;
            Ok(Note::insert(index, decode_nested(data, pos, depth + 1)?))
        }
        TAG_DELETE => Ok(Note::Delete(vlq::decode_usize(data, pos)?)),
        TAG_EXTEND => {
            let index = vlq::decode_usize(data, pos)?;
            Ok(Note::extend(index, decode_nested(data, pos, depth + 1)?))
        }
        TAG_CHORD => {
            let count = vlq::decode_usize(data, pos)?;
            // every note takes at least one byte
            let mut notes = Vec::with_capacity(count.min(data.len() - *pos));
            for _ in 0..count {
                notes.push(decode_nested(data, pos, depth + 1)?);
            }
            Ok(Note::Chord(notes))
        }
        unknown => Err(DecodeError::UnknownTag(unknown)),
    };
}

fn note_from_sexp(sexp: &Sexp, depth: usize) -> Result<Note, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::TooDeep(MAX_DEPTH));
    }
    let items = sexp.as_list().ok_or_else(|| ParseError::Malformed {
        note: sexp.to_string(),
        reason: "a note is a list",
    })?;
    let (head, args) = items.split_first().ok_or_else(|| ParseError::Malformed {
        note: "()".to_string(),
        reason: "a note starts with its name",
    })?;
    let name = head.as_word().ok_or_else(|| ParseError::Malformed {
        note: head.to_string(),
        reason: "a note starts with its name",
    })?;

    let malformed = |reason: &'static str| ParseError::Malformed {
        note: name.to_string(),
        reason,
    };

    return match (name, args) {
        ("become-atom", [text]) => Ok(Note::BecomeAtom(parse_text(text).ok_or_else(|| malformed("expected text"))?)),
        ("set-atom", [text]) => Ok(Note::SetAtom(parse_text(text).ok_or_else(|| malformed("expected text"))?)),
        ("become-list", []) => Ok(Note::BecomeList),
        ("insert", [index, child]) => {
            let index = parse_index(index).ok_or_else(|| malformed("expected an index"))?;
            Ok(Note::insert(index, note_from_sexp(child, depth + 1)?))
        }
        ("delete", [index]) => Ok(Note::Delete(parse_index(index).ok_or_else(|| malformed("expected an index"))?)),
        ("extend", [index, child]) => {
            let index = parse_index(index).ok_or_else(|| malformed("expected an index"))?;
            Ok(Note::extend(index, note_from_sexp(child, depth + 1)?))
        }
        ("chord", [notes]) => {
            let notes = notes.as_list().ok_or_else(|| malformed("expected a list of notes"))?;
            let notes = notes
                .iter()
                .map(|note| note_from_sexp(note, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Note::Chord(notes))
        }
        ("become-atom" | "set-atom" | "become-list" | "insert" | "delete" | "extend" | "chord", _) => {
            Err(malformed("wrong number of arguments"))
        }
        (unknown, _) => Err(ParseError::UnknownNote(unknown.to_string())),
    };
}

fn decode_text(data: &[u8], pos: &mut usize) -> Result<String, DecodeError> {
    let len = vlq::decode_usize(data, pos)?;
    let end = pos.checked_add(len).ok_or(DecodeError::UnexpectedEnd)?;
    let bytes = data.get(*pos..end).ok_or(DecodeError::UnexpectedEnd)?;
    *pos = end;
    return String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8);
}

fn parse_text(sexp: &Sexp) -> Option<String> {
    return match sexp {
        Sexp::Text(text) | Sexp::Word(text) => Some(text.clone()),
        Sexp::List(_) => None,
    };
}

fn parse_index(sexp: &Sexp) -> Option<usize> {
    return sexp.as_word()?.parse().ok();
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.to_s_expression());
    }
}

impl FromStr for Note {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Note, ParseError> {
        return Note::from_s_expression(&Sexp::parse(s)?);
    }
}

/// Iterates over the notes of a concatenated note stream.
pub struct NoteStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> NoteStream<'a> {
    pub fn new(data: &'a [u8]) -> NoteStream<'a> {
        return NoteStream { data, pos: 0 };
    }

    /// Byte offset of the next note.
    pub fn position(&self) -> usize {
        return self.pos;
    }
}

impl Iterator for NoteStream<'_> {
    type Item = Result<Note, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let result = Note::decode(self.data, &mut self.pos);
        if result.is_err() {
            // a broken stream cannot be resynchronized
            self.pos = self.data.len();
        }
        return Some(result);
    }
}
