//! Global note addresses.
//!
//! A note address is the path of a note relative to some root score: `@i`
//! selects the i-th note of a score or chord, `>` descends into the single
//! child of an insert or extend. Annotating every note of a score with its
//! address, and every token of its rendering with the address of the part it
//! renders, lets a history view map anything on screen back to the note that
//! produced it.

use std::fmt;

use smallvec::SmallVec;

use crate::note::Note;
use crate::score::Score;
use crate::sexp::write_quoted;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteAddressPart {
    /// Descend into the child note of an insert or extend.
    TheChild,
    /// The note at this index of a score or chord.
    InScore(usize),
}

impl fmt::Display for NoteAddressPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            NoteAddressPart::TheChild => f.write_str(">"),
            NoteAddressPart::InScore(i) => write!(f, "@{}", i),
        };
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NoteAddress(pub SmallVec<[NoteAddressPart; 8]>);

impl NoteAddress {
    pub fn root() -> NoteAddress {
        return NoteAddress::default();
    }

    pub fn plus(&self, part: NoteAddressPart) -> NoteAddress {
        let mut parts = self.0.clone();
        parts.push(part);
        return NoteAddress(parts);
    }

    pub fn len(&self) -> usize {
        return self.0.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.0.is_empty();
    }

    pub fn is_prefix_of(&self, other: &NoteAddress) -> bool {
        return other.0.starts_with(&self.0);
    }
}

fn write_parts(f: &mut fmt::Formatter<'_>, parts: &[&dyn fmt::Display]) -> fmt::Result {
    f.write_str("(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", part)?;
    }
    return f.write_str(")");
}

impl fmt::Display for NoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&dyn fmt::Display> = self.0.iter().map(|p| p as &dyn fmt::Display).collect();
        return write_parts(f, &parts);
    }
}

/// Which part of a note an s-expression token renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteField {
    Name,
    Atom,
    Index,
    /// The list of notes of a chord.
    List,
}

impl fmt::Display for NoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoteField::Name => "name",
            NoteField::Atom => "atom",
            NoteField::Index => "index",
            NoteField::List => "list",
        };
        return f.write_str(name);
    }
}

/// The address of an s-expression that renders (a field of) a note.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SExprNoteAddress {
    pub note_address: NoteAddress,
    /// `None` when the s-expression renders the whole note.
    pub field: Option<NoteField>,
}

impl SExprNoteAddress {
    pub fn new(note_address: NoteAddress, field: Option<NoteField>) -> SExprNoteAddress {
        return SExprNoteAddress { note_address, field };
    }

    pub fn with_render(&self, part: Option<RenderPart>) -> RenderingAddress {
        return RenderingAddress {
            node: self.clone(),
            part,
        };
    }

    pub fn is_prefix_of(&self, other: &SExprNoteAddress) -> bool {
        return match self.field {
            None => self.note_address.is_prefix_of(&other.note_address),
            // The list of a chord contains the chord's members, whose
            // addresses continue with `@i` but carry no `list` field.
            Some(NoteField::List) => {
                let len = self.note_address.len();
                self.note_address.is_prefix_of(&other.note_address)
                    && matches!(other.note_address.0.get(len), Some(NoteAddressPart::InScore(_)))
            }
            Some(_) => self == other,
        };
    }
}

impl fmt::Display for SExprNoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&dyn fmt::Display> = self.note_address.0.iter().map(|p| p as &dyn fmt::Display).collect();
        if let Some(field) = &self.field {
            parts.push(field);
        }
        return write_parts(f, &parts);
    }
}

/// For lists: the opening or the closing paren.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderPart {
    Open,
    Close,
}

/// The address of a single rendered token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderingAddress {
    pub node: SExprNoteAddress,
    pub part: Option<RenderPart>,
}

/// A note in which every note, down to the leaves, knows its global address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobNote {
    pub address: NoteAddress,
    pub body: GlobBody,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlobBody {
    BecomeAtom(String),
    SetAtom(String),
    BecomeList,
    Insert(usize, Box<GlobNote>),
    Delete(usize),
    Extend(usize, Box<GlobNote>),
    Chord(Vec<GlobNote>),
}

impl GlobNote {
    /// Annotate `note` and all its descendants, with `note` at `address`.
    pub fn annotate(note: &Note, address: NoteAddress) -> GlobNote {
        let body = match note {
            Note::BecomeAtom(text) => GlobBody::BecomeAtom(text.clone()),
            Note::SetAtom(text) => GlobBody::SetAtom(text.clone()),
            Note::BecomeList => GlobBody::BecomeList,
            Note::Insert(index, child) => GlobBody::Insert(
                *index,
                Box::new(GlobNote::annotate(child, address.plus(NoteAddressPart::TheChild))),
            ),
            Note::Delete(index) => GlobBody::Delete(*index),
            Note::Extend(index, child) => GlobBody::Extend(
                *index,
                Box::new(GlobNote::annotate(child, address.plus(NoteAddressPart::TheChild))),
            ),
            Note::Chord(notes) => GlobBody::Chord(
                notes
                    .iter()
                    .enumerate()
                    .map(|(i, n)| GlobNote::annotate(n, address.plus(NoteAddressPart::InScore(i))))
                    .collect(),
            ),
        };
        return GlobNote { address, body };
    }

    /// The plain note, without addresses.
    pub fn to_note(&self) -> Note {
        return match &self.body {
            GlobBody::BecomeAtom(text) => Note::BecomeAtom(text.clone()),
            GlobBody::SetAtom(text) => Note::SetAtom(text.clone()),
            GlobBody::BecomeList => Note::BecomeList,
            GlobBody::Insert(index, child) => Note::insert(*index, child.to_note()),
            GlobBody::Delete(index) => Note::Delete(*index),
            GlobBody::Extend(index, child) => Note::extend(*index, child.to_note()),
            GlobBody::Chord(notes) => Note::Chord(notes.iter().map(GlobNote::to_note).collect()),
        };
    }

    /// The note at `address`, searching this note and its descendants.
    pub fn find(&self, address: &NoteAddress) -> Option<&GlobNote> {
        if &self.address == address {
            return Some(self);
        }
        if !self.address.is_prefix_of(address) {
            return None;
        }
        return match &self.body {
            GlobBody::Insert(_, child) | GlobBody::Extend(_, child) => child.find(address),
            GlobBody::Chord(notes) => notes.iter().find_map(|n| n.find(address)),
            _ => None,
        };
    }

    /// The textual form of the note, every part tagged with its address.
    pub fn to_s_expression(&self) -> AddressedSexp {
        let at = |field: NoteField| SExprNoteAddress::new(self.address.clone(), Some(field));
        let word = |text: &str, field: NoteField| AddressedSexp::Atom {
            text: text.to_string(),
            address: at(field),
        };

        let children = match &self.body {
            GlobBody::BecomeAtom(text) => vec![word("become-atom", NoteField::Name), word(text.as_str(), NoteField::Atom)],
            GlobBody::SetAtom(text) => vec![word("set-atom", NoteField::Name), word(text.as_str(), NoteField::Atom)],
            GlobBody::BecomeList => vec![word("become-list", NoteField::Name)],
            GlobBody::Insert(index, child) => vec![
                word("insert", NoteField::Name),
                word(&index.to_string(), NoteField::Index),
                child.to_s_expression(),
            ],
            GlobBody::Delete(index) => vec![word("delete", NoteField::Name), word(&index.to_string(), NoteField::Index)],
            GlobBody::Extend(index, child) => vec![
                word("extend", NoteField::Name),
                word(&index.to_string(), NoteField::Index),
                child.to_s_expression(),
            ],
            GlobBody::Chord(notes) => vec![
                word("chord", NoteField::Name),
                AddressedSexp::List {
                    children: notes.iter().map(GlobNote::to_s_expression).collect(),
                    address: at(NoteField::List),
                },
            ],
        };

        return AddressedSexp::List {
            children,
            address: SExprNoteAddress::new(self.address.clone(), None),
        };
    }
}

/// Annotate all notes of `score`; the i-th note is at `(@i)`.
pub fn score_with_global_address(score: &Score) -> Vec<GlobNote> {
    return score
        .notes()
        .into_iter()
        .enumerate()
        .map(|(i, note)| GlobNote::annotate(note, NoteAddress::root().plus(NoteAddressPart::InScore(i))))
        .collect();
}

/// An s-expression whose every node knows which note (field) it renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressedSexp {
    Atom { text: String, address: SExprNoteAddress },
    List { children: Vec<AddressedSexp>, address: SExprNoteAddress },
}

impl AddressedSexp {
    pub fn address(&self) -> &SExprNoteAddress {
        return match self {
            AddressedSexp::Atom { address, .. } | AddressedSexp::List { address, .. } => address,
        };
    }

    /// Every rendered token with the address it was rendered from.
    pub fn tokens(&self) -> Vec<(String, RenderingAddress)> {
        let mut tokens = Vec::new();
        self.collect_tokens(&mut tokens);
        return tokens;
    }

    fn collect_tokens(&self, tokens: &mut Vec<(String, RenderingAddress)>) {
        match self {
            AddressedSexp::Atom { address, .. } => {
                tokens.push((self.atom_token(), address.with_render(None)));
            }
            AddressedSexp::List { children, address } => {
                tokens.push(("(".to_string(), address.with_render(Some(RenderPart::Open))));
                for child in children {
                    child.collect_tokens(tokens);
                }
                tokens.push((")".to_string(), address.with_render(Some(RenderPart::Close))));
            }
        }
    }

    fn atom_token(&self) -> String {
        return self.to_string();
    }
}

/// Renders like `Note`'s textual form; atom text is quoted.
impl fmt::Display for AddressedSexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            AddressedSexp::Atom { text, address } if address.field == Some(NoteField::Atom) => write_quoted(f, text),
            AddressedSexp::Atom { text, .. } => f.write_str(text),
            AddressedSexp::List { children, .. } => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoreTable;
    use NoteAddressPart::InScore;
    use NoteAddressPart::TheChild;

    fn address(parts: &[NoteAddressPart]) -> NoteAddress {
        return NoteAddress(SmallVec::from_slice(parts));
    }

    #[test]
    fn annotate_assigns_paths() {
        let note = Note::Chord(vec![Note::BecomeList, Note::insert(0, Note::become_atom("a"))]);
        let glob = GlobNote::annotate(&note, address(&[InScore(3)]));

        let GlobBody::Chord(members) = &glob.body else {
            panic!("expected a chord");
        };
        assert_eq!(members[1].address, address(&[InScore(3), InScore(1)]));
        let GlobBody::Insert(_, child) = &members[1].body else {
            panic!("expected an insert");
        };
        assert_eq!(child.address, address(&[InScore(3), InScore(1), TheChild]));
        assert_eq!(glob.to_note(), note);
    }

    #[test]
    fn rendering_matches_plain_text_form() {
        let note = Note::Chord(vec![Note::Delete(0), Note::extend(1, Note::set_atom("x y"))]);
        let glob = GlobNote::annotate(&note, NoteAddress::root());
        assert_eq!(glob.to_s_expression().to_string(), note.to_string());
    }

    #[test]
    fn tokens_carry_addresses() {
        let glob = GlobNote::annotate(&Note::insert(2, Note::become_atom("q")), address(&[InScore(0)]));
        let tokens: Vec<(String, String)> = glob
            .to_s_expression()
            .tokens()
            .into_iter()
            .map(|(token, at)| (token, at.node.to_string()))
            .collect();

        assert_eq!(
            tokens,
            vec![
                ("(".to_string(), "(@0)".to_string()),
                ("insert".to_string(), "(@0, name)".to_string()),
                ("2".to_string(), "(@0, index)".to_string()),
                ("(".to_string(), "(@0, >)".to_string()),
                ("become-atom".to_string(), "(@0, >, name)".to_string()),
                ("\"q\"".to_string(), "(@0, >, atom)".to_string()),
                (")".to_string(), "(@0, >)".to_string()),
                (")".to_string(), "(@0)".to_string()),
            ]
        );
    }

    #[test]
    fn chord_list_is_prefix_of_members() {
        let list = SExprNoteAddress::new(address(&[InScore(3)]), Some(NoteField::List));
        let member = SExprNoteAddress::new(address(&[InScore(3), InScore(2)]), None);
        let child = SExprNoteAddress::new(address(&[InScore(3), TheChild]), None);
        let itself = SExprNoteAddress::new(address(&[InScore(3)]), None);

        assert!(list.is_prefix_of(&member));
        assert!(!list.is_prefix_of(&child));
        assert!(!list.is_prefix_of(&itself));
        assert!(itself.is_prefix_of(&member));

        let name = SExprNoteAddress::new(address(&[InScore(3)]), Some(NoteField::Name));
        assert!(name.is_prefix_of(&name.clone()));
        assert!(!name.is_prefix_of(&member));
    }

    #[test]
    fn score_addresses_and_find() {
        let mut table = ScoreTable::new();
        let score = table.from_notes([Note::BecomeList, Note::insert(0, Note::BecomeList)]);
        let globs = score_with_global_address(&score);
        assert_eq!(globs.len(), 2);
        assert_eq!(globs[1].address, address(&[InScore(1)]));

        let target = address(&[InScore(1), TheChild]);
        assert_eq!(globs[1].find(&target).map(GlobNote::to_note), Some(Note::BecomeList));
        assert!(globs[0].find(&target).is_none());
    }
}
