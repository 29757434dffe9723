//! Showing notes in the structural context they were played in.
//!
//! Given the structure before a note and the nerd tree after it, these
//! functions decide how every node is displayed: unchanged, inserted,
//! deleted, or inserted and deleted again. Two views exist:
//!
//! * `render_t0` shows only the net effect compared to the structure before.
//!   Anything that could be left out without changing the end result is
//!   hidden, e.g. an insertion inside a list that was later deleted.
//! * `render_most_completely` shows everything that happened.

use std::fmt;

use crate::address::Address;
use crate::error::PlayError;
use crate::nerd::NerdAtom;
use crate::nerd::NerdList;
use crate::nerd::NerdSExpr;
use crate::nerd::plusminus;
use crate::note_address::NoteAddress;
use crate::note_address::NoteAddressPart;
use crate::note_address::RenderPart;
use crate::play::Construct;
use crate::score::Score;
use crate::session::Session;

/// Which of several displays of one node this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IcdDetail {
    /// The text the atom had before, shown as deleted.
    Original,
    /// The text the atom has now, shown as inserted next to its original.
    FinalVersion,
    /// The i-th previous text of an atom.
    Version(usize),
    /// The current text of an atom, after all its versions.
    Last,
}

/// Uniquely identifies a rendered node of an in-context history: first by
/// the note it displays, then by the stable address in the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IchAddress {
    pub note_address: NoteAddress,
    pub t_address: Address,
    pub detail: Option<IcdDetail>,
    pub render: Option<RenderPart>,
}

impl IchAddress {
    pub fn for_note(note_address: NoteAddress) -> IchAddress {
        return IchAddress {
            note_address,
            ..IchAddress::default()
        };
    }

    pub fn plus_t(&self, t: usize) -> IchAddress {
        let mut t_address = self.t_address.clone();
        t_address.push(t);
        return IchAddress {
            note_address: self.note_address.clone(),
            t_address,
            detail: None,
            render: None,
        };
    }

    pub fn with_detail(&self, detail: IcdDetail) -> IchAddress {
        return IchAddress {
            note_address: self.note_address.clone(),
            t_address: self.t_address.clone(),
            detail: Some(detail),
            render: None,
        };
    }

    pub fn with_render(&self, render: RenderPart) -> IchAddress {
        return IchAddress {
            render: Some(render),
            ..self.clone()
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InContextDisplay {
    Atom {
        atom: String,
        is_inserted: bool,
        is_deleted: bool,
        address: IchAddress,
    },
    List {
        children: Vec<InContextDisplay>,
        is_inserted: bool,
        is_deleted: bool,
        address: IchAddress,
    },
}

impl InContextDisplay {
    pub fn address(&self) -> &IchAddress {
        return match self {
            InContextDisplay::Atom { address, .. } | InContextDisplay::List { address, .. } => address,
        };
    }
}

impl fmt::Display for InContextDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            InContextDisplay::Atom {
                atom,
                is_inserted,
                is_deleted,
                ..
            } => write!(f, "{}{}", plusminus(*is_inserted, *is_deleted), atom),
            InContextDisplay::List {
                children,
                is_inserted,
                is_deleted,
                ..
            } => {
                write!(f, "{}(", plusminus(*is_inserted, *is_deleted))?;
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

fn atom(atom: &str, is_inserted: bool, is_deleted: bool, address: IchAddress) -> InContextDisplay {
    return InContextDisplay::Atom {
        atom: atom.to_string(),
        is_inserted,
        is_deleted,
        address,
    };
}

fn child_address(list: &NerdList, n: usize, address: &IchAddress) -> IchAddress {
    return match list.nerdtime.t_for_s(n) {
        Some(t) => address.plus_t(t),
        None => address.plus_t(n),
    };
}

/// The net effect view; see the module documentation.
pub fn render_t0(node: &NerdSExpr, address: &IchAddress) -> Vec<InContextDisplay> {
    return render_t0_in(node, false, address);
}

fn render_t0_in(node: &NerdSExpr, context_is_deleted: bool, address: &IchAddress) -> Vec<InContextDisplay> {
    let context_is_deleted = context_is_deleted || node.is_deleted();

    return match node {
        NerdSExpr::Atom(a) => render_t0_atom(a, context_is_deleted, address),
        NerdSExpr::List(list) => {
            // insertions inside deletions are hidden
            if context_is_deleted && list.is_inserted {
                return Vec::new();
            }
            let mut children = Vec::new();
            for (n, child) in list.children.iter().enumerate() {
                children.extend(render_t0_in(child, context_is_deleted, &child_address(list, n, address)));
            }
            vec![InContextDisplay::List {
                children,
                is_inserted: list.is_inserted,
                is_deleted: context_is_deleted,
                address: address.clone(),
            }]
        }
    };
}

fn render_t0_atom(a: &NerdAtom, context_is_deleted: bool, address: &IchAddress) -> Vec<InContextDisplay> {
    let Some(first) = a.versions.first() else {
        // unchanged
        return vec![atom(&a.atom, false, context_is_deleted, address.clone())];
    };

    return match (first, context_is_deleted) {
        // new, and gone again: nothing to show at t=0
        (None, true) => Vec::new(),
        (Some(original), true) => vec![atom(original, false, true, address.clone())],
        (None, false) => vec![atom(&a.atom, true, false, address.clone())],
        (Some(original), false) => vec![
            atom(original, false, true, address.with_detail(IcdDetail::Original)),
            atom(&a.atom, true, false, address.with_detail(IcdDetail::FinalVersion)),
        ],
    };
}

/// The everything-that-happened view; see the module documentation.
pub fn render_most_completely(node: &NerdSExpr, address: &IchAddress) -> Vec<InContextDisplay> {
    return render_most_completely_in(node, false, address);
}

fn render_most_completely_in(node: &NerdSExpr, context_is_deleted: bool, address: &IchAddress) -> Vec<InContextDisplay> {
    let context_is_deleted = context_is_deleted || node.is_deleted();

    return match node {
        NerdSExpr::Atom(a) if a.versions.is_empty() => {
            vec![atom(&a.atom, false, context_is_deleted, address.clone())]
        }
        NerdSExpr::Atom(a) => {
            let mut result: Vec<InContextDisplay> = a
                .versions
                .iter()
                .enumerate()
                .filter_map(|(i, version)| {
                    let text = version.as_deref()?;
                    return Some(atom(text, i > 0, true, address.with_detail(IcdDetail::Version(i))));
                })
                .collect();
            result.push(atom(&a.atom, true, context_is_deleted, address.with_detail(IcdDetail::Last)));
            result
        }
        NerdSExpr::List(list) => {
            let mut children = Vec::new();
            for (n, child) in list.children.iter().enumerate() {
                children.extend(render_most_completely_in(
                    child,
                    context_is_deleted,
                    &child_address(list, n, address),
                ));
            }
            vec![InContextDisplay::List {
                children,
                is_inserted: list.is_inserted,
                is_deleted: context_is_deleted,
                address: address.clone(),
            }]
        }
    };
}

/// For every note of `score`: the effect of that note on the structure it
/// was played on, as `render_t0` shows it.
pub fn history_in_context(session: &mut Session, score: &Score) -> Result<Vec<InContextDisplay>, PlayError> {
    let mut items = Vec::new();
    let prefixes: Vec<Score> = score.scores().cloned().collect();

    for (i, prefix) in prefixes.iter().rev().enumerate() {
        let Some(note) = prefix.last_note() else {
            continue;
        };
        let before = match prefix.previous() {
            Some(previous) => session.play(previous)?,
            None => None,
        };
        let before = before.as_ref().map(NerdSExpr::from_s_expr);
        let after = NerdSExpr::play_note(&mut session.scores, note, before.as_ref())?;

        let address = IchAddress::for_note(NoteAddress::root().plus(NoteAddressPart::InScore(i)));
        items.extend(render_t0(&after, &address));
    }

    return Ok(items);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;
    use crate::score::ScoreTable;
    use crate::tree::SExpr;

    fn in_context(before: &[Note], note: Note) -> NerdSExpr {
        let mut table = ScoreTable::new();
        let tree: Option<SExpr> = crate::play::play_notes(&mut table, before).unwrap();
        let nerd = tree.as_ref().map(NerdSExpr::from_s_expr);
        return NerdSExpr::play_note(&mut table, &note, nerd.as_ref()).unwrap();
    }

    fn show(items: &[InContextDisplay]) -> String {
        return items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
    }

    fn abc() -> Vec<Note> {
        return vec![
            Note::BecomeList,
            Note::insert(0, Note::become_atom("a")),
            Note::insert(1, Note::become_atom("b")),
            Note::insert(2, Note::become_atom("c")),
        ];
    }

    #[test]
    fn deletion_and_insertion() {
        let chord = Note::Chord(vec![Note::Delete(0), Note::insert(0, Note::become_atom("z"))]);
        let nerd = in_context(&abc(), chord);
        assert_eq!(show(&render_t0(&nerd, &IchAddress::default())), "(+z -a b c)");
    }

    #[test]
    fn changed_atom_shows_both_versions() {
        let nerd = in_context(&abc(), Note::extend(1, Note::set_atom("B")));
        let items = render_t0(&nerd, &IchAddress::default());
        assert_eq!(show(&items), "(a -b +B c)");

        let InContextDisplay::List { children, .. } = &items[0] else {
            panic!("expected a list");
        };
        assert_eq!(children[1].address().detail, Some(IcdDetail::Original));
        assert_eq!(children[2].address().detail, Some(IcdDetail::FinalVersion));
        assert_eq!(children[2].address().t_address.as_slice(), &[1]);
    }

    #[test]
    fn insertions_inside_deletions_are_hidden_at_t0() {
        let chord = Note::Chord(vec![
            Note::extend(1, Note::set_atom("B")),
            Note::insert(3, Note::BecomeList),
            Note::extend(3, Note::insert(0, Note::become_atom("q"))),
            Note::Delete(3),
            Note::Delete(1),
        ]);
        let nerd = in_context(&abc(), chord);
        assert_eq!(show(&render_t0(&nerd, &IchAddress::default())), "(a -b c)");
        assert_eq!(
            show(&render_most_completely(&nerd, &IchAddress::default())),
            "(a -b ±B c ±(±q))"
        );
    }

    #[test]
    fn from_nothing_everything_is_new() {
        let nerd = in_context(&[], Note::Chord(abc()));
        assert_eq!(show(&render_t0(&nerd, &IchAddress::default())), "+(+a +b +c)");
    }

    #[test]
    fn history_lists_every_note() {
        let mut session = Session::new();
        let mut notes = abc();
        notes.push(Note::Delete(1));
        let score = session.from_notes(notes);
        let items = history_in_context(&mut session, &score).unwrap();

        let rendered: Vec<String> = items.iter().map(|i| i.to_string()).collect();
        assert_eq!(rendered, vec!["+()", "(+a)", "(a +b)", "(a b +c)", "(a -b c)"]);
        assert_eq!(
            items[4].address().note_address,
            NoteAddress::root().plus(NoteAddressPart::InScore(4))
        );
    }
}
