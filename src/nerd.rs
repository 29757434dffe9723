//! Nerd trees: s-expressions in which nothing ever really disappears.
//!
//! Playing a score as a nerd tree keeps deleted children in place, marked as
//! deleted, and keeps every previous text of an atom. It also records which
//! lists came into being during the history that was played. This is the
//! structure from which histories are rendered in context.

use std::fmt;
use std::rc::Rc;

use crate::address::Address;
use crate::address::Node;
use crate::address::best_lookup;
use crate::address::get_node_for_address;
use crate::error::PlayError;
use crate::nerdspace::InsertPolicy;
use crate::nerdspace::NerdSpace;
use crate::note::Note;
use crate::play::Construct;
use crate::play::check_insertion;
use crate::play::check_inside;
use crate::play::next_score;
use crate::score::Score;
use crate::score::ScoreTable;
use crate::spacetime::SpaceTime;
use crate::tree::SExpr;

#[derive(Debug)]
pub struct NerdAtom {
    pub atom: String,
    /// Every previous text, oldest first. A leading `None` means the atom
    /// did not exist before; an empty list means it was never changed.
    pub versions: Vec<Option<String>>,
    pub is_deleted: bool,
    pub score: Score,
}

#[derive(Debug)]
pub struct NerdList {
    /// Live and deleted children, in nerd order.
    pub children: Vec<NerdSExpr>,
    pub nerdspace: NerdSpace,
    /// Time coordinates of the children, with nerd indices in place of space
    /// indices; nothing is ever deleted here.
    pub nerdtime: SpaceTime,
    pub is_inserted: bool,
    pub is_deleted: bool,
    pub score: Score,
}

#[derive(Clone, Debug)]
pub enum NerdSExpr {
    Atom(Rc<NerdAtom>),
    List(Rc<NerdList>),
}

/// `±` for inserted-then-deleted, `+` and `-` for either alone.
pub fn plusminus(is_inserted: bool, is_deleted: bool) -> &'static str {
    return match (is_inserted, is_deleted) {
        (true, true) => "±",
        (true, false) => "+",
        (false, true) => "-",
        (false, false) => "",
    };
}

impl NerdSExpr {
    /// The nerd view of a plain tree: no tombstones, nothing inserted.
    pub fn from_s_expr(s_expr: &SExpr) -> NerdSExpr {
        return match s_expr {
            SExpr::Atom(atom) => NerdSExpr::Atom(Rc::new(NerdAtom {
                atom: atom.atom.clone(),
                versions: Vec::new(),
                is_deleted: false,
                score: atom.score.clone(),
            })),
            SExpr::List(list) => NerdSExpr::List(Rc::new(NerdList {
                children: list.children.iter().map(NerdSExpr::from_s_expr).collect(),
                nerdspace: NerdSpace::identity(list.children.len()),
                // n and s coincide, so the time tables carry over
                nerdtime: list.spacetime.clone(),
                is_inserted: false,
                is_deleted: false,
                score: list.score.clone(),
            })),
        };
    }

    pub fn score(&self) -> &Score {
        return match self {
            NerdSExpr::Atom(atom) => &atom.score,
            NerdSExpr::List(list) => &list.score,
        };
    }

    pub fn is_deleted(&self) -> bool {
        return match self {
            NerdSExpr::Atom(atom) => atom.is_deleted,
            NerdSExpr::List(list) => list.is_deleted,
        };
    }

    pub fn as_list(&self) -> Option<&NerdList> {
        return match self {
            NerdSExpr::Atom(_) => None,
            NerdSExpr::List(list) => Some(list),
        };
    }

    pub fn as_atom(&self) -> Option<&NerdAtom> {
        return match self {
            NerdSExpr::Atom(atom) => Some(atom),
            NerdSExpr::List(_) => None,
        };
    }

    /// The same node, marked as deleted. Its score is unchanged: the
    /// deletion happened in the parent.
    pub fn deleted_version(&self) -> NerdSExpr {
        return match self {
            NerdSExpr::Atom(atom) => NerdSExpr::Atom(Rc::new(NerdAtom {
                atom: atom.atom.clone(),
                versions: atom.versions.clone(),
                is_deleted: true,
                score: atom.score.clone(),
            })),
            NerdSExpr::List(list) => NerdSExpr::List(Rc::new(NerdList {
                children: list.children.clone(),
                nerdspace: list.nerdspace.clone(),
                nerdtime: list.nerdtime.clone(),
                is_inserted: list.is_inserted,
                is_deleted: true,
                score: list.score.clone(),
            })),
        };
    }

    /// The same node, tagged with a different history.
    pub fn rescore(&self, score: Score) -> NerdSExpr {
        return match self {
            NerdSExpr::Atom(atom) => NerdSExpr::Atom(Rc::new(NerdAtom {
                atom: atom.atom.clone(),
                versions: atom.versions.clone(),
                is_deleted: atom.is_deleted,
                score,
            })),
            NerdSExpr::List(list) => NerdSExpr::List(Rc::new(NerdList {
                children: list.children.clone(),
                nerdspace: list.nerdspace.clone(),
                nerdtime: list.nerdtime.clone(),
                is_inserted: list.is_inserted,
                is_deleted: list.is_deleted,
                score,
            })),
        };
    }

    /// Play a note, choosing where insertions go relative to tombstones.
    pub fn play_note_with(
        table: &mut ScoreTable,
        note: &Note,
        structure: Option<&NerdSExpr>,
        policy: InsertPolicy,
    ) -> Result<NerdSExpr, PlayError> {
        let score = next_score(table, note, structure.map(NerdSExpr::score));

        let list = match (note, structure) {
            (Note::Chord(notes), _) => {
                let mut current = structure.cloned();
                for note in notes {
                    current = Some(NerdSExpr::play_note_with(table, note, current.as_ref(), policy)?);
                }
                let played = current.ok_or(PlayError::EmptyChord)?;
                return Ok(played.rescore(score));
            }
            (Note::BecomeAtom(text), None) => {
                return Ok(NerdSExpr::Atom(Rc::new(NerdAtom {
                    atom: text.clone(),
                    versions: vec![None],
                    is_deleted: false,
                    score,
                })));
            }
            (Note::BecomeList, None) => {
                return Ok(NerdSExpr::List(Rc::new(NerdList {
                    children: Vec::new(),
                    nerdspace: NerdSpace::new(),
                    nerdtime: SpaceTime::new(),
                    is_inserted: true,
                    is_deleted: false,
                    score,
                })));
            }
            (Note::BecomeAtom(_) | Note::BecomeList, Some(_)) => {
                return Err(PlayError::NotFromNothing { note: note.name() });
            }
            (Note::SetAtom(text), Some(NerdSExpr::Atom(atom))) => {
                let mut versions = atom.versions.clone();
                versions.push(Some(atom.atom.clone()));
                return Ok(NerdSExpr::Atom(Rc::new(NerdAtom {
                    atom: text.clone(),
                    versions,
                    is_deleted: false,
                    score,
                })));
            }
            (Note::SetAtom(_), _) => return Err(PlayError::NotAnAtom),
            (_, Some(NerdSExpr::List(list))) => list,
            (_, _) => return Err(PlayError::NotAList { note: note.name() }),
        };

        let len = list.nerdspace.len();
        let mut children = list.children.clone();
        let mut nerdspace = list.nerdspace.clone();
        let mut nerdtime = list.nerdtime.clone();

        match note {
            Note::Insert(index, child) => {
                check_insertion(note, *index, len)?;
                let child = NerdSExpr::play_note_with(table, child, None, policy)?;
                let index_in_n = nerdspace.insert(*index, policy);
                nerdtime.insert(index_in_n);
                children.insert(index_in_n, child);
            }
            Note::Delete(index) => {
                check_inside(note, *index, len)?;
                let index_in_n = nerdspace.delete(*index);
                children[index_in_n] = children[index_in_n].deleted_version();
            }
            Note::Extend(index, child) => {
                check_inside(note, *index, len)?;
                let index_in_n = nerdspace.replace(*index);
                children[index_in_n] =
                    NerdSExpr::play_note_with(table, child, Some(&list.children[index_in_n]), policy)?;
            }
            // handled above
            Note::Chord(_) | Note::BecomeAtom(_) | Note::SetAtom(_) | Note::BecomeList => {}
        }

        return Ok(NerdSExpr::List(Rc::new(NerdList {
            children,
            nerdspace,
            nerdtime,
            is_inserted: list.is_inserted,
            is_deleted: list.is_deleted,
            score,
        })));
    }

    /// Render only what is alive, the way the plain tree would.
    pub fn live_flat(&self) -> String {
        let mut out = String::new();
        self.write_live_flat(&mut out);
        return out;
    }

    fn write_live_flat(&self, out: &mut String) {
        match self {
            NerdSExpr::Atom(atom) => out.push_str(&atom.atom),
            NerdSExpr::List(list) => {
                out.push('(');
                let mut first = true;
                for child in list.children.iter().filter(|c| !c.is_deleted()) {
                    if !first {
                        out.push(' ');
                    }
                    first = false;
                    child.write_live_flat(out);
                }
                out.push(')');
            }
        }
    }
}

impl Construct for NerdSExpr {
    fn play_note(table: &mut ScoreTable, note: &Note, structure: Option<&NerdSExpr>) -> Result<NerdSExpr, PlayError> {
        return NerdSExpr::play_note_with(table, note, structure, InsertPolicy::default());
    }

    fn score(&self) -> &Score {
        return NerdSExpr::score(self);
    }
}

impl Node for NerdSExpr {
    fn children(&self) -> Option<&[NerdSExpr]> {
        return match self {
            NerdSExpr::List(list) => Some(&list.children),
            NerdSExpr::Atom(_) => None,
        };
    }
}

/// Shows tombstones and history markers, e.g. `+(«None»+a «»-b)`.
impl fmt::Display for NerdSExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            NerdSExpr::Atom(atom) => {
                f.write_str("«")?;
                for (i, version) in atom.versions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    match version {
                        Some(text) => f.write_str(text)?,
                        None => f.write_str("None")?,
                    }
                }
                write!(f, "»{}{}", plusminus(false, atom.is_deleted), atom.atom)
            }
            NerdSExpr::List(list) => {
                write!(f, "{}(", plusminus(list.is_inserted, list.is_deleted))?;
                for (i, child) in list.children.iter().enumerate() {
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

/// The nerd address of the longest prefix of `t_address` that can be found.
pub fn best_n_address_for_t_address(node: &NerdSExpr, t_address: &[usize]) -> Address {
    return best_lookup(node, t_address, |node, t| {
        let n = node.as_list()?.nerdtime.s_for_t(t)?;
        return Some((n, n));
    });
}

/// The nerd address for `t_address`; deleted nodes still have one.
pub fn get_n_address_for_t_address(node: &NerdSExpr, t_address: &[usize]) -> Option<Address> {
    let n_address = best_n_address_for_t_address(node, t_address);
    if n_address.len() != t_address.len() {
        return None;
    }
    return Some(n_address);
}

/// Nerd addresses index straight into the children, deleted or not.
pub fn node_for_n_address<'a>(node: &'a NerdSExpr, n_address: &[usize]) -> Option<&'a NerdSExpr> {
    return get_node_for_address(node, n_address);
}
