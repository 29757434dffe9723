//! Pretty-printing annotations and layout.
//!
//! Layout choices are recorded as notes against time addresses, so a choice
//! made for a node keeps applying to that node while the tree around it is
//! edited. Later annotations for the same node win.

use crate::address::Address;
use crate::annotated::Annotated;
use crate::score::Score;
use crate::spacetime::get_s_address_for_t_address;
use crate::tree::SExpr;

/// The layout requested for a single node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PpSetting {
    /// No manual override.
    #[default]
    Default,
    SingleLine,
    /// Arguments below each other, aligned with the first argument.
    MultiLineAligned,
    /// Arguments below each other, indented under the head.
    MultiLineIndented,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PpNote {
    pub t_address: Address,
    pub setting: PpSetting,
}

/// A layout note, together with the score of the tree it was made on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PpAnnotation {
    pub score: Score,
    pub note: PpNote,
}

pub type PpTree = Annotated<SExpr, PpSetting>;

/// Annotate `tree` with the settings of `annotations`, in order. Annotations
/// for nodes that no longer exist are skipped.
pub fn construct_pp_tree(tree: &SExpr, annotations: &[PpAnnotation]) -> PpTree {
    let mut pp_tree = Annotated::build(tree, PpSetting::Default);

    for annotation in annotations {
        let Some(s_address) = get_s_address_for_t_address(tree, &annotation.note.t_address) else {
            continue;
        };
        if let Some(node) = pp_tree.get_mut(&s_address) {
            node.annotation = annotation.note.setting;
        }
    }

    return pp_tree;
}

/// How a node is laid out, after taking its ancestors into account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MultilineMode {
    MultiLineAligned,
    MultiLineIndented,
    SingleLine,
}

pub type IriTree = Annotated<SExpr, MultilineMode>;

/// Resolve the settings of `pp_tree` into layout modes, top-down.
///
/// A node without a setting is aligned. The head of a list (its first
/// child) and everything below a single-line node are single-line.
pub fn construct_iri_top_down(pp_tree: &PpTree, inherited: MultilineMode) -> IriTree {
    let mode = match (inherited, pp_tree.annotation) {
        (MultilineMode::SingleLine, _) => MultilineMode::SingleLine,
        (_, PpSetting::Default) => MultilineMode::MultiLineAligned,
        (_, PpSetting::SingleLine) => MultilineMode::SingleLine,
        (_, PpSetting::MultiLineAligned) => MultilineMode::MultiLineAligned,
        (_, PpSetting::MultiLineIndented) => MultilineMode::MultiLineIndented,
    };

    let children = pp_tree
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let child_mode = if i == 0 { MultilineMode::SingleLine } else { mode };
            return construct_iri_top_down(child, child_mode);
        })
        .collect();

    return IriTree {
        node: pp_tree.node.clone(),
        annotation: mode,
        children,
    };
}

/// Lay out an annotated tree as text.
pub fn render(iri_tree: &IriTree) -> String {
    let mut out = String::new();
    render_at(iri_tree, 0, &mut out);
    return out;
}

fn render_at(node: &IriTree, column: usize, out: &mut String) {
    if node.annotation == MultilineMode::SingleLine || node.children.len() < 2 || !node.node.is_list() {
        out.push_str(&node.node.to_string());
        return;
    }

    out.push('(');
    let head = match node.children.first() {
        Some(head) => head.node.to_string(),
        None => String::new(),
    };
    out.push_str(&head);

    let rest_column = match node.annotation {
        MultilineMode::MultiLineIndented => column + 2,
        // aligned with the first argument
        _ => column + 1 + head.chars().count() + 1,
    };

    for (i, child) in node.children.iter().enumerate().skip(1) {
        if i == 1 && node.annotation != MultilineMode::MultiLineIndented {
            out.push(' ');
        } else {
            out.push('\n');
            out.extend(std::iter::repeat_n(' ', rest_column));
        }
        render_at(child, rest_column, out);
    }
    out.push(')');
}
