//! A selection: a range of siblings between two edges, one of which may be
//! attached to the editor's cursor.
//!
//! The selection lives in the context of an edit structure. When that
//! structure changes, the detached edges are carried over through their time
//! addresses, and the attached edge simply follows the cursor.

use log::debug;

use crate::address::Address;
use crate::editor::structure::EditStructure;
use crate::error::AddressError;
use crate::spacetime::get_stable_s_over_time;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Zero,
    One,
}

impl Edge {
    pub fn other(self) -> Edge {
        return match self {
            Edge::Zero => Edge::One,
            Edge::One => Edge::Zero,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionEdges {
    /// Which edge moves with the cursor, if any.
    pub attached_to: Option<Edge>,
    pub edge_0: Address,
    pub edge_1: Address,
}

impl SelectionEdges {
    pub fn edge(&self, edge: Edge) -> &Address {
        return match edge {
            Edge::Zero => &self.edge_0,
            Edge::One => &self.edge_1,
        };
    }
}

#[derive(Clone, Debug)]
pub struct Selection {
    pub context: EditStructure,
    pub edges: Option<SelectionEdges>,
}

impl Selection {
    pub fn new(context: EditStructure) -> Selection {
        return Selection { context, edges: None };
    }

    pub fn exists(&self) -> bool {
        return self.edges.is_some();
    }
}

#[derive(Clone, Debug)]
pub enum SelectionNote {
    /// Start a selection at the cursor, or toggle whether the cursor drags an edge.
    AttachDetach,
    /// Move the cursor to the other edge, dragging it from there.
    SwitchToOtherEnd,
    ClearSelection,
    /// The editor's structure was replaced.
    ContextChange(EditStructure),
}

pub fn selection_note_play(note: &SelectionNote, selection: &Selection) -> Result<Selection, AddressError> {
    let context = &selection.context;

    match note {
        SelectionNote::ContextChange(new_context) => {
            let Some(edges) = &selection.edges else {
                return Ok(Selection::new(new_context.clone()));
            };

            let mut carried = Vec::with_capacity(2);
            for edge in [Edge::Zero, Edge::One] {
                if edges.attached_to == Some(edge) {
                    carried.push(Some(new_context.s_cursor.clone()));
                } else {
                    carried.push(get_stable_s_over_time(&context.tree, edges.edge(edge), &new_context.tree)?);
                }
            }

            let mut carried = carried.into_iter();
            let (Some(Some(edge_0)), Some(Some(edge_1))) = (carried.next(), carried.next()) else {
                debug!("selection edge no longer exists; dropping the selection");
                return Ok(Selection::new(new_context.clone()));
            };

            return Ok(Selection {
                context: new_context.clone(),
                edges: Some(SelectionEdges {
                    attached_to: edges.attached_to,
                    edge_0,
                    edge_1,
                }),
            });
        }

        SelectionNote::AttachDetach => {
            let Some(edges) = &selection.edges else {
                // both edges start at the cursor; either can be the attached one
                return Ok(Selection {
                    context: context.clone(),
                    edges: Some(SelectionEdges {
                        attached_to: Some(Edge::Zero),
                        edge_0: context.s_cursor.clone(),
                        edge_1: context.s_cursor.clone(),
                    }),
                });
            };

            if edges.attached_to.is_some() {
                return Ok(Selection {
                    context: context.clone(),
                    edges: Some(SelectionEdges {
                        attached_to: None,
                        ..edges.clone()
                    }),
                });
            }

            // reattaching always jumps to the end of the selection
            let attached_to = if edges.edge_0 > edges.edge_1 { Edge::Zero } else { Edge::One };
            return Ok(Selection {
                context: context.with_s_cursor(edges.edge(attached_to).clone()),
                edges: Some(SelectionEdges {
                    attached_to: Some(attached_to),
                    ..edges.clone()
                }),
            });
        }

        SelectionNote::SwitchToOtherEnd => {
            let Some((edges, attached_to)) = selection.edges.as_ref().and_then(|e| Some((e, e.attached_to?))) else {
                return Ok(selection.clone());
            };
            let attached_to = attached_to.other();
            return Ok(Selection {
                context: context.with_s_cursor(edges.edge(attached_to).clone()),
                edges: Some(SelectionEdges {
                    attached_to: Some(attached_to),
                    ..edges.clone()
                }),
            });
        }

        SelectionNote::ClearSelection => return Ok(Selection::new(context.clone())),
    }
}
