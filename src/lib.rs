//! Nerf - structural s-expression editing on an append-only log of notes.
//!
//! A document is a `Score`: a hash-linked chain of `Note`s, each one a small
//! edit to a tree of atoms and lists. Playing the score produces the tree.
//! Nothing is ever removed from the log, and every list keeps track of the
//! order in which its children were created, so a node can be found again
//! after the edits that moved it around.
//!
//! # Quick Start
//!
//! ```
//! use nerf::editor::EditNote;
//! use nerf::editor::Editor;
//!
//! let mut editor = Editor::new().unwrap();
//! for (index, text) in ["a", "b"].into_iter().enumerate() {
//!     let note = EditNote::TextInsert { parent: Default::default(), index, text: text.to_string() };
//!     editor.handle_edit_note(&note).unwrap();
//! }
//! assert_eq!(editor.tree().to_string(), "(a b)");
//!
//! // the history is the document
//! assert_eq!(editor.score().len(), 3);
//! ```

pub mod address;
pub mod annotated;
pub mod bubble;
pub mod channel;
pub mod editor;
pub mod error;
pub mod file;
pub mod in_context;
pub mod nerd;
pub mod nerdspace;
pub mod note;
pub mod note_address;
pub mod play;
pub mod pp;
pub mod score;
pub mod selection;
pub mod session;
pub mod sexp;
pub mod spacetime;
pub mod tree;
pub mod vlq;

pub use address::Address;
pub use error::Error;
pub use note::Note;
pub use score::Score;
pub use score::ScoreTable;
pub use session::Session;
pub use tree::SExpr;
