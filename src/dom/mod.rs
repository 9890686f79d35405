//! Document Model - The live tree portals mount into.
//!
//! A small in-memory stand-in for a browser document:
//! - [`Document`] owns an arena of nodes and exposes `<body>`
//! - [`Node`] is a cheap handle with DOM-style tree operations
//! - [`NodeRef`] is a reactive slot pointing at a node
//!
//! Several documents can coexist (frames), and every node remembers which
//! document created it. Inserting a node into a different document is
//! refused with [`DomError::WrongDocument`].

mod document;
mod error;
mod node;
mod node_ref;
mod serialize;

pub use document::Document;
pub use error::DomError;
pub use node::Node;
pub use node_ref::NodeRef;
