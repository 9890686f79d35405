//! Pipeline - Mounting component trees.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Root::render → components build nodes → Root::tick → layout effects → post-commit effects
//! ```
//!
//! A [`Root`] ties a component tree to a mount node and an environment. The
//! client flavour renders into a live document; the server flavour renders
//! into a scratch document whose markup is read back with [`Root::to_html`].

pub mod mount;

pub use mount::{mount, unmount, Root};
