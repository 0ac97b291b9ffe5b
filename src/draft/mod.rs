//! Staged edit transactions.
//!
//! A draft is a plain, independently-owned copy of an entity's editable
//! fields. Views mutate the draft freely; nothing touches the live
//! store until the draft is handed to the owning manager's `commit`.
//! Discarding a draft is just dropping it. Creation and modification
//! share the same commit path: a draft without a target id creates a
//! new entity.

pub mod item;
pub mod location;

pub use item::ItemDraft;
pub use location::LocationDraft;
