//! Conversation state
//!
//! Turn history bounded by a sliding window, and the process-wide session
//! store that owns it.
//!
//! # Example
//!
//! ```rust,ignore
//! use dialogos_core::conversation::SessionStore;
//!
//! let store = SessionStore::new(20);
//! let id = store.resolve_or_create(None);
//! store.append(&id, "Hello!", "Hi there. What do you need?");
//! assert_eq!(store.history(&id).len(), 2);
//! ```

mod history;
mod store;

pub use history::{MessageHistory, Turn};
pub use store::SessionStore;
