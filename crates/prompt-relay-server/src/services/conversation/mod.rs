//! In-memory conversation state.
//!
//! Every conversation identifier maps to an ordered message log guarded by
//! its own async mutex, so calls sharing an identifier serialize for the
//! whole read-append-call-append region while distinct identifiers never
//! contend.

mod store;

pub use store::{ConversationLog, ConversationStore, SharedLog};
