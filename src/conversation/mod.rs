//! Conversation state and the orchestrator that grows it

mod orchestrator;
mod scratch;
mod session;
mod turn;

pub use orchestrator::{Event, Handled, Orchestrator, Outcome};
pub use scratch::ScratchFile;
pub use session::{AudioDigest, SessionState, SkipReason};
pub use turn::{AudioClip, Conversation, Role, Turn};
