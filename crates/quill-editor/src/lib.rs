//! Editor draft store and session state machine.
//!
//! Holds the single mutable draft of a post and the two orthogonal
//! request cycles (save, generate) it synchronizes with the external
//! gateways. One writer, one in-flight request per operation kind, no
//! cancellation.

pub mod draft;
pub mod session;

pub use draft::Draft;
pub use session::{EditorError, EditorSession, GenerateState, SaveState};
