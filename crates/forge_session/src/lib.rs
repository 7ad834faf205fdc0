//! `forge_session` — client-side session runtime.
//!
//! Owns the shared game state, dispatches player intents into the engine,
//! drives the continuous accrual loop from a monotonic clock, persists the
//! lean snapshot locally on a fixed cadence, and talks to the remote store.
//! The UI collaborator only ever sees read accessors and intent dispatch —
//! never a mutable reference to state.

pub mod autoplay;
pub mod local;
pub mod remote;
pub mod runtime;
mod state;

pub use autoplay::{CommandSource, GreedyPilot};
pub use local::LocalStore;
pub use remote::{RemoteClient, RemoteError, RequestOutcome};
pub use runtime::{run_accrual_loop, run_autosave_loop, unix_ms};
pub use state::{bootstrap, new_shared, SessionState, SharedSession};
