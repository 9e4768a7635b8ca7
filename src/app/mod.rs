//! App layer - central state management and command processing
//!
//! The App actor receives UI events and network responses,
//! updates state, and emits network commands and render state.

pub mod actor;
pub mod auth;
pub mod forms;
pub mod policies;
pub mod router;
pub mod state;
pub mod travel;
pub mod vehicle;

pub use actor::AppActor;
pub use router::View;
pub use state::AppState;
