// Engine module - core group-visibility and session-state logic.
// This layer sits between the provider/store boundaries and the runtime's
// command dispatch: every operation re-derives a fresh snapshot before
// acting and issues provider commands to converge on the requested state.

pub mod cluster;
pub mod duplicates;
pub mod focus;
pub mod sessions;
pub mod snapshot;
pub mod state;
pub mod suspend;
pub mod urls;

mod error;

pub use error::{Error, Result};
pub use snapshot::{Snapshot, build_snapshot};
pub use state::{EngineState, SuspensionRecord};
