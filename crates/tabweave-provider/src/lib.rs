mod error;
mod event;
mod simulated;
mod traits;

pub use error::{Error, Result};
pub use event::ProviderEvent;
pub use simulated::SimulatedProvider;
pub use traits::{GroupUpdate, ProviderGroup, ProviderTab, TabProvider};
