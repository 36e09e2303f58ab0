pub mod controller;
pub mod state;

pub use controller::{ChatController, SendOutcome, SpawnOutcome, CONNECTION_LOST};
pub use state::SessionState;
