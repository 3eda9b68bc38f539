pub mod orchestrator;
pub mod state;

pub use orchestrator::Studio;
pub use state::StudioState;
