pub mod engine;
pub mod voice;

pub use engine::{AudioEngine, SharedState};
pub use voice::Voice;
