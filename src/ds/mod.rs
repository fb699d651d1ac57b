pub mod generation;

pub use generation::{DEFAULT_MAX_GENERATION, Generation, GenerationState};
