//! Memory: find the pairs among face-down cards.

mod card;
mod engine;

pub use card::{Card, ICON_POOL};
pub use engine::{FlipError, FlipOutcome, MemoryEngine, MemoryPhase, ScoredMoves};
