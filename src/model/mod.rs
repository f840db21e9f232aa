pub mod types;
pub mod transcript;
pub mod gene;

pub use types::{ExonSlot, NodeId, Pseudoexon, PseudoexonId};
