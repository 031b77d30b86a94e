//! ragdb-grounding
//!
//! Turns ranked chunks into a constrained-context answer: assemble the
//! context, shape the generation request, call the model, and fold every
//! failure into a well-formed [`GroundedAnswer`](ragdb_core::types::GroundedAnswer).

pub mod context;
pub mod enforcer;
pub mod generator;
pub mod prompt;

pub use context::{assemble, AssembledContext};
pub use enforcer::GroundingEnforcer;
