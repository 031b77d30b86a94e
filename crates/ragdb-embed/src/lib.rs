//! ragdb-embed
//!
//! Similarity backends behind [`ragdb_core::traits::Embedder`]. The lexical
//! scorer is the reference relevance policy; the hashing backend produces
//! dense unit vectors and shows how an embedding model slots in.

pub mod hashing;
pub mod lexical;
pub mod norm;
pub mod tokenize;

pub use hashing::HashingEmbedder;
pub use lexical::{LexicalEmbedder, LexicalVector};
