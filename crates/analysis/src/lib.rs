//! Query intent analysis
//!
//! Features:
//! - Lexicon-driven entity extraction (people, roles, services, sectors,
//!   locations, organizations, regulatory terms)
//! - Intent classification by priority cascade
//! - Optional LLM augmentation with heuristic fallback
//! - Post-type priority recommendation from intent and entities
//! - Per-intent reranking instruction templates

pub mod ai;
pub mod instructions;
pub mod intent;
pub mod lexicons;
pub mod post_types;

pub use instructions::intent_instructions;
pub use intent::QueryAnalyzer;
pub use lexicons::Lexicons;
pub use post_types::{effective_priority, recommended_post_types};
