//! Community implementability moderation
//!
//! The engine turns confirm, dispute and retract votes into counter updates
//! and status transitions, and lets owners lock a paper's status.
//!
//! # Example
//!
//! ```ignore
//! use p2c_core::moderation::ModerationEngine;
//! use p2c_core::store::MemoryStore;
//! use p2c_core::vote::VoteAction;
//!
//! let engine = ModerationEngine::new(MemoryStore::new(), Default::default());
//! let paper = engine.register_paper("Some Paper", "https://arxiv.org/abs/0000.00000")?;
//! let outcome = engine.apply_vote(&paper.id, &user, VoteAction::Confirm)?;
//! ```

mod audit;
mod engine;
pub mod rules;

pub use audit::{AuditReport, Tally};
pub use engine::{ModerationEngine, VoteOutcome};
pub use rules::{recompute_status, Rule, RuleContext, Transition, RULES};
