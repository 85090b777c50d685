//! Workflow operations for every Expensa entity.
//!
//! Each module adds methods to `ExpensaService` via `impl ExpensaService` blocks.

pub mod attachment;
pub mod audit;
pub mod history;
pub mod lifecycle;
pub mod transition;
