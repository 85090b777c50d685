//! # expensa-core
//!
//! Core types, transition tables, and error types for Expensa.
//!
//! This crate provides the foundational types shared across all Expensa crates:
//! - Lifecycle record structs (funding requests, expense reports, reimbursement claims)
//! - Status enums, roles, and the role-keyed transition tables
//! - Attachment, status history, and audit entry entities
//! - Audit detail payloads and the flat field-diff helper
//! - Requester snapshot capture
//! - ID prefix constants
//! - Cross-cutting error types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod snapshot;
pub mod transitions;
