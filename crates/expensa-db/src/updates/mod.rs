//! Update builder types for entity mutations.
//!
//! Each builder produces a patch struct with `Option` fields. Only `Some`
//! fields are serialized, so the serialized patch is exactly the set of keys
//! to merge into the stored document.

pub mod attachment;
