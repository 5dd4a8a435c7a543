//! Trait seams implemented by infrastructure crates.

pub mod records;

pub use records::SessionRecords;
