//! Domain models: parsing and validation rules for persisted records.

pub mod milestone;
pub mod stamp_card;
