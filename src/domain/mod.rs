//! Domain aggregates exposed by the finance service layer.

pub mod accounting;
pub mod analytics;
pub mod dunning;
pub mod payments;
pub mod settings;
pub mod types;
