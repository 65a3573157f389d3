//! Backend payload models and shared configuration.

pub mod accounting;
pub mod config;
pub mod dunning;
pub mod envelope;
pub mod lenient;
pub mod payments;
