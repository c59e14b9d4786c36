//! `cropwise-core`: soil sample domain building blocks.
//!
//! This crate contains **pure domain** logic: the soil sample value object, its
//! parameter metadata, and the agronomic plausibility checks. No IO, no model
//! artifacts.

pub mod error;
pub mod id;
pub mod sample;
pub mod validation;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::RequestId;
pub use sample::{FEATURE_COUNT, SoilParameter, SoilSample};
pub use validation::{ValidationReport, validate};
pub use value_object::ValueObject;
