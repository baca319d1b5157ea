// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod report;

pub use crate::core::engine::DiagnosisModel;
pub use crate::core::normalize::normalize;
pub use crate::core::types::{Diagnosis, INSUFFICIENT_INFORMATION, NO_LIKELY_DISEASE, NO_PRECAUTIONS};
pub use crate::error::{CatalogError, ReportError};
