//! Calculation modules for the closing-shift sheet.
//!
//! This module provides the arithmetic behind the sheet's computed fields,
//! kept free of any form or network concerns.

pub mod common;
pub mod metrics;

pub use metrics::{DerivedMetrics, MetricInputs};
