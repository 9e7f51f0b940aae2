//! Small numeric helpers shared by the forecaster and the chart builders.

pub mod ols;
pub mod stats;
