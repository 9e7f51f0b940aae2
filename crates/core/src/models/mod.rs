pub mod analysis;
pub mod chart;
pub mod dataset;
pub mod forecast;
pub mod insights;
pub mod interpretation;
pub mod query;
pub mod record;
pub mod settings;
pub mod variant;
