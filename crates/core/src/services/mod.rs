pub mod analysis_service;
pub mod annotation_service;
pub mod chart_service;
pub mod chat_service;
pub mod forecast_service;
pub mod interpretation_service;
pub mod query_service;
pub mod summary_service;
pub mod trend_chart_service;

mod json_reply;
