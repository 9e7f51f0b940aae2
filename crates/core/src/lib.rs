pub mod errors;
pub mod logging;
pub mod math;
pub mod models;
pub mod providers;
pub mod services;

use chrono::{Days, NaiveDate, Utc};
use models::{
    chart::{ChartRecommendation, ChartRequest},
    dataset::ChartableDataset,
    forecast::Forecast,
    insights::TrendPrediction,
    interpretation::{LiteratureContext, PatientSummary, VariantSummaryReport},
    query::StructuredQuery,
    record::Timestamped,
    settings::Settings,
    variant::VariantRecord,
};
use providers::{
    gemini::GeminiProvider,
    traits::{GenerationParams, TextGenerator},
};
use services::{
    analysis_service::AnalysisService, annotation_service::AnnotationService,
    chart_service::ChartService, chat_service::ChatService, forecast_service::ForecastService,
    interpretation_service::InterpretationService, query_service::QueryService,
    summary_service::SummaryService, trend_chart_service::TrendChartService,
};
use std::sync::Arc;
use tracing::info;

use errors::CoreError;

/// Generative-AI services sharing one provider.
struct Analyst {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
    analysis: AnalysisService,
    interpretation: InterpretationService,
    query: QueryService,
    annotation: AnnotationService,
}

impl Analyst {
    fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self {
            analysis: AnalysisService::new(generator.clone(), params),
            interpretation: InterpretationService::new(generator.clone(), params),
            query: QueryService::new(generator.clone(), params),
            annotation: AnnotationService::new(generator.clone(), params),
            generator,
            params,
        }
    }
}

/// Main entry point for the variant-insights core library.
///
/// An explicitly constructed, stateless value: build one at startup and
/// hand it to request handlers. Nothing is initialised lazily or globally.
#[must_use]
pub struct VariantInsights {
    settings: Settings,
    forecast_service: ForecastService,
    chart_service: ChartService,
    summary_service: SummaryService,
    trend_chart_service: TrendChartService,
    analyst: Option<Analyst>,
}

impl std::fmt::Debug for VariantInsights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantInsights")
            .field("settings", &self.settings)
            .field("analyst", &self.analyst.as_ref().map(|a| a.generator.name()))
            .finish()
    }
}

impl VariantInsights {
    /// Build from settings. A Gemini analyst is wired in when
    /// `settings.analyst` is present.
    pub fn new(settings: Settings) -> Self {
        let analyst = settings.analyst.as_ref().map(|analyst| {
            Analyst::new(
                Arc::new(GeminiProvider::new(analyst)),
                Self::generation_params(&settings),
            )
        });

        Self {
            forecast_service: ForecastService::new(settings.forecast.clone()),
            chart_service: ChartService::new(settings.charts.clone()),
            summary_service: SummaryService::new(),
            trend_chart_service: TrendChartService::new(),
            analyst,
            settings,
        }
    }

    /// Replace (or add) the AI analyst with any `TextGenerator`.
    pub fn with_analyst(mut self, generator: Box<dyn TextGenerator>) -> Self {
        let params = Self::generation_params(&self.settings);
        self.analyst = Some(Analyst::new(Arc::from(generator), params));
        self
    }

    fn generation_params(settings: &Settings) -> GenerationParams {
        settings
            .analyst
            .as_ref()
            .map(|a| GenerationParams {
                temperature: a.temperature,
                max_output_tokens: a.max_output_tokens,
            })
            .unwrap_or_default()
    }

    fn analyst(&self) -> Result<&Analyst, CoreError> {
        self.analyst
            .as_ref()
            .ok_or_else(|| CoreError::MissingConfig("generative-AI analyst".into()))
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn has_analyst(&self) -> bool {
        self.analyst.is_some()
    }

    // ── Forecasting ─────────────────────────────────────────────────

    /// Forecast daily record counts `horizon_days` ahead.
    pub fn forecast<T: Timestamped>(
        &self,
        records: &[T],
        horizon_days: u32,
    ) -> Result<Forecast, CoreError> {
        self.forecast_service.forecast(records, horizon_days)
    }

    /// Full trend report over the variant history as of `today`.
    ///
    /// 1. Keep records inside the history window `[today - window, today]`
    /// 2. Forecast daily counts (fails on too little history)
    /// 3. Summarise and, when an analyst is configured, ask it for insights
    /// 4. Build the trend and gene charts and a confidence score
    pub async fn predict_variant_trends(
        &self,
        records: &[VariantRecord],
        days_ahead: u32,
        today: NaiveDate,
    ) -> Result<TrendPrediction, CoreError> {
        let forecast_settings = &self.settings.forecast;
        if days_ahead == 0 || days_ahead > forecast_settings.max_horizon_days {
            return Err(CoreError::InvalidHorizon(days_ahead));
        }

        let window_start = u64::try_from(forecast_settings.history_window_days)
            .ok()
            .and_then(|days| today.checked_sub_days(Days::new(days)))
            .unwrap_or(NaiveDate::MIN);
        let history: Vec<VariantRecord> = records
            .iter()
            .filter(|r| r.date >= window_start && r.date <= today)
            .cloned()
            .collect();

        let forecast = self.forecast_service.forecast(&history, days_ahead)?;

        let summary = self.summary_service.summarize(&history, today);
        let analysis = match &self.analyst {
            Some(analyst) => Some(analyst.analysis.analyze(&summary).await),
            None => None,
        };

        let daily = ForecastService::bucket_daily(&history);
        let charts = self
            .trend_chart_service
            .trend_charts(&daily, &forecast, &history);

        info!(
            history = history.len(),
            days_ahead,
            trend = %forecast.trend,
            "variant trend prediction built"
        );

        Ok(TrendPrediction {
            id: uuid::Uuid::new_v4(),
            created_at: Utc::now(),
            horizon_days: days_ahead,
            confidence_score: SummaryService::confidence_score(history.len()),
            total_variants_analyzed: history.len(),
            forecast,
            analysis,
            charts,
        })
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Recommend and build charts; `requested` is "auto" or a chart type.
    #[must_use]
    pub fn recommend_charts(
        &self,
        dataset: &ChartableDataset,
        requested: &str,
    ) -> ChartRecommendation {
        self.chart_service.recommend_charts(dataset, requested)
    }

    /// Parse a JSON request body and recommend charts for it.
    pub fn recommend_charts_from_json(
        &self,
        data: serde_json::Value,
        requested: &str,
    ) -> Result<ChartRecommendation, CoreError> {
        let dataset = ChartableDataset::from_json(data)?;
        Ok(self.recommend_charts(&dataset, requested))
    }

    /// Impact/gene/chromosome statistics charted in auto mode.
    #[must_use]
    pub fn variant_statistics(&self, records: &[VariantRecord]) -> ChartRecommendation {
        let dataset = self.summary_service.variant_statistics_dataset(records);
        self.chart_service.recommend(&dataset, ChartRequest::Auto)
    }

    // ── Variant interpretation ──────────────────────────────────────
    //
    // These need an analyst; without one they fail with `MissingConfig`.

    /// Structured clinical interpretation of one variant.
    pub async fn interpret_variant(
        &self,
        variant: &VariantRecord,
    ) -> Result<VariantSummaryReport, CoreError> {
        self.analyst()?.interpretation.summarize_variant(variant).await
    }

    pub async fn explain_clinical_significance(
        &self,
        variant: &VariantRecord,
    ) -> Result<String, CoreError> {
        self.analyst()?
            .interpretation
            .explain_clinical_significance(variant)
            .await
    }

    pub async fn patient_summary(&self, variant: &VariantRecord) -> Result<PatientSummary, CoreError> {
        self.analyst()?.interpretation.patient_summary(variant).await
    }

    pub async fn literature_context(
        &self,
        variant: &VariantRecord,
    ) -> Result<LiteratureContext, CoreError> {
        self.analyst()?.annotation.literature_context(variant).await
    }

    pub async fn pathway_analysis(&self, variant: &VariantRecord) -> Result<String, CoreError> {
        self.analyst()?.annotation.pathway_analysis(variant).await
    }

    // ── Natural-language search ─────────────────────────────────────

    /// Translate a free-text search into filters over `available_fields`.
    pub async fn parse_query(
        &self,
        query: &str,
        available_fields: &[&str],
    ) -> Result<StructuredQuery, CoreError> {
        Ok(self.analyst()?.query.parse_query(query, available_fields).await)
    }

    pub async fn suggest_queries(
        &self,
        partial: &str,
        context: &serde_json::Value,
    ) -> Result<Vec<String>, CoreError> {
        Ok(self.analyst()?.query.suggest_queries(partial, context).await)
    }

    /// Start a fresh conversation with the variant assistant.
    pub fn chat_session(&self) -> Result<ChatService, CoreError> {
        let analyst = self.analyst()?;
        Ok(ChatService::new(analyst.generator.clone(), analyst.params))
    }
}

impl Default for VariantInsights {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
