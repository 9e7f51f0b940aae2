use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::math::ols::fit_line;
use crate::math::stats::{mean, sample_std_dev};
use crate::models::forecast::{DailyCount, Forecast, Trend};
use crate::models::record::Timestamped;
use crate::models::settings::ForecastSettings;

/// Forecasts daily record counts with a single-variable linear model.
///
/// Stateless apart from its settings: every call is a pure function of its
/// inputs, so one instance can be shared across request handlers.
#[derive(Debug, Clone, Default)]
pub struct ForecastService {
    settings: ForecastSettings,
}

impl ForecastService {
    pub fn new(settings: ForecastSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Count records per calendar day over `[first day, last day]`.
    ///
    /// Days with no records are present with a count of zero. The result is
    /// sorted by date and empty only when `records` is empty.
    pub fn bucket_daily<T: Timestamped>(records: &[T]) -> Vec<DailyCount> {
        let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for record in records {
            *per_day.entry(record.calendar_day()).or_insert(0) += 1;
        }

        let (Some(&first), Some(&last)) = (per_day.keys().next(), per_day.keys().next_back())
        else {
            return Vec::new();
        };

        let mut daily = Vec::new();
        let mut current = first;
        while current <= last {
            daily.push(DailyCount {
                date: current,
                count: per_day.get(&current).copied().unwrap_or(0),
            });
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        daily
    }

    /// Label a fitted slope using the fixed absolute threshold.
    pub fn classify_slope(&self, slope: f64) -> Trend {
        if slope > self.settings.slope_threshold {
            Trend::Increasing
        } else if slope < -self.settings.slope_threshold {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    /// Predict the next `horizon_days` daily counts.
    ///
    /// 1. Bucket by day, filling gaps with zero
    /// 2. Fit count ~ day index (0-based from the first day)
    /// 3. Label the slope (> threshold increasing, < -threshold decreasing)
    /// 4. Extrapolate from the day after the last historical day, clamped at 0
    /// 5. Interval: prediction ± historical sample std, low end clamped at 0
    ///
    /// Fails with `InsufficientData` below `min_distinct_days` distinct days.
    pub fn forecast<T: Timestamped>(
        &self,
        records: &[T],
        horizon_days: u32,
    ) -> Result<Forecast, CoreError> {
        if horizon_days == 0 {
            return Err(CoreError::InvalidHorizon(horizon_days));
        }

        let daily = Self::bucket_daily(records);
        let distinct_days = daily.iter().filter(|d| d.count > 0).count();
        let required = self.settings.min_distinct_days.max(1);
        if distinct_days < required {
            return Err(CoreError::InsufficientData {
                required,
                found: distinct_days,
            });
        }

        let counts: Vec<f64> = daily.iter().map(|d| d.count as f64).collect();
        // Non-empty: at least one distinct day passed the check above.
        let last_date = daily[daily.len() - 1].date;
        let future_dates = future_dates(last_date, horizon_days)?;

        debug!(
            records = records.len(),
            days = daily.len(),
            distinct_days,
            horizon_days,
            "fitting daily count trend"
        );

        let x: Vec<f64> = (0..counts.len()).map(|i| i as f64).collect();
        let Some(fit) = fit_line(&x, &counts) else {
            return Ok(self.single_day_forecast(&counts, future_dates));
        };

        let start = counts.len() as f64;
        let predicted_counts: Vec<f64> = (0..horizon_days)
            .map(|i| fit.predict(start + f64::from(i)).max(0.0))
            .collect();

        let historical_std = sample_std_dev(&counts);
        let confidence_interval = predicted_counts
            .iter()
            .map(|p| [(p - historical_std).max(0.0), p + historical_std])
            .collect();

        let trend = self.classify_slope(fit.slope);
        info!(%trend, slope = fit.slope, horizon_days, "trend forecast computed");

        Ok(Forecast {
            predicted_counts,
            future_dates,
            trend,
            confidence_interval,
            slope: fit.slope,
            historical_std,
        })
    }

    /// All history on one day: no slope to fit, repeat the mean with a
    /// relative band.
    fn single_day_forecast(&self, counts: &[f64], future_dates: Vec<NaiveDate>) -> Forecast {
        let avg = mean(counts);
        let band = self.settings.single_day_band;
        let horizon = future_dates.len();
        debug!(avg, horizon, "single-day history, repeating mean");

        Forecast {
            predicted_counts: vec![avg; horizon],
            future_dates,
            trend: Trend::Stable,
            confidence_interval: vec![[(avg * (1.0 - band)).max(0.0), avg * (1.0 + band)]; horizon],
            slope: 0.0,
            historical_std: 0.0,
        }
    }
}

fn future_dates(last: NaiveDate, horizon_days: u32) -> Result<Vec<NaiveDate>, CoreError> {
    (1..=u64::from(horizon_days))
        .map(|offset| {
            last.checked_add_days(Days::new(offset)).ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "Forecast horizon of {horizon_days} days runs past the supported calendar"
                ))
            })
        })
        .collect()
}
