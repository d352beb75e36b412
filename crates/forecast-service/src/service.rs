//! Forecast Service
//!
//! Owns the loaded model and history dataset. Build one at start-up and
//! share it by reference; it holds no per-request state.

use crate::config::{HistoryFormat, ServiceConfig};
use crate::error::ServiceError;
use crate::request::{DailyPrediction, ForecastRequest, ForecastResponse};
use advisor::{Prompt, PromptBuilder};
use earnings_history::{DriverHistory, HistoryRepository};
use feature_engine::{FeatureGenerator, ForecastRow, DATE_FORMAT};
use inference_engine::InferenceEngine;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

pub struct ForecastService {
    engine: InferenceEngine,
    history: HistoryRepository,
    generator: FeatureGenerator,
    prompts: PromptBuilder,
    config: ServiceConfig,
}

impl ForecastService {
    /// Assemble a service from already-loaded parts
    pub fn new(engine: InferenceEngine, history: HistoryRepository, config: ServiceConfig) -> Self {
        match (history.driver_count(), history.record_count()) {
            (Ok(drivers), Ok(records)) => info!(
                "Forecast service ready: model={}, drivers={}, records={}",
                engine.model_name(),
                drivers,
                records
            ),
            (Err(e), _) | (_, Err(e)) => warn!(
                "Forecast service ready: model={}, history unreadable: {}",
                engine.model_name(),
                e
            ),
        }
        Self {
            engine,
            history,
            generator: FeatureGenerator::new(),
            prompts: PromptBuilder::new(config.advisor.platform.clone()),
            config,
        }
    }

    /// Load the model and history named in the configuration
    pub fn from_config(config: ServiceConfig) -> Result<Self, ServiceError> {
        let engine = match &config.model.path {
            Some(path) => InferenceEngine::from_artifact(path)?,
            None => {
                warn!("No model artifact configured, using naive baseline");
                InferenceEngine::naive()
            }
        };

        let history = match &config.history.path {
            Some(path) => match config.history.format {
                HistoryFormat::Records => HistoryRepository::load_json(path)?,
                HistoryFormat::Sessions => HistoryRepository::load_sessions_json(path)?,
            },
            None => {
                warn!("No history dataset configured, every forecast starts from empty history");
                HistoryRepository::new()
            }
        };

        Ok(Self::new(engine, history, config))
    }

    pub fn history(&self) -> &HistoryRepository {
        &self.history
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Feature table for a request, before inference
    pub fn features(&self, request: &ForecastRequest) -> Result<Vec<ForecastRow>, ServiceError> {
        request.check()?;
        let history = self.history.history(&request.driver_id)?;
        if history.is_none() {
            warn!("Unknown driver {}, forecasting from empty history", request.driver_id);
        }
        self.rows(request, history.as_ref())
    }

    /// Feature table for a range with no driver history; `driver_id` is ignored
    pub fn features_without_history(
        &self,
        request: &ForecastRequest,
    ) -> Result<Vec<ForecastRow>, ServiceError> {
        request.check_wellness()?;
        self.rows(request, None)
    }

    fn rows(
        &self,
        request: &ForecastRequest,
        history: Option<&DriverHistory>,
    ) -> Result<Vec<ForecastRow>, ServiceError> {
        let (start, end) = request.date_range(self.config.forecast.max_horizon_days)?;
        let wellness = self.resolve_wellness(request, history);
        let records = history.map(DriverHistory::records).unwrap_or(&[]);

        let rows = self.generator.generate(records, start, end, wellness)?;
        Ok(rows)
    }

    /// Predict daily earnings over the requested range
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, ServiceError> {
        let span = info_span!(
            "forecast",
            request_id = %Uuid::new_v4(),
            driver_id = %request.driver_id
        );
        let _guard = span.enter();
        let started = Instant::now();
        metrics::counter!("forecast_requests_total").increment(1);

        let result = self.run_forecast(request);

        match &result {
            Ok(response) => {
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                metrics::counter!("forecast_rows_generated").increment(response.predictions.len() as u64);
                metrics::histogram!("forecast_latency_ms").record(elapsed_ms);
                info!(
                    "Forecast {}..{} produced {} predictions in {:.2}ms",
                    request.start,
                    request.end,
                    response.predictions.len(),
                    elapsed_ms
                );
            }
            Err(e) => {
                metrics::counter!("forecast_failures_total").increment(1);
                warn!("Forecast failed: {}", e);
            }
        }
        result
    }

    fn run_forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, ServiceError> {
        let rows = self.features(request)?;
        let batch = self.engine.predict_rows(&rows)?;

        let predictions = rows
            .iter()
            .zip(batch.predictions)
            .map(|(row, predicted_earnings)| DailyPrediction {
                date: row.timestamp.format(DATE_FORMAT).to_string(),
                predicted_earnings,
            })
            .collect();

        Ok(ForecastResponse {
            status: "success".to_string(),
            currency: self.config.forecast.currency.clone(),
            driver_id: request.driver_id.clone(),
            model: batch.model,
            predictions,
        })
    }

    /// Route a welfare question to its prompt
    pub fn advise(&self, query: &str) -> Result<Prompt, ServiceError> {
        if query.trim().is_empty() {
            return Err(ServiceError::EmptyQuery);
        }
        let prompt = self.prompts.build(query);
        debug!("Advice prompt built for topic {}", prompt.topic.as_str());
        Ok(prompt)
    }

    /// Request value, else the driver's latest recorded score, else the configured default
    fn resolve_wellness(&self, request: &ForecastRequest, history: Option<&DriverHistory>) -> f64 {
        request
            .wellness_score
            .or_else(|| history.and_then(DriverHistory::latest_wellness))
            .unwrap_or(self.config.forecast.default_wellness_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use earnings_history::HistoricalRecord;

    fn service_with(records: &[(u32, f64, Option<f64>)]) -> ForecastService {
        let repo = HistoryRepository::new();
        for (d, earnings, wellness) in records {
            let day = NaiveDate::from_ymd_opt(2025, 5, *d).unwrap();
            repo.insert("driver_1", HistoricalRecord::new(day, *earnings), *wellness)
                .unwrap();
        }
        ForecastService::new(InferenceEngine::naive(), repo, ServiceConfig::default())
    }

    #[test]
    fn test_wellness_resolution_order() {
        let service = service_with(&[(1, 100.0, Some(70.0))]);

        let rows = service
            .features(&ForecastRequest::new("driver_1", "2025-05-02", "2025-05-02").with_wellness(10.0))
            .unwrap();
        assert_eq!(rows[0].wellness_score, 10.0);

        let rows = service
            .features(&ForecastRequest::new("driver_1", "2025-05-02", "2025-05-02"))
            .unwrap();
        assert_eq!(rows[0].wellness_score, 70.0);

        let rows = service
            .features(&ForecastRequest::new("someone_else", "2025-05-02", "2025-05-02"))
            .unwrap();
        assert_eq!(rows[0].wellness_score, 50.0);
    }

    #[test]
    fn test_unknown_driver_gets_empty_history_rows() {
        let service = service_with(&[]);
        let response = service
            .forecast(&ForecastRequest::new("ghost", "2025-05-13", "2025-05-15"))
            .unwrap();
        assert_eq!(response.predictions.len(), 3);
        assert_eq!(response.model, "naive");
        assert!(response.predictions.iter().all(|p| p.predicted_earnings == 0.0));
    }

    #[test]
    fn test_features_without_history_ignores_driver() {
        let service = service_with(&[(1, 100.0, Some(70.0))]);
        let request = ForecastRequest::new("", "2025-05-02", "2025-05-04");

        let rows = service.features_without_history(&request).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.lag(1).is_none() && r.wellness_score == 50.0));

        let rows = service
            .features_without_history(&request.clone().with_wellness(20.0))
            .unwrap();
        assert_eq!(rows[0].wellness_score, 20.0);

        assert!(matches!(
            service.features_without_history(&request.clone().with_wellness(f64::INFINITY)),
            Err(ServiceError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.features(&request),
            Err(ServiceError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_advise_rejects_blank() {
        let service = service_with(&[]);
        assert!(matches!(service.advise("   "), Err(ServiceError::EmptyQuery)));
        assert!(service.advise("any tips for heavy traffic?").is_ok());
    }
}
