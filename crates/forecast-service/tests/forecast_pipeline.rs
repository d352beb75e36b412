//! End-to-end forecasts through `ForecastService`

use forecast_service::{
    ForecastRequest, ForecastService, HistoryFormat, ServiceConfig, ServiceError,
};
use earnings_history::HistoryRepository;
use feature_engine::FEATURE_COLUMNS;
use inference_engine::{InferenceEngine, LinearModel};
use std::path::PathBuf;

const HISTORY: &str = r#"[
    {"driver_id": "driver_1", "day": "2025-05-01", "total_earnings": 100, "wellness_score": 60},
    {"driver_id": "driver_1", "day": "2025-05-03", "total_earnings": 200},
    {"driver_id": "driver_2", "day": "2025-05-01", "total_earnings": 10},
    {"driver_id": "driver_2", "day": "2025-05-02", "total_earnings": 20},
    {"driver_id": "driver_2", "day": "2025-05-03", "total_earnings": 30},
    {"driver_id": "driver_2", "day": "2025-05-04", "total_earnings": 40},
    {"driver_id": "driver_2", "day": "2025-05-05", "total_earnings": 50},
    {"driver_id": "driver_2", "day": "2025-05-06", "total_earnings": 60},
    {"driver_id": "driver_2", "day": "2025-05-07", "total_earnings": 70}
]"#;

/// prediction = 1000 + 2 * lag_1 + 1 * rolling_mean_7 + 10 * wellness_score
fn linear_artifact() -> String {
    let mut coefficients = vec![0.0; FEATURE_COLUMNS.len()];
    coefficients[2] = 10.0;
    coefficients[3] = 1.0;
    coefficients[6] = 2.0;
    serde_json::json!({
        "name": "linear-test",
        "feature_names": FEATURE_COLUMNS,
        "coefficients": coefficients,
        "intercept": 1000.0
    })
    .to_string()
}

fn service() -> ForecastService {
    let history = HistoryRepository::from_json_str(HISTORY).unwrap();
    let model = LinearModel::from_json_str(&linear_artifact()).unwrap();
    let engine = InferenceEngine::new(Box::new(model)).unwrap();
    ForecastService::new(engine, history, ServiceConfig::default())
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn forecast_covers_every_requested_day_in_order() {
    let response = service()
        .forecast(&ForecastRequest::new("driver_1", "2025-05-13", "2025-05-20"))
        .unwrap();

    assert_eq!(response.status, "success");
    assert_eq!(response.currency, "IDR");
    assert_eq!(response.model, "linear-test");
    let dates: Vec<&str> = response.predictions.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(
        dates,
        vec![
            "2025-05-13", "2025-05-14", "2025-05-15", "2025-05-16", "2025-05-17", "2025-05-18",
            "2025-05-19", "2025-05-20"
        ]
    );
}

#[test]
fn forecast_uses_lags_and_recorded_wellness() {
    let response = service()
        .forecast(&ForecastRequest::new("driver_1", "2025-05-02", "2025-05-05"))
        .unwrap();

    // lag_1 is 100 on the 2nd and 3rd, 200 afterwards; wellness 60 from history;
    // two records is too few for rolling_mean_7, filled with 0
    let values: Vec<f64> = response.predictions.iter().map(|p| p.predicted_earnings).collect();
    assert_eq!(values, vec![1800.0, 1800.0, 2000.0, 2000.0]);
}

#[test]
fn forecast_uses_rolling_mean_once_seven_days_exist() {
    let response = service()
        .forecast(&ForecastRequest::new("driver_2", "2025-05-08", "2025-05-08").with_wellness(0.0))
        .unwrap();

    // lag_1 = 70, rolling_mean_7 = 40
    assert_eq!(response.predictions[0].predicted_earnings, 1000.0 + 140.0 + 40.0);
}

#[test]
fn unknown_driver_degrades_to_defaults() {
    let response = service()
        .forecast(&ForecastRequest::new("driver_9", "2025-05-13", "2025-05-15"))
        .unwrap();

    assert_eq!(response.predictions.len(), 3);
    // only the default wellness score of 50 contributes
    assert!(response
        .predictions
        .iter()
        .all(|p| p.predicted_earnings == 1500.0));
}

#[test]
fn features_preserve_column_names() {
    let rows = service()
        .features(&ForecastRequest::new("driver_1", "2025-05-05", "2025-05-05"))
        .unwrap();
    let json = serde_json::to_value(&rows).unwrap();
    let row = &json[0];

    assert_eq!(row["timestamp"], "2025-05-05");
    assert_eq!(row["lag_1"], 200.0);
    assert_eq!(row["lag_2"], 200.0);
    assert_eq!(row["lag_4"], 100.0);
    assert!(row["lag_5"].is_null());
    assert!(row["rolling_mean_7"].is_null());
    assert!(row["earnings"].is_null());
}

#[test]
fn invalid_requests_fail_before_any_rows() {
    let service = service();

    let err = service
        .forecast(&ForecastRequest::new("driver_1", "2025-05-20", "2025-05-13"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRange(_)));
    assert_eq!(err.status_code(), 400);

    let err = service
        .forecast(&ForecastRequest::new("driver_1", "13/05/2025", "2025-05-20"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRange(_)));

    let err = service
        .forecast(&ForecastRequest::new("driver_1", "2025-01-01", "2027-01-01"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRange(_)));

    let err = service
        .forecast(&ForecastRequest::new("", "2025-05-13", "2025-05-20"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRequest(_)));
}

#[test]
fn repeated_forecasts_are_identical() {
    let service = service();
    let request = ForecastRequest::new("driver_2", "2025-05-08", "2025-05-30");
    let first = service.forecast(&request).unwrap();
    let second = service.forecast(&request).unwrap();
    assert_eq!(first.predictions, second.predictions);
}

#[test]
fn service_loads_everything_from_config_files() {
    let history = temp_file("history.json", HISTORY);
    let model = temp_file("model.json", &linear_artifact());

    let mut config = ServiceConfig::default();
    config.history.path = Some(history.clone());
    config.model.path = Some(model.clone());
    config.forecast.currency = "USD".to_string();

    let service = ForecastService::from_config(config).unwrap();
    std::fs::remove_file(history).ok();
    std::fs::remove_file(model).ok();

    assert_eq!(service.history().driver_ids().unwrap(), vec!["driver_1", "driver_2"]);
    let response = service
        .forecast(&ForecastRequest::new("driver_1", "2025-05-04", "2025-05-04"))
        .unwrap();
    assert_eq!(response.currency, "USD");
    assert_eq!(response.model, "linear-test");
}

#[test]
fn service_loads_session_datasets() {
    let sessions = temp_file(
        "sessions.json",
        r#"[
            {"driver_id": "driver_1", "timestamp": "2025-05-01 08:00:00", "earnings": 40},
            {"driver_id": "driver_1", "timestamp": "2025-05-01 17:00:00", "earnings": 60, "wellness_score": 30}
        ]"#,
    );

    let mut config = ServiceConfig::default();
    config.history.path = Some(sessions.clone());
    config.history.format = HistoryFormat::Sessions;

    let service = ForecastService::from_config(config).unwrap();
    std::fs::remove_file(sessions).ok();

    let rows = service
        .features(&ForecastRequest::new("driver_1", "2025-05-02", "2025-05-02"))
        .unwrap();
    assert_eq!(rows[0].lag(1), Some(100.0));
    assert_eq!(rows[0].wellness_score, 30.0);
}

#[test]
fn missing_model_artifact_is_a_startup_error() {
    let mut config = ServiceConfig::default();
    config.model.path = Some(std::env::temp_dir().join("no-such-model.json"));
    assert!(matches!(
        ForecastService::from_config(config),
        Err(ServiceError::Inference(_))
    ));
}

#[test]
fn malformed_history_dataset_is_a_startup_error() {
    let history = temp_file(
        "bad-history.json",
        r#"[{"driver_id": "d", "day": "2025-05-01", "total_earnings": "n/a"}]"#,
    );
    let mut config = ServiceConfig::default();
    config.history.path = Some(history.clone());

    let result = ForecastService::from_config(config);
    std::fs::remove_file(history).ok();
    assert!(matches!(result, Err(ServiceError::History(_))));
}

#[test]
fn advice_prompts_route_by_topic() {
    let prompt = service().advise("so sleepy after the night shift").unwrap();
    assert_eq!(prompt.topic, advisor::AdviceTopic::Fatigue);
    assert!(prompt.text.contains("Question: so sleepy after the night shift"));
}
