//! Tests for the dashboard, advisory and season endpoints

mod common;

use axum::http::StatusCode;
use crop_advisory_backend::create_app;
use serde_json::{json, Value};
use shared::{FeatureSchema, YieldEstimator};

use common::{get, post_json, state, CURRENT_YEAR};

fn demo_app() -> axum::Router {
    create_app(state(
        YieldEstimator::demo(),
        YieldEstimator::unavailable(FeatureSchema::field_service_v1()),
    ))
}

// =============================================================================
// Dashboard pipeline
// =============================================================================

mod dashboard {
    use super::*;

    #[tokio::test]
    async fn defaults_fill_missing_inputs() {
        let (status, body) = post_json(demo_app(), "/api/v1/dashboard", json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["farmer_name"], "Tamlin");
        assert_eq!(body["crop_type"], "Wheat");
        assert_eq!(body["predicted_yield"], 12.9);
        assert_eq!(body["estimate"]["status"], "ok");
        assert_eq!(body["estimate"]["message"], Value::Null);
    }

    #[tokio::test]
    async fn charts_cover_sweep_nutrients_and_history() {
        let (_, body) = post_json(
            demo_app(),
            "/api/v1/dashboard",
            json!({"farmer_name": "Amara", "crop_type": "Maize", "input": {"nitrogen": 120}}),
        )
        .await;

        let curve = body["charts"]["yield_vs_rainfall"].as_array().unwrap();
        assert_eq!(curve.len(), 20);
        assert_eq!(curve[0]["rainfall"], 0.0);
        assert_eq!(curve[19]["rainfall"], 500.0);

        let nutrients = body["charts"]["nutrients"].as_array().unwrap();
        assert_eq!(nutrients[0]["current"], 120.0);
        assert_eq!(nutrients[0]["recommended"], 100.0);

        let history = body["charts"]["yield_history"].as_array().unwrap();
        let labels: Vec<&str> = history.iter().map(|b| b["label"].as_str().unwrap()).collect();
        assert_eq!(
            labels,
            vec!["2019", "2020", "2021", "2022", "2023", "2024 (Predicted)"]
        );
        assert_eq!(history[5]["yield"], body["estimate"]["value"]);
    }

    #[tokio::test]
    async fn unloaded_model_degrades_to_zero() {
        let unloaded = post_json(common::unloaded_app(), "/api/v1/dashboard", json!({})).await.1;
        let demo = post_json(demo_app(), "/api/v1/dashboard", json!({})).await.1;

        assert_eq!(unloaded["estimate"]["value"], 0.0);
        assert_eq!(unloaded["estimate"]["status"], "model_unavailable");
        assert_eq!(unloaded["estimate"]["message"], "Model not loaded.");
        assert!(unloaded["charts"]["yield_vs_rainfall"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["yield"] == 0.0));

        // Advisories never depend on the estimator
        assert_eq!(unloaded["advisories"], demo["advisories"]);
        assert_eq!(unloaded["advisory_lines"], demo["advisory_lines"]);
    }

    #[tokio::test]
    async fn invalid_input_is_a_validation_error() {
        let (status, body) = post_json(
            demo_app(),
            "/api/v1/dashboard",
            json!({"input": {"ndvi": 1.5}}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "ndvi");
    }
}

// =============================================================================
// Advisories
// =============================================================================

mod advisories {
    use super::*;

    #[tokio::test]
    async fn depleted_acidic_soil() {
        let (status, body) = post_json(
            demo_app(),
            "/api/v1/advisories",
            json!({"nitrogen": 10, "phosphorus": 10, "potassium": 10, "soil_ph": 4.0,
                   "ndvi": 0.3, "humidity_pct": 85, "rainfall_mm": 50}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["advisories"]["fertilizer"],
            json!(["add_urea", "add_dap", "add_mop", "apply_lime"])
        );
        assert_eq!(body["advisories"]["pest_alert"], "high_fungal_risk");
        assert_eq!(body["advisories"]["irrigation"], "needed");
        assert_eq!(body["lines"]["fertilizer"][0]["severity"], "critical");
        assert_eq!(
            body["lines"]["fertilizer"][0]["message"],
            "🔴 Add Urea (Nitrogen) – 100 kg/ha"
        );
    }

    #[tokio::test]
    async fn sufficient_soil_gets_sentinel() {
        let (_, body) = post_json(
            demo_app(),
            "/api/v1/advisories",
            json!({"nitrogen": 80, "phosphorus": 40, "potassium": 40, "soil_ph": 6.5}),
        )
        .await;

        assert_eq!(
            body["advisories"]["fertilizer"],
            json!(["nutrients_sufficient"])
        );
        assert_eq!(body["lines"]["fertilizer"][0]["severity"], "ok");
    }
}

// =============================================================================
// Season history
// =============================================================================

mod seasons {
    use super::*;

    #[tokio::test]
    async fn lists_history_with_current_season() {
        let (status, body) = post_json(demo_app(), "/api/v1/seasons", json!({})).await;

        assert_eq!(status, StatusCode::OK);
        let years: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(years, vec!["2019", "2022", "2023", "2024"]);
        let current = body["2024"]["yield"].as_f64().unwrap();
        assert!((current - 12.9).abs() < 1e-9);
        assert_eq!(body["2022"]["rainfall"], 1200.0);
    }

    #[tokio::test]
    async fn history_is_not_changed_by_requests() {
        let app = demo_app();
        let first = post_json(app.clone(), "/api/v1/seasons", json!({"nitrogen": 10})).await.1;
        let second = post_json(app, "/api/v1/seasons", json!({"nitrogen": 190})).await.1;

        for year in ["2019", "2022", "2023"] {
            assert_eq!(first[year], second[year]);
        }
        assert_ne!(first["2024"], second["2024"]);
    }

    #[tokio::test]
    async fn single_year_detail() {
        let (status, body) = post_json(demo_app(), "/api/v1/seasons/2019", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ndvi"], 0.65);

        let uri = format!("/api/v1/seasons/{}", CURRENT_YEAR);
        let (_, current) = post_json(demo_app(), &uri, json!({"ndvi": 0.9})).await;
        assert_eq!(current["ndvi"], 0.9);
    }

    #[tokio::test]
    async fn unknown_year_is_not_found() {
        let (status, body) = post_json(demo_app(), "/api/v1/seasons/2020", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_estimators() {
    let (status, body) = get(demo_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dashboard_estimator"]["kind"], "demo_formula");
    assert_eq!(body["dashboard_estimator"]["loaded"], true);
    assert_eq!(body["service_estimator"]["loaded"], false);
    assert_eq!(body["service_estimator"]["schema"], "field_service_v1");
    assert_eq!(body["mood_classifier"], "keyword");
}
