// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: real TCP server, real HTTP client, mocked provider.

use std::net::SocketAddr;
use std::process::Command;
use std::sync::Arc;
use std::time::{Duration, Instant};

use secrecy::SecretString;
use triage_config::{EngineConfig, HuggingFaceConfig, LiveSettings};
use triage_core::ClassificationStrategy;
use triage_engine::Orchestrator;
use triage_gateway::{build_router, AppState};
use triage_huggingface::HuggingFaceClassifier;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve the full router on an ephemeral port.
async fn spawn_service(orchestrator: Orchestrator) -> SocketAddr {
    let app = build_router(AppState::new(Arc::new(orchestrator)), None);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn hf_orchestrator(base_url: &str, timeout_ms: u64) -> Orchestrator {
    let hf = HuggingFaceConfig {
        base_url: base_url.to_string(),
        model: "acme/sentiment".to_string(),
        ..HuggingFaceConfig::default()
    };
    let strategy = HuggingFaceClassifier::with_token(&SecretString::from("hf_e2e".to_string()), &hf)
        .unwrap();
    let live = LiveSettings::new(EngineConfig {
        use_ai_model: true,
        confidence_threshold: 70.0,
        ai_timeout_ms: timeout_ms,
    });
    Orchestrator::new(Some(Arc::new(strategy) as Arc<dyn ClassificationStrategy>), live)
}

async fn classify(addr: SocketAddr, text: &str) -> (u16, serde_json::Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/classify"))
        .json(&serde_json::json!({ "text": text }))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn ai_path_end_to_end() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([[{"label": "NEGATIVE", "score": 0.99}]])),
        )
        .mount(&provider)
        .await;

    let addr = spawn_service(hf_orchestrator(&provider.uri(), 3000)).await;
    let (status, json) = classify(addr, "The app keeps crashing").await;
    assert_eq!(status, 200);
    assert_eq!(json["label"], "complaint");
    assert_eq!(json["method"], "ai");
    assert_eq!(json["escalate"], false);
}

#[tokio::test]
async fn provider_outage_falls_back_to_rules() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(
            serde_json::json!({"error": "Model is currently loading", "estimated_time": 20.0}),
        ))
        .mount(&provider)
        .await;

    let addr = spawn_service(hf_orchestrator(&provider.uri(), 3000)).await;
    let (status, json) = classify(addr, "How do I reset my password?").await;
    assert_eq!(status, 200);
    assert_eq!(json["label"], "question");
    assert_eq!(json["method"], "rules");
    assert!(json["confidence"].as_f64().unwrap() >= 70.0);
}

#[tokio::test]
async fn slow_provider_is_cut_off_by_timeout() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([[{"label": "POSITIVE", "score": 0.99}]]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&provider)
        .await;

    let addr = spawn_service(hf_orchestrator(&provider.uri(), 300)).await;
    let started = Instant::now();
    let (_, json) = classify(addr, "This product is broken!").await;
    assert!(started.elapsed() < Duration::from_secs(3), "took {:?}", started.elapsed());
    assert_eq!(json["method"], "rules");
    assert_eq!(json["label"], "complaint");
}

#[tokio::test]
async fn empty_text_is_rejected_over_http() {
    let addr = spawn_service(Orchestrator::rules_only(LiveSettings::default())).await;
    let (status, json) = classify(addr, "  ").await;
    assert_eq!(status, 422);
    assert!(json["error"].as_str().is_some());
}

#[test]
fn classify_subcommand_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_triage"))
        .args(["classify", "This product is broken!", "--json"])
        .current_dir(dir.path())
        .env("TRIAGE_ENGINE_USE_AI_MODEL", "false")
        .env_remove("HF_API_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["label"], "complaint");
    assert_eq!(json["method"], "rules");
}

#[test]
fn invalid_config_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[engine]\nconfidence_threshold = 150\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_triage"))
        .arg("check-config")
        .arg("--config")
        .arg(&path)
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("confidence_threshold"));
}

#[test]
fn empty_classify_text_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_triage"))
        .args(["classify", "   "])
        .current_dir(dir.path())
        .env("TRIAGE_ENGINE_USE_AI_MODEL", "false")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("text must not be empty"));
}

#[test]
fn evaluate_subcommand_reports_sample_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/sample_dataset.json");
    let output = Command::new(env!("CARGO_BIN_EXE_triage"))
        .args(["evaluate", dataset, "--json"])
        .current_dir(dir.path())
        .env("TRIAGE_ENGINE_USE_AI_MODEL", "false")
        .env_remove("HF_API_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total"], 12);
    assert_eq!(json["methods"]["rules"], 12);
    assert_eq!(json["methods"]["ai"], 0);
    assert_eq!(json["target_accuracy"], 70.0);
    let cells: u64 = json["confusion"]
        .as_object()
        .unwrap()
        .values()
        .flat_map(|row| row.as_object().unwrap().values())
        .map(|n| n.as_u64().unwrap())
        .sum();
    assert_eq!(cells, 12);
}

#[test]
fn evaluate_missing_dataset_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_triage"))
        .args(["evaluate", "missing.json"])
        .current_dir(dir.path())
        .env("TRIAGE_ENGINE_USE_AI_MODEL", "false")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}
