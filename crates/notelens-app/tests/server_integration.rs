//! 서버 통합 테스트.
//!
//! 실제 TCP 리스너에 라우터를 띄우고 reqwest로 호출한다.
//! OCR/교정/노트 제공자는 mockito 서버로 대체한다.

use std::io::Cursor;
use std::time::Duration;

use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tokio::sync::watch;

use notelens_app::wiring::{apply_api_keys, build_state, ApiKeys};
use notelens_core::config::{AiProviderType, AppConfig, ExternalApiEndpoint, OcrProviderType};
use notelens_web::{router, WebServer};

fn png_base64() -> String {
    let img = RgbImage::from_pixel(64, 32, Rgb([255, 255, 255]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
}

/// `ocr_url`의 원격 OCR을 쓰는 설정
fn config_with_ocr(ocr_url: String) -> AppConfig {
    let mut config = AppConfig::default_config();
    config.ai_provider.ocr_provider = OcrProviderType::Remote;
    config.ai_provider.ocr_api = Some(ExternalApiEndpoint {
        endpoint: ocr_url,
        api_key: String::new(),
        model: None,
        timeout_secs: 5,
        provider_type: AiProviderType::Generic,
    });
    config
}

/// 연결되지 않는 OCR 주소 (OCR을 거치지 않는 테스트용)
fn offline_config() -> AppConfig {
    config_with_ocr("http://127.0.0.1:9/ocr".to_string())
}

/// 라우터를 임의 포트에 띄우고 기본 URL 반환
async fn spawn_app(config: &AppConfig) -> String {
    let state = build_state(config).unwrap();
    let app = router(state, config.max_body_bytes());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn health_and_greeting() {
    let base = spawn_app(&offline_config()).await;
    let client = reqwest::Client::new();

    let greeting = client.get(&base).send().await.unwrap();
    assert_eq!(greeting.status(), 200);
    assert_eq!(greeting.text().await.unwrap(), "Hello, World!");

    let health: serde_json::Value = client
        .get(format!("{}/api/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn uploaded_image_is_detected_filtered_and_corrected() {
    let mut providers = mockito::Server::new_async().await;
    let encoded = png_base64();
    let ocr = providers
        .mock("POST", "/ocr")
        .match_body(mockito::Matcher::Json(serde_json::json!({ "image": encoded })))
        .with_status(200)
        .with_body(
            r#"{"detections":[
                {"quad":[[0,0],[100,0],[100,20],[0,20]],"text":"Ce11 wall","confidence":0.8},
                {"quad":[[0,0],[0,0],[10,10],[10,0]],"text":"x","confidence":0.9},
                {"quad":[[0,0],[200,0],[200,40],[0,40]],"text":"Mitocondria","confidence":0.7}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let guesses = serde_json::json!([
        { "possibility": "Cell wall", "confidence": 0.9 },
        { "possibility": "Mitochondria", "confidence": 0.95 }
    ]);
    let correction = providers
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": guesses.to_string() } }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let mut config = config_with_ocr(format!("{}/ocr", providers.url()));
    if let Some(api) = config.ai_provider.correction_api.as_mut() {
        api.endpoint = format!("{}/v1/chat/completions", providers.url());
    }
    apply_api_keys(
        &mut config,
        &ApiKeys {
            correction: Some("sk-test".into()),
            ..ApiKeys::default()
        },
    );

    let base = spawn_app(&config).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/text_from_image", base))
        .json(&serde_json::json!({ "theme": "biology", "image": encoded }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let fragments = body.as_array().unwrap();
    // 면적 100의 "x"는 제거, 나머지는 크기 순
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0]["text"], "Mitocondria");
    assert_eq!(fragments[0]["size"], 8_000);
    assert_eq!(fragments[0]["autocorrect"]["possibility"], "Mitochondria");
    assert_eq!(fragments[1]["text"], "Ce11 wall");
    assert_eq!(fragments[1]["autocorrect"]["possibility"], "Cell wall");

    ocr.assert_async().await;
    correction.assert_async().await;
}

#[tokio::test]
async fn undecodable_image_is_400() {
    let base = spawn_app(&offline_config()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/text_from_image", base))
        .json(&serde_json::json!({ "theme": "biology", "blob": { "0": 1, "1": 2, "2": 3 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let mut config = offline_config();
    config.web.max_body_mb = 1;
    let base = spawn_app(&config).await;

    let huge = "A".repeat(2 * 1024 * 1024);
    let response = reqwest::Client::new()
        .post(format!("{}/api/text_from_image", base))
        .json(&serde_json::json!({ "theme": "biology", "image": huge }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn notes_relay_through_mock_provider() {
    let mut provider = mockito::Server::new_async().await;
    let _notes = provider
        .mock("POST", "/v1/generate")
        .match_header("authorization", "Bearer co-key")
        .with_status(200)
        .with_body(r##"{"generations":[{"text":"# Cells\n- unit of life"}]}"##)
        .create_async()
        .await;

    let mut config = offline_config();
    let mut notes_api = ExternalApiEndpoint::cohere_generate("command");
    notes_api.endpoint = format!("{}/v1/generate", provider.url());
    config.ai_provider.notes_api = Some(notes_api);
    apply_api_keys(
        &mut config,
        &ApiKeys {
            notes: Some("co-key".into()),
            ..ApiKeys::default()
        },
    );

    let base = spawn_app(&config).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/generate_notes", base))
        .json(&serde_json::json!({ "topic": "Cells", "description": "intro", "data": "Ce11" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "# Cells\n- unit of life");
}

#[tokio::test]
async fn unconfigured_format_api_is_502() {
    // 키 없음 → 포맷 생성기 비활성화
    let base = spawn_app(&offline_config()).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/generate_json", base))
        .json(&serde_json::json!({ "notes": "- Cells" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn web_server_stops_on_shutdown_signal() {
    let mut config = offline_config();
    config.web.port = 0;
    let state = build_state(&config).unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = tokio::spawn(WebServer::new(config.web.clone(), state).run(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.send(true).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("서버가 제한 시간 안에 종료되어야 함")
        .unwrap();
    assert!(result.is_ok());
}
