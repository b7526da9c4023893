//! # notelens-web
//!
//! NoteLens HTTP API 서버.
//! Axum 기반 REST API.
//!
//! ## 엔드포인트
//! - `GET /` 생존 확인
//! - `GET /api/health` 상태 + 버전
//! - `POST /api/text_from_image` 이미지 → 순위가 매겨진 텍스트 조각
//! - `POST /api/generate_notes` 학습 노트 생성
//! - `POST /api/generate_json` 노트 → JSON 텍스트

pub mod error;
pub mod handlers;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use notelens_core::config::WebConfig;
use notelens_extract::notes::StudyNotesComposer;
use notelens_extract::pipeline::ExtractionPipeline;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 이미지 분석 파이프라인
    pub pipeline: Arc<ExtractionPipeline>,
    /// 노트/포맷 릴레이
    pub notes: Arc<StudyNotesComposer>,
}

/// 전체 라우터 구성 (CORS, 트레이스, 본문 크기 제한 포함)
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health::greeting))
        .nest("/api", routes::api_routes())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP API 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    pub fn new(config: WebConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// 서버 실행
    ///
    /// 설정 포트에만 바인드하며, 사용 중이면 바인드 에러를 그대로 반환한다.
    /// `shutdown_rx`에 `true`가 오면 진행 중인 요청을 마치고 종료한다.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };
        let addr: SocketAddr = format!("{}:{}", host, self.config.port)
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            error!(%addr, error = %e, "API 서버 바인드 실패");
            e
        })?;
        info!("API 서버 시작: http://{}", addr);

        let app = router(self.state, self.config.max_body_bytes());
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("API 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("API 서버 종료");
        Ok(())
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}
