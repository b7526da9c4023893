//! # notelens
//!
//! NoteLens 서버 바이너리 진입점.
//! CLI 파싱, 로깅 초기화, 설정 로드, DI, 종료 신호 처리.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use notelens_app::wiring::{apply_api_keys, build_state, ApiKeys};
use notelens_core::config::AppConfig;
use notelens_core::config_manager::ConfigManager;
use notelens_web::WebServer;

/// NoteLens — 필기 사진 텍스트 추출 + 자동 교정 + 학습 노트 생성 서버
#[derive(Parser, Debug)]
#[command(name = "notelens")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 설정 파일 없이 기본 설정으로 실행
    #[arg(long)]
    no_config_file: bool,

    /// 리슨 포트
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 외부 접근 허용 (0.0.0.0 바인드)
    #[arg(long)]
    allow_external: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 1차 교정 모델 API 키
    #[arg(long, env = "NOTELENS_CORRECTION_API_KEY", hide_env_values = true)]
    correction_api_key: Option<String>,

    /// 폴백 교정 모델 API 키
    #[arg(long, env = "NOTELENS_FALLBACK_API_KEY", hide_env_values = true)]
    fallback_api_key: Option<String>,

    /// 교정 키 공용 값 (1차/폴백 키가 없을 때 사용)
    #[arg(long, env = "GPT_KEY", hide_env_values = true)]
    gpt_key: Option<String>,

    /// 학습 노트 생성 API 키
    #[arg(long, env = "NOTELENS_NOTES_API_KEY", hide_env_values = true)]
    notes_api_key: Option<String>,

    /// 노트 → JSON 변환 API 키
    #[arg(long, env = "NOTELENS_FORMAT_API_KEY", hide_env_values = true)]
    format_api_key: Option<String>,

    /// 원격 OCR API 키
    #[arg(long, env = "NOTELENS_OCR_API_KEY", hide_env_values = true)]
    ocr_api_key: Option<String>,
}

impl Args {
    fn api_keys(&self) -> ApiKeys {
        ApiKeys {
            correction: self.correction_api_key.clone().or_else(|| self.gpt_key.clone()),
            fallback: self.fallback_api_key.clone().or_else(|| self.gpt_key.clone()),
            notes: self.notes_api_key.clone(),
            format: self.format_api_key.clone(),
            ocr: self.ocr_api_key.clone(),
        }
    }
}

/// 설정 로드 (파일 → CLI 오버라이드)
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if args.no_config_file {
        AppConfig::default_config()
    } else {
        let manager = match &args.config {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new(),
        }
        .context("설정 로드 실패")?;
        info!("설정 파일: {}", manager.config_path().display());
        manager.get()
    };

    if let Some(port) = args.port {
        config.web.port = port;
    }
    if args.allow_external {
        config.web.allow_external = true;
    }
    apply_api_keys(&mut config, &args.api_keys());
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "notelens={lvl},notelens_app={lvl},notelens_core={lvl},notelens_vision={lvl},notelens_network={lvl},notelens_extract={lvl},notelens_web={lvl},tower_http={lvl}",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("NoteLens 서버 시작 (v{})", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let state = build_state(&config).context("서비스 구성 실패")?;

    // 종료 신호 채널
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // 송신자를 드롭하면 서버가 종료되므로 유지
            warn!("Ctrl+C 핸들러 등록 실패: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Ctrl+C 수신 — 종료 시작");
        let _ = shutdown_tx.send(true);
    });

    WebServer::new(config.web.clone(), state)
        .run(shutdown_rx)
        .await
        .context("API 서버 실행 실패")?;

    info!("NoteLens 서버 종료");
    Ok(())
}
