//! # notelens-app
//!
//! NoteLens 서버 조립 계층.
//! 설정에서 어댑터를 만들고 `AppState`로 묶는다.

pub mod wiring;
