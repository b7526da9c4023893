//! API 핸들러 모듈.

pub mod extraction;
pub mod health;
pub mod notes;
