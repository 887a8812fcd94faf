//! Liveness report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::context::ServiceContext;

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub message: String,
    pub service: String,
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
}

pub fn status(ctx: &ServiceContext) -> StatusReport {
    let service = &ctx.config().service;
    StatusReport {
        message: service.status_message.clone(),
        service: service.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        started_at: ctx.started_at(),
        uptime_seconds: ctx.uptime().as_secs(),
    }
}
