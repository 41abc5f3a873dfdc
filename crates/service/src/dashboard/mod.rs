//! Dashboard summary built from the JSON document `dbo.sp_ResumenDashboard` returns.

use std::sync::Arc;

use async_trait::async_trait;
use common::utils::log_sink::LogSink;
use models::dashboard::DashboardSummary;
use models::db::{NoParams, ProcedureExecutor};
use models::ResponseDto;
use tracing::{instrument, warn};

pub const SP_DASHBOARD_SUMMARY: &str = "dbo.sp_ResumenDashboard";
pub const SUMMARY_RETRIEVED: &str = "Summary retrieved successfully";

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Raw JSON text of the summary.
    async fn summary_json(&self) -> ResponseDto<String>;
}

pub struct RoutineDashboardRepository {
    executor: Arc<ProcedureExecutor>,
}

impl RoutineDashboardRepository {
    pub fn new(executor: Arc<ProcedureExecutor>) -> Self { Self { executor } }
}

#[async_trait]
impl DashboardRepository for RoutineDashboardRepository {
    async fn summary_json(&self) -> ResponseDto<String> {
        self.executor.execute_raw_json(SP_DASHBOARD_SUMMARY, Some(&NoParams {})).await
    }
}

pub struct DashboardService<R: DashboardRepository> {
    repo: Arc<R>,
    log: Arc<dyn LogSink>,
}

impl<R: DashboardRepository> DashboardService<R> {
    pub fn new(repo: Arc<R>, log: Arc<dyn LogSink>) -> Self { Self { repo, log } }

    /// A failed or empty repository answer is returned as is. Undecodable
    /// JSON is logged and reported as a processing error.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> ResponseDto<DashboardSummary> {
        let raw = self.repo.summary_json().await;
        let ResponseDto { is_success, message, data } = raw;
        let Some(json) = data.filter(|_| is_success) else {
            return ResponseDto { is_success, message, data: None };
        };
        match DashboardSummary::from_json(&json) {
            Ok(summary) => ResponseDto::success(summary, SUMMARY_RETRIEVED),
            Err(err) => {
                warn!(error = %err, "dashboard_json_rejected");
                self.log.log(&format!("Error deserializing dashboard JSON: {err}"));
                ResponseDto::failure(format!("Error processing data: {err}"))
            }
        }
    }
}
