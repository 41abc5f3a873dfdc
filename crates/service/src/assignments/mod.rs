//! Assigning a service to a provider for a set of countries.

use std::sync::Arc;

use async_trait::async_trait;
use models::db::ProcedureExecutor;
use models::provider_service::AssignServiceRequest;
use models::ResponseDto;
use tracing::instrument;

pub const SP_ASSIGN_SERVICE: &str = "dbo.sp_AssignServiceToProvider";

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn assign(&self, input: &AssignServiceRequest) -> ResponseDto<()>;
}

pub struct RoutineAssignmentRepository {
    executor: Arc<ProcedureExecutor>,
}

impl RoutineAssignmentRepository {
    pub fn new(executor: Arc<ProcedureExecutor>) -> Self { Self { executor } }
}

#[async_trait]
impl AssignmentRepository for RoutineAssignmentRepository {
    async fn assign(&self, input: &AssignServiceRequest) -> ResponseDto<()> {
        self.executor.execute_command(SP_ASSIGN_SERVICE, Some(input)).await
    }
}

pub struct AssignmentService<R: AssignmentRepository> {
    repo: Arc<R>,
}

impl<R: AssignmentRepository> AssignmentService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, input), fields(provider_id = input.provider_id, service_id = input.service_id))]
    pub async fn assign(&self, input: &AssignServiceRequest) -> ResponseDto<()> {
        self.repo.assign(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{command_row, executor_with};
    use models::db::driver::mock::ScriptedDriver;
    use models::db::SqlValue;

    #[tokio::test]
    async fn country_codes_reach_the_routine_as_json_text() {
        let (executor, driver, _log) =
            executor_with(ScriptedDriver::new().with_cursor(SP_ASSIGN_SERVICE, command_row("Service assigned.", true)));
        let svc = AssignmentService::new(Arc::new(RoutineAssignmentRepository::new(executor)));

        let input = AssignServiceRequest { provider_id: 2, service_id: 5, country_codes: r#"["COL","PER"]"#.into() };
        let result = svc.assign(&input).await;

        assert!(result.is_success);
        let call = driver.last_call().expect("call");
        assert_eq!(call.routine, SP_ASSIGN_SERVICE);
        assert_eq!(call.param("@CountryCodes").map(|p| &p.value), Some(&SqlValue::Text(r#"["COL","PER"]"#.into())));
    }

    #[tokio::test]
    async fn routine_without_rows_is_a_failure() {
        let (executor, _driver, log) = executor_with(
            ScriptedDriver::new().with_cursor(SP_ASSIGN_SERVICE, models::db::ResultCursor::empty()),
        );
        let svc = AssignmentService::new(Arc::new(RoutineAssignmentRepository::new(executor)));

        let result = svc.assign(&AssignServiceRequest::default()).await;
        assert!(!result.is_success);
        assert_eq!(result.message.as_deref(), Some(models::envelope::NO_DATA_RETURNED));
        assert_eq!(log.count(), 0);
    }
}
