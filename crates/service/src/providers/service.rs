use std::sync::Arc;

use models::provider::{AddCustomFieldRequest, CreateProviderRequest, GetProvidersPagedRequest, ProviderPagedRow};
use models::{ResponseDto, TablePage};
use tracing::{info, instrument};

use super::repository::ProviderRepository;

/// Provider use cases.
pub struct ProviderService<R: ProviderRepository> {
    repo: Arc<R>,
}

impl<R: ProviderRepository> ProviderService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, filters), fields(page = ?filters.page_number, size = ?filters.page_size))]
    pub async fn get_paged(&self, filters: &GetProvidersPagedRequest) -> ResponseDto<TablePage<ProviderPagedRow>> {
        self.repo.get_paged(filters).await
    }

    #[instrument(skip(self, input), fields(nit = %input.nit))]
    pub async fn create(&self, input: &CreateProviderRequest) -> ResponseDto<()> {
        let result = self.repo.create(input).await;
        if result.is_success {
            info!(nit = %input.nit, "provider_created");
        }
        result
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, provider_id: i32) -> ResponseDto<()> {
        self.repo.delete(provider_id).await
    }

    /// The provider named by the route wins over any id in the body.
    #[instrument(skip(self, input), fields(field = %input.field_name))]
    pub async fn add_custom_field(&self, provider_id: i32, mut input: AddCustomFieldRequest) -> ResponseDto<()> {
        input.provider_id = provider_id;
        self.repo.add_custom_field(&input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::repository::{RoutineProviderRepository, SP_ADD_CUSTOM_FIELD, SP_DELETE_PROVIDER, SP_GET_PROVIDERS_PAGED};
    use crate::test_support::{command_row, executor_with};
    use models::db::driver::mock::ScriptedDriver;
    use models::db::{ResultCursor, ResultSet, SqlValue};

    fn provider_rows() -> ResultCursor {
        let rows = ResultSet::new(["ProviderId", "Nit", "ProviderName", "Email", "CustomFields", "CreatedAt", "UpdatedAt", "TotalServices"])
            .row([
                SqlValue::Int(1),
                SqlValue::Text("900".into()),
                SqlValue::Text("Acme".into()),
                SqlValue::Text("ops@acme.test".into()),
                SqlValue::Text("[]".into()),
                SqlValue::Text("2024-03-01T10:00:00".into()),
                SqlValue::Null,
                SqlValue::Int(2),
            ]);
        let total = ResultSet::new(["TotalRecords"]).row([SqlValue::Int(17)]);
        ResultCursor::new(vec![rows, total])
    }

    #[tokio::test]
    async fn paged_listing_binds_filters_and_reads_total() {
        let (executor, driver, _log) = executor_with(ScriptedDriver::new().with_cursor(SP_GET_PROVIDERS_PAGED, provider_rows()));
        let svc = ProviderService::new(Arc::new(RoutineProviderRepository::new(executor)));

        let filters = GetProvidersPagedRequest { search_term: Some("ac".into()), ..Default::default() };
        let page = svc.get_paged(&filters).await;

        assert!(page.is_success);
        let data = page.data.expect("page");
        assert_eq!(data.total_records, 17);
        assert_eq!(data.results[0].provider_name, "Acme");
        assert_eq!(data.results[0].updated_at, None);
        let call = driver.last_call().expect("call");
        assert_eq!(call.param("@SearchTerm").map(|p| &p.value), Some(&SqlValue::Text("ac".into())));
        assert_eq!(call.param("@SortBy").map(|p| &p.value), Some(&SqlValue::Text("ProviderName".into())));
    }

    #[tokio::test]
    async fn delete_passes_the_routine_verdict_through() {
        let (executor, driver, _log) =
            executor_with(ScriptedDriver::new().with_cursor(SP_DELETE_PROVIDER, command_row("Provider has services.", false)));
        let svc = ProviderService::new(Arc::new(RoutineProviderRepository::new(executor)));

        let result = svc.delete(9).await;
        assert!(!result.is_success);
        assert_eq!(result.message.as_deref(), Some("Provider has services."));
        let call = driver.last_call().expect("call");
        assert_eq!(call.params.len(), 1);
        assert_eq!(call.param("@ProviderId").map(|p| &p.value), Some(&SqlValue::Int(9)));
    }

    #[tokio::test]
    async fn custom_field_uses_route_provider_id() {
        let (executor, driver, _log) =
            executor_with(ScriptedDriver::new().with_cursor(SP_ADD_CUSTOM_FIELD, command_row("Field added.", true)));
        let svc = ProviderService::new(Arc::new(RoutineProviderRepository::new(executor)));

        let body = AddCustomFieldRequest { provider_id: 1, field_name: "Tier".into(), field_value: "Gold".into() };
        let result = svc.add_custom_field(44, body).await;

        assert!(result.is_success);
        let call = driver.last_call().expect("call");
        assert_eq!(call.param("@ProviderId").map(|p| &p.value), Some(&SqlValue::Int(44)));
        assert_eq!(call.param("@FieldName").map(|p| &p.value), Some(&SqlValue::Text("Tier".into())));
    }

    #[tokio::test]
    async fn create_failure_is_logged_once() {
        let (executor, _driver, log) = executor_with(
            ScriptedDriver::failing(models::DataError::Database("duplicate key value violates unique constraint".into())),
        );
        let svc = ProviderService::new(Arc::new(RoutineProviderRepository::new(executor)));

        let input = CreateProviderRequest { nit: "900".into(), provider_name: "Acme".into(), email: "a@b.c".into() };
        let result = svc.create(&input).await;

        assert!(!result.is_success);
        assert_eq!(log.count(), 1);
        assert!(log.messages()[0].contains("dbo.sp_CreateProvider"));
    }
}
