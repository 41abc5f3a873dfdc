use std::sync::Arc;

use async_trait::async_trait;
use models::db::ProcedureExecutor;
use models::provider::{AddCustomFieldRequest, CreateProviderRequest, GetProvidersPagedRequest, ProviderIdParam, ProviderPagedRow};
use models::{ResponseDto, TablePage};

pub const SP_GET_PROVIDERS_PAGED: &str = "dbo.sp_GetProvidersPaged";
pub const SP_CREATE_PROVIDER: &str = "dbo.sp_CreateProvider";
pub const SP_DELETE_PROVIDER: &str = "dbo.sp_DeleteProvider";
pub const SP_ADD_CUSTOM_FIELD: &str = "dbo.sp_AddCustomFieldToProvider";

/// Provider persistence. Implementations report failures inside the envelope.
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn get_paged(&self, filters: &GetProvidersPagedRequest) -> ResponseDto<TablePage<ProviderPagedRow>>;
    async fn create(&self, input: &CreateProviderRequest) -> ResponseDto<()>;
    async fn delete(&self, provider_id: i32) -> ResponseDto<()>;
    async fn add_custom_field(&self, input: &AddCustomFieldRequest) -> ResponseDto<()>;
}

/// Stored-routine backed repository.
pub struct RoutineProviderRepository {
    executor: Arc<ProcedureExecutor>,
}

impl RoutineProviderRepository {
    pub fn new(executor: Arc<ProcedureExecutor>) -> Self { Self { executor } }
}

#[async_trait]
impl ProviderRepository for RoutineProviderRepository {
    async fn get_paged(&self, filters: &GetProvidersPagedRequest) -> ResponseDto<TablePage<ProviderPagedRow>> {
        self.executor.execute_paged(SP_GET_PROVIDERS_PAGED, Some(filters)).await
    }

    async fn create(&self, input: &CreateProviderRequest) -> ResponseDto<()> {
        self.executor.execute_command(SP_CREATE_PROVIDER, Some(input)).await
    }

    async fn delete(&self, provider_id: i32) -> ResponseDto<()> {
        self.executor.execute_command(SP_DELETE_PROVIDER, Some(&ProviderIdParam { provider_id })).await
    }

    async fn add_custom_field(&self, input: &AddCustomFieldRequest) -> ResponseDto<()> {
        self.executor.execute_command(SP_ADD_CUSTOM_FIELD, Some(input)).await
    }
}
