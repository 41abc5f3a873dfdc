use std::sync::Arc;

use async_trait::async_trait;
use models::catalog::{CreateServiceRequest, GetServicesPagedRequest, ServiceIdParam, ServicePagedRow, UpdateServiceRequest};
use models::db::ProcedureExecutor;
use models::{ResponseDto, TablePage};

pub const SP_GET_SERVICES_PAGED: &str = "dbo.sp_GetServicesPaged";
pub const SP_CREATE_SERVICE: &str = "dbo.sp_CreateService";
pub const SP_UPDATE_SERVICE: &str = "dbo.sp_UpdateService";
pub const SP_DELETE_SERVICE: &str = "dbo.sp_DeleteService";

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get_paged(&self, filters: &GetServicesPagedRequest) -> ResponseDto<TablePage<ServicePagedRow>>;
    async fn create(&self, input: &CreateServiceRequest) -> ResponseDto<()>;
    async fn update(&self, input: &UpdateServiceRequest) -> ResponseDto<()>;
    async fn delete(&self, service_id: i32) -> ResponseDto<()>;
}

pub struct RoutineCatalogRepository {
    executor: Arc<ProcedureExecutor>,
}

impl RoutineCatalogRepository {
    pub fn new(executor: Arc<ProcedureExecutor>) -> Self { Self { executor } }
}

#[async_trait]
impl CatalogRepository for RoutineCatalogRepository {
    async fn get_paged(&self, filters: &GetServicesPagedRequest) -> ResponseDto<TablePage<ServicePagedRow>> {
        self.executor.execute_paged(SP_GET_SERVICES_PAGED, Some(filters)).await
    }

    async fn create(&self, input: &CreateServiceRequest) -> ResponseDto<()> {
        self.executor.execute_command(SP_CREATE_SERVICE, Some(input)).await
    }

    async fn update(&self, input: &UpdateServiceRequest) -> ResponseDto<()> {
        self.executor.execute_command(SP_UPDATE_SERVICE, Some(input)).await
    }

    async fn delete(&self, service_id: i32) -> ResponseDto<()> {
        self.executor.execute_command(SP_DELETE_SERVICE, Some(&ServiceIdParam { service_id })).await
    }
}
