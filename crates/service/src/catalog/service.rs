use std::sync::Arc;

use models::catalog::{CreateServiceRequest, GetServicesPagedRequest, ServicePagedRow, UpdateServiceRequest};
use models::{ResponseDto, TablePage};
use tracing::{info, instrument};

use super::repository::CatalogRepository;

/// Service catalog use cases.
pub struct CatalogService<R: CatalogRepository> {
    repo: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, filters), fields(page = ?filters.page_number, size = ?filters.page_size))]
    pub async fn get_paged(&self, filters: &GetServicesPagedRequest) -> ResponseDto<TablePage<ServicePagedRow>> {
        self.repo.get_paged(filters).await
    }

    #[instrument(skip(self, input), fields(name = %input.service_name))]
    pub async fn create(&self, input: &CreateServiceRequest) -> ResponseDto<()> {
        let result = self.repo.create(input).await;
        if result.is_success {
            info!(name = %input.service_name, rate = %input.hourly_rate_usd, "service_created");
        }
        result
    }

    /// The route id replaces whatever `serviceId` the body carried.
    #[instrument(skip(self, input))]
    pub async fn update(&self, service_id: i32, mut input: UpdateServiceRequest) -> ResponseDto<()> {
        input.service_id = service_id;
        self.repo.update(&input).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, service_id: i32) -> ResponseDto<()> {
        self.repo.delete(service_id).await
    }
}
