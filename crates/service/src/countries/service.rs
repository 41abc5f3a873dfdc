use std::sync::Arc;
use std::time::Duration;

use common::metrics::record_country_cache;
use common::utils::log_sink::LogSink;
use models::country::{Country, CountryFilter, PagedResult};
use models::ResponseDto;
use moka::future::Cache;
use tracing::{debug, instrument};

use super::errors::CountriesError;
use super::query;
use super::source::{CountriesSource, CountryLookup};
use crate::errors::envelope_from_error;

pub const CACHE_KEY_ALL_COUNTRIES: &str = "all_countries";
const EXTERNAL_SERVICE_ERROR: &str = "Error querying the external service";
const EXTERNAL_COUNTRIES_ERROR: &str = "Error querying the external countries service";

/// Country catalog use cases over a [`CountriesSource`].
pub struct CountriesService<S: CountriesSource + ?Sized> {
    source: Arc<S>,
    cache: Cache<String, Arc<Vec<Country>>>,
    use_cache: bool,
    log: Arc<dyn LogSink>,
}

fn failure_with<T>(message: String, data: T) -> ResponseDto<T> {
    ResponseDto { is_success: false, message: Some(message), data: Some(data) }
}

impl<S: CountriesSource + ?Sized> CountriesService<S> {
    pub fn new(source: Arc<S>, log: Arc<dyn LogSink>, use_cache: bool, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { source, cache, use_cache, log }
    }

    pub fn from_config(source: Arc<S>, log: Arc<dyn LogSink>, cfg: &configs::RestCountriesConfig) -> Self {
        Self::new(source, log, cfg.use_cache, Duration::from_secs(cfg.cache_expiration_minutes * 60))
    }

    /// Non-404 status answers become a failed envelope; transport and decode
    /// failures are logged as unexpected.
    fn upstream_failure<T>(&self, method: &str, base: &str, err: CountriesError) -> ResponseDto<T> {
        match err {
            CountriesError::Status { status, body } => ResponseDto::failure(format!("{base}: {status} - {body}")),
            other => envelope_from_error(self.log.as_ref(), method, other),
        }
    }

    async fn all(&self) -> ResponseDto<Arc<Vec<Country>>> {
        if self.use_cache {
            if let Some(cached) = self.cache.get(CACHE_KEY_ALL_COUNTRIES).await {
                record_country_cache(true);
                return ResponseDto::success(cached, "Countries retrieved from cache");
            }
            record_country_cache(false);
        }
        let external = match self.source.fetch(CountryLookup::All).await {
            Ok(external) => external,
            Err(err) => return self.upstream_failure("get_all_countries", EXTERNAL_COUNTRIES_ERROR, err),
        };
        if external.is_empty() {
            return ResponseDto::success(Arc::new(Vec::new()), "No countries found");
        }
        let countries: Arc<Vec<Country>> = Arc::new(external.into_iter().map(Country::from).collect());
        if self.use_cache {
            self.cache.insert(CACHE_KEY_ALL_COUNTRIES.to_string(), countries.clone()).await;
        }
        debug!(count = countries.len(), "countries_loaded");
        ResponseDto::success(countries.clone(), format!("{} countries retrieved successfully", countries.len()))
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> ResponseDto<Vec<Country>> {
        self.all().await.map(|countries| countries.as_ref().clone())
    }

    #[instrument(skip(self))]
    pub async fn get_by_code(&self, code: &str) -> ResponseDto<Country> {
        if code.trim().is_empty() {
            return ResponseDto::failure("Country code is required");
        }
        let code = code.trim().to_uppercase();
        match self.source.fetch(CountryLookup::Alpha(&code)).await {
            Ok(external) => match external.into_iter().next() {
                Some(first) => ResponseDto::success(Country::from(first), "Country retrieved successfully"),
                None => ResponseDto::failure(format!("No information found for code: {code}")),
            },
            Err(err) if err.is_not_found() => ResponseDto::failure(format!("Country not found with code: {code}")),
            Err(err) => self.upstream_failure("get_country_by_code", EXTERNAL_SERVICE_ERROR, err),
        }
    }

    /// A 404 is a failure that still carries an empty list.
    #[instrument(skip(self))]
    pub async fn get_by_region(&self, region: &str) -> ResponseDto<Vec<Country>> {
        if region.trim().is_empty() {
            return ResponseDto::failure("Region is required");
        }
        match self.source.fetch(CountryLookup::Region(region)).await {
            Ok(external) if external.is_empty() => {
                ResponseDto::success(Vec::new(), format!("No countries found in region: {region}"))
            }
            Ok(external) => {
                let countries: Vec<Country> = external.into_iter().map(Country::from).collect();
                let message = format!("{} countries retrieved from region {region}", countries.len());
                ResponseDto::success(countries, message)
            }
            Err(err) if err.is_not_found() => failure_with(format!("Region not found: {region}"), Vec::new()),
            Err(err) => self.upstream_failure("get_countries_by_region", EXTERNAL_SERVICE_ERROR, err),
        }
    }

    /// No match, including a 404 from the source, is an empty success.
    #[instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> ResponseDto<Vec<Country>> {
        if name.trim().is_empty() {
            return ResponseDto::failure("Name is required");
        }
        let none_found = || ResponseDto::success(Vec::new(), format!("No countries found with name: {name}"));
        match self.source.fetch(CountryLookup::Name(name)).await {
            Ok(external) if external.is_empty() => none_found(),
            Ok(external) => {
                let countries: Vec<Country> = external.into_iter().map(Country::from).collect();
                let message = format!("{} countries found", countries.len());
                ResponseDto::success(countries, message)
            }
            Err(err) if err.is_not_found() => none_found(),
            Err(err) => self.upstream_failure("search_countries_by_name", EXTERNAL_SERVICE_ERROR, err),
        }
    }

    #[instrument(skip(self, filter), fields(page = filter.page_number, size = filter.page_size))]
    pub async fn get_paged(&self, filter: &CountryFilter) -> ResponseDto<PagedResult<Country>> {
        let all = self.all().await;
        let Some(countries) = all.data.filter(|_| all.is_success) else {
            return ResponseDto { is_success: all.is_success, message: all.message, data: None };
        };
        let page = query::page(&countries, filter);
        let message = format!("Page {} of {} retrieved successfully", page.page_number, page.total_pages);
        ResponseDto::success(page, message)
    }

    #[instrument(skip(self))]
    pub async fn get_available_regions(&self) -> ResponseDto<Vec<String>> {
        let all = self.all().await;
        let Some(countries) = all.data.filter(|_| all.is_success) else {
            return ResponseDto { is_success: all.is_success, message: all.message, data: None };
        };
        let regions = query::available_regions(&countries);
        let message = format!("{} regions available", regions.len());
        ResponseDto::success(regions, message)
    }
}
