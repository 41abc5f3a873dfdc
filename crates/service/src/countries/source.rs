use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use models::country::{Country, CurrencyInfo};
use serde::Deserialize;
use reqwest::Url;
use serde_json::{Map, Value};
use tracing::debug;

use super::errors::CountriesError;

/// Fields requested for the full listing.
pub const ALL_FIELDS: &str = "name,cca3,capital,region,subregion,population,flags,languages,currencies";

/// One request against the source. Values are raw user input; the HTTP
/// source percent-encodes them as single path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryLookup<'a> {
    All,
    Alpha(&'a str),
    Region(&'a str),
    Name(&'a str),
}

impl<'a> CountryLookup<'a> {
    pub fn segments(&self) -> Vec<&'a str> {
        match *self {
            CountryLookup::All => vec!["all"],
            CountryLookup::Alpha(code) => vec!["alpha", code],
            CountryLookup::Region(region) => vec!["region", region],
            CountryLookup::Name(name) => vec!["name", name],
        }
    }

    /// `fields` filter, listings only.
    pub fn fields(&self) -> Option<&'static str> {
        matches!(self, CountryLookup::All).then_some(ALL_FIELDS)
    }
}

/// `region/asia`, `all?fields=..`; unencoded, for logs and canned sources.
impl fmt::Display for CountryLookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("/"))?;
        match self.fields() {
            Some(fields) => write!(f, "?fields={fields}"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestCountryName {
    pub common: Option<String>,
    pub official: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestFlags {
    pub svg: Option<String>,
    pub png: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestCurrency {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// One entry as the external service returns it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestCountry {
    pub name: Option<RestCountryName>,
    pub cca3: Option<String>,
    pub capital: Option<Vec<String>>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: i64,
    pub flags: Option<RestFlags>,
    // keyed by ISO 639-3 code, in document order
    pub languages: Option<Map<String, Value>>,
    pub currencies: Option<Map<String, Value>>,
}

impl From<RestCountry> for Country {
    fn from(external: RestCountry) -> Self {
        let name = external.name.unwrap_or_default();
        let flags = external.flags.unwrap_or_default();
        Country {
            code: external.cca3.unwrap_or_else(|| "N/A".into()),
            name: name.common.unwrap_or_else(|| "N/A".into()),
            official_name: name.official.unwrap_or_else(|| "N/A".into()),
            region: external.region.unwrap_or_default(),
            sub_region: external.subregion.unwrap_or_default(),
            population: external.population,
            capitals: external.capital.unwrap_or_default(),
            flag_url: flags.svg.or(flags.png).unwrap_or_default(),
            languages: external
                .languages
                .map(|langs| langs.into_iter().filter_map(|(_, v)| v.as_str().map(str::to_string)).collect())
                .unwrap_or_default(),
            currency: first_currency(external.currencies),
        }
    }
}

fn first_currency(currencies: Option<Map<String, Value>>) -> CurrencyInfo {
    let Some((code, value)) = currencies.and_then(|c| c.into_iter().next()) else {
        return CurrencyInfo::default();
    };
    match serde_json::from_value::<RestCurrency>(value) {
        Ok(currency) => CurrencyInfo {
            code,
            name: currency.name.unwrap_or_default(),
            symbol: currency.symbol.unwrap_or_default(),
        },
        Err(_) => CurrencyInfo::default(),
    }
}

/// Where country data comes from.
#[async_trait]
pub trait CountriesSource: Send + Sync {
    async fn fetch(&self, lookup: CountryLookup<'_>) -> Result<Vec<RestCountry>, CountriesError>;
}

/// reqwest client against the REST Countries API.
pub struct HttpCountrySource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCountrySource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CountriesError> {
        let base_url = Url::parse(base_url).map_err(|e| CountriesError::Http(format!("invalid base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CountriesError::Http(format!("{base_url} cannot be a base url")));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CountriesError::Http(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(cfg: &configs::RestCountriesConfig) -> Result<Self, CountriesError> {
        Self::new(&cfg.base_url, Duration::from_secs(cfg.timeout_seconds))
    }

    /// Base URL plus one encoded segment per lookup part.
    pub fn url_for(&self, lookup: CountryLookup<'_>) -> Result<Url, CountriesError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CountriesError::Http(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(lookup.segments());
        if let Some(fields) = lookup.fields() {
            url.set_query(Some(&format!("fields={fields}")));
        }
        Ok(url)
    }
}

#[async_trait]
impl CountriesSource for HttpCountrySource {
    async fn fetch(&self, lookup: CountryLookup<'_>) -> Result<Vec<RestCountry>, CountriesError> {
        let url = self.url_for(lookup)?;
        debug!(%url, "countries_fetch");
        let response = self.client.get(url).send().await.map_err(|e| CountriesError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CountriesError::Status { status: status.as_u16(), body });
        }
        let body = response.text().await.map_err(|e| CountriesError::Http(e.to_string()))?;
        // alpha lookups may answer with a bare object
        match serde_json::from_str::<Value>(&body).map_err(|e| CountriesError::Decode(e.to_string()))? {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<RestCountry>, _>>()
                .map_err(|e| CountriesError::Decode(e.to_string())),
            Value::Null => Ok(Vec::new()),
            single => serde_json::from_value(single)
                .map(|c| vec![c])
                .map_err(|e| CountriesError::Decode(e.to_string())),
        }
    }
}

/// Canned responses for tests.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Answers by path with the query string stripped; unknown paths are 404.
    #[derive(Default)]
    pub struct StaticCountrySource {
        responses: Mutex<HashMap<String, Result<Vec<RestCountry>, CountriesError>>>,
        calls: AtomicUsize,
        paths: Mutex<Vec<String>>,
    }

    impl StaticCountrySource {
        pub fn new() -> Self { Self::default() }

        pub fn with(self, path: &str, response: Result<Vec<RestCountry>, CountriesError>) -> Self {
            if let Ok(mut r) = self.responses.lock() {
                r.insert(path.to_string(), response);
            }
            self
        }

        pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

        pub fn paths(&self) -> Vec<String> { self.paths.lock().map(|p| p.clone()).unwrap_or_default() }
    }

    #[async_trait]
    impl CountriesSource for StaticCountrySource {
        async fn fetch(&self, lookup: CountryLookup<'_>) -> Result<Vec<RestCountry>, CountriesError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let path = lookup.to_string();
            if let Ok(mut p) = self.paths.lock() {
                p.push(path.clone());
            }
            let key = path.split('?').next().unwrap_or(&path);
            self.responses
                .lock()
                .ok()
                .and_then(|r| r.get(key).cloned())
                .unwrap_or_else(|| Err(CountriesError::Status { status: 404, body: "{\"status\":404}".into() }))
        }
    }

    /// Minimal external record for fixtures.
    pub fn rest_country(code: &str, name: &str, region: &str, population: i64, languages: &[&str]) -> RestCountry {
        RestCountry {
            name: Some(RestCountryName { common: Some(name.into()), official: Some(format!("Republic of {name}")) }),
            cca3: Some(code.into()),
            region: Some(region.into()),
            population,
            languages: Some(
                languages
                    .iter()
                    .enumerate()
                    .map(|(i, l)| (format!("l{i}"), Value::String((*l).into())))
                    .collect(),
            ),
            ..Default::default()
        }
    }
}
