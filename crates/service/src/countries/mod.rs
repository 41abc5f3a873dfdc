//! Country catalog backed by an external REST source.
//!
//! The full list is fetched once and kept in a TTL cache; paging, filtering
//! and the region list are computed in memory from that list.

pub mod errors;
pub mod query;
pub mod service;
pub mod source;

pub use errors::CountriesError;
pub use service::CountriesService;
pub use source::{CountriesSource, CountryLookup, HttpCountrySource};
