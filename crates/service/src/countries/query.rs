//! In-memory filtering, ordering and paging over the cached country list.

use std::cmp::Ordering;

use models::country::{Country, CountryFilter, PagedResult};

pub const MAX_PAGE_SIZE: i64 = 250;

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// True when `country` passes every filter that was provided.
pub fn matches(country: &Country, filter: &CountryFilter) -> bool {
    if let Some(term) = non_blank(&filter.search_term) {
        let term = term.to_lowercase();
        let hit = contains_ci(&country.name, &term)
            || contains_ci(&country.code, &term)
            || contains_ci(&country.official_name, &term);
        if !hit {
            return false;
        }
    }
    if let Some(region) = non_blank(&filter.region) {
        if country.region.to_lowercase() != region.to_lowercase() {
            return false;
        }
    }
    if let Some(language) = non_blank(&filter.language) {
        let language = language.to_lowercase();
        if !country.languages.iter().any(|l| contains_ci(l, &language)) {
            return false;
        }
    }
    true
}

/// Case-insensitive text order; exact spelling breaks ties.
fn text_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Sort in place. Unknown or missing keys order by name ascending.
pub fn sort(countries: &mut [Country], sort_by: Option<&str>, ascending: bool) {
    let key = sort_by.map(str::to_lowercase);
    let compare: fn(&Country, &Country) -> Ordering = match key.as_deref() {
        Some("name") => |a, b| text_order(&a.name, &b.name),
        Some("population") => |a, b| a.population.cmp(&b.population),
        Some("code") => |a, b| text_order(&a.code, &b.code),
        Some("region") => |a, b| text_order(&a.region, &b.region),
        _ => {
            countries.sort_by(|a, b| text_order(&a.name, &b.name));
            return;
        }
    };
    if ascending {
        countries.sort_by(compare);
    } else {
        countries.sort_by(|a, b| compare(b, a));
    }
}

/// Filter, order and cut one page. The total is counted before paging.
pub fn page(countries: &[Country], filter: &CountryFilter) -> PagedResult<Country> {
    let page_size = filter.page_size.clamp(1, MAX_PAGE_SIZE);
    let page_number = filter.page_number.max(1);

    let mut selected: Vec<Country> = countries.iter().filter(|c| matches(c, filter)).cloned().collect();
    sort(&mut selected, filter.sort_by.as_deref(), filter.ascending);

    let total_count = selected.len() as i64;
    let skip = usize::try_from((page_number - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let items: Vec<Country> = selected.into_iter().skip(skip).take(page_size as usize).collect();
    PagedResult::new(items, total_count, page_number, page_size)
}

/// Distinct non-blank regions, sorted.
pub fn available_regions(countries: &[Country]) -> Vec<String> {
    let mut regions: Vec<String> = countries
        .iter()
        .filter(|c| !c.region.trim().is_empty())
        .map(|c| c.region.clone())
        .collect();
    regions.sort_by(|a, b| text_order(a, b));
    regions.dedup();
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str, name: &str, official: &str, region: &str, population: i64, languages: &[&str]) -> Country {
        Country {
            code: code.into(),
            name: name.into(),
            official_name: official.into(),
            region: region.into(),
            population,
            languages: languages.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }

    fn fixture() -> Vec<Country> {
        vec![
            country("IND", "India", "Republic of India", "Asia", 1_380_004_385, &["English", "Hindi"]),
            country("IDN", "Indonesia", "Republic of Indonesia", "Asia", 273_523_621, &["Indonesian"]),
            country("SGP", "Singapore", "Republic of Singapore", "Asia", 5_685_807, &["English", "Malay"]),
            country("JPN", "Japan", "Japan", "Asia", 125_836_021, &["Japanese"]),
            country("GBR", "United Kingdom", "United Kingdom of Great Britain", "Europe", 67_215_293, &["English"]),
            country("FIN", "Finland", "Republic of Finland", "Europe", 5_530_719, &["Finnish", "Swedish"]),
            country("COL", "Colombia", "Republic of Colombia", "Americas", 50_882_884, &["Spanish"]),
            country("ATA", "Antarctica", "Antarctica", "", 1_000, &[]),
        ]
    }

    fn filter() -> CountryFilter {
        CountryFilter { page_size: 250, ..Default::default() }
    }

    #[test]
    fn search_term_matches_name_code_or_official_name() {
        let search = |term: &str| -> Vec<String> {
            let f = CountryFilter { search_term: Some(term.into()), ..filter() };
            page(&fixture(), &f).items.into_iter().map(|c| c.code).collect()
        };
        assert_eq!(search("ind"), ["IND", "IDN"]);
        assert_eq!(search("IND"), ["IND", "IDN"]);
        assert_eq!(search("sgp"), ["SGP"]);
        assert_eq!(search("great britain"), ["GBR"]);
    }

    #[test]
    fn filters_intersect() {
        let f = CountryFilter { region: Some("asia".into()), language: Some("english".into()), ..filter() };
        let codes: Vec<String> = page(&fixture(), &f).items.into_iter().map(|c| c.code).collect();
        assert_eq!(codes, ["IND", "SGP"]);
    }

    #[test]
    fn blank_filters_are_ignored() {
        let f = CountryFilter { search_term: Some("  ".into()), region: Some(String::new()), ..filter() };
        assert_eq!(page(&fixture(), &f).total_count, 8);
    }

    #[test]
    fn sorts_by_population_descending() {
        let f = CountryFilter { sort_by: Some("Population".into()), ascending: false, ..filter() };
        let first = page(&fixture(), &f).items.into_iter().next().expect("item");
        assert_eq!(first.code, "IND");
    }

    #[test]
    fn unknown_sort_key_falls_back_to_name_ascending() {
        let f = CountryFilter { sort_by: Some("capital".into()), ascending: false, ..filter() };
        let names: Vec<String> = page(&fixture(), &f).items.into_iter().map(|c| c.name).collect();
        assert_eq!(names.first().map(String::as_str), Some("Antarctica"));
        assert_eq!(names.last().map(String::as_str), Some("United Kingdom"));
    }

    #[test]
    fn name_order_ignores_letter_case() {
        let mixed: Vec<Country> = ["zimbabwe", "Albania", "bahamas", "Zambia"]
            .iter()
            .map(|name| country(name, name, "", "Africa", 1, &[]))
            .collect();
        let names = |f: CountryFilter| -> Vec<String> { page(&mixed, &f).items.into_iter().map(|c| c.name).collect() };
        assert_eq!(names(filter()), ["Albania", "bahamas", "Zambia", "zimbabwe"]);
        let descending = CountryFilter { sort_by: Some("name".into()), ascending: false, ..filter() };
        assert_eq!(names(descending), ["zimbabwe", "Zambia", "bahamas", "Albania"]);
    }

    #[test]
    fn total_is_counted_before_paging() {
        let many: Vec<Country> = (0..21).map(|i| country(&format!("C{i:02}"), &format!("Country {i:02}"), "", "Asia", i, &[])).collect();
        let third = page(&many, &CountryFilter { page_number: 3, page_size: 10, ..Default::default() });
        assert_eq!(third.total_count, 21);
        assert_eq!(third.total_pages, 3);
        assert_eq!(third.items.len(), 1);
        assert!(!third.has_next_page);
        assert!(third.has_previous_page);

        let first = page(&many, &CountryFilter { page_number: 1, page_size: 10, ..Default::default() });
        assert!(first.has_next_page);
        assert_eq!(first.items[0].name, "Country 00");
    }

    #[test]
    fn page_bounds_are_clamped() {
        let p = page(&fixture(), &CountryFilter { page_number: 0, page_size: 0, ..Default::default() });
        assert_eq!(p.page_number, 1);
        assert_eq!(p.page_size, 1);
        assert_eq!(p.items.len(), 1);
        let big = page(&fixture(), &CountryFilter { page_size: 10_000, ..Default::default() });
        assert_eq!(big.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn regions_are_distinct_sorted_and_non_blank() {
        assert_eq!(available_regions(&fixture()), ["Americas", "Asia", "Europe"]);
    }
}
