use serde::Deserialize;
use urlencoding::encode;

pub const UPWORK_SEARCH_BASE: &str = "https://www.upwork.com/nx/search/jobs/";

/// Search filters as they appear in the input configuration. Budget and
/// hours values are forwarded verbatim; the upstream contract for them is
/// best-effort and unverified.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub experience: Vec<String>,
    pub payment_type: Vec<String>,
    pub verified_only: bool,
    pub hours_per_week: Option<String>,
    pub budget_min: Option<u32>,
    pub budget_max: Option<u32>,
    pub include_countries: Vec<String>,
}

/// One page worth of search input. Built per page iteration and consumed
/// immediately by [`build_search_url`].
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub page: u32,
    pub per_page: u32,
    pub filters: &'a FilterConfig,
}

fn map_experience(entry: &str) -> String {
    match entry.to_lowercase().as_str() {
        "entry" => "entry_level".to_string(),
        "intermediate" => "intermediate".to_string(),
        "expert" => "expert".to_string(),
        // entries outside the vocabulary pass through lower-cased
        other => other.to_string(),
    }
}

fn map_payment_type(entry: &str) -> String {
    match entry.to_lowercase().as_str() {
        "hourly" => "hourly".to_string(),
        "fixed" => "fixed-price".to_string(),
        other => other.to_string(),
    }
}

/// Deterministically build the search URL for one results page. The site
/// renders these server-side, which is what makes plain GET scraping work.
pub fn build_search_url(req: &SearchRequest) -> String {
    let mut params: Vec<(&str, String)> = vec![
        ("q", req.query.to_string()),
        ("sort", "recency".to_string()),
        ("page", req.page.to_string()),
        ("per_page", req.per_page.to_string()),
    ];

    let filters = req.filters;

    if !filters.experience.is_empty() {
        let levels = filters
            .experience
            .iter()
            .map(|e| map_experience(e))
            .collect::<Vec<_>>()
            .join(",");
        params.push(("experience_level", levels));
    }

    if !filters.payment_type.is_empty() {
        // the empty value is dropped below when verified_only is unset
        let verification = if filters.verified_only { "1" } else { "" };
        params.push(("payment_verification", verification.to_string()));
        let types = filters
            .payment_type
            .iter()
            .map(|p| map_payment_type(p))
            .collect::<Vec<_>>()
            .join(",");
        params.push(("job_type", types));
    }

    if let Some(hours) = &filters.hours_per_week {
        params.push(("hours_per_week", hours.clone()));
    }
    if let Some(min) = filters.budget_min {
        params.push(("budget_min", min.to_string()));
    }
    if let Some(max) = filters.budget_max {
        params.push(("budget_max", max.to_string()));
    }
    if !filters.include_countries.is_empty() {
        params.push(("client_location", filters.include_countries.join(",")));
    }

    let query_string = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", UPWORK_SEARCH_BASE, query_string)
}
