use crate::extractor::{find_snippet, Extractor};
use crate::time_utils::{now_iso, parse_relative_time_to_iso};
use log::debug;
use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const UPWORK_BASE: &str = "https://www.upwork.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT_SECS: u64 = 30;

// Fragment discovery tiers. The data-test tiles match Upwork's SSR list
// markup; the broad structural scan is a superset fallback that trades
// precision for resilience when the markup shifts.
const FRAGMENT_SELECTORS: &[&str] = &[
    "[data-test='job-tile-list'] li, li[data-test='job-tile-list-item']",
    "section, article, li",
];

// Title anchor tiers. Heading anchors are only consulted when neither the
// title marker nor a listings-path anchor is present.
const TITLE_SELECTORS: &[&str] = &[
    "a[data-test='job-tile-title'], a[href*='/jobs/']",
    "h2 a, h3 a",
];

const DESCRIPTION_SELECTOR: &str = "[data-test='job-description-text'], p, .text-body-sm";

// Skill tag tiers: token markers first, then older link/badge variants.
const SKILL_SELECTORS: &[&str] = &[
    "[data-test='token']",
    "a[href*='/o/profiles/skills/'], .o-tag-skill, .up-skill-badge",
];

/// One job listing extracted from a search-results page. `query` and
/// `source` are filled in by the run loop, not by the parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub scraped_at: String,
    pub job_id: String,
    pub posted_at: String,
    pub payment_type: String,
    pub budget: String,
    pub skill_level: String,
    pub skills: Vec<String>,
    pub title: String,
    pub url: String,
    pub description: String,
    pub location: String,
    pub rating: Option<f64>,
    pub proposals_count: Option<u32>,
    // Only present on the job detail page; a detail fetch is not implemented,
    // so these stay empty.
    pub total_spent: String,
    pub project_length: String,
    pub weekly_hours: String,
    pub query: String,
    pub source: String,
}

/// Fetches Upwork job-search result pages and extracts listing records.
/// Works best with valid cookies; without them fewer fields are present.
pub struct JobParser {
    client: Client,
    cookies: Option<Arc<Jar>>,
    extractor: Extractor,
    fragment_tiers: Vec<Selector>,
    title_tiers: Vec<Selector>,
    description_selector: Selector,
    skill_tiers: Vec<Selector>,
    base_url: Url,
}

impl JobParser {
    pub fn new(cookies: Option<Arc<Jar>>) -> Self {
        let client = build_client(cookies.as_ref(), None).expect("Failed to build HTTP client");
        JobParser {
            client,
            cookies,
            extractor: Extractor::new(),
            fragment_tiers: compile_selectors(FRAGMENT_SELECTORS),
            title_tiers: compile_selectors(TITLE_SELECTORS),
            description_selector: Selector::parse(DESCRIPTION_SELECTOR).unwrap(),
            skill_tiers: compile_selectors(SKILL_SELECTORS),
            base_url: Url::parse(UPWORK_BASE).unwrap(),
        }
    }

    /// One blocking GET followed by extraction. A proxy applies to the whole
    /// client in reqwest, so a short-lived client is built when one is given.
    pub fn fetch_and_parse(&self, url: &str, proxy: Option<&str>) -> reqwest::Result<Vec<JobRecord>> {
        debug!("Fetching URL: {}", url);
        let resp = match proxy {
            Some(p) => build_client(self.cookies.as_ref(), Some(p))?.get(url).send()?,
            None => self.client.get(url).send()?,
        };
        let html = resp.error_for_status()?.text()?;
        Ok(self.parse_html(&html))
    }

    /// Pure extraction over one HTML document. Malformed markup never fails;
    /// the parser works with whatever structure it can infer.
    pub fn parse_html(&self, html: &str) -> Vec<JobRecord> {
        let document = Html::parse_document(html);

        let mut fragments: Vec<ElementRef> = Vec::new();
        for tier in &self.fragment_tiers {
            fragments = document.select(tier).collect();
            if !fragments.is_empty() {
                break;
            }
        }

        let mut jobs = Vec::new();
        for node in fragments {
            if let Some(job) = self.extract_job_from_node(node) {
                jobs.push(job);
            }
        }
        debug!("Parsed {} jobs from HTML", jobs.len());
        jobs
    }

    fn extract_job_from_node(&self, node: ElementRef) -> Option<JobRecord> {
        let title_el = self
            .title_tiers
            .iter()
            .find_map(|tier| node.select(tier).next())?;
        let title = element_text(title_el);
        if title.is_empty() {
            return None;
        }

        let href = title_el.value().attr("href").unwrap_or("");
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            match self.base_url.join(href) {
                Ok(joined) => joined.to_string(),
                Err(_) => return None,
            }
        };

        let text = element_text(node);

        let payment_type = find_snippet(&text, &["Hourly", "Fixed Price", "Fixed"]);
        let skill_level = find_snippet(&text, &["Entry", "Intermediate", "Expert"]);

        let mut budget = self.extractor.extract_budget(&text);
        if budget.is_none() {
            if let Some(pt) = &payment_type {
                if pt.contains("Hourly") {
                    budget = find_snippet(&text, &["per hour", "/hr", "$/hr"]);
                }
            }
        }

        let posted_at = find_snippet(&text, &["ago", "hour", "minute", "day", "week", "month"])
            .map(|snippet| parse_relative_time_to_iso(&snippet))
            .unwrap_or_default();

        let description = node
            .select(&self.description_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let mut skills: Vec<String> = Vec::new();
        for tier in &self.skill_tiers {
            skills = node.select(tier).map(element_text).collect();
            if !skills.is_empty() {
                break;
            }
        }
        skills.retain(|s| !s.is_empty());

        Some(JobRecord {
            scraped_at: now_iso(),
            job_id: self.extractor.extract_job_id(&url),
            posted_at,
            payment_type: payment_type.unwrap_or_default(),
            budget: budget.unwrap_or_default(),
            skill_level: skill_level.unwrap_or_default(),
            skills,
            title,
            url,
            description,
            location: self.extractor.extract_location(&text).unwrap_or_default(),
            rating: self.extractor.extract_rating(&text),
            proposals_count: self.extractor.extract_proposals(&text),
            ..JobRecord::default()
        })
    }
}

impl Default for JobParser {
    fn default() -> Self {
        Self::new(None)
    }
}

fn compile_selectors(sources: &[&str]) -> Vec<Selector> {
    sources
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
}

fn build_client(cookies: Option<&Arc<Jar>>, proxy: Option<&str>) -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    let mut builder = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .default_headers(headers);
    if let Some(jar) = cookies {
        builder = builder.cookie_provider(jar.clone());
    }
    if let Some(proxy_url) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }
    builder.build()
}

fn element_text(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
