use regex::Regex;

/// Bytes kept on each side of a keyword hit.
const SNIPPET_WINDOW: usize = 24;

/// Case-insensitive keyword search over a fragment's text. Returns a
/// whitespace-collapsed window around the first needle that matches, or
/// `None` when no needle occurs. Needles are tried in order.
pub fn find_snippet(text: &str, needles: &[&str]) -> Option<String> {
    let haystack = text.to_lowercase();
    for needle in needles {
        if let Some(idx) = haystack.find(&needle.to_lowercase()) {
            let idx = idx.min(text.len());
            let mut start = idx.saturating_sub(SNIPPET_WINDOW);
            while start > 0 && !text.is_char_boundary(start) {
                start -= 1;
            }
            let mut end = (idx + needle.len() + SNIPPET_WINDOW).min(text.len());
            while end < text.len() && !text.is_char_boundary(end) {
                end += 1;
            }
            let snippet = text[start..end]
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            return Some(snippet);
        }
    }
    None
}

pub struct Extractor {
    money_regex: Regex,
    proposals_regex: Regex,
    country_regex: Regex,
    rating_regex: Regex,
    bare_decimal_regex: Regex,
    job_id_regex: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            // Single amounts, ranges like "$10.00-$20.00", and "$50+"
            money_regex: Regex::new(
                r"\$\s?\d[\d,]*(\.\d{2})?(\s?-\s?\$\s?\d[\d,]*(\.\d{2})?)?|\$\s?\d[\d,]*\+?",
            )
            .unwrap(),
            proposals_regex: Regex::new(r"(?i)Proposals\s*:\s*(\d+)").unwrap(),
            country_regex: Regex::new(
                r"(?i)\b(United States|United Kingdom|Canada|Australia|Germany|France|India|Pakistan|Bangladesh|Philippines|Brazil|Spain|Italy|Netherlands|UAE|Saudi Arabia|Singapore|New Zealand|Poland|Mexico|Turkey|Japan|China|South Korea|South Africa)\b",
            )
            .unwrap(),
            rating_regex: Regex::new(r"(\d\.\d{1,2})\s*/?\s*5").unwrap(),
            bare_decimal_regex: Regex::new(r"\b(\d\.\d{1,2})\b").unwrap(),
            job_id_regex: Regex::new(r"\d{7,}").unwrap(),
        }
    }

    /// First currency amount or range in the text, verbatim.
    pub fn extract_budget(&self, text: &str) -> Option<String> {
        self.money_regex.find(text).map(|m| m.as_str().to_string())
    }

    /// Labeled integer like "Proposals: 12".
    pub fn extract_proposals(&self, text: &str) -> Option<u32> {
        self.proposals_regex
            .captures(text)
            .and_then(|caps| caps[1].parse().ok())
    }

    /// First country-name hit against the fixed allow-list.
    pub fn extract_location(&self, text: &str) -> Option<String> {
        self.country_regex
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    /// Client rating in [0.0, 5.0]. Prefers an "x.y/5" shape; otherwise the
    /// first bare decimal in range is accepted, so a lone price like "$4.99"
    /// can pass for a rating. Known heuristic weakness, kept as-is.
    pub fn extract_rating(&self, text: &str) -> Option<f64> {
        if let Some(caps) = self.rating_regex.captures(text) {
            if let Ok(val) = caps[1].parse::<f64>() {
                return Some(val);
            }
        }
        if let Some(caps) = self.bare_decimal_regex.captures(text) {
            if let Ok(val) = caps[1].parse::<f64>() {
                if (0.0..=5.0).contains(&val) {
                    return Some(val);
                }
            }
        }
        None
    }

    /// Listing URLs carry the job id as a long digit run. First run of 7+
    /// consecutive digits wins; empty string when the URL has none.
    pub fn extract_job_id(&self, url: &str) -> String {
        self.job_id_regex
            .find(url)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
