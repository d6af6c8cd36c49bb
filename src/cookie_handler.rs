use crate::job_parser::UPWORK_BASE;
use log::debug;
use reqwest::cookie::Jar;
use std::sync::Arc;
use url::Url;

/// Split a raw cookie-header string ("name=value; name2=value2") into
/// name/value pairs. Entries without an `=` are ignored.
pub fn parse_cookie_string(cookie_string: &str) -> Vec<(String, String)> {
    cookie_string
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Build a cookie jar usable by the page fetcher. Cookies default to the
/// site's domain and root path. Blank input yields no jar at all.
pub fn jar_from_cookie_string(cookie_string: &str) -> Option<Arc<Jar>> {
    if cookie_string.trim().is_empty() {
        return None;
    }

    let pairs = parse_cookie_string(cookie_string);
    let base = Url::parse(UPWORK_BASE).unwrap();
    let jar = Jar::default();
    for (name, value) in &pairs {
        jar.add_cookie_str(
            &format!("{}={}; Domain=.upwork.com; Path=/", name, value),
            &base,
        );
    }
    debug!("Prepared cookie jar with {} cookies", pairs.len());
    Some(Arc::new(jar))
}
