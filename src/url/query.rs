use url::Url;

/// Query parameter carrying the server-side search session id
pub const SESSION_PARAM: &str = "_ssn";

/// Query parameter that filters search results by condition
pub const CONDITION_PARAM: &str = "LH_ItemCondition";

/// Extracts the `_ssn` session id from a (post-redirect) search URL
///
/// Returns None when the URL is malformed, the parameter is absent, or it
/// carries an empty value.
///
/// # Examples
///
/// ```
/// use facet_sweep::url::session_id_from_url;
///
/// let url = "https://www.ebay.com/sch/i.html?_ssn=garlandcomputer&_ipg=60";
/// assert_eq!(session_id_from_url(url), Some("garlandcomputer".to_string()));
/// ```
pub fn session_id_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == SESSION_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Builds the base URL for one condition facet
///
/// The parameter is appended textually so the rest of the negotiated search
/// URL is left exactly as the server produced it.
pub fn facet_url(resolved_url: &str, param_value: &str) -> String {
    let separator = if resolved_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}{}={}",
        resolved_url, separator, CONDITION_PARAM, param_value
    )
}

/// Resolves a link href against the page it was found on
///
/// Returns None for empty hrefs, fragment-only links and anything that does
/// not resolve to an http(s) URL.
pub fn resolve_link(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = match Url::parse(base_url) {
        Ok(base) => base.join(href).ok()?,
        Err(_) => Url::parse(href).ok()?,
    };

    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}
