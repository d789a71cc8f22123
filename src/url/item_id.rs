use regex::Regex;
use std::sync::OnceLock;

fn item_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"itm/(\d+)").ok())
        .as_ref()
}

/// Extracts the numeric listing id following `itm/` in a product link
///
/// # Examples
///
/// ```
/// use facet_sweep::url::extract_item_id;
///
/// let link = "https://www.ebay.com/itm/999888777?hash=item1";
/// assert_eq!(extract_item_id(link), Some("999888777"));
/// assert_eq!(extract_item_id("https://www.ebay.com/str/garland"), None);
/// ```
pub fn extract_item_id(link: &str) -> Option<&str> {
    item_id_pattern()?
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
