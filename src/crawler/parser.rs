//! Listing page parser
//!
//! This module turns one search results page into records:
//! - Locates the results container
//! - Enumerates item elements (any `li` carrying the `s-item` class token)
//! - Pulls the product link, title and price text of each item
//! - Locates the "next page" link, independently of the items
//!
//! Missing fields never fail the page. An item without a title keeps a null
//! title, an item without a price element keeps an empty price, and an item
//! whose link carries no `itm/<digits>` id is dropped.

use crate::storage::Record;
use crate::url::{extract_item_id, resolve_link};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Compiled selectors for the listing page layout
struct ListingSelectors {
    container: Selector,
    item: Selector,
    link: Selector,
    title: Selector,
    price: Selector,
    next_page: Selector,
    item_class: Regex,
}

impl ListingSelectors {
    fn compile() -> Option<Self> {
        Some(Self {
            container: Selector::parse("div#srp-river-results").ok()?,
            item: Selector::parse("li[class]").ok()?,
            link: Selector::parse("a").ok()?,
            title: Selector::parse(r#"span[role="heading"]"#).ok()?,
            price: Selector::parse("span.s-item__price").ok()?,
            next_page: Selector::parse("a.pagination__next").ok()?,
            item_class: Regex::new(r"\bs-item\b").ok()?,
        })
    }
}

fn selectors() -> Option<&'static ListingSelectors> {
    static SELECTORS: OnceLock<Option<ListingSelectors>> = OnceLock::new();
    SELECTORS.get_or_init(ListingSelectors::compile).as_ref()
}

/// A record together with the item id it is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    pub item_id: String,
    pub record: Record,
}

/// What the results container yielded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// No results container on the page
    ContainerMissing,

    /// The container was found
    Items {
        /// Items with a usable id, in page order
        items: Vec<ExtractedItem>,

        /// Number of item elements matched, including dropped ones
        matched: usize,

        /// Item elements dropped because their link had no item id
        dropped: usize,
    },
}

/// Everything extracted from one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedListing {
    pub extraction: Extraction,

    /// Absolute URL of the next page, if the page links one
    pub next_page: Option<String>,
}

/// Parses a listing page
///
/// # Arguments
///
/// * `html` - The page body
/// * `page_url` - Resolved URL of the page, used to absolutize the next link
/// * `condition` - Facet label stamped onto every record
///
/// # Example
///
/// ```
/// use facet_sweep::crawler::{parse_listing, Extraction};
///
/// let html = r#"<div id="srp-river-results"><ul>
///   <li class="s-item"><a href="https://www.ebay.com/itm/123">x</a>
///   <span role="heading">Widget</span><span class="s-item__price">$5.00</span></li>
/// </ul></div>"#;
/// let parsed = parse_listing(html, "https://www.ebay.com/sch/i.html", "New");
/// match parsed.extraction {
///     Extraction::Items { items, .. } => assert_eq!(items[0].item_id, "123"),
///     Extraction::ContainerMissing => unreachable!(),
/// }
/// ```
pub fn parse_listing(html: &str, page_url: &str, condition: &str) -> ParsedListing {
    let Some(selectors) = selectors() else {
        tracing::error!("Listing selectors failed to compile");
        return ParsedListing {
            extraction: Extraction::ContainerMissing,
            next_page: None,
        };
    };
    let document = Html::parse_document(html);

    let next_page = document
        .select(&selectors.next_page)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| resolve_link(href, page_url));

    let extraction = match document.select(&selectors.container).next() {
        Some(container) => extract_items(selectors, container, condition),
        None => Extraction::ContainerMissing,
    };

    ParsedListing {
        extraction,
        next_page,
    }
}

fn extract_items(
    selectors: &ListingSelectors,
    container: ElementRef<'_>,
    condition: &str,
) -> Extraction {
    let mut items = Vec::new();
    let mut matched = 0;
    let mut dropped = 0;

    let elements = container.select(&selectors.item).filter(|element| {
        element
            .value()
            .classes()
            .any(|class| selectors.item_class.is_match(class))
    });

    for element in elements {
        matched += 1;

        let product_link = element
            .select(&selectors.link)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .map(str::to_string);

        let item_id = product_link
            .as_deref()
            .and_then(extract_item_id)
            .map(str::to_string);

        let (Some(product_link), Some(item_id)) = (product_link, item_id) else {
            tracing::debug!("Dropping item without an itm/<id> link");
            dropped += 1;
            continue;
        };

        let title = element.select(&selectors.title).next().map(element_text);
        let raw_price = element
            .select(&selectors.price)
            .next()
            .map(element_text)
            .unwrap_or_default();

        items.push(ExtractedItem {
            item_id,
            record: Record {
                title,
                condition: condition.to_string(),
                price: normalize_price(&raw_price),
                product_link,
            },
        });
    }

    Extraction::Items {
        items,
        matched,
        dropped,
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Strips every character that is not an ASCII digit or a decimal point
///
/// ```
/// use facet_sweep::crawler::normalize_price;
///
/// assert_eq!(normalize_price("US $1,234.56"), "1234.56");
/// ```
pub fn normalize_price(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}
