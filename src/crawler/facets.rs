//! Facet enumeration
//!
//! Asks the refine endpoint of a negotiated session which values the
//! configured aspect (normally `condition`) can take, and turns each value
//! into a filtered search URL.

use crate::crawler::{Session, Transport};
use crate::url::{facet_url, SESSION_PARAM};
use crate::{Result, SweepError};
use serde::Deserialize;

/// One filterable value of the crawled aspect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    /// Display label, e.g. "New" or "For parts or not working"
    pub name: String,

    /// Search URL restricted to this value
    pub base_url: String,
}

/// Refine endpoint response
#[derive(Debug, Deserialize)]
struct RefineResponse {
    group: Vec<FacetGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FacetGroup {
    #[serde(default)]
    field_id: Option<String>,
    #[serde(default)]
    entries: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FacetEntry {
    label: FacetLabel,
    param_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FacetLabel {
    text_spans: Vec<TextSpan>,
}

#[derive(Debug, Deserialize)]
struct TextSpan {
    text: String,
}

/// Lists the facets available to a session
///
/// # Arguments
///
/// * `transport` - The session's transport
/// * `refine_endpoint` - URL of the refine/aggregation endpoint
/// * `aspect` - Field id of the facet group to read (e.g. `condition`)
/// * `session` - The negotiated session
/// * `resolved_url` - Resolved URL of the session's first listing page
///
/// # Returns
///
/// Facets in the order the endpoint lists them. A missing group is reported
/// as `SweepError::FacetGroupMissing`; it means the site changed shape.
pub async fn enumerate<T: Transport + ?Sized>(
    transport: &T,
    refine_endpoint: &str,
    aspect: &str,
    session: &Session,
    resolved_url: &str,
) -> Result<Vec<Facet>> {
    let params = [
        ("no_encode_refine_params", "1"),
        ("_fsrp", "1"),
        (SESSION_PARAM, session.session_id.as_str()),
        ("_aspectname", aspect),
    ];
    let page = transport.get(refine_endpoint, &params).await?;

    let facets = parse_refine_response(&page.body, refine_endpoint, aspect, resolved_url)?;
    tracing::debug!(
        "Session {} exposes {} '{}' facets",
        session.session_id,
        facets.len(),
        aspect
    );
    Ok(facets)
}

/// Parses a refine response body into facets
pub fn parse_refine_response(
    body: &str,
    endpoint: &str,
    aspect: &str,
    resolved_url: &str,
) -> Result<Vec<Facet>> {
    let response: RefineResponse = serde_json::from_str(body).map_err(|source| SweepError::Json {
        endpoint: endpoint.to_string(),
        source,
    })?;

    let group = response
        .group
        .into_iter()
        .find(|group| group.field_id.as_deref() == Some(aspect))
        .ok_or_else(|| SweepError::FacetGroupMissing {
            field: aspect.to_string(),
        })?;

    group
        .entries
        .into_iter()
        .map(|value| -> Result<Facet> {
            let entry: FacetEntry =
                serde_json::from_value(value).map_err(|source| SweepError::Json {
                    endpoint: endpoint.to_string(),
                    source,
                })?;
            let name = entry
                .label
                .text_spans
                .into_iter()
                .next()
                .map(|span| span.text)
                .ok_or_else(|| SweepError::Protocol {
                    endpoint: endpoint.to_string(),
                    message: format!("facet entry {} has no label text", entry.param_value),
                })?;

            Ok(Facet {
                name,
                base_url: facet_url(resolved_url, &entry.param_value),
            })
        })
        .collect()
}
