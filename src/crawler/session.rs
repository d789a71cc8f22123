//! Search-session negotiation
//!
//! A session is opened by fetching a seed search URL, reading the `_ssn`
//! session id off the redirected URL, trading it for a display token, and
//! submitting the customize form that switches results to USD pricing and
//! the expected layout. The customize response is itself the first listing
//! page of the session and is handed back to the caller.

use crate::config::SiteConfig;
use crate::crawler::{Page, Transport};
use crate::url::{session_id_from_url, SESSION_PARAM};
use crate::{Result, SweepError};
use serde::Deserialize;

/// Display flags submitted ahead of the search URL and token
///
/// The customize endpoint reads repeated `_fcpe` fields positionally, so the
/// order here is part of the protocol.
const CUSTOMIZE_FLAGS: &[(&str, &str)] = &[
    ("_fcdm", "1"),
    ("_fcss", "12"),
    ("_fcippl", "2"),
    ("_fctab", "0"),
    ("_fcpe", "7"),
    ("_fcpe", "5"),
    ("_fcse", "1"),
    ("_fcpe", "3"),
];

/// A negotiated marketplace search session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Server-assigned `_ssn` value
    pub session_id: String,

    /// Currency/display token returned by the token endpoint
    pub token: String,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    success: bool,
    #[serde(default)]
    token: Option<String>,
}

/// Opens a session starting from `seed_url`
///
/// # Returns
///
/// * `Ok((Page, Session))` - The first listing page (the customize response) and the session
/// * `Err(SweepError::MissingSessionId)` - The resolved seed URL carries no `_ssn`
/// * `Err(SweepError::TokenRejected)` - The token endpoint answered `success: false`
/// * `Err(SweepError)` - Transport or protocol failure at any step
pub async fn negotiate<T: Transport + ?Sized>(
    transport: &T,
    site: &SiteConfig,
    seed_url: &str,
) -> Result<(Page, Session)> {
    let seed = transport.get(seed_url, &[]).await?;

    let session_id =
        session_id_from_url(&seed.resolved_url).ok_or_else(|| SweepError::MissingSessionId {
            url: seed.resolved_url.clone(),
        })?;
    tracing::debug!("Session id {} from {}", session_id, seed.resolved_url);

    let token = fetch_token(transport, site, &session_id).await?;

    let form = customize_form(&seed.resolved_url, &token);
    let first_page = transport.post(&site.customize_endpoint(), &form).await?;
    tracing::debug!("Customized session {} -> {}", session_id, first_page.resolved_url);

    Ok((first_page, Session { session_id, token }))
}

/// Trades a session id for the display token
async fn fetch_token<T: Transport + ?Sized>(
    transport: &T,
    site: &SiteConfig,
    session_id: &str,
) -> Result<String> {
    let endpoint = site.token_endpoint();
    let page = transport
        .get(&endpoint, &[(SESSION_PARAM, session_id)])
        .await?;

    let response: TokenResponse =
        serde_json::from_str(&page.body).map_err(|source| SweepError::Json {
            endpoint: endpoint.clone(),
            source,
        })?;

    if !response.success {
        return Err(SweepError::TokenRejected {
            session_id: session_id.to_string(),
        });
    }

    response
        .token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| SweepError::Protocol {
            endpoint,
            message: "success response without a token".to_string(),
        })
}

/// Builds the customize form in submission order
fn customize_form<'a>(search_url: &'a str, token: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut form: Vec<(&'a str, &'a str)> = CUSTOMIZE_FLAGS.to_vec();
    form.push(("_fcsp", search_url));
    form.push(("action", "apply"));
    form.push(("srt", token));
    form
}
