//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the marketplace: a seed page that
//! redirects onto a `_ssn` search URL, the token and customize endpoints, the
//! refine endpoint, and listing pages.

use facet_sweep::config::{validate, Config};
use facet_sweep::crawler::{Coordinator, CrawlMode};
use facet_sweep::state::PageOutcome;
use facet_sweep::SweepError;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEED_PATH: &str = "/sch/garlandcomputer/m.html";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.seed_url = format!("{}{}", base_url, SEED_PATH);
    config.output.directory = output.path().join("result");
    validate(&config).expect("test config is valid");
    config
}

fn listing_page(items: &[(&str, &str, &str)], next: Option<&str>) -> String {
    let items: String = items
        .iter()
        .map(|(link, title, price)| {
            format!(
                r#"<li class="s-item s-item__pl-on-bottom"><div class="s-item__info">
                   <a class="s-item__link" href="{}"><div class="s-item__title"><span role="heading">{}</span></div></a>
                   <div class="s-item__details"><span class="s-item__price">{}</span></div>
                   </div></li>"#,
                link, title, price
            )
        })
        .collect();
    let next = next
        .map(|href| {
            format!(
                r#"<nav class="pagination"><a class="pagination__next icon-link" href="{}">Next</a></nav>"#,
                href
            )
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><div id="srp-river-results"><ul class="srp-results">{}</ul></div>{}</body></html>"#,
        items, next
    )
}

fn refine_body(entries: &[(&str, &str)]) -> String {
    let entries: Vec<String> = entries
        .iter()
        .map(|(label, value)| {
            format!(
                r#"{{"label":{{"textSpans":[{{"text":"{}"}}]}},"paramValue":"{}"}}"#,
                label, value
            )
        })
        .collect();
    format!(
        r#"{{"group":[{{"fieldId":"price","entries":[]}},{{"fieldId":"condition","entries":[{}]}}]}}"#,
        entries.join(",")
    )
}

/// Mounts the seed redirect and the token endpoint
async fn mount_session(server: &MockServer, token_body: &str) {
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path(SEED_PATH))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/sch/i.html?_ssn=ABC123", base).as_str()),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>store</body></html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/ajax/customize"))
        .and(query_param("_ssn", "ABC123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(token_body))
        .mount(server)
        .await;
}

/// Mounts the customize form endpoint, redirecting to the results page
async fn mount_customize(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/sch/customize"))
        .and(body_string_contains("srt=T1"))
        .and(body_string_contains("_fcpe=7&_fcpe=5&_fcse=1&_fcpe=3"))
        .respond_with(ResponseTemplate::new(303).insert_header(
            "location",
            format!("{}/sch/results?_ssn=ABC123", server.uri()).as_str(),
        ))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_refine(server: &MockServer, entries: &[(&str, &str)], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/sch/ajax/refine"))
        .and(query_param("_ssn", "ABC123"))
        .and(query_param("_aspectname", "condition"))
        .respond_with(ResponseTemplate::new(200).set_body_string(refine_body(entries)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn read_record(dir: &std::path::Path, item_id: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.join(format!("{}.json", item_id)))
        .expect("record file exists");
    serde_json::from_str(&content).expect("record is JSON")
}

fn record_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_targeted_crawl_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_session(&server, r#"{"success":true,"token":"T1"}"#).await;
    // Discovery session plus the fresh session for the chosen facet
    mount_customize(&server, 2).await;
    mount_refine(&server, &[("New", "1000"), ("Used", "3000")], 1).await;

    let link = format!("{}/itm/999888777?x=1", base);
    Mock::given(method("GET"))
        .and(path("/sch/results"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[(&link, "Widget", "US $19.99")], None)),
        )
        // customize redirect x2 + facet seed fetch; the first listing page is never refetched
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&base, &output);
    let result_dir = config.output.directory.clone();
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let stats = coordinator
        .run(&CrawlMode::Targeted("new".to_string()))
        .await
        .expect("Crawl failed");

    assert_eq!(stats.facets_crawled, vec!["New"]);
    assert_eq!(stats.records_persisted, 1);
    assert_eq!(stats.pages(PageOutcome::Scraped), 1);

    assert_eq!(record_count(&result_dir), 1);
    let record = read_record(&result_dir, "999888777");
    assert_eq!(
        record,
        serde_json::json!({
            "title": "Widget",
            "condition": "New",
            "price": "19.99",
            "product_link": link,
        })
    );
}

#[tokio::test]
async fn test_targeted_crawl_follows_pagination() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_session(&server, r#"{"success":true,"token":"T1"}"#).await;
    mount_customize(&server, 2).await;
    mount_refine(&server, &[("Used", "3000")], 1).await;

    let first = format!("{}/itm/111", base);
    let second = format!("{}/itm/222", base);
    let third = format!("{}/itm/333", base);

    Mock::given(method("GET"))
        .and(path("/sch/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[(&first, "First", "$1.00")],
            Some("/sch/results/2?_ssn=ABC123&_pgn=2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/results/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[(&second, "Second", "$2.00")],
            Some(&format!("{}/sch/results/3?_ssn=ABC123&_pgn=3", base)),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/results/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[(&third, "Third", "$3,000.50")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&base, &output);
    let result_dir = config.output.directory.clone();
    let coordinator = Coordinator::new(config).unwrap();

    let stats = coordinator
        .run(&CrawlMode::Targeted("USED".to_string()))
        .await
        .unwrap();

    assert_eq!(stats.pages(PageOutcome::Scraped), 3);
    assert_eq!(stats.records_persisted, 3);
    assert_eq!(record_count(&result_dir), 3);
    assert_eq!(read_record(&result_dir, "333")["price"], "3000.50");
    assert_eq!(read_record(&result_dir, "222")["condition"], "Used");
}

#[tokio::test]
async fn test_facet_not_found_writes_nothing() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_session(&server, r#"{"success":true,"token":"T1"}"#).await;
    // Only the discovery session is negotiated
    mount_customize(&server, 1).await;
    mount_refine(
        &server,
        &[("New", "1000"), ("Used", "3000"), ("For parts", "7000")],
        1,
    )
    .await;

    let link = format!("{}/itm/5", server.uri());
    Mock::given(method("GET"))
        .and(path("/sch/results"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_page(&[(&link, "x", "$1")], None)),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &output);
    let result_dir = config.output.directory.clone();
    let coordinator = Coordinator::new(config).unwrap();

    let result = coordinator
        .run(&CrawlMode::Targeted("Refurbished".to_string()))
        .await;

    match result {
        Err(SweepError::FacetNotFound {
            requested,
            available,
        }) => {
            assert_eq!(requested, "Refurbished");
            assert_eq!(available, vec!["New", "Used", "For parts"]);
        }
        other => panic!("expected FacetNotFound, got {:?}", other),
    }

    assert!(result_dir.is_dir());
    assert_eq!(record_count(&result_dir), 0);
}

#[tokio::test]
async fn test_full_sweep_overwrites_by_item_id() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_session(&server, r#"{"success":true,"token":"T1"}"#).await;
    // Discovery plus one fresh session per facet
    mount_customize(&server, 3).await;
    mount_refine(&server, &[("New", "1000"), ("Used", "3000")], 1).await;

    let shared = format!("{}/itm/424242", server.uri());
    Mock::given(method("GET"))
        .and(path("/sch/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[(&shared, "Shared", "$10.00")],
            None,
        )))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &output);
    let result_dir = config.output.directory.clone();
    let coordinator = Coordinator::new(config).unwrap();

    let stats = coordinator.run(&CrawlMode::FullSweep).await.unwrap();

    assert_eq!(stats.facets_crawled, vec!["New", "Used"]);
    assert_eq!(stats.records_persisted, 2);

    // Same item under both facets: one artifact, last facet wins
    assert_eq!(record_count(&result_dir), 1);
    assert_eq!(read_record(&result_dir, "424242")["condition"], "Used");
}

#[tokio::test]
async fn test_failed_facet_does_not_abort_siblings() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    // Mounted ahead of the general results mock so it wins for the "New" facet:
    // its seed lands on a URL without a session id
    Mock::given(method("GET"))
        .and(path("/sch/results"))
        .and(query_param("LH_ItemCondition", "1000"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/sch/lost", base).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/lost"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    mount_session(&server, r#"{"success":true,"token":"T1"}"#).await;
    // Discovery plus the "Used" session; "New" never reaches the customize step
    mount_customize(&server, 2).await;
    mount_refine(&server, &[("New", "1000"), ("Used", "3000")], 1).await;

    let link = format!("{}/itm/777", base);
    Mock::given(method("GET"))
        .and(path("/sch/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[(&link, "Survivor", "$7.00")],
            None,
        )))
        .mount(&server)
        .await;

    let config = create_test_config(&base, &output);
    let result_dir = config.output.directory.clone();
    let coordinator = Coordinator::new(config).unwrap();

    let stats = coordinator.run(&CrawlMode::FullSweep).await.unwrap();

    assert_eq!(stats.facets_crawled, vec!["Used"]);
    assert_eq!(stats.records_persisted, 1);
    assert_eq!(record_count(&result_dir), 1);
    assert_eq!(read_record(&result_dir, "777")["condition"], "Used");
}

#[tokio::test]
async fn test_container_missing_is_contained() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_session(&server, r#"{"success":true,"token":"T1"}"#).await;
    mount_customize(&server, 2).await;
    mount_refine(&server, &[("New", "1000")], 1).await;

    Mock::given(method("GET"))
        .and(path("/sch/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><h1>Pardon our interruption</h1>
               <a class="pagination__next" href="/sch/results/2">Next</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/results/2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &output);
    let coordinator = Coordinator::new(config).unwrap();

    let stats = coordinator.run(&CrawlMode::FullSweep).await.unwrap();

    assert_eq!(stats.pages(PageOutcome::ContainerMissing), 1);
    assert_eq!(stats.records_persisted, 0);
}

#[tokio::test]
async fn test_token_rejection_aborts_discovery() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_session(&server, r#"{"success":false}"#).await;
    mount_customize(&server, 0).await;

    let config = create_test_config(&server.uri(), &output);
    let coordinator = Coordinator::new(config).unwrap();

    let result = coordinator.run(&CrawlMode::FullSweep).await;
    assert!(matches!(
        result,
        Err(SweepError::TokenRejected { ref session_id }) if session_id == "ABC123"
    ));
}

#[tokio::test]
async fn test_missing_session_id_aborts_discovery() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // Seed answers directly instead of redirecting onto a _ssn URL
    Mock::given(method("GET"))
        .and(path(SEED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;
    mount_customize(&server, 0).await;

    let config = create_test_config(&server.uri(), &output);
    let coordinator = Coordinator::new(config).unwrap();

    let result = coordinator.discover().await;
    assert!(matches!(result, Err(SweepError::MissingSessionId { .. })));
}
