// tests/crawl_http.rs
// =============================================================================
// End-to-end crawls against a small axum site on 127.0.0.1, using the real
// reqwest-backed probe.
// =============================================================================

use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{any, get};
use axum::Router;

use site2pdf::checker::ReqwestProbe;
use site2pdf::crawl::NoopObserver;
use site2pdf::{crawl, CrawlConfig, CrawlError, SiteCrawler};

const HOME: &str = r#"
    <a href="/a">A</a>
    <a href="/b">B</a>
    <a href="http://external.invalid/">Elsewhere</a>
    <a href="/c">C</a>
    <a href="/soft">Soft</a>
    <a href="/no-head">No HEAD</a>
    <a href="mailto:team@example.com">Mail</a>
"#;

async fn no_head(method: Method) -> impl IntoResponse {
    if method == Method::HEAD {
        (StatusCode::METHOD_NOT_ALLOWED, Html(""))
    } else {
        (StatusCode::OK, Html("<p>GET only</p>"))
    }
}

fn site() -> Router {
    Router::new()
        .route("/", get(|| async { Html(HOME) }))
        .route("/a", get(|| async { Html(r#"<a href="/">Home</a>"#) }))
        .route("/b", get(|| async { Html("<p>b</p>") }))
        .route("/soft", get(|| async { Html("<h1>Sorry, page Not Found</h1>") }))
        .route("/no-head", any(no_head))
}

// Starts the app on a random port and returns its base URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn test_crawl_local_site() {
    let base = serve(site()).await;

    let report = crawl(&base, &CrawlConfig::default()).await.unwrap();

    let mut expected: Vec<String> = ["", "a", "b", "no-head"]
        .iter()
        .map(|path| format!("{base}{path}"))
        .collect();
    expected.sort();
    assert_eq!(report.valid_links, expected);
    assert_eq!(report.invalid_count, 2);
    assert_eq!(report.failed_pages, 0);
    assert_eq!(report.total_internal, 6);
    assert_eq!(report.duplicate_links, 1);
    assert_eq!(report.pages_fetched, 4);
}

#[tokio::test]
async fn test_validator_against_real_responses() {
    let base = serve(site()).await;
    let config = CrawlConfig::default();
    let crawler = SiteCrawler::new(config.clone(), ReqwestProbe::new(&config).unwrap());
    let validator = crawler.validator();

    assert!(validator.validate(&format!("{base}b")).await.is_valid());
    assert!(validator.validate(&format!("{base}no-head")).await.is_valid());
    assert!(!validator.validate(&format!("{base}c")).await.is_valid());
    assert!(!validator.validate(&format!("{base}soft")).await.is_valid());

    // same answer twice in a row
    for path in ["a", "c", "soft"] {
        let url = format!("{base}{path}");
        let first = validator.validate(&url).await.is_valid();
        let second = validator.validate(&url).await.is_valid();
        assert_eq!(first, second, "{url}");
    }
}

#[tokio::test]
async fn test_keyword_filter_on_live_site() {
    let base = serve(site()).await;
    let config = CrawlConfig {
        keywords: vec!["get only".to_string()],
        ..CrawlConfig::default()
    };
    let crawler = SiteCrawler::new(config.clone(), ReqwestProbe::new(&config).unwrap());

    let report = crawler.crawl(&base, &NoopObserver).await.unwrap();

    assert_eq!(report.valid_links, vec![base.clone(), format!("{base}no-head")]);
    assert_eq!(report.filtered_links, 2);
}

#[tokio::test]
async fn test_refused_seed_is_unreachable() {
    // Grab a free port, then close it again
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = crawl(&format!("http://{addr}/"), &CrawlConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::SeedUnreachable { .. }), "{err}");
}

#[tokio::test]
async fn test_seed_without_scheme_is_normalized() {
    let base = serve(site()).await;
    let bare = base.trim_start_matches("http://");

    let report = crawl(bare, &CrawlConfig::default()).await.unwrap();

    assert_eq!(report.seed, base);
}
