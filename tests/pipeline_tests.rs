//! Integration tests for the scraping pipeline
//!
//! These use wiremock to stand in for the target site and exercise the
//! batch runner, the discovery crawl, and the command surface
//! end-to-end against a temporary data directory.

use nisbets_scraper::storage::{load_progress, load_urls};
use nisbets_scraper::{Config, Pipeline, ScrapeError};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test config rooted at a temp data dir, with delays shrunk to
/// milliseconds
fn test_config(data_dir: &Path, base_url: &str) -> Config {
    let mut config = Config::for_target(data_dir, base_url);
    config.scraper.retry_delay_ms = [0, 1];
    config.scraper.page_delay_ms = [0, 1];
    // Keep the first-run fallback inside the temp dir so a stray file in
    // the working directory cannot leak into a test
    config.scraper.bundled_urls_file = data_dir.join("bundled_urls.txt");
    config.ensure_data_dirs().unwrap();
    config
}

fn write_urls(config: &Config, urls: &[String]) {
    std::fs::write(config.urls_file(), urls.join("\n") + "\n").unwrap();
}

async fn mount_product_page(server: &MockServer, route: &str, title: &str, price: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><body>
            <h1>{}</h1>
            <div class="product-price">{} inc VAT</div>
            <div class="product-description"><p>Description of {}.</p></div>
            </body></html>"#,
            title, price, title
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_batch_scrapes_and_checkpoints() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    mount_product_page(&server, "/a/ab12345", "Widget", "£12.50").await;
    write_urls(&config, &[format!("{}/a/ab12345", server.uri())]);

    let pipeline = Pipeline::new(config.clone());
    let ran = pipeline.run_batch(None).await.unwrap();
    assert!(ran);

    let catalog = pipeline.load_catalog().unwrap();
    assert_eq!(catalog.info.total, 1);
    assert_eq!(catalog.info.failed, 0);
    assert!(catalog.failed_urls.is_empty());

    let record = &catalog.products[0];
    assert_eq!(record.title, "Widget");
    assert_eq!(record.source_sku, "AB12345");
    assert_eq!(record.source_price, "12.50");
    assert_eq!(record.variants.len(), 1);
    assert_eq!(record.variants[0].price, "12.50");
    assert_eq!(record.variants[0].currency, "GBP");
    assert!(record.body_html.contains("Description of Widget"));
    assert_eq!(
        record.tags,
        vec!["SKU:AB12345", "UK", "Nisbets UK", "GBP"]
    );

    let progress = load_progress(&config.progress_file());
    assert_eq!(progress.last_index, 1);
    assert!(progress.failed_urls.is_empty());

    let status = pipeline.status();
    assert!(!status.running);
    assert!(status.last_run.is_some());
    assert_eq!(status.products_scraped, 1);
    assert_eq!(status.error, None);
}

#[tokio::test]
async fn test_batch_records_fetch_failures() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    // No mock mounted: the only URL 404s
    let url = format!("{}/a/zz999", server.uri());
    write_urls(&config, &[url.clone()]);

    let pipeline = Pipeline::new(config.clone());
    pipeline.run_batch(None).await.unwrap();

    let catalog = pipeline.load_catalog().unwrap();
    assert!(catalog.products.is_empty());
    assert_eq!(catalog.failed_urls, vec![url]);
    assert_eq!(catalog.info.failed, 1);

    let progress = load_progress(&config.progress_file());
    assert_eq!(progress.last_index, 1);
    assert_eq!(progress.failed_urls.len(), 1);
    assert_eq!(pipeline.status().failed_count, 1);
}

#[tokio::test]
async fn test_untitled_record_is_discarded_but_not_failed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    Mock::given(method("GET"))
        .and(path("/a/ab111"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>no heading</body></html>"))
        .mount(&server)
        .await;
    write_urls(&config, &[format!("{}/a/ab111", server.uri())]);

    let pipeline = Pipeline::new(config.clone());
    pipeline.run_batch(None).await.unwrap();

    let catalog = pipeline.load_catalog().unwrap();
    assert!(catalog.products.is_empty());
    // Distinct from a fetch failure: the URL is consumed, not failed
    assert!(catalog.failed_urls.is_empty());
    assert_eq!(load_progress(&config.progress_file()).last_index, 1);
}

#[tokio::test]
async fn test_batch_resumes_from_checkpoint_and_clips_window() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    mount_product_page(&server, "/a/aa11", "First", "£1.00").await;
    mount_product_page(&server, "/b/bb22", "Second", "£2.00").await;
    mount_product_page(&server, "/c2/cc33", "Third", "£3.00").await;
    write_urls(
        &config,
        &[
            format!("{}/a/aa11", server.uri()),
            format!("{}/b/bb22", server.uri()),
            format!("{}/c2/cc33", server.uri()),
        ],
    );

    // Pretend index 0 was already attempted in an earlier run
    std::fs::write(
        config.progress_file(),
        r#"{"last_index": 1, "failed_urls": [], "timestamp": ""}"#,
    )
    .unwrap();

    let pipeline = Pipeline::new(config.clone());
    pipeline.run_batch(Some(10)).await.unwrap();

    // Window was [1, 3): exactly min(B, L-k) = 2 URLs processed
    let catalog = pipeline.load_catalog().unwrap();
    assert_eq!(catalog.products.len(), 2);
    assert_eq!(catalog.products[0].title, "Second");
    assert_eq!(catalog.products[1].title, "Third");
    assert_eq!(load_progress(&config.progress_file()).last_index, 3);

    // Re-running against the exhausted checkpoint processes nothing
    pipeline.run_batch(Some(10)).await.unwrap();
    let catalog = pipeline.load_catalog().unwrap();
    assert_eq!(catalog.products.len(), 2);
    assert_eq!(load_progress(&config.progress_file()).last_index, 3);
}

#[tokio::test]
async fn test_batch_size_bounds_the_window() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    mount_product_page(&server, "/a/aa11", "First", "£1.00").await;
    mount_product_page(&server, "/b/bb22", "Second", "£2.00").await;
    write_urls(
        &config,
        &[
            format!("{}/a/aa11", server.uri()),
            format!("{}/b/bb22", server.uri()),
        ],
    );

    let pipeline = Pipeline::new(config.clone());
    pipeline.run_batch(Some(1)).await.unwrap();

    assert_eq!(pipeline.load_catalog().unwrap().products.len(), 1);
    assert_eq!(load_progress(&config.progress_file()).last_index, 1);
}

#[tokio::test]
async fn test_batch_falls_back_to_bundled_url_list() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    mount_product_page(&server, "/a/ab111", "Bundled Widget", "£4.00").await;

    // No runtime list under data-dir, only the bundled fallback
    std::fs::write(
        &config.scraper.bundled_urls_file,
        format!("{}/a/ab111\n", server.uri()),
    )
    .unwrap();

    let pipeline = Pipeline::new(config.clone());
    assert!(pipeline.run_batch(None).await.unwrap());

    let catalog = pipeline.load_catalog().unwrap();
    assert_eq!(catalog.products.len(), 1);
    assert_eq!(catalog.products[0].title, "Bundled Widget");
}

#[tokio::test]
async fn test_checkpoint_saves_mid_window() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    // 26 URLs: the first 25 hit wiremock's unmatched-request 404 and are
    // consumed immediately; the 26th stalls long enough for the
    // checkpoint written at index 25 to be observed from disk
    let urls: Vec<String> = (1..=26)
        .map(|i| format!("{}/a/zz{:03}", server.uri(), i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/a/zz026"))
        .respond_with(
            ResponseTemplate::new(404).set_delay(std::time::Duration::from_millis(2000)),
        )
        .mount(&server)
        .await;
    write_urls(&config, &urls);

    let pipeline = Pipeline::new(config.clone());
    let background = pipeline.clone();
    let task = tokio::spawn(async move { background.run_batch(None).await });

    let mut checkpoint = load_progress(&config.progress_file());
    for _ in 0..300 {
        checkpoint = load_progress(&config.progress_file());
        if checkpoint.last_index >= 25 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    // The mid-window checkpoint: both files reflect index 25 while the
    // run is still inside the window
    assert!(pipeline.is_running());
    assert_eq!(checkpoint.last_index, 25);
    assert_eq!(checkpoint.failed_urls.len(), 25);
    let catalog = pipeline.load_catalog().unwrap();
    assert_eq!(catalog.info.failed, 25);
    assert!(catalog.products.is_empty());

    assert!(task.await.unwrap().unwrap());
    let finished = load_progress(&config.progress_file());
    assert_eq!(finished.last_index, 26);
    assert_eq!(finished.failed_urls.len(), 26);
}

#[tokio::test]
async fn test_batch_without_urls_reports_config_error() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), "https://www.nisbets.co.uk");

    let pipeline = Pipeline::new(config);
    let result = pipeline.run_batch(None).await;
    assert!(matches!(result, Err(ScrapeError::NoUrls)));

    let status = pipeline.status();
    assert!(!status.running);
    assert!(status.error.unwrap().contains("No URLs"));
}

#[tokio::test]
async fn test_discovery_builds_sorted_url_list() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    // Root links to one category, one product, and one ignorable page
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <a href="/c/catering-equipment">Catering</a>
            <a href="/widget/zz999">Widget</a>
            <a href="/about-us">About</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    // The category page yields another product and links back to itself
    Mock::given(method("GET"))
        .and(path("/c/catering-equipment"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <a href="/c/catering-equipment">Self</a>
            <a href="/widget/aa111?ref=listing">Other widget</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(config.clone());
    let ran = pipeline.run_discovery(Some(10)).await.unwrap();
    assert!(ran);

    let urls = load_urls(&config.urls_file(), Path::new("/nonexistent")).unwrap();
    assert_eq!(
        urls,
        vec![
            format!("{}/widget/aa111", server.uri()),
            format!("{}/widget/zz999", server.uri()),
        ]
    );

    let status = pipeline.status();
    assert_eq!(status.total_urls, 2);
    assert!(!status.running);
}

#[tokio::test]
async fn test_trigger_while_running_is_noop() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    Mock::given(method("GET"))
        .and(path("/a/ab123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<h1>Slow Widget</h1>")
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    write_urls(&config, &[format!("{}/a/ab123", server.uri())]);

    let pipeline = Pipeline::new(config);
    let background = pipeline.clone();
    let task = tokio::spawn(async move { background.run_batch(None).await });

    // Give the spawned batch time to take the run lock
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(pipeline.is_running());
    assert!(!pipeline.run_batch(None).await.unwrap());
    assert!(!pipeline.run_discovery(None).await.unwrap());

    assert!(task.await.unwrap().unwrap());
    assert!(!pipeline.is_running());
}

#[tokio::test]
async fn test_catalog_appends_across_runs() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path(), &server.uri());

    mount_product_page(&server, "/a/aa11", "First", "£1.00").await;
    mount_product_page(&server, "/b/bb22", "Second", "£2.00").await;
    write_urls(
        &config,
        &[
            format!("{}/a/aa11", server.uri()),
            format!("{}/b/bb22", server.uri()),
        ],
    );

    let pipeline = Pipeline::new(config.clone());
    pipeline.run_batch(Some(1)).await.unwrap();
    pipeline.run_batch(Some(1)).await.unwrap();

    let catalog = pipeline.load_catalog().unwrap();
    assert_eq!(catalog.products.len(), 2);
    assert_eq!(catalog.products[0].title, "First");
    assert_eq!(catalog.products[1].title, "Second");
    assert_eq!(load_progress(&config.progress_file()).last_index, 2);
}
