//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve synthetic listing pages and run the
//! full fetch → extract → store cycle into a temporary SQLite database.

use reel_harvest::config::{parse_config, Config};
use reel_harvest::crawler::{harvest, Dispatcher, HttpFetcher, PageExtractor};
use reel_harvest::storage::SqliteStorage;
use reel_harvest::HarvestError;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One listing item in Top 250 markup
fn listing_item(rank: u32, title: &str, poster: Option<&str>) -> String {
    let img = match poster {
        Some(src) => format!(r#"<img width="100" alt="{}" src="{}" class="">"#, title, src),
        None => format!(r#"<img width="100" alt="{}" class="">"#, title),
    };

    format!(
        r#"
        <li>
            <div class="item">
                <div class="pic">
                    <em class="">{rank}</em>
                    <a href="https://movie.douban.com/subject/{rank}/">{img}</a>
                </div>
                <div class="info">
                    <div class="hd">
                        <a href="https://movie.douban.com/subject/{rank}/" class="">
                            <span class="title">{title}</span>
                            <span class="title">&nbsp;/&nbsp;Original</span>
                        </a>
                    </div>
                    <div class="bd">
                        <p class="">
                            导演: 弗兰克·德拉邦特 Frank Darabont&nbsp;&nbsp;&nbsp;主演: 蒂姆·罗宾斯 Tim Robbins / Morgan Freeman
                            <br>
                            1994&nbsp;/&nbsp;美国&nbsp;/&nbsp;犯罪 剧情
                        </p>
                        <div class="star">
                            <span class="rating5-t"></span>
                            <span class="rating_num" property="v:average">9.{rank}</span>
                            <span>100000人评价</span>
                        </div>
                        <p class="quote">
                            <span class="inq">Quote {rank}</span>
                        </p>
                    </div>
                </div>
            </div>
        </li>"#,
        rank = rank,
        img = img,
        title = title
    )
}

fn listing_page(items: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head><title>豆瓣电影 Top 250</title></head>
<body>
<div id="wrapper">
    <div id="content">
        <h1>豆瓣电影 Top 250</h1>
        <div class="grid-16-8 clearfix">
            <div class="article">
                <ol class="grid_view">{}</ol>
            </div>
        </div>
    </div>
</div>
</body>
</html>"#,
        items.concat()
    )
}

/// Mounts a listing page for `start=<offset>`
async fn mount_page(server: &MockServer, offset: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/top250"))
        .and(query_param("start", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn test_config(server: &MockServer, dir: &TempDir, page_size: u32, page_count: u32) -> Config {
    let db_path = dir.path().join("movies.db");
    parse_config(&format!(
        r#"
[crawler]
base-url = "{}/top250"
page-size = {}
page-count = {}

[storage]
database-path = "{}"
max-open-connections = 4
max-idle-connections = 2
"#,
        server.uri(),
        page_size,
        page_count,
        db_path.display()
    ))
    .expect("test config should be valid")
}

#[tokio::test]
async fn test_full_harvest_stores_every_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    for page in 0..3u32 {
        let offset = page * 2;
        let items = vec![
            listing_item(offset + 1, &format!("Film {}", offset + 1), Some("http://img/a.jpg")),
            listing_item(offset + 2, &format!("Film {}", offset + 2), Some("http://img/b.jpg")),
        ];
        mount_page(&server, offset, listing_page(&items)).await;
    }

    let config = test_config(&server, &dir, 2, 3);
    let summary = harvest(&config).await.expect("harvest setup failed");

    assert_eq!(summary.pages, 3);
    assert!(summary.is_success(), "failures: {:?}", summary.failures);
    assert_eq!(summary.records_extracted, 6);
    assert_eq!(summary.records_saved, 6);

    let storage = SqliteStorage::from_config(&config.storage).unwrap();
    assert_eq!(storage.count_records().unwrap(), 6);

    let mut records = storage.load_records().unwrap();
    records.sort_by(|a, b| a.title.cmp(&b.title));
    let first = &records[0];
    assert_eq!(first.title, "Film 1");
    assert_eq!(first.director, "弗兰克·德拉邦特 Frank Darabont");
    assert_eq!(first.actor, "蒂姆·罗宾斯 Tim Robbins / Morgan Freeman");
    assert_eq!(first.year, "1994");
    assert_eq!(first.picture, "http://img/a.jpg");
    assert_eq!(first.score, "9.1");
    assert_eq!(first.quote, "Quote 1");
}

#[tokio::test]
async fn test_items_without_poster_are_not_stored() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let items = vec![
        listing_item(1, "Kept", Some("http://img/kept.jpg")),
        listing_item(2, "Dropped", None),
    ];
    mount_page(&server, 0, listing_page(&items)).await;

    let config = test_config(&server, &dir, 25, 1);
    let summary = harvest(&config).await.unwrap();

    assert!(summary.is_success());
    assert_eq!(summary.records_extracted, 1);

    let storage = SqliteStorage::from_config(&config.storage).unwrap();
    let titles: Vec<String> = storage
        .load_records()
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["Kept".to_string()]);
}

#[tokio::test]
async fn test_failed_pages_are_isolated() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        0,
        listing_page(&[listing_item(1, "Good", Some("http://img/g.jpg"))]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/top250"))
        .and(query_param("start", "25"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;
    mount_page(
        &server,
        50,
        "<html><body>检测到有异常请求</body></html>".to_string(),
    )
    .await;

    let config = test_config(&server, &dir, 25, 3);
    let summary = harvest(&config).await.unwrap();

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.pages_succeeded(), 1);
    assert_eq!(summary.records_saved, 1);

    let failed: Vec<u32> = summary.failures.iter().map(|f| f.offset).collect();
    assert_eq!(failed, vec![25, 50]);
    assert!(matches!(
        summary.failures[0].error,
        HarvestError::HttpStatus { status: 418, .. }
    ));
    assert!(matches!(
        summary.failures[1].error,
        HarvestError::HtmlParse { .. }
    ));

    let storage = SqliteStorage::from_config(&config.storage).unwrap();
    assert_eq!(storage.count_records().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_default_ten_page_fan_out() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let config = test_config(&server, &dir, 25, 10);
    let offsets = config.page_offsets();
    assert_eq!(offsets, vec![0, 25, 50, 75, 100, 125, 150, 175, 200, 225]);

    for &offset in &offsets {
        let items: Vec<String> = (1..=25)
            .map(|i| {
                listing_item(
                    offset + i,
                    &format!("Film {}", offset + i),
                    Some("http://img/p.jpg"),
                )
            })
            .collect();
        mount_page(&server, offset, listing_page(&items)).await;
    }

    let storage = Arc::new(SqliteStorage::from_config(&config.storage).unwrap());
    let fetcher = Arc::new(HttpFetcher::from_config(&config.crawler, &config.request).unwrap());
    let dispatcher = Dispatcher::new(fetcher, PageExtractor::new(), Arc::clone(&storage));

    let summary = dispatcher.run(&offsets).await;

    assert_eq!(summary.pages, 10);
    assert!(summary.is_success(), "failures: {:?}", summary.failures);
    assert_eq!(summary.records_saved, 250);
    assert_eq!(storage.count_records().unwrap(), 250);

    let status = storage.pool_status();
    assert!(status.open <= 4);
    assert!(status.open >= 2);
    assert_eq!(status.idle, status.open);
}
