//! Fetch, export and batch tests against a mock profile server

use std::time::Duration;
use tempfile::tempdir;
use tikscrape::batch::{download_batch, scrape_batch};
use tikscrape::display::{render_error, Palette};
use tikscrape::export::download_avatar;
use tikscrape::shell::Shell;
use tikscrape::{outcome_to_json, FetchError, Scraper, ScraperConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE_PAGE: &str = r#"<html><head><title>Jane (@jane_doe) | TikTok</title></head><body>
<script id="__UNIVERSAL_DATA_FOR_REHYDRATION__" type="application/json">
{"__DEFAULT_SCOPE__":{"webapp.user-detail":{"userInfo":{"user":{"id":"6900000000000000001","uniqueId":"jane_doe","nickname":"Jane Doe","avatarLarger":"https://cdn.example/avatar.jpeg","signature":"IG: jane_doe contact me@x.com\nDMs open","createTime":1600000000,"verified":true,"secUid":"MS4wLjABAAAAexampleexampleexample","privateAccount":false,"region":"US"},"stats":{"followerCount":1234567,"followingCount":321,"heartCount":98765432,"videoCount":150,"diggCount":4200,"friendCount":12}}}}}
</script></body></html>"#;

async fn server_with(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

/// Mount the profile page at `route`, with its avatar served by the same server
async fn mount_profile(server: &MockServer, route: &str) {
    let page = PROFILE_PAGE.replace(
        "https://cdn.example/avatar.jpeg",
        &format!("{}/avatar.jpeg", server.uri()),
    );
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/avatar.jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
        .mount(server)
        .await;
}

fn scraper_for(server: &MockServer) -> Scraper {
    let config = ScraperConfig {
        use_colors: false,
        ..ScraperConfig::default()
    }
    .with_base_url(server.uri());
    Scraper::new(config).unwrap()
}

#[tokio::test]
async fn test_not_found_is_in_band_error() {
    let server = server_with("/@ghost", ResponseTemplate::new(404)).await;
    let scraper = scraper_for(&server);

    let outcome = scraper.fetch_profile("@ghost", false).await;
    assert!(matches!(outcome, Err(FetchError::Status(404))));

    let json: serde_json::Value = serde_json::from_str(&outcome_to_json(&outcome).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"error": "Failed to fetch user (Status: 404)"})
    );

    if let Err(e) = &outcome {
        let line = render_error(e, &Palette::new(true));
        assert!(line.contains("Failed to fetch user (Status: 404)"));
        assert_eq!(line.trim().lines().count(), 1);
    }
}

#[tokio::test]
async fn test_profile_is_extracted_and_normalized() {
    let server = server_with(
        "/@jane_doe",
        ResponseTemplate::new(200).set_body_string(PROFILE_PAGE),
    )
    .await;
    let scraper = scraper_for(&server);

    let record = scraper.fetch_profile("@jane_doe", false).await.unwrap();

    assert_eq!(record.user_id, "6900000000000000001");
    assert_eq!(record.unique_id, "jane_doe");
    assert_eq!(record.nickname, "Jane Doe");
    assert_eq!(record.followers, "1.2M");
    assert_eq!(record.following, "321");
    assert_eq!(record.likes, "98.8M");
    assert_eq!(record.videos, "150");
    assert_eq!(record.digg_count, "4200");
    assert_eq!(record.friend_count, "12");
    assert!(record.verified);
    assert!(!record.private_account);
    assert_eq!(record.region, "US");
    assert_eq!(record.create_time, "2020-09-13 12:26:40");
    assert_eq!(record.signature, "IG: jane_doe contact me@x.com\nDMs open");
    assert!(record
        .social_links
        .contains(&"instagram:jane_doe".to_string()));
    assert!(record.social_links.contains(&"email:me@x.com".to_string()));
    assert_eq!(record.url, format!("{}/@jane_doe", server.uri()));
    assert!(record.fetch_time.ends_with('s'));
    assert_ne!(record.timestamp, "N/A");
}

#[tokio::test]
async fn test_fetch_by_id_uses_user_prefix() {
    let server = server_with(
        "/@user6900000000000000001",
        ResponseTemplate::new(200).set_body_string(PROFILE_PAGE),
    )
    .await;
    let scraper = scraper_for(&server);

    let record = scraper
        .fetch_profile("6900000000000000001", true)
        .await
        .unwrap();
    assert_eq!(record.unique_id, "jane_doe");
}

#[tokio::test]
async fn test_unmatched_page_degrades_to_sentinels() {
    let server = server_with(
        "/@blank",
        ResponseTemplate::new(200).set_body_string("<html>captcha</html>"),
    )
    .await;
    let scraper = scraper_for(&server);

    let record = scraper.fetch_profile("blank", false).await.unwrap();
    assert_eq!(record.unique_id, "N/A");
    assert_eq!(record.followers, "N/A");
    assert!(!record.verified);
    assert!(record.social_links.is_empty());
}

#[tokio::test]
async fn test_network_failure_is_in_band_error() {
    let config = ScraperConfig {
        timeout: Duration::from_secs(2),
        ..ScraperConfig::default()
    }
    .with_base_url("http://127.0.0.1:1");
    let scraper = Scraper::new(config).unwrap();

    let err = scraper.fetch_profile("jane", false).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
    assert!(err.to_string().starts_with("Network error: "));
}

#[tokio::test]
async fn test_download_avatar() {
    let server = server_with(
        "/avatar.jpeg",
        ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]),
    )
    .await;
    let scraper = scraper_for(&server);
    let dir = tempdir().unwrap();
    let pics = dir.path().join("pics");

    let record = tikscrape::ProfileRecord {
        unique_id: "jane_doe".to_string(),
        avatar_larger: format!("{}/avatar.jpeg", server.uri()).replace('/', "\\u002F"),
        ..Default::default()
    };

    let saved = download_avatar(&scraper, &record, &pics, &Palette::new(false))
        .await
        .unwrap();
    assert_eq!(saved, pics.join("jane_doe_profile.jpg"));
    assert_eq!(std::fs::read(saved).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
}

#[tokio::test]
async fn test_download_avatar_rejected_is_soft() {
    let server = server_with("/avatar.jpeg", ResponseTemplate::new(403)).await;
    let scraper = scraper_for(&server);
    let dir = tempdir().unwrap();

    let record = tikscrape::ProfileRecord {
        unique_id: "jane_doe".to_string(),
        avatar_larger: format!("{}/avatar.jpeg", server.uri()),
        ..Default::default()
    };

    let saved = download_avatar(&scraper, &record, dir.path(), &Palette::new(false)).await;
    assert!(saved.is_none());
}

#[tokio::test]
async fn test_batch_writes_per_user_and_combined_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@jane_doe"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/@ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("output");
    let config = ScraperConfig {
        use_colors: false,
        output_dir: output.clone(),
        ..ScraperConfig::default()
    }
    .with_base_url(server.uri());
    let scraper = Scraper::new(config).unwrap();

    let ids = vec!["@jane_doe".to_string(), "ghost".to_string()];
    let report = scrape_batch(&scraper, &ids, false, Duration::ZERO, &Palette::new(false))
        .await
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.successful, 1);
    assert!(output.join("jane_doe.json").exists());

    let combined = report.combined_file.unwrap();
    let name = combined.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("batch_") && name.ends_with(".json"));

    let records: Vec<tikscrape::ProfileRecord> =
        serde_json::from_str(&std::fs::read_to_string(combined).unwrap()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].unique_id, "jane_doe");
}

#[tokio::test]
async fn test_batch_with_no_successes_writes_nothing() {
    let server = server_with("/@ghost", ResponseTemplate::new(404)).await;
    let dir = tempdir().unwrap();
    let config = ScraperConfig {
        use_colors: false,
        output_dir: dir.path().join("output"),
        ..ScraperConfig::default()
    }
    .with_base_url(server.uri());
    let scraper = Scraper::new(config).unwrap();

    let report = scrape_batch(
        &scraper,
        &["ghost".to_string()],
        false,
        Duration::ZERO,
        &Palette::new(false),
    )
    .await
    .unwrap();

    assert_eq!(report.successful, 0);
    assert!(report.combined_file.is_none());
    assert!(!dir.path().join("output").exists());
}

#[tokio::test]
async fn test_download_batch_counts_saved_pictures() {
    let server = MockServer::start().await;
    mount_profile(&server, "/@jane_doe").await;
    Mock::given(method("GET"))
        .and(path("/@ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let pics = dir.path().join("pics");
    let config = ScraperConfig {
        use_colors: false,
        pics_dir: pics.clone(),
        ..ScraperConfig::default()
    }
    .with_base_url(server.uri());
    let scraper = Scraper::new(config).unwrap();

    let ids = vec!["jane_doe".to_string(), "ghost".to_string()];
    let saved = download_batch(&scraper, &ids, false, Duration::ZERO, &Palette::new(false)).await;

    assert_eq!(saved, 1);
    assert_eq!(
        std::fs::read(pics.join("jane_doe_profile.jpg")).unwrap(),
        b"jpeg-bytes"
    );
    assert!(!pics.join("ghost_profile.jpg").exists());
}

#[tokio::test]
async fn test_menu_export_writes_to_export_dir() {
    let server = MockServer::start().await;
    mount_profile(&server, "/@jane_doe").await;

    let dir = tempdir().unwrap();
    let config = ScraperConfig {
        use_colors: false,
        export_dir: dir.path().to_path_buf(),
        ..ScraperConfig::default()
    }
    .with_base_url(server.uri());
    let scraper = Scraper::new(config).unwrap();

    let mut shell = Shell::new(scraper, &b"5\njane_doe\n\n0\n"[..])
        .without_clear()
        .with_delay(Duration::ZERO);
    shell.run().await.unwrap();

    let saved: tikscrape::ProfileRecord = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("jane_doe_data.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(saved.unique_id, "jane_doe");
    assert_eq!(saved.followers, "1.2M");
}

#[tokio::test]
async fn test_menu_scrape_by_id_saves_avatar() {
    let server = MockServer::start().await;
    mount_profile(&server, "/@user123").await;

    let dir = tempdir().unwrap();
    let pics = dir.path().join("pics");
    let config = ScraperConfig {
        use_colors: false,
        pics_dir: pics.clone(),
        ..ScraperConfig::default()
    }
    .with_base_url(server.uri());
    let scraper = Scraper::new(config).unwrap();

    let mut shell = Shell::new(scraper, &b"2\n123\n\n0\n"[..])
        .without_clear()
        .with_delay(Duration::ZERO);
    shell.run().await.unwrap();

    assert_eq!(
        std::fs::read(pics.join("jane_doe_profile.jpg")).unwrap(),
        b"jpeg-bytes"
    );
}
