//! Integration tests for the two GitHub backends
//!
//! These run against the library instead of the binary so the sources can be
//! pointed at a local mock server through their API base setters, the same
//! hook a GitHub Enterprise deployment would use.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tempfile::TempDir;
use updraft::cache::VersionCache;
use updraft::events::{EventBus, UpdaterEvent};
use updraft::source::{GithubBranchSource, GithubTagSource, SourceContext, SourceRepository};
use updraft::token::AccessToken;

use crate::common::zip_archive;

fn context(staging: &Path, installed: Option<&str>) -> SourceContext {
    SourceContext {
        client: reqwest::Client::new(),
        cache: VersionCache::new(staging),
        events: EventBus::new(),
        download_path: staging.to_path_buf(),
        version_installed: installed.map(str::to_string),
        token: None,
        keep_archive: false,
    }
}

const TAGS_JSON: &str = r#"[
    {"name": "2.7.1", "zipball_url": "__BASE__/zipballs/2.7.1"},
    {"name": "2.6.0", "zipball_url": "__BASE__/zipballs/2.6.0"}
]"#;

const COMMITS_JSON: &str = r#"[
    {"sha": "f3c9a1d", "commit": {"author": {"date": "2026-08-20T17:02:11Z"}}},
    {"sha": "0b7e442", "commit": {"author": {"date": "2026-08-19T09:00:00Z"}}}
]"#;

#[tokio::test]
async fn tag_listing_drives_the_update_check() -> Result<()> {
    let temp = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;

    let listing = server
        .mock("GET", "/repos/acme/app/tags")
        .match_header("accept", "application/vnd.github+json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TAGS_JSON.replace("__BASE__", &server.url()))
        .create_async()
        .await;

    let context = context(temp.path(), Some("2.6.0"));
    let cache = context.cache.clone();
    let announced = Arc::new(Mutex::new(Vec::new()));
    let sink = announced.clone();
    context.events.subscribe(move |event| {
        if let UpdaterEvent::UpdateAvailable { new_version } = event {
            sink.lock().unwrap().push(new_version.clone());
        }
    });

    let source = GithubTagSource::new("acme".to_string(), "app".to_string(), context)
        .with_api_base(server.url());

    assert!(source.is_new_version_available(None).await?);
    listing.assert_async().await;

    assert_eq!(cache.read().await?, "2.7.1");
    assert_eq!(*announced.lock().unwrap(), vec!["2.7.1".to_string()]);
    Ok(())
}

#[tokio::test]
async fn tag_fetch_stages_the_zipball() -> Result<()> {
    let temp = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;

    let listing = server
        .mock("GET", "/repos/acme/app/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TAGS_JSON.replace("__BASE__", &server.url()))
        .create_async()
        .await;
    // GitHub zipballs wrap the tree in a single vendor-name-sha folder.
    let download = server
        .mock("GET", "/zipballs/2.7.1")
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(zip_archive(&[
            ("acme-app-f3c9a1d/index.txt", "tagged release"),
            ("acme-app-f3c9a1d/lib/util.txt", "util"),
        ]))
        .create_async()
        .await;

    let source = GithubTagSource::new("acme".to_string(), "app".to_string(), context(temp.path(), None))
        .with_api_base(server.url());

    let release = source.fetch(None).await?;
    listing.assert_async().await;
    download.assert_async().await;

    assert_eq!(release.version(), Some("2.7.1"));
    let staged = temp.path().join("2.7.1");
    assert_eq!(std::fs::read_to_string(staged.join("index.txt"))?, "tagged release");
    assert_eq!(std::fs::read_to_string(staged.join("lib/util.txt"))?, "util");
    assert!(!staged.join("acme-app-f3c9a1d").exists());
    assert!(!temp.path().join("2.7.1.zip").exists());
    Ok(())
}

#[tokio::test]
async fn tag_requests_send_the_configured_token() -> Result<()> {
    let temp = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;

    let listing = server
        .mock("GET", "/repos/acme/app/tags")
        .match_header("authorization", "Bearer gh-tok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TAGS_JSON.replace("__BASE__", &server.url()))
        .create_async()
        .await;

    let mut context = context(temp.path(), None);
    context.token = Some(AccessToken::new("gh-tok"));

    let source = GithubTagSource::new("acme".to_string(), "app".to_string(), context)
        .with_api_base(server.url());

    assert_eq!(source.latest_version().await?, "2.7.1");
    listing.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn branch_versions_are_commit_dates() -> Result<()> {
    let temp = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;

    let listing = server
        .mock("GET", "/repos/acme/app/commits?sha=main")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(COMMITS_JSON)
        .create_async()
        .await;

    let source = GithubBranchSource::new(
        "acme".to_string(),
        "app".to_string(),
        "main".to_string(),
        context(temp.path(), None),
    )
    .with_api_base(server.url())
    .with_archive_base(server.url());

    let entries = source.list_remote().await?;
    listing.assert_async().await;
    assert_eq!(entries[0].version, "2026-08-20T17:02:11Z");
    assert_eq!(
        entries[0].download_url,
        format!("{}/acme/app/archive/f3c9a1d.zip", server.url())
    );
    Ok(())
}

#[tokio::test]
async fn branch_head_commit_drives_the_update_check() -> Result<()> {
    let temp = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;

    let listing = server
        .mock("GET", "/repos/acme/app/commits?sha=main")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(COMMITS_JSON)
        .create_async()
        .await;

    // ISO-8601 commit dates compare chronologically.
    let source = GithubBranchSource::new(
        "acme".to_string(),
        "app".to_string(),
        "main".to_string(),
        context(temp.path(), Some("2026-08-19T09:00:00Z")),
    )
    .with_api_base(server.url())
    .with_archive_base(server.url());

    assert!(source.is_new_version_available(None).await?);
    listing.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn branch_fetch_sanitizes_the_archive_file_name() -> Result<()> {
    let temp = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;

    let listing = server
        .mock("GET", "/repos/acme/app/commits?sha=main")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(COMMITS_JSON)
        .create_async()
        .await;
    let download = server
        .mock("GET", "/acme/app/archive/f3c9a1d.zip")
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(zip_archive(&[("app-main/index.txt", "branch snapshot")]))
        .create_async()
        .await;

    let source = GithubBranchSource::new(
        "acme".to_string(),
        "app".to_string(),
        "main".to_string(),
        context(temp.path(), None),
    )
    .with_api_base(server.url())
    .with_archive_base(server.url());

    let release = source.fetch(None).await?;
    listing.assert_async().await;
    download.assert_async().await;

    assert_eq!(release.archive_name(), Some("2026-08-20T17-02-11Z.zip"));
    let staged = temp.path().join("2026-08-20T17-02-11Z");
    assert_eq!(std::fs::read_to_string(staged.join("index.txt"))?, "branch snapshot");
    Ok(())
}
