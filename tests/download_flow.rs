use reelgrab::downloader::{self, DownloadError};
use reelgrab::extractor::{MediaFields, MediaPost};
use reelgrab::metadata::{self, MediaSidecar};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn streams_media_to_disk_and_reports_progress() {
    let server = MockServer::start().await;
    let payload = vec![0xABu8; 256 * 1024];

    Mock::given(method("GET"))
        .and(path("/x.mp4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(payload.clone())
                .insert_header("Content-Type", "video/mp4"),
        )
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let target = tmp.path().join("clips").join("ABC123xyz.mp4");
    let client = reqwest::Client::new();

    let mut updates = Vec::new();
    let url = format!("{}/x.mp4", server.uri());
    let written = downloader::download_to_file(&client, &url, &target, |p| {
        updates.push(p.percent);
    })
    .await
    .unwrap();

    assert_eq!(written, payload.len() as u64);
    assert_eq!(std::fs::read(&target).unwrap(), payload);
    // The final progress update always fires, at 100% when the size was
    // known up front.
    assert!(!updates.is_empty());
    assert_eq!(*updates.last().unwrap(), 100.0);
}

#[tokio::test]
async fn http_error_surfaces_as_download_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone.mp4"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let client = reqwest::Client::new();
    let url = format!("{}/gone.mp4", server.uri());
    let err = downloader::download_to_file(&client, &url, &tmp.path().join("g.mp4"), |_| {})
        .await
        .unwrap_err();

    match err {
        DownloadError::Http(status) => assert_eq!(status.as_u16(), 410),
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn sidecar_round_trips_next_to_the_video() {
    let post = MediaPost::assemble(
        "ABC123xyz",
        MediaFields {
            media_url: "https://cdn.example.com/x.mp4".to_string(),
            thumbnail_url: "https://cdn.example.com/x.jpg".to_string(),
            caption: "sunset run".to_string(),
            owner: "alice".to_string(),
            likes: 10,
            comments: 2,
            views: 300,
        },
    );

    let tmp = tempfile::tempdir().unwrap();
    let video_path = tmp.path().join("ABC123xyz_1.mp4");
    let sidecar_path = video_path.with_extension("json");

    let sidecar = MediaSidecar::new(&post, "ABC123xyz_1.mp4");
    metadata::write_sidecar(&sidecar_path, &sidecar).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&sidecar_path).unwrap()).unwrap();
    assert_eq!(value["originalUrl"], "https://www.instagram.com/p/ABC123xyz/");
    assert_eq!(value["owner"], "alice");
    assert_eq!(value["likes"], 10);
    assert_eq!(value["videoFileName"], "ABC123xyz_1.mp4");
    assert_eq!(value["thumbnailUrl"], "https://cdn.example.com/x.jpg");
    assert!(
        chrono::DateTime::parse_from_rfc3339(value["downloadedAt"].as_str().unwrap()).is_ok()
    );
}

#[test]
fn colliding_names_get_a_counter_suffix() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("ABC123xyz.mp4"), b"first").unwrap();

    let next = downloader::unique_path(tmp.path(), "ABC123xyz.mp4");
    assert_eq!(next, tmp.path().join("ABC123xyz_1.mp4"));
}
