//! End-to-end aggregation against a local HTTP subscription host

use axum::{
    Router,
    http::StatusCode,
    routing::get,
};
use std::net::SocketAddr;
use std::path::Path;
use tempfile::TempDir;

use iptv_aggregator::{
    config::{Config, OutputConfig, SourcesConfig},
    services::AggregationService,
};

const PLAYLIST: &str = "#EXTM3U\n\
#EXTINF:-1 tvg-id=\"cctv1\" tvg-logo=\"http://logo/src.png\" group-title=\"News\",CCTV-1 综合\n\
http://stream/cctv1.m3u8\n\
#EXTINF:-1 tvg-name=\"湖南卫视\",湖南卫视\n\
http://stream/hunan.m3u8\n";

const TEXT_LIST: &str = "CCTV1,http://stream/cctv1-backup.m3u8\n\
CCTV1,http://stream/cctv1.m3u8\n";

async fn spawn_subscription_host() -> SocketAddr {
    let app = Router::new()
        .route("/playlist.m3u", get(|| async { PLAYLIST }))
        .route("/list.txt", get(|| async { TEXT_LIST }))
        .route("/broken.m3u", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down") }))
        .route("/compressed.txt", get(|| async { gzip_body("湖北卫视,http://stream/hubei.m3u8\n") }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[cfg(feature = "compression-gzip")]
fn gzip_body(text: &str) -> Vec<u8> {
    use flate2::{Compression, write::GzEncoder};
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

#[cfg(not(feature = "compression-gzip"))]
fn gzip_body(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

fn write_sources(dir: &Path, addr: SocketAddr) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join("subscribe.txt"),
        format!(
            "# local test host\nhttp://{addr}/playlist.m3u\nhttp://{addr}/list.txt\nhttp://{addr}/broken.m3u\nhttp://{addr}/compressed.txt\n"
        ),
    )
    .unwrap();
    std::fs::write(dir.join("alias.txt"), "CCTV1,CCTV-1,CCTV 1\n").unwrap();
    std::fs::write(dir.join("logo.txt"), "湖南卫视,http://logo/hunan.png\n").unwrap();
    std::fs::write(
        dir.join("template.txt"),
        "央视频道,#genre#\ncctv1\n卫视频道,#genre#\n湖南卫视\n湖北卫视\n",
    )
    .unwrap();
    std::fs::write(dir.join("epg.txt"), "http://epg/e.xml.gz\n").unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_end_to_end_aggregation() {
    let addr = spawn_subscription_host().await;
    let dir = TempDir::new().unwrap();
    let source_dir = dir.path().join("source");
    write_sources(&source_dir, addr);

    let config = Config {
        sources: SourcesConfig::in_dir(&source_dir),
        output: OutputConfig::in_dir(dir.path().join("output")),
        ..Default::default()
    };
    let service = AggregationService::from_config(&config).unwrap();

    let report = service.run().await.unwrap();
    assert_eq!(report.subscription_count, 4);
    assert_eq!(report.failed_subscriptions, 1);
    assert_eq!(report.channel_count, 3);
    // the duplicate CCTV1 URL from the text list is dropped
    assert_eq!(report.stream_count, 4);
    assert!(report.outputs_written);

    let m3u = std::fs::read_to_string(&config.output.m3u_path).unwrap();
    let expected = format!(
        "#EXTM3U\n\
         #EXTM3U x-tvg-url=\"http://epg/e.xml.gz\"\n\
         \n央视频道,#genre#\n\
         #EXTINF:-1 tvg-name=\"cctv1\" tvg-logo=\"http://logo/src.png\" group-title=\"央视频道\" tvg-id=\"cctv1\",cctv1\n\
         http://stream/cctv1.m3u8\n\
         {backup}\
         \n卫视频道,#genre#\n\
         #EXTINF:-1 tvg-name=\"湖南卫视\" tvg-logo=\"http://logo/hunan.png\" group-title=\"卫视频道\",湖南卫视\n\
         http://stream/hunan.m3u8\n\
         {hubei}",
        backup = "#EXTINF:-1 tvg-name=\"cctv1\" group-title=\"央视频道\",cctv1\nhttp://stream/cctv1-backup.m3u8\n",
        hubei = "#EXTINF:-1 tvg-name=\"湖北卫视\" group-title=\"卫视频道\",湖北卫视\nhttp://stream/hubei.m3u8\n",
    );

    if m3u.find("cctv1-backup").unwrap() > m3u.find("cctv1.m3u8").unwrap() {
        assert_eq!(m3u, expected);
    } else {
        // fetches complete in any order, so the CCTV1 sources may be swapped
        assert!(m3u.contains("http://stream/cctv1-backup.m3u8\n"));
        let satellite = expected.split("\n卫视频道,#genre#\n").nth(1).unwrap();
        assert!(m3u.ends_with(satellite));
    }

    let txt = std::fs::read_to_string(&config.output.txt_path).unwrap();
    let mut lines: Vec<&str> = txt.lines().collect();
    assert_eq!(lines.len(), 4);
    // Han names collate ahead of Latin ones
    assert!(lines[0].starts_with("湖北卫视,"));
    assert!(lines[1].starts_with("湖南卫视,"));
    assert!(lines[2].starts_with("CCTV1,"));
    assert!(lines[3].starts_with("CCTV1,"));
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "CCTV1,http://stream/cctv1-backup.m3u8",
            "CCTV1,http://stream/cctv1.m3u8",
            "湖北卫视,http://stream/hubei.m3u8",
            "湖南卫视,http://stream/hunan.m3u8",
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_all_subscriptions_failing_writes_nothing() {
    let addr = spawn_subscription_host().await;
    let dir = TempDir::new().unwrap();
    let source_dir = dir.path().join("source");
    std::fs::create_dir_all(&source_dir).unwrap();
    std::fs::write(
        source_dir.join("subscribe.txt"),
        format!("http://{addr}/broken.m3u\nhttp://{addr}/missing.m3u\n"),
    )
    .unwrap();

    let config = Config {
        sources: SourcesConfig::in_dir(&source_dir),
        output: OutputConfig::in_dir(dir.path().join("output")),
        ..Default::default()
    };
    let report = AggregationService::from_config(&config).unwrap().run().await.unwrap();

    assert_eq!(report.failed_subscriptions, 2);
    assert_eq!(report.channel_count, 0);
    assert!(!report.outputs_written);
    assert!(!config.output.m3u_path.exists());
}
