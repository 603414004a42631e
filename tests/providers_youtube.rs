// tests/providers_youtube.rs

use rankwatch::fetch::youtube::YoutubeTrendsProvider;
use rankwatch::fetch::TrendProvider;
use rankwatch::Source;

const YT_JSON: &str = include_str!("fixtures/youtube_popular.json");

#[tokio::test]
async fn fixture_parses_with_video_id_identity() {
    let provider = YoutubeTrendsProvider::from_fixture(YT_JSON);
    assert_eq!(provider.source(), Source::Youtube);

    let snapshot = provider.fetch("KR").await.expect("youtube parse ok");
    assert_eq!(snapshot.items.len(), 3);

    let first = &snapshot.items[0];
    assert_eq!(first.identity, "dQw4w9WgXcQ");
    assert_eq!(first.rank, 1);
    assert_eq!(first.title, "[MV] 신곡 뮤직비디오");
    assert_eq!(first.url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
}

#[tokio::test]
async fn description_compacts_views_and_names_the_channel() {
    let snapshot = YoutubeTrendsProvider::parse_snapshot(YT_JSON).unwrap();

    // 12,345,678 views lands in the 천만 bucket.
    assert_eq!(snapshot.items[0].description, "👤 뮤직채널 | 👁 1.2천만회");
    // 543,210 lands in the 만 bucket.
    assert_eq!(snapshot.items[1].description, "👤 일상채널 | 👁 54.3만회");
    // Missing statistics degrade to zero, not an error.
    assert_eq!(snapshot.items[2].description, "👤 스포츠채널 | 👁 0회");
}
