// tests/providers_google.rs

use rankwatch::fetch::google::GoogleTrendsProvider;
use rankwatch::fetch::TrendProvider;
use rankwatch::Source;

const GOOGLE_XML: &str = include_str!("fixtures/google_trends.xml");

#[tokio::test]
async fn fixture_parses_into_a_dense_ranking() {
    let provider = GoogleTrendsProvider::from_fixture(GOOGLE_XML);
    assert_eq!(provider.source(), Source::Google);

    let snapshot = provider.fetch("KR").await.expect("google parse ok");
    assert_eq!(snapshot.items.len(), 3);

    let ranks: Vec<u32> = snapshot.items.iter().map(|i| i.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn identity_is_the_normalized_title() {
    let snapshot = GoogleTrendsProvider::parse_snapshot(GOOGLE_XML).unwrap();

    // Trailing whitespace and punctuation are folded away.
    assert_eq!(snapshot.items[0].identity, "손흥민");
    assert_eq!(snapshot.items[1].identity, "Samsung Galaxy");
    // Identity doubles as the display title for this source.
    assert_eq!(snapshot.items[1].title, "Samsung Galaxy");
}

#[tokio::test]
async fn description_carries_traffic_and_first_news() {
    let snapshot = GoogleTrendsProvider::parse_snapshot(GOOGLE_XML).unwrap();

    let first = &snapshot.items[0];
    assert!(first.description.contains("🔍 200만+"));
    assert!(first.description.contains("📰 손흥민, 리그 10호골 폭발"));
    assert!(first.description.contains("📱 스포츠뉴스"));
    assert_eq!(
        first.url.as_deref(),
        Some("https://news.example.com/son-goal")
    );

    // Item without news still gets the traffic line and no link.
    let last = &snapshot.items[2];
    assert_eq!(last.description, "🔍 20만+");
    assert!(last.url.is_none());
}

#[tokio::test]
async fn captured_at_follows_the_latest_pub_date() {
    let snapshot = GoogleTrendsProvider::parse_snapshot(GOOGLE_XML).unwrap();
    // Latest pubDate in the fixture: Mon, 10 Mar 2025 04:10:00 -0700.
    assert_eq!(snapshot.captured_at.timestamp(), 1_741_605_000);
}

#[tokio::test]
async fn skipped_items_leave_no_rank_gaps() {
    // The second title normalizes to nothing and is dropped; ranks must stay
    // dense over the items that survive.
    let xml = r#"<rss><channel>
        <item><title>first</title></item>
        <item><title>!!!</title></item>
        <item><title>second</title></item>
        <item><title>third</title></item>
    </channel></rss>"#;

    let snapshot = GoogleTrendsProvider::parse_snapshot(xml).unwrap();
    let ranks: Vec<u32> = snapshot.items.iter().map(|i| i.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(snapshot.items[1].identity, "second");
}

#[tokio::test]
async fn colliding_normalized_titles_keep_the_first_slot() {
    // "first..." folds into "first" after normalization; only the earlier
    // occurrence may survive, or the identity-keyed diff turns ambiguous.
    let xml = r#"<rss><channel>
        <item><title>first</title></item>
        <item><title>second</title></item>
        <item><title>first...</title></item>
    </channel></rss>"#;

    let snapshot = GoogleTrendsProvider::parse_snapshot(xml).unwrap();
    let ids: Vec<&str> = snapshot.items.iter().map(|i| i.identity.as_str()).collect();
    assert_eq!(ids, vec!["first", "second"]);
    let ranks: Vec<u32> = snapshot.items.iter().map(|i| i.rank).collect();
    assert_eq!(ranks, vec![1, 2]);
}
