//! Sends one rendered sample message through the configured Telegram channel
//! to verify credentials and formatting before a real deployment.

use chrono::{FixedOffset, Utc};

use rankwatch::engine::Entry;
use rankwatch::notify::{telegram::TelegramNotifier, Deliver, OutboundMessage};
use rankwatch::render;
use rankwatch::{Reason, ScheduleBucket, Source, TrendItem, TrendKey};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    tracing_subscriber::fmt().with_target(false).init();

    let key = TrendKey::new(Source::Google, "KR");
    let now = Utc::now().with_timezone(&FixedOffset::east_opt(9 * 3600).unwrap());
    let entries = vec![
        Entry {
            item: TrendItem {
                identity: "테스트 검색어".into(),
                rank: 1,
                title: "테스트 검색어".into(),
                description: "🔍 5만+ | 📰 프로브 메시지 | 📱 rankwatch".into(),
                url: None,
            },
            reason: Reason::Entered,
        },
        Entry {
            item: TrendItem {
                identity: "순위 변동 예시".into(),
                rank: 2,
                title: "순위 변동 예시".into(),
                description: String::new(),
                url: None,
            },
            reason: Reason::Improved { from: 5, to: 2 },
        },
    ];

    let text = render::render_announcement(ScheduleBucket::Delta, &key, &entries, now);
    println!("{text}");

    let notifier = TelegramNotifier::from_env()?;
    notifier.deliver(&OutboundMessage::new(text)).await?;
    println!("send-probe done");
    Ok(())
}
