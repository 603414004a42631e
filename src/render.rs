// src/render.rs
// Maps the engine's (bucket, entries) output to the Telegram message text.
// Pure string work; the engine never depends on anything in here.

use chrono::{DateTime, Datelike, FixedOffset};

use crate::engine::Entry;
use crate::schedule::ScheduleBucket;
use crate::trend::{Reason, Source, TrendKey};

const WEEKDAYS_KO: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

fn date_line(now: DateTime<FixedOffset>) -> String {
    let weekday = WEEKDAYS_KO[now.weekday().num_days_from_monday() as usize];
    format!("{} {}요일", now.format("%Y-%m-%d"), weekday)
}

fn source_emoji(source: Source) -> &'static str {
    match source {
        Source::Google => "🔍",
        Source::Youtube => "📺",
    }
}

fn source_name(source: Source) -> &'static str {
    match source {
        Source::Google => "구글 트렌드",
        Source::Youtube => "유튜브 트렌드",
    }
}

fn region_label(region: &str) -> (&'static str, String) {
    match region {
        "KR" => ("🇰🇷", "한국".to_string()),
        "US" => ("🇺🇸", "미국".to_string()),
        other => ("🌐", other.to_string()),
    }
}

/// One list line: rank marker, title, and the change annotation for the
/// reason, followed by description and link lines.
fn push_entry(out: &mut String, entry: &Entry) {
    let item = &entry.item;
    match entry.reason {
        Reason::Entered => {
            out.push_str(&format!("{}위) {} New\n", item.rank, item.title));
        }
        Reason::Improved { from, to } | Reason::Worsened { from, to } => {
            out.push_str(&format!("{}위) {} {} → {}\n", item.rank, item.title, from, to));
        }
        Reason::Full | Reason::Summary => {
            out.push_str(&format!("{}위) {}\n", item.rank, item.title));
        }
    }
    if !item.description.is_empty() {
        out.push_str(&item.description);
        out.push('\n');
    }
    if let Some(url) = &item.url {
        out.push_str(&format!("🔗 {url}\n"));
    }
    out.push('\n');
}

/// Render an `Announce` plan into the outgoing message body.
pub fn render_announcement(
    bucket: ScheduleBucket,
    key: &TrendKey,
    entries: &[Entry],
    now: DateTime<FixedOffset>,
) -> String {
    let (flag, country) = region_label(&key.region);
    let emoji = source_emoji(key.source);
    let name = source_name(key.source);
    let date = date_line(now);

    let mut out = String::new();
    match bucket {
        ScheduleBucket::DailySummary => {
            out.push_str(&format!("📋 {flag} {country} {name} 일일 요약 ({date})\n\n"));
        }
        _ if entries.iter().all(|e| e.reason == Reason::Full) => {
            out.push_str(&format!("{emoji} {flag} {country} {name} ({date})\n\n"));
        }
        _ => {
            out.push_str(&format!("{emoji} {flag} {country} {name} 업데이트 ({date})\n"));
            out.push_str("📊 순위 변경 및 신규 진입\n\n");
        }
    }

    for entry in entries {
        push_entry(&mut out, entry);
    }

    if bucket == ScheduleBucket::DailySummary {
        out.push_str("\n🌙 오늘 하루도 수고하셨습니다. 편안한 밤 되세요.");
    }

    out
}

/// Courtesy notice for the quiet window.
pub fn night_notice() -> &'static str {
    "편안한 밤 되세요 🌙"
}

/// Compact view-count formatting: 천만 (tens of millions) and 만 (tens of
/// thousands) buckets, thousands separators below that.
pub fn format_views(views: u64) -> String {
    if views >= 10_000_000 {
        format!("{:.1}천만", views as f64 / 10_000_000.0)
    } else if views >= 100_000 {
        format!("{:.1}만", views as f64 / 10_000.0)
    } else {
        group_thousands(views)
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
