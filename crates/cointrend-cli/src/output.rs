//! Plain-text renderings of pipeline results for terminal output.

use std::fmt::Write as _;

use cointrend_core::ScoredEntity;
use cointrend_fusion::{SourceReport, SourceStatus, Summary};

/// Short human label for a source status.
pub(crate) fn status_label(status: &SourceStatus) -> String {
    match status {
        SourceStatus::Ready { rows, dropped: 0 } => format!("ready ({rows} rows)"),
        SourceStatus::Ready { rows, dropped } => {
            format!("ready ({rows} rows, {dropped} dropped)")
        }
        SourceStatus::Empty => "empty".to_string(),
        SourceStatus::Unavailable { reason } => format!("unavailable: {reason}"),
        SourceStatus::Malformed { reason } => format!("malformed: {reason}"),
    }
}

pub(crate) fn render_sources(sources: &[SourceReport]) -> String {
    let mut out = format!("{:<18}STATUS\n", "SOURCE");
    for report in sources {
        let _ = writeln!(
            out,
            "{:<18}{}",
            report.source.to_string(),
            status_label(&report.status)
        );
    }
    out
}

pub(crate) fn render_trending(entities: &[ScoredEntity]) -> String {
    if entities.is_empty() {
        return "no trending assets: no asset has a positive 24h change".to_string();
    }

    let mut out = format!(
        "{:<6}{:<24}{:>12}{:>10}{:>10}\n",
        "RANK", "NAME", "CHANGE 24H", "MENTIONS", "SCORE"
    );
    for (idx, entity) in entities.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<6}{:<24}{:>11.2}%{:>10}{:>10.3}",
            idx + 1,
            entity.display_name,
            entity.price_change_pct_24h,
            entity.mention_count,
            entity.composite_score
        );
    }
    out
}

pub(crate) fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str("TOP MOVERS\n");
    if summary.top_movers.is_empty() {
        out.push_str("  (none)\n");
    }
    for record in &summary.top_movers {
        let change = record.price_change_pct_24h.unwrap_or_default();
        let _ = writeln!(out, "  {:<24}{change:>10.2}%", record.display_name);
    }

    out.push_str("\nKEYWORD FREQUENCY\n");
    if summary.keyword_frequency.is_empty() {
        out.push_str("  (none)\n");
    }
    for count in &summary.keyword_frequency {
        let _ = writeln!(out, "  {:<24}{:>10}", count.canonical_id, count.count);
    }

    out.push_str("\nLATEST SENTIMENT\n");
    match &summary.latest_sentiment {
        Some(point) => {
            let _ = writeln!(
                out,
                "  {} {:.0} {}",
                point.date,
                point.value,
                point.classification.as_deref().unwrap_or("-")
            );
        }
        None => out.push_str("  (none)\n"),
    }

    out.push_str("\nNEWS VOLUME\n");
    if summary.news_volume.is_empty() {
        out.push_str("  (none)\n");
    }
    for day in &summary.news_volume {
        let _ = writeln!(out, "  {}{:>10}", day.date, day.count);
    }

    out.push_str("\nTICKERS\n");
    if summary.ticker_snapshot.is_empty() {
        out.push_str("  (none)\n");
    }
    for ticker in &summary.ticker_snapshot {
        let _ = writeln!(out, "  {:<16}{:>16.4}", ticker.symbol, ticker.price);
    }

    out.push_str("\nMENTION SHARE\n");
    match &summary.mention_share {
        Some(shares) => {
            for share in shares {
                let _ = writeln!(
                    out,
                    "  {:<24}{:>9.1}%",
                    share.display_name,
                    share.share * 100.0
                );
            }
        }
        None => out.push_str("  (no mentions among trending assets)\n"),
    }

    out.push_str("\nCLOSE/SENTIMENT CORRELATION\n");
    match summary.close_sentiment_correlation {
        Some(r) => {
            let _ = writeln!(out, "  {r:.3}");
        }
        None => out.push_str("  (not enough data)\n"),
    }

    out
}
