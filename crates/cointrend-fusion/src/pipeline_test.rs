#![allow(clippy::float_cmp)]

use cointrend_core::{
    RawMarketRow, RawMentionRow, RawNewsRow, RawPriceRow, RawSentimentRow, RawTickerRow,
};

use super::*;

fn s(text: &str) -> Option<String> {
    Some(text.to_string())
}

fn market_row(name: &str, change: &str) -> RawMarketRow {
    RawMarketRow {
        name: s(name),
        price_change_percentage_24h: s(change),
        ..RawMarketRow::default()
    }
}

fn mention_row(keyword: &str) -> RawMentionRow {
    RawMentionRow {
        keyword: s(keyword),
        ..RawMentionRow::default()
    }
}

fn price_row(date: &str, close: &str) -> RawPriceRow {
    RawPriceRow {
        date: s(date),
        close: s(close),
        ..RawPriceRow::default()
    }
}

fn sentiment_row(timestamp: &str, value: &str) -> RawSentimentRow {
    RawSentimentRow {
        value: s(value),
        value_classification: s("Neutral"),
        timestamp: s(timestamp),
    }
}

fn full_inputs() -> RawInputs {
    RawInputs {
        market: Ok(vec![
            market_row("Alpha", "10.0"),
            market_row("Beta", "5.0"),
            market_row("Gamma", "-2.0"),
            market_row("Broken", "??"),
        ]),
        mentions: Ok(vec![mention_row("alpha"), mention_row("Alpha ")]),
        price_history: Ok(vec![
            price_row("2024-01-01", "100"),
            price_row("2024-01-02", "110"),
            price_row("garbage", "1"),
        ]),
        sentiment_index: Ok(vec![
            sentiment_row("1704067200", "40"),
            sentiment_row("1704153600", "60"),
        ]),
        news: Ok(vec![RawNewsRow {
            published_at: s("2024-01-02T08:00:00Z"),
            ..RawNewsRow::default()
        }]),
        tickers: Ok(vec![RawTickerRow {
            symbol: s("BTCUSDT"),
            price: s("42000"),
        }]),
    }
}

#[test]
fn full_run_scores_aligns_and_summarizes() {
    let report = run_pipeline(full_inputs(), &PipelineOptions::default());

    let names: Vec<&str> = report
        .trending
        .iter()
        .map(|e| e.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
    assert_eq!(report.trending[0].mention_count, 2);
    assert_eq!(report.trending[0].composite_score, 2.0);

    assert_eq!(report.market_sentiment.len(), 2);
    assert_eq!(report.market_sentiment[1].sentiment_value, Some(60.0));

    assert_eq!(report.summary.news_volume.len(), 1);
    assert_eq!(report.summary.ticker_snapshot.len(), 1);
    assert_eq!(
        report.summary.latest_sentiment.as_ref().map(|p| p.value),
        Some(60.0)
    );
    assert!(report.summary.close_sentiment_correlation.is_some());
    assert!(report.degraded_sources().is_empty());
}

#[test]
fn dropped_rows_are_counted_per_source() {
    let report = run_pipeline(full_inputs(), &PipelineOptions::default());
    assert_eq!(
        report.status(SourceKind::Market),
        Some(&SourceStatus::Ready {
            rows: 3,
            dropped: 1
        })
    );
    assert_eq!(
        report.status(SourceKind::PriceHistory),
        Some(&SourceStatus::Ready {
            rows: 2,
            dropped: 1
        })
    );
}

#[test]
fn source_with_only_unusable_rows_is_malformed() {
    let mut inputs = full_inputs();
    inputs.price_history = Ok(vec![price_row("garbage", "1"), price_row("2024-01-01", "n/a")]);

    let report = run_pipeline(inputs, &PipelineOptions::default());

    assert_eq!(
        report.status(SourceKind::PriceHistory),
        Some(&SourceStatus::Malformed {
            reason: "all 2 rows failed coercion".to_string()
        })
    );
    let degraded = report.degraded_sources();
    assert_eq!(degraded.len(), 1);
    assert_eq!(degraded[0].source, SourceKind::PriceHistory);
    assert!(report.market_sentiment.is_empty());
}

#[test]
fn unavailable_mentions_fall_back_to_market_only_scoring() {
    let mut inputs = full_inputs();
    inputs.mentions = Err(SourceFailure::Unavailable("timeout".to_string()));

    let report = run_pipeline(inputs, &PipelineOptions::default());

    assert_eq!(report.trending.len(), 2);
    assert!(report.trending.iter().all(|e| e.mention_count == 0));
    assert_eq!(report.trending[0].display_name, "Alpha");
    assert!(report.summary.mention_share.is_none());

    let degraded = report.degraded_sources();
    assert_eq!(degraded.len(), 1);
    assert_eq!(degraded[0].source, SourceKind::Mentions);
    assert_eq!(
        degraded[0].status,
        SourceStatus::Unavailable {
            reason: "timeout".to_string()
        }
    );
}

#[test]
fn missing_sentiment_still_aligns_with_nulls() {
    let mut inputs = full_inputs();
    inputs.sentiment_index = Err(SourceFailure::Malformed("bad header".to_string()));

    let report = run_pipeline(inputs, &PipelineOptions::default());

    assert_eq!(report.market_sentiment.len(), 2);
    assert!(report
        .market_sentiment
        .iter()
        .all(|r| r.sentiment_value.is_none()));
    assert!(matches!(
        report.status(SourceKind::SentimentIndex),
        Some(SourceStatus::Malformed { .. })
    ));
}

#[test]
fn empty_unavailable_and_malformed_are_distinguishable() {
    let inputs = RawInputs {
        market: Ok(Vec::new()),
        mentions: Err(SourceFailure::Unavailable("no credentials".to_string())),
        price_history: Err(SourceFailure::Malformed("not csv".to_string())),
        ..RawInputs::default()
    };

    let report = run_pipeline(inputs, &PipelineOptions::default());

    assert_eq!(report.status(SourceKind::Market), Some(&SourceStatus::Empty));
    assert!(matches!(
        report.status(SourceKind::Mentions),
        Some(SourceStatus::Unavailable { .. })
    ));
    assert!(matches!(
        report.status(SourceKind::PriceHistory),
        Some(SourceStatus::Malformed { .. })
    ));
    assert!(report.trending.is_empty());
    assert!(report.market_sentiment.is_empty());
    assert_eq!(report.degraded_sources().len(), 6);
}

#[test]
fn no_trending_coins_is_a_valid_result() {
    let inputs = RawInputs {
        market: Ok(vec![market_row("Down", "-1"), market_row("Flat", "0")]),
        ..RawInputs::default()
    };
    let report = run_pipeline(inputs, &PipelineOptions::default());
    assert!(report.trending.is_empty());
    assert_eq!(report.summary.top_movers.len(), 2);
}

#[test]
fn top_n_option_truncates() {
    let options = PipelineOptions {
        top_n: 1,
        ..PipelineOptions::default()
    };
    let report = run_pipeline(full_inputs(), &options);
    assert_eq!(report.trending.len(), 1);
}

#[test]
fn every_source_is_reported_once() {
    let (_, reports) = clean_inputs(RawInputs::default());
    let kinds: Vec<SourceKind> = reports.iter().map(|r| r.source).collect();
    assert_eq!(kinds, SourceKind::ALL.to_vec());
}

#[test]
fn report_serializes_status_inline() {
    let mut inputs = full_inputs();
    inputs.news = Err(SourceFailure::Unavailable("missing key".to_string()));
    let report = run_pipeline(inputs, &PipelineOptions::default());

    let json = serde_json::to_value(&report).unwrap();
    let news = json["sources"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["source"] == "news")
        .unwrap();
    assert_eq!(news["status"], "unavailable");
    assert_eq!(news["reason"], "missing key");
    assert!(json.get("tables").is_none());
    assert_eq!(json["trending"][0]["display_name"], "Alpha");
}
