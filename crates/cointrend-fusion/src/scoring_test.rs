#![allow(clippy::float_cmp)]

use cointrend_core::{MarketRecord, MentionRecord};

use super::*;

fn market(rows: &[(&str, Option<f64>)]) -> Vec<MarketRecord> {
    rows.iter()
        .map(|(name, change)| MarketRecord::new(*name, *change))
        .collect()
}

fn mentions(keywords: &[&str]) -> Vec<MentionRecord> {
    keywords.iter().map(|k| MentionRecord::new(*k)).collect()
}

fn names(entities: &[ScoredEntity]) -> Vec<&str> {
    entities.iter().map(|e| e.display_name.as_str()).collect()
}

#[test]
fn alpha_beta_gamma_scenario() {
    let market = market(&[
        ("Alpha", Some(10.0)),
        ("Beta", Some(5.0)),
        ("Gamma", Some(-2.0)),
    ]);
    let mentions = mentions(&["alpha", "alpha"]);

    let out = score_trending(&market, &mentions, DEFAULT_TOP_N);

    assert_eq!(names(&out), vec!["Alpha", "Beta"]);

    let alpha = &out[0];
    assert_eq!(alpha.canonical_id, "alpha");
    assert_eq!(alpha.mention_count, 2);
    assert_eq!(alpha.norm_price_change, 1.0);
    assert_eq!(alpha.norm_mentions, 1.0);
    assert_eq!(alpha.composite_score, 2.0);

    let beta = &out[1];
    assert_eq!(beta.mention_count, 0);
    assert_eq!(beta.norm_price_change, 0.0);
    assert_eq!(beta.norm_mentions, 0.0);
    assert_eq!(beta.composite_score, 0.0);
}

#[test]
fn degenerate_columns_pass_through() {
    let market = market(&[("Alpha", Some(5.0)), ("Beta", Some(5.0))]);

    let out = score_trending(&market, &[], DEFAULT_TOP_N);

    assert_eq!(names(&out), vec!["Alpha", "Beta"]);
    for entity in &out {
        assert_eq!(entity.norm_price_change, 5.0);
        assert_eq!(entity.mention_count, 0);
        assert_eq!(entity.norm_mentions, 0.0);
        assert_eq!(entity.composite_score, 5.0);
    }
}

#[test]
fn non_positive_and_missing_changes_are_not_candidates() {
    let market = market(&[
        ("Flat", Some(0.0)),
        ("Down", Some(-0.01)),
        ("Unknown", None),
        ("Up", Some(0.01)),
    ]);

    let out = rank_candidates(&market, &mentions(&["flat", "down", "unknown"]));

    assert_eq!(names(&out), vec!["Up"]);
}

#[test]
fn empty_candidate_set_is_empty_result() {
    let market = market(&[("Down", Some(-3.0))]);
    assert!(score_trending(&market, &mentions(&["down"]), 5).is_empty());
    assert!(score_trending(&[], &[], 5).is_empty());
}

#[test]
fn every_candidate_appears_exactly_once_before_truncation() {
    let market = market(&[
        ("A", Some(1.0)),
        ("B", Some(2.0)),
        ("C", Some(-1.0)),
        ("D", Some(3.0)),
        ("E", Some(4.0)),
        ("F", Some(5.0)),
        ("G", Some(6.0)),
        ("H", None),
    ]);
    let out = rank_candidates(&market, &mentions(&["a", "b", "b", "zzz"]));

    let mut got = names(&out);
    got.sort_unstable();
    assert_eq!(got, vec!["A", "B", "D", "E", "F", "G"]);
}

#[test]
fn top_n_truncates_and_short_sets_are_returned_whole() {
    let market = market(&[
        ("A", Some(1.0)),
        ("B", Some(2.0)),
        ("C", Some(3.0)),
        ("D", Some(4.0)),
        ("E", Some(5.0)),
        ("F", Some(6.0)),
    ]);
    assert_eq!(score_trending(&market, &[], 5).len(), 5);
    assert_eq!(score_trending(&market, &[], 100).len(), 6);
    assert!(score_trending(&market, &[], 0).is_empty());
}

#[test]
fn output_is_sorted_non_increasing() {
    let market = market(&[
        ("A", Some(1.0)),
        ("B", Some(9.0)),
        ("C", Some(4.0)),
        ("D", Some(2.5)),
        ("E", Some(7.0)),
    ]);
    let out = rank_candidates(&market, &mentions(&["a", "a", "a", "c", "d", "d"]));

    for pair in out.windows(2) {
        assert!(
            pair[0].composite_score >= pair[1].composite_score,
            "{} before {}",
            pair[0].composite_score,
            pair[1].composite_score
        );
    }
}

#[test]
fn ties_keep_market_order() {
    let market = market(&[
        ("Third", Some(2.0)),
        ("First", Some(2.0)),
        ("Second", Some(2.0)),
    ]);
    let out = rank_candidates(&market, &[]);
    assert_eq!(names(&out), vec!["Third", "First", "Second"]);
}

#[test]
fn unmatched_candidates_get_zero_mentions() {
    let market = market(&[("Alpha", Some(1.0)), ("Beta", Some(2.0))]);
    let out = rank_candidates(&market, &mentions(&["alpha", "gamma", "gamma"]));

    let beta = out.iter().find(|e| e.display_name == "Beta").unwrap();
    assert_eq!(beta.mention_count, 0);
}

#[test]
fn join_is_case_and_whitespace_insensitive() {
    let market = market(&[(" Bitcoin ", Some(1.0))]);
    let out = rank_candidates(&market, &mentions(&["BITCOIN", "bitcoin  "]));
    assert_eq!(out[0].canonical_id, "bitcoin");
    assert_eq!(out[0].mention_count, 2);
}

#[test]
fn nameless_candidates_are_kept_with_zero_mentions() {
    let market = market(&[("", Some(3.0)), ("Alpha", Some(1.0))]);
    let out = rank_candidates(&market, &mentions(&["", "alpha"]));

    assert_eq!(out.len(), 2);
    let nameless = out.iter().find(|e| e.display_name.is_empty()).unwrap();
    assert_eq!(nameless.mention_count, 0);
}

#[test]
fn aliases_are_not_matched() {
    let market = market(&[("XRP", Some(1.0))]);
    let out = rank_candidates(&market, &mentions(&["ripple"]));
    assert_eq!(out[0].mention_count, 0);
}

#[test]
fn composite_is_sum_of_normalized_metrics() {
    let market = market(&[
        ("A", Some(1.0)),
        ("B", Some(3.0)),
        ("C", Some(2.0)),
    ]);
    let out = rank_candidates(&market, &mentions(&["a", "a", "c"]));
    for entity in &out {
        assert_eq!(
            entity.composite_score,
            entity.norm_price_change + entity.norm_mentions
        );
    }
}
