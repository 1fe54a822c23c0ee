use std::collections::BTreeMap;

use cointrend_core::{MentionCount, MentionRecord};

/// Counts mentions per canonical keyword.
///
/// Records whose keyword canonicalizes to the empty string are skipped, so the
/// counts sum to the number of records with a usable keyword.
#[must_use]
pub fn aggregate_mentions(mentions: &[MentionRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for mention in mentions {
        let key = mention.canonical_key();
        if key.is_empty() {
            continue;
        }
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// [`aggregate_mentions`] as rows, ordered by canonical key.
#[must_use]
pub fn mention_counts(mentions: &[MentionRecord]) -> Vec<MentionCount> {
    aggregate_mentions(mentions)
        .into_iter()
        .map(|(canonical_id, count)| MentionCount {
            canonical_id,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentions(keywords: &[&str]) -> Vec<MentionRecord> {
        keywords.iter().map(|k| MentionRecord::new(*k)).collect()
    }

    #[test]
    fn groups_by_canonical_key() {
        let counts = aggregate_mentions(&mentions(&["Bitcoin", " bitcoin", "ETHEREUM", "bitcoin "]));
        assert_eq!(counts.get("bitcoin"), Some(&3));
        assert_eq!(counts.get("ethereum"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn empty_keywords_are_excluded() {
        let counts = aggregate_mentions(&mentions(&["", "   ", "alpha"]));
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(""), None);
    }

    #[test]
    fn total_equals_records_with_usable_keys() {
        let input = mentions(&["a", "b", "a", "c", "", "B"]);
        let total: u64 = aggregate_mentions(&input).values().sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn rows_are_sorted_by_key() {
        let rows = mention_counts(&mentions(&["zeta", "alpha", "zeta"]));
        assert_eq!(
            rows,
            vec![
                MentionCount {
                    canonical_id: "alpha".to_string(),
                    count: 1
                },
                MentionCount {
                    canonical_id: "zeta".to_string(),
                    count: 2
                },
            ]
        );
    }
}
