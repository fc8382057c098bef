use crate::graph::PageId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rank of every page in a corpus, produced by one estimator run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankMap {
    ranks: BTreeMap<PageId, f64>,
}

impl RankMap {
    pub(crate) fn from_map(ranks: BTreeMap<PageId, f64>) -> Self {
        Self { ranks }
    }

    pub fn get(&self, page: &str) -> Option<f64> {
        self.ranks.get(page).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn contains(&self, page: &str) -> bool {
        self.ranks.contains_key(page)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PageId, f64)> {
        self.ranks.iter().map(|(page, rank)| (page, *rank))
    }

    /// Sum of all ranks. Should be 1.0 within tolerance.
    pub fn total(&self) -> f64 {
        self.ranks.values().sum()
    }

    /// Pages ordered by identifier, the order results are printed in
    pub fn sorted(&self) -> Vec<(&PageId, f64)> {
        self.iter().collect()
    }

    /// Highest-ranked pages first; ties are broken by page identifier
    pub fn top_n(&self, n: usize) -> Vec<(&PageId, f64)> {
        let mut ranked = self.sorted();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }

    /// Largest absolute per-page difference against another map.
    ///
    /// Pages missing from `other` are compared against 0.0.
    pub fn max_delta(&self, other: &RankMap) -> f64 {
        self.iter()
            .map(|(page, rank)| (rank - other.get(page).unwrap_or(0.0)).abs())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> RankMap {
        RankMap::from_map(BTreeMap::from([
            ("b.html".to_string(), 0.25),
            ("a.html".to_string(), 0.25),
            ("c.html".to_string(), 0.5),
        ]))
    }

    #[test]
    fn test_sorted_by_page() {
        let map = sample_map();
        let pages: Vec<&str> = map.sorted().iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(pages, vec!["a.html", "b.html", "c.html"]);
    }

    #[test]
    fn test_top_n_breaks_ties_by_page() {
        let map = sample_map();
        let top = map.top_n(2);
        assert_eq!(top[0].0, "c.html");
        assert_eq!(top[1].0, "a.html");
    }

    #[test]
    fn test_max_delta() {
        let map = sample_map();
        let mut shifted = map.ranks.clone();
        shifted.insert("a.html".to_string(), 0.3);
        let other = RankMap::from_map(shifted);
        assert!((map.max_delta(&other) - 0.05).abs() < 1e-12);
    }
}
