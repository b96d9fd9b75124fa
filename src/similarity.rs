//! Cosine distance and exhaustive nearest-neighbour search.
//!
//! Both the analogy solver and the similarity ranker go through
//! [`NeighborSearch`], so a different search structure can be dropped in
//! without touching either of them.

use crate::error::{Error, Result};
use crate::word_vectors::Embeddings;
use rayon::prelude::*;
use std::cmp::Ordering;

#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine distance `1 - cos(a, b)`, in `[0, 2]`.
///
/// A zero vector has no direction, so it is treated as orthogonal to
/// everything and the distance is 1.0.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    distance_from_parts(dot(a, b), dot(a, a), dot(b, b))
}

/// Distance from a precomputed dot product and the two squared norms.
///
/// `sqrt(s * s) == s` holds exactly in IEEE arithmetic, so a vector compared
/// with itself always lands on 0.0.
#[inline]
pub(crate) fn distance_from_parts(dot: f64, norm_sq_a: f64, norm_sq_b: f64) -> f64 {
    let denom = (norm_sq_a * norm_sq_b).sqrt();
    if !(denom > 0.0 && denom.is_finite()) {
        return 1.0;
    }
    let cos = dot / denom;
    if !cos.is_finite() {
        return 1.0;
    }
    1.0 - cos.clamp(-1.0, 1.0)
}

/// A candidate found by a search: its index in the table and its distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

impl Neighbor {
    /// Ranking order: distance first, then load order.
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Strategy for finding the entries closest to a target vector.
pub trait NeighborSearch {
    /// The entry closest to `target`, ignoring the indices in `exclude`.
    fn nearest<E: Embeddings>(&self, table: &E, target: &[f64], exclude: &[usize])
    -> Option<Neighbor>;

    /// The `n` entries closest to `target`, ignoring `exclude`, best first.
    fn ranked<E: Embeddings>(
        &self,
        table: &E,
        target: &[f64],
        exclude: &[usize],
        n: usize,
    ) -> Vec<Neighbor>;
}

#[inline]
fn score<E: Embeddings>(table: &E, idx: usize, target: &[f64], target_norm_sq: f64) -> Neighbor {
    Neighbor {
        index: idx,
        distance: distance_from_parts(
            dot(table.vector(idx), target),
            table.norm_sq(idx),
            target_norm_sq,
        ),
    }
}

/// Keep the best `n` of `scores`, sorted.
fn keep_best(scores: &mut Vec<Neighbor>, n: usize) {
    if n == 0 {
        scores.clear();
        return;
    }
    // Partial sort first, this is cheaper when n is small compared to the vocabulary.
    if n < scores.len() {
        scores.select_nth_unstable_by(n - 1, Neighbor::cmp_rank);
        scores.truncate(n);
    }
    scores.sort_unstable_by(Neighbor::cmp_rank);
}

/// Exhaustive scan split across the rayon thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl NeighborSearch for BruteForce {
    fn nearest<E: Embeddings>(
        &self,
        table: &E,
        target: &[f64],
        exclude: &[usize],
    ) -> Option<Neighbor> {
        let target_norm_sq = dot(target, target);
        (0..table.len())
            .into_par_iter()
            .filter(|i| !exclude.contains(i))
            .map(|i| score(table, i, target, target_norm_sq))
            .min_by(Neighbor::cmp_rank)
    }

    fn ranked<E: Embeddings>(
        &self,
        table: &E,
        target: &[f64],
        exclude: &[usize],
        n: usize,
    ) -> Vec<Neighbor> {
        let target_norm_sq = dot(target, target);
        let mut scores: Vec<Neighbor> = (0..table.len())
            .into_par_iter()
            .filter(|i| !exclude.contains(i))
            .map(|i| score(table, i, target, target_norm_sq))
            .collect();
        keep_best(&mut scores, n);
        scores
    }
}

/// Exhaustive scan on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl NeighborSearch for LinearScan {
    fn nearest<E: Embeddings>(
        &self,
        table: &E,
        target: &[f64],
        exclude: &[usize],
    ) -> Option<Neighbor> {
        let target_norm_sq = dot(target, target);
        let mut best: Option<Neighbor> = None;
        for i in (0..table.len()).filter(|i| !exclude.contains(i)) {
            let current = score(table, i, target, target_norm_sq);
            // strict: the first entry reaching the minimum is kept
            if best.is_none_or(|b| current.distance < b.distance) {
                best = Some(current);
            }
        }
        best
    }

    fn ranked<E: Embeddings>(
        &self,
        table: &E,
        target: &[f64],
        exclude: &[usize],
        n: usize,
    ) -> Vec<Neighbor> {
        let target_norm_sq = dot(target, target);
        let mut scores: Vec<Neighbor> = (0..table.len())
            .filter(|i| !exclude.contains(i))
            .map(|i| score(table, i, target, target_norm_sq))
            .collect();
        keep_best(&mut scores, n);
        scores
    }
}

/// The `n` words closest to `word`, best first, with their cosine distances.
///
/// The query word is part of the vocabulary being ranked, so it comes back
/// with distance 0.0.
pub fn top_n<E: Embeddings>(table: &E, word: &str, n: usize) -> Result<Vec<(String, f64)>> {
    top_n_with(&BruteForce, table, word, n)
}

pub fn top_n_with<E: Embeddings, S: NeighborSearch>(
    search: &S,
    table: &E,
    word: &str,
    n: usize,
) -> Result<Vec<(String, f64)>> {
    let idx = table
        .index_of(word)
        .ok_or_else(|| Error::WordNotFound(word.to_string()))?;

    let ranked = search.ranked(table, table.vector(idx), &[], n);
    Ok(ranked
        .into_iter()
        .map(|nb| (table.word(nb.index).to_string(), nb.distance))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WordVectors;

    fn table() -> WordVectors {
        WordVectors::from_pairs([
            ("north", vec![0.0, 1.0]),
            ("east", vec![1.0, 0.0]),
            ("south", vec![0.0, -1.0]),
            ("northeast", vec![1.0, 1.0]),
            ("up", vec![0.0, 3.0]),
        ])
        .unwrap()
    }

    #[test]
    fn distance_of_known_angles() {
        assert_eq!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]), 0.0);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 5.0]) - 1.0).abs() < 1e-12);
        assert!((cosine_distance(&[1.0, 0.0], &[-3.0, 0.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_is_orthogonal() {
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 2.0]), 1.0);
        assert_eq!(cosine_distance(&[1.0, 2.0], &[0.0, 0.0]), 1.0);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[0.0, 0.0]), 1.0);
    }

    #[test]
    fn self_distance_is_exact() {
        let v = [0.3, -1.7, 2.9, 1e-3];
        assert_eq!(cosine_distance(&v, &v), 0.0);
    }

    #[test]
    fn top_n_includes_query_first() {
        let t = table();
        let result = top_n(&t, "north", 3).unwrap();
        assert_eq!(result[0], ("north".to_string(), 0.0));
        // "up" is parallel to "north" but loaded later
        assert_eq!(result[1].0, "up");
        assert_eq!(result[2].0, "northeast");
    }

    #[test]
    fn top_n_unknown_word_fails() {
        let t = table();
        assert!(matches!(
            top_n(&t, "west", 3),
            Err(Error::WordNotFound(w)) if w == "west"
        ));
    }

    #[test]
    fn top_n_larger_than_vocabulary() {
        let t = table();
        let result = top_n(&t, "east", 50).unwrap();
        assert_eq!(result.len(), t.len());
        // north, south and up are all orthogonal to east; load order decides
        assert_eq!(result[1].0, "northeast");
        assert_eq!(result[4].0, "up");
    }

    #[test]
    fn top_zero_is_empty() {
        assert!(top_n(&table(), "east", 0).unwrap().is_empty());
    }

    #[test]
    fn strategies_agree() {
        let t = table();
        let target = [0.5, 0.5];
        assert_eq!(
            BruteForce.nearest(&t, &target, &[3]),
            LinearScan.nearest(&t, &target, &[3])
        );
        assert_eq!(
            BruteForce.ranked(&t, &target, &[], 4),
            LinearScan.ranked(&t, &target, &[], 4)
        );
    }

    #[test]
    fn ties_go_to_first_loaded() {
        let t = table();
        // "north" and "up" are both at distance 0 from the target
        let best = BruteForce.nearest(&t, &[0.0, 2.0], &[]).unwrap();
        assert_eq!(best.index, 0);
        let best = BruteForce.nearest(&t, &[0.0, 2.0], &[0]).unwrap();
        assert_eq!(t.word(best.index), "up");
    }
}
