//! Word analogies by vector arithmetic: `a` is to `b` as `c` is to `?`.

use crate::similarity::{BruteForce, NeighborSearch};
use crate::word_vectors::Embeddings;

/// `vec(b) - vec(a) + vec(c)` and the indices of the three query words.
/// `None` if any of them is out of vocabulary.
fn query<E: Embeddings>(table: &E, a: &str, b: &str, c: &str) -> Option<(Vec<f64>, [usize; 3])> {
    let (Some(a_idx), Some(b_idx), Some(c_idx)) =
        (table.index_of(a), table.index_of(b), table.index_of(c))
    else {
        return None;
    };

    let va = table.vector(a_idx);
    let vb = table.vector(b_idx);
    let vc = table.vector(c_idx);

    let target = va
        .iter()
        .zip(vb)
        .zip(vc)
        .map(|((a, b), c)| b - a + c)
        .collect();

    Some((target, [a_idx, b_idx, c_idx]))
}

/// Solve the analogy, returning the closest word in lowercase.
///
/// The three query words never answer their own question: they are matched
/// exactly as given, so a differently cased entry for one of them is still a
/// candidate. Returns `None` when a query word is out of vocabulary or the
/// table has nothing left after the exclusions.
pub fn solve<E: Embeddings>(table: &E, a: &str, b: &str, c: &str) -> Option<String> {
    solve_with(&BruteForce, table, a, b, c)
}

pub fn solve_with<E: Embeddings, S: NeighborSearch>(
    search: &S,
    table: &E,
    a: &str,
    b: &str,
    c: &str,
) -> Option<String> {
    let (target, exclude) = query(table, a, b, c)?;
    search
        .nearest(table, &target, &exclude)
        .map(|best| table.word(best.index).to_lowercase())
}

/// same as solve, except it returns the top n candidates with their distances
pub fn solve_top_n<E: Embeddings>(
    table: &E,
    a: &str,
    b: &str,
    c: &str,
    n: usize,
) -> Option<Vec<(String, f64)>> {
    let (target, exclude) = query(table, a, b, c)?;
    let ranked = BruteForce.ranked(table, &target, &exclude, n);
    Some(
        ranked
            .into_iter()
            .map(|nb| (table.word(nb.index).to_string(), nb.distance))
            .collect(),
    )
}
