//! Greedy selection policies shared by clustering and tracking.
//!
//! Both policies scan candidates in order and keep the first strict minimum,
//! so ties always resolve to the earliest candidate.

/// Pick the candidate with the smallest distance strictly below `threshold`.
///
/// # Arguments
/// * `candidates` - `(key, distance)` pairs in scan order
/// * `threshold` - Exclusive upper bound for a valid match
///
/// # Returns
/// The winning `(key, distance)`, or `None` if no candidate is below threshold.
pub fn nearest_below_threshold<K, I>(candidates: I, threshold: f64) -> Option<(K, f64)>
where
    I: IntoIterator<Item = (K, f64)>,
{
    let mut best: Option<(K, f64)> = None;
    let mut best_distance = threshold;

    for (key, distance) in candidates {
        if distance < best_distance {
            best_distance = distance;
            best = Some((key, distance));
        }
    }

    best
}

/// Find the closest unordered pair `(i, j)`, `i < j`, among `n` items.
///
/// Pairs are scanned row by row; the first strict minimum wins.
///
/// # Returns
/// `(i, j, distance)` or `None` when fewer than two items exist.
pub fn closest_pair<F>(n: usize, mut distance: F) -> Option<(usize, usize, f64)>
where
    F: FnMut(usize, usize) -> f64,
{
    let mut best: Option<(usize, usize, f64)> = None;

    for i in 0..n.saturating_sub(1) {
        for j in (i + 1)..n {
            let d = distance(i, j);
            match best {
                Some((_, _, best_d)) if d >= best_d => {}
                _ => best = Some((i, j, d)),
            }
        }
    }

    best
}
