//! Fuzzy contact matching
//!
//! Partial-ratio scoring: the shorter string is slid across the longer one
//! and the best normalized similarity of any alignment wins.

use rapidfuzz::fuzz;

/// Candidates scoring at or below this are dropped from search results.
pub const FILTER_THRESHOLD: u8 = 40;

/// Minimum top score for resolving a recipient by name.
pub const ACCEPT_THRESHOLD: u8 = 60;

/// A candidate that survived filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Position of the candidate in the list that was searched.
    pub index: usize,
    pub score: u8,
}

/// Outcome of resolving a single recipient from a ranked match list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    NoMatch,
    Low(Match),
    Accepted(Match),
}

/// Case-insensitive partial-ratio score in `0..=100`. An empty query scores 100.
pub fn score(query: &str, candidate: &str) -> u8 {
    if query.is_empty() {
        return 100;
    }

    let query: Vec<char> = query.to_lowercase().chars().collect();
    let candidate: Vec<char> = candidate.to_lowercase().chars().collect();

    let best = if query.len() == candidate.len() {
        best_alignment(&query, &candidate).max(best_alignment(&candidate, &query))
    } else if query.len() < candidate.len() {
        best_alignment(&query, &candidate)
    } else {
        best_alignment(&candidate, &query)
    };

    to_score(best)
}

/// Scale a `0..=1` similarity to a whole score, rounding halves to even.
fn to_score(similarity: f64) -> u8 {
    (similarity * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}

/// Best similarity of `short` against every window of `long`, including
/// the partial windows that hang off either end. Requires `short.len() <= long.len()`.
fn best_alignment(short: &[char], long: &[char]) -> f64 {
    let n = short.len();
    let m = long.len();
    debug_assert!(n <= m);
    if n == 0 {
        return 0.0;
    }

    let windows = (1..n)
        .map(|end| &long[..end])
        .chain((0..=m - n).map(|start| &long[start..start + n]))
        .chain((m - n + 1..m).map(|start| &long[start..]));

    let mut best = 0.0f64;
    for window in windows {
        best = best.max(fuzz::ratio(short.iter().copied(), window.iter().copied()));
        if best >= 1.0 {
            return 1.0;
        }
    }
    best
}

/// Score every candidate, drop weak ones and rank the rest.
///
/// Ties keep their input order. An empty query returns every candidate,
/// unfiltered and in original order.
pub fn search<S: AsRef<str>>(candidates: &[S], query: &str) -> Vec<Match> {
    if query.is_empty() {
        return (0..candidates.len())
            .map(|index| Match { index, score: 100 })
            .collect();
    }

    let mut matches: Vec<Match> = candidates
        .iter()
        .enumerate()
        .map(|(index, name)| Match {
            index,
            score: score(query, name.as_ref()),
        })
        .filter(|m| m.score > FILTER_THRESHOLD)
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

/// Decide whether the top-ranked match is good enough to act on.
pub fn resolve(matches: &[Match]) -> Resolution {
    match matches.first() {
        None => Resolution::NoMatch,
        Some(top) if top.score >= ACCEPT_THRESHOLD => Resolution::Accepted(*top),
        Some(top) => Resolution::Low(*top),
    }
}
