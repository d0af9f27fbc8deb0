//! Similarity scoring compatible with the classic `fuzzywuzzy` scorers.
//!
//! All scores are integers in `0..=100`. Strings are compared per `char`.

use std::collections::BTreeSet;

const UNBASE_SCALE: f64 = 0.95;
const LATIN1_SUPPLEMENT: std::ops::RangeInclusive<u32> = 0x80..=0xFF;

/// Best candidate picked by [`extract_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub candidate: &'a str,
    pub score: u8,
}

/// Drops Latin-1 supplement characters (`U+0080..=U+00FF`), lowercases, and
/// turns every remaining non-word character into a space.
pub fn full_process(value: &str) -> String {
    let replaced: String = value
        .chars()
        .filter(|ch| !LATIN1_SUPPLEMENT.contains(&u32::from(*ch)))
        .map(|ch| if ch.is_alphanumeric() || ch == '_' { ch } else { ' ' })
        .collect();
    replaced.to_lowercase().trim().to_string()
}

/// Indel similarity: `2 * LCS / (len(a) + len(b))`.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    let left: Vec<char> = a.chars().collect();
    let right: Vec<char> = b.chars().collect();
    ratio_chars(&left, &right)
}

fn ratio_chars(left: &[char], right: &[char]) -> u8 {
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    let total = (left.len() + right.len()) as f64;
    let common = longest_common_subsequence(left, right) as f64;
    to_score(100.0 * 2.0 * common / total)
}

fn longest_common_subsequence(left: &[char], right: &[char]) -> usize {
    let mut previous = vec![0usize; right.len() + 1];
    let mut current = vec![0usize; right.len() + 1];
    for l in left {
        for (j, r) in right.iter().enumerate() {
            current[j + 1] = if l == r {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[right.len()]
}

/// Best [`ratio`] of the shorter string against equally long windows of the longer.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let left: Vec<char> = a.chars().collect();
    let right: Vec<char> = b.chars().collect();
    let (shorter, longer) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };

    if shorter.is_empty() {
        return 0;
    }
    if shorter.len() == longer.len() {
        return ratio_chars(&shorter, &longer);
    }

    let mut best = 0;
    for window in longer.windows(shorter.len()) {
        let score = ratio_chars(&shorter, window);
        if score == 100 {
            return 100;
        }
        best = best.max(score);
    }
    best
}

fn sorted_tokens(value: &str) -> String {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn partial_token_sort_ratio(a: &str, b: &str) -> u8 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn token_set_with(a: &str, b: &str, scorer: fn(&str, &str) -> u8) -> u8 {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |tokens: Vec<&str>| tokens.join(" ");
    let intersection = join(left.intersection(&right).copied().collect());
    let left_only = join(left.difference(&right).copied().collect());
    let right_only = join(right.difference(&left).copied().collect());

    let combined_left = format!("{intersection} {left_only}").trim().to_string();
    let combined_right = format!("{intersection} {right_only}").trim().to_string();

    [
        scorer(&intersection, &combined_left),
        scorer(&intersection, &combined_right),
        scorer(&combined_left, &combined_right),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Compares the shared token set against each side's leftovers.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    token_set_with(a, b, ratio)
}

fn partial_token_set_ratio(a: &str, b: &str) -> u8 {
    token_set_with(a, b, partial_ratio)
}

/// Weighted combination of the scorers above, switching to partial matching
/// when one string is much longer than the other.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let left = full_process(a);
    let right = full_process(b);
    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let base = f64::from(ratio(&left, &right));
    let left_len = left.chars().count() as f64;
    let right_len = right.chars().count() as f64;
    let len_ratio = left_len.max(right_len) / left_len.min(right_len);

    if len_ratio < 1.5 {
        let token_sort = f64::from(token_sort_ratio(&left, &right)) * UNBASE_SCALE;
        let token_set = f64::from(token_set_ratio(&left, &right)) * UNBASE_SCALE;
        return to_score(base.max(token_sort).max(token_set));
    }

    let partial_scale = if len_ratio <= 8.0 { 0.9 } else { 0.6 };
    let partial = f64::from(partial_ratio(&left, &right)) * partial_scale;
    let partial_sort =
        f64::from(partial_token_sort_ratio(&left, &right)) * UNBASE_SCALE * partial_scale;
    let partial_set =
        f64::from(partial_token_set_ratio(&left, &right)) * UNBASE_SCALE * partial_scale;
    to_score(base.max(partial).max(partial_sort).max(partial_set))
}

/// Highest [`weighted_ratio`] candidate; the earliest one wins ties.
pub fn extract_one<'a>(query: &str, candidates: &[&'a str]) -> Option<Match<'a>> {
    let mut best: Option<Match<'a>> = None;
    for &candidate in candidates {
        let score = weighted_ratio(query, candidate);
        if best.map_or(true, |current| score > current.score) {
            best = Some(Match { candidate, score });
        }
    }
    best
}

/// Rounds half to even.
fn to_score(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 100.0) as u8
}
