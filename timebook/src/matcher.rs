//! Fuzzy candidate matching for searchable selects.
//!
//! Filtering is a case-insensitive ordered subsequence test and never reorders
//! candidates. The suggestion is always the first match in input order.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// An item that can be offered in a searchable select.
///
/// Only [`Candidate::label`] is inspected when matching.
pub trait Candidate {
    type Id: PartialEq;

    fn id(&self) -> &Self::Id;
    fn label(&self) -> &str;
}

/// Matches for one query against one candidate list.
#[derive(Debug)]
pub struct MatchResult<'a, C> {
    pub matches: Vec<&'a C>,
    pub suggestion: Option<&'a C>,
}

impl<'a, C: Candidate> MatchResult<'a, C> {
    /// Ghost text for the suggestion, if it extends the query as a literal prefix.
    pub fn inline_completion(&self, query: &str) -> Option<&'a str> {
        self.suggestion
            .and_then(|candidate| inline_completion(candidate.label(), query))
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Filter `candidates` by `query` and nominate a suggestion.
pub fn match_candidates<'a, C: Candidate>(candidates: &'a [C], query: &str) -> MatchResult<'a, C> {
    let matches = filter_candidates(candidates, query);
    let suggestion = suggestion(&matches, query);
    MatchResult {
        matches,
        suggestion,
    }
}

/// Whether every character of `query` appears in `label` in order, ignoring case.
///
/// # Examples
///
/// ```
/// use timebook::matcher::is_subsequence_match;
///
/// assert!(is_subsequence_match("Anthropic", "ap"));
/// assert!(is_subsequence_match("Vercel", "RCL"));
/// assert!(!is_subsequence_match("Figma", "af"));
/// ```
pub fn is_subsequence_match(label: &str, query: &str) -> bool {
    let label = label.to_lowercase();
    let mut label_chars = label.chars();
    query
        .to_lowercase()
        .chars()
        .all(|wanted| label_chars.any(|c| c == wanted))
}

/// Candidates whose label contains `query` as a subsequence, in input order.
///
/// An empty query keeps every candidate.
pub fn filter_candidates<'a, C: Candidate>(candidates: &'a [C], query: &str) -> Vec<&'a C> {
    matching_indices(candidates, query)
        .into_iter()
        .map(|index| &candidates[index])
        .collect()
}

/// Positions in `candidates` of the entries [`filter_candidates`] keeps.
pub fn matching_indices<C: Candidate>(candidates: &[C], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..candidates.len()).collect();
    }

    candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| is_subsequence_match(candidate.label(), query))
        .map(|(index, _)| index)
        .collect()
}

/// The candidate to autocomplete: the first match, never the best scored one.
pub fn suggestion<'a, C>(matches: &[&'a C], query: &str) -> Option<&'a C> {
    if query.is_empty() {
        return None;
    }
    matches.first().copied()
}

/// Remainder of `label` after `query`, when `label` starts with `query` ignoring case.
///
/// Stricter than the subsequence filter: `"rcl"` matches `"Vercel"` but has no
/// inline completion. The remainder keeps the label's casing.
pub fn inline_completion<'a>(label: &'a str, query: &str) -> Option<&'a str> {
    if query.is_empty() {
        return None;
    }

    let mut label_chars = label.char_indices();
    for wanted in query.chars() {
        let (_, c) = label_chars.next()?;
        if !c.to_lowercase().eq(wanted.to_lowercase()) {
            return None;
        }
    }

    let rest = label_chars.next().map_or(label.len(), |(index, _)| index);
    Some(&label[rest..])
}

/// Char indices in `label` to highlight for `query`, for display only.
pub fn highlight_positions(label: &str, query: &str) -> Option<Vec<usize>> {
    if query.is_empty() {
        return Some(Vec::new());
    }

    SkimMatcherV2::default()
        .ignore_case()
        .fuzzy_indices(label, query)
        .map(|(_, indices)| indices)
}
