//! State machine behind a searchable select (project or phase picker).
//!
//! The widget moves between four states:
//!
//! ```text
//! Closed --open--> Querying <--text--> Suggesting --accept--> Committed
//!    ^                |  \                 |                      |
//!    +------blur------+   +-----click------+----------------------+
//! ```
//!
//! Any text change clears the committed selection and re-filters. The
//! dropdown only opens while the select has focus.

use crate::matcher::{inline_completion, is_subsequence_match, matching_indices, Candidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectState {
    /// Dropdown hidden, nothing committed.
    Closed,
    /// Dropdown open, no suggestion for the current query.
    Querying,
    /// Dropdown open and the first match is offered for accept.
    Suggesting,
    /// A candidate has been chosen.
    Committed,
}

/// Keys that accept the current suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptKey {
    Enter,
    Tab,
}

/// What the caller should do with a key after the select has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The select handled the key; suppress its default action.
    Consumed,
    /// Not handled; submit the form, move focus, etc.
    PassThrough,
}

/// A searchable select over any [`Candidate`] list.
#[derive(Debug, Clone)]
pub struct SearchSelect<C> {
    candidates: Vec<C>,
    query: String,
    state: SelectState,
    focused: bool,
    /// Indices into `candidates`, in candidate order.
    matches: Vec<usize>,
    selected: Option<usize>,
}

impl<C: Candidate> SearchSelect<C> {
    pub fn new(candidates: Vec<C>) -> Self {
        let matches = (0..candidates.len()).collect();
        Self {
            candidates,
            query: String::new(),
            state: SelectState::Closed,
            focused: false,
            matches,
            selected: None,
        }
    }

    pub fn state(&self) -> SelectState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn candidates(&self) -> &[C] {
        &self.candidates
    }

    pub fn selected(&self) -> Option<&C> {
        self.selected.map(|index| &self.candidates[index])
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SelectState::Querying | SelectState::Suggesting)
    }

    /// Candidates matching the current query, in candidate order.
    pub fn matches(&self) -> impl Iterator<Item = &C> + '_ {
        self.matches.iter().map(|&index| &self.candidates[index])
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// The candidate Enter/Tab would commit.
    pub fn suggestion(&self) -> Option<&C> {
        if self.selected.is_some() || self.query.is_empty() {
            return None;
        }
        self.matches.first().map(|&index| &self.candidates[index])
    }

    /// Ghost text to render after the query, only while suggesting.
    pub fn inline_completion(&self) -> Option<&str> {
        if self.state != SelectState::Suggesting {
            return None;
        }
        let suggestion = self.suggestion()?;
        inline_completion(suggestion.label(), &self.query)
    }

    /// Focus gained: show the dropdown.
    pub fn open(&mut self) {
        self.focused = true;
        if self.state == SelectState::Closed {
            self.settle();
        }
    }

    /// Focus lost: hide the dropdown, keeping the query and any commit.
    pub fn blur(&mut self) {
        self.focused = false;
        if self.is_open() {
            self.transition(SelectState::Closed);
        }
    }

    pub fn set_query(&mut self, text: &str) {
        text.clone_into(&mut self.query);
        self.query_changed();
    }

    /// Append a typed character to the query.
    pub fn input_char(&mut self, c: char) {
        self.query.push(c);
        self.query_changed();
    }

    /// Remove the last character of the query; no-op when it is empty.
    pub fn input_backspace(&mut self) {
        if self.query.pop().is_some() {
            self.query_changed();
        }
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.query_changed();
    }

    /// Enter or Tab pressed.
    ///
    /// Commits the suggestion when nothing is committed yet and a suggestion
    /// exists for the current query; the caller must then suppress the key's
    /// default action.
    pub fn accept(&mut self, key: AcceptKey) -> KeyOutcome {
        if self.state != SelectState::Suggesting {
            return KeyOutcome::PassThrough;
        }
        match self.matches.first().copied() {
            Some(index) if self.selected.is_none() => {
                tracing::debug!(?key, "suggestion accepted");
                self.commit(index);
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::PassThrough,
        }
    }

    /// A row of the open dropdown was clicked; `position` indexes [`Self::matches`].
    pub fn click(&mut self, position: usize) -> Option<&C> {
        if !self.is_open() {
            return None;
        }
        let index = *self.matches.get(position)?;
        self.commit(index);
        self.selected()
    }

    /// Replace the candidate list, keeping the commit if its id is still offered.
    pub fn set_candidates(&mut self, candidates: Vec<C>) {
        let kept = self.selected().and_then(|current| {
            candidates
                .iter()
                .position(|candidate| candidate.id() == current.id())
        });
        self.candidates = candidates;
        self.selected = kept;
        self.refilter();

        if kept.is_none() || self.state != SelectState::Committed {
            self.settle();
        }
    }

    /// Drop the commit and query, e.g. after the owning project changed.
    pub fn reset(&mut self) {
        self.query.clear();
        self.selected = None;
        self.focused = false;
        self.refilter();
        self.transition(SelectState::Closed);
    }

    fn query_changed(&mut self) {
        self.selected = None;
        self.refilter();
        self.settle();
    }

    fn refilter(&mut self) {
        self.matches = matching_indices(&self.candidates, &self.query);
    }

    fn commit(&mut self, index: usize) {
        self.selected = Some(index);
        self.candidates[index].label().clone_into(&mut self.query);
        self.refilter();
        self.transition(SelectState::Committed);
    }

    /// Uncommitted state for the current query: open only while focused.
    fn settle(&mut self) {
        let next = if !self.focused {
            SelectState::Closed
        } else if self.suggestion().is_some() {
            SelectState::Suggesting
        } else {
            SelectState::Querying
        };
        self.transition(next);
    }

    fn transition(&mut self, next: SelectState) {
        if self.state != next {
            tracing::trace!(from = ?self.state, to = ?next, "search select transition");
            self.state = next;
        }
    }

    /// Whether the committed candidate still matches the visible query.
    pub fn selection_matches_query(&self) -> bool {
        self.selected()
            .is_some_and(|selected| is_subsequence_match(selected.label(), &self.query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Project;

    fn projects() -> Vec<Project> {
        vec![
            Project::new("p-1", "Anthropic"),
            Project::new("p-2", "Vercel"),
            Project::new("p-3", "Stripe"),
            Project::new("p-4", "Linear"),
            Project::new("p-5", "Figma"),
        ]
    }

    fn typed(query: &str) -> SearchSelect<Project> {
        let mut select = SearchSelect::new(projects());
        select.open();
        for c in query.chars() {
            select.input_char(c);
        }
        select
    }

    fn names<'a>(select: &'a SearchSelect<Project>) -> Vec<&'a str> {
        select.matches().map(|project| project.name.as_str()).collect()
    }

    #[test]
    fn starts_closed_with_all_candidates() {
        let select = SearchSelect::new(projects());
        assert_eq!(select.state(), SelectState::Closed);
        assert_eq!(select.match_count(), 5);
        assert!(select.suggestion().is_none());
    }

    #[test]
    fn opening_without_query_is_querying() {
        let mut select = SearchSelect::new(projects());
        select.open();
        assert_eq!(select.state(), SelectState::Querying);
        assert!(select.is_open());
    }

    #[test]
    fn typing_suggests_first_match() {
        let select = typed("str");
        assert_eq!(select.state(), SelectState::Suggesting);
        assert_eq!(names(&select), vec!["Stripe"]);
        assert_eq!(select.suggestion().map(|p| p.name.as_str()), Some("Stripe"));
        assert_eq!(select.inline_completion(), Some("ipe"));
    }

    #[test]
    fn fuzzy_suggestion_has_no_ghost_text_but_can_be_accepted() {
        let mut select = typed("rcl");
        assert_eq!(select.state(), SelectState::Suggesting);
        assert_eq!(select.inline_completion(), None);

        assert_eq!(select.accept(AcceptKey::Enter), KeyOutcome::Consumed);
        assert_eq!(select.state(), SelectState::Committed);
        assert_eq!(select.selected().map(|p| p.name.as_str()), Some("Vercel"));
        assert_eq!(select.query(), "Vercel");
    }

    #[test]
    fn no_match_is_querying_and_accept_passes_through() {
        let mut select = typed("zzz");
        assert_eq!(select.state(), SelectState::Querying);
        assert_eq!(select.match_count(), 0);
        assert_eq!(select.accept(AcceptKey::Tab), KeyOutcome::PassThrough);
        assert!(select.selected().is_none());
    }

    #[test]
    fn accept_after_commit_passes_through() {
        let mut select = typed("st");
        assert_eq!(select.accept(AcceptKey::Tab), KeyOutcome::Consumed);
        // Second Enter should submit the form.
        assert_eq!(select.accept(AcceptKey::Enter), KeyOutcome::PassThrough);
        assert_eq!(select.selected().map(|p| p.id.as_str()), Some("p-3"));
    }

    #[test]
    fn accept_on_empty_query_passes_through() {
        let mut select = SearchSelect::new(projects());
        select.open();
        assert_eq!(select.accept(AcceptKey::Enter), KeyOutcome::PassThrough);
        assert_eq!(select.state(), SelectState::Querying);
    }

    #[test]
    fn editing_after_commit_clears_selection() {
        let mut select = typed("str");
        select.accept(AcceptKey::Enter);
        assert!(select.selection_matches_query());

        select.input_backspace();
        assert!(select.selected().is_none());
        assert_eq!(select.query(), "Strip");
        assert_eq!(select.state(), SelectState::Suggesting);
        assert_eq!(select.inline_completion(), Some("e"));
    }

    #[test]
    fn click_commits_any_visible_match() {
        let mut select = typed("e");
        assert_eq!(names(&select), vec!["Vercel", "Stripe", "Linear"]);

        let clicked = select.click(2).map(|p| p.name.clone());
        assert_eq!(clicked.as_deref(), Some("Linear"));
        assert_eq!(select.state(), SelectState::Committed);
    }

    #[test]
    fn click_outside_matches_or_when_closed_is_ignored() {
        let mut select = typed("e");
        assert!(select.click(7).is_none());
        assert_eq!(select.state(), SelectState::Suggesting);

        select.blur();
        assert!(select.click(0).is_none());
        assert_eq!(select.state(), SelectState::Closed);
    }

    #[test]
    fn blur_keeps_query_and_commit() {
        let mut select = typed("fi");
        select.blur();
        assert_eq!(select.state(), SelectState::Closed);
        assert_eq!(select.query(), "fi");

        select.open();
        assert_eq!(select.state(), SelectState::Suggesting);
        select.accept(AcceptKey::Enter);
        select.blur();
        assert_eq!(select.state(), SelectState::Committed);
        assert_eq!(select.selected().map(|p| p.name.as_str()), Some("Figma"));
    }

    #[test]
    fn clear_query_reopens_full_list() {
        let mut select = typed("lin");
        select.accept(AcceptKey::Enter);
        select.clear_query();
        assert!(select.selected().is_none());
        assert_eq!(select.state(), SelectState::Querying);
        assert_eq!(select.match_count(), 5);
    }

    #[test]
    fn backspace_on_empty_query_is_noop() {
        let mut select = typed("s");
        select.input_backspace();
        assert_eq!(select.query(), "");
        assert_eq!(select.state(), SelectState::Querying);

        select.input_backspace();
        assert_eq!(select.query(), "");
        assert_eq!(select.state(), SelectState::Querying);
        assert_eq!(select.match_count(), 5);
    }

    #[test]
    fn set_candidates_keeps_commit_by_id() {
        let mut select = typed("str");
        select.accept(AcceptKey::Enter);

        let mut reloaded = projects();
        reloaded.reverse();
        select.set_candidates(reloaded);
        assert_eq!(select.state(), SelectState::Committed);
        assert_eq!(select.selected().map(|p| p.id.as_str()), Some("p-3"));

        select.set_candidates(vec![Project::new("p-9", "Stripe Atlas")]);
        assert!(select.selected().is_none());
        assert_eq!(select.state(), SelectState::Suggesting);
    }

    #[test]
    fn reload_after_blur_stays_closed() {
        let mut select = typed("str");
        select.accept(AcceptKey::Enter);
        select.blur();
        assert_eq!(select.state(), SelectState::Committed);

        select.set_candidates(vec![Project::new("p-9", "Stripe Atlas")]);
        assert!(select.selected().is_none());
        assert_eq!(select.state(), SelectState::Closed);
        assert!(!select.is_open());
        assert!(select.click(0).is_none());

        select.open();
        assert_eq!(select.state(), SelectState::Suggesting);
        assert_eq!(select.suggestion().map(|p| p.name.as_str()), Some("Stripe Atlas"));
    }

    #[test]
    fn edits_without_focus_do_not_open() {
        let mut select = SearchSelect::new(projects());
        select.set_query("lin");
        assert_eq!(select.state(), SelectState::Closed);
        assert!(!select.is_focused());
        assert_eq!(names(&select), vec!["Linear"]);

        select.open();
        assert!(select.is_focused());
        assert_eq!(select.state(), SelectState::Suggesting);
    }

    #[test]
    fn reset_closes_and_forgets() {
        let mut select = typed("str");
        select.accept(AcceptKey::Enter);
        select.reset();
        assert_eq!(select.state(), SelectState::Closed);
        assert_eq!(select.query(), "");
        assert!(select.selected().is_none());
    }

    #[test]
    fn backspace_removes_whole_multibyte_char() {
        let mut select = SearchSelect::new(vec![Project::new("p-6", "Åland")]);
        select.open();
        select.set_query("åä");
        select.input_backspace();
        assert_eq!(select.query(), "å");
        assert_eq!(select.inline_completion(), Some("land"));
    }
}
