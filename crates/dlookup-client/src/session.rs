//! Search session: the state behind one lookup screen.
//!
//! ```text
//!              text = ""                     lookup done, ≥1 user
//!   any ───────────────────► New    Searching ──────────────────► Results
//!   any ── new text/refresh ───────► Searching ── 0 users ──────► NoResults
//!                                    Searching ── error ────────► Error
//! ```
//!
//! Every issued lookup gets the next sequence number. [`SearchSession::complete`]
//! only applies a result whose number is the latest one handed out, so a slow
//! response to an old query can never overwrite a newer one. Cancellations
//! are dropped without a transition.
//!
//! Filtered views are recomputed on every call; nothing derived is stored.

use chrono::Datelike;
use dlookup_common::models::{self, DirectoryUser, FilterKind, LookupResponse};
use tracing::{debug, info, warn};

use crate::error::{LookupError, Result};

/// Coarse status shown alongside the results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStatus {
    #[default]
    New,
    Searching,
    Results,
    NoResults,
    Error,
}

/// A lookup the session wants run. Hand `seq` back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    search_text: String,
    last_issued: String,
    raw_results: Vec<DirectoryUser>,
    truncated: bool,
    filter_kind: FilterKind,
    filter_year: u8,
    selected: Vec<DirectoryUser>,
    status: SearchStatus,
    latest_seq: u64,
    last_error: Option<String>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(current_class_year())
    }
}

impl SearchSession {
    /// Empty session; `filter_year` is the two-digit year the ByYear filter starts on.
    pub fn new(filter_year: u8) -> Self {
        Self {
            search_text: String::new(),
            last_issued: String::new(),
            raw_results: Vec::new(),
            truncated: false,
            filter_kind: FilterKind::All,
            filter_year: filter_year % 100,
            selected: Vec::new(),
            status: SearchStatus::New,
            latest_seq: 0,
            last_error: None,
        }
    }

    // ── Search text & status machine ─────────────────────────────────────────

    /// Update the search text.
    ///
    /// Returns a ticket when a lookup must be issued: the text is non-empty
    /// and differs from the last issued query. Empty text resets to `New`.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> Option<LookupTicket> {
        self.search_text = text.into();
        if self.search_text.is_empty() {
            self.reset();
            return None;
        }
        if self.search_text == self.last_issued {
            debug!("Search {:?} already issued, skipping", self.search_text);
            return None;
        }
        Some(self.issue())
    }

    /// Re-issue the current text even if unchanged (pull-to-refresh).
    pub fn refresh(&mut self) -> Option<LookupTicket> {
        if self.search_text.is_empty() {
            self.reset();
            return None;
        }
        Some(self.issue())
    }

    /// Apply the result of the lookup issued as `seq`.
    ///
    /// Returns whether the session changed. Stale results and cancellations
    /// are discarded. On a non-cancel error the previous results stay visible.
    pub fn complete(&mut self, seq: u64, result: Result<LookupResponse>) -> bool {
        if seq != self.latest_seq || self.status != SearchStatus::Searching {
            debug!("Discarding stale lookup #{} (latest #{})", seq, self.latest_seq);
            return false;
        }
        match result {
            Ok(response) => {
                self.status = if response.users.is_empty() {
                    SearchStatus::NoResults
                } else {
                    SearchStatus::Results
                };
                info!(
                    "Lookup #{} for {:?}: {} entries{}",
                    seq,
                    self.last_issued,
                    response.users.len(),
                    if response.truncated { " (truncated)" } else { "" }
                );
                self.raw_results = response.users;
                self.truncated = response.truncated;
                self.last_error = None;
                true
            }
            Err(LookupError::CancelError) => {
                debug!("Lookup #{} cancelled", seq);
                false
            }
            Err(e) => {
                warn!("Lookup #{} for {:?} failed: {}", seq, self.last_issued, e);
                self.status = SearchStatus::Error;
                self.last_error = Some(e.to_string());
                true
            }
        }
    }

    fn issue(&mut self) -> LookupTicket {
        self.latest_seq += 1;
        self.last_issued = self.search_text.clone();
        self.status = SearchStatus::Searching;
        debug!("Issuing lookup #{} for {:?}", self.latest_seq, self.last_issued);
        LookupTicket {
            seq: self.latest_seq,
            query: self.last_issued.clone(),
        }
    }

    fn reset(&mut self) {
        // Bumping the sequence orphans whatever is still in flight.
        self.latest_seq += 1;
        self.last_issued.clear();
        self.raw_results.clear();
        self.truncated = false;
        self.last_error = None;
        self.status = SearchStatus::New;
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn last_issued_search_text(&self) -> &str {
        &self.last_issued
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn raw_results(&self) -> &[DirectoryUser] {
        &self.raw_results
    }

    /// The last applied response hit the server's result cap.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Message of the error behind the current `Error` status.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Filter ───────────────────────────────────────────────────────────────

    pub fn filter_kind(&self) -> FilterKind {
        self.filter_kind
    }

    pub fn filter_year(&self) -> u8 {
        self.filter_year
    }

    pub fn set_filter(&mut self, kind: FilterKind) {
        self.filter_kind = kind;
    }

    pub fn set_filter_year(&mut self, year: u8) {
        self.filter_year = year % 100;
    }

    pub fn visible(&self) -> Vec<&DirectoryUser> {
        models::visible(&self.raw_results, self.filter_kind, self.filter_year)
    }

    pub fn visible_excluding_selected(&self) -> Vec<&DirectoryUser> {
        models::visible_excluding_selected(
            &self.raw_results,
            self.filter_kind,
            self.filter_year,
            &self.selected,
        )
    }

    // ── Selection ────────────────────────────────────────────────────────────

    pub fn selected(&self) -> &[DirectoryUser] {
        &self.selected
    }

    pub fn is_selected(&self, uid: &str) -> bool {
        self.selected.iter().any(|u| u.uid() == uid)
    }

    /// Append `user` unless its uid is already selected. Returns whether it was added.
    ///
    /// Users without a mail address may be selected; the batch export actions reject
    /// such a selection as a whole.
    pub fn select(&mut self, user: DirectoryUser) -> bool {
        if self.is_selected(user.uid()) {
            return false;
        }
        self.selected.push(user);
        true
    }

    /// Remove the user with `uid`. Returns whether anything was removed.
    pub fn deselect(&mut self, uid: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|u| u.uid() != uid);
        self.selected.len() != before
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Find a user by uid among the selection and the current results.
    pub fn find(&self, uid: &str) -> Option<&DirectoryUser> {
        self.selected
            .iter()
            .chain(self.raw_results.iter())
            .find(|u| u.uid() == uid)
    }

    /// Heading for the selection: `"3 selected"`, or `"Jordan Mann & 2 more"` when collapsed.
    pub fn selection_summary(&self, expanded: bool) -> Option<String> {
        let first = self.selected.first()?;
        let n = self.selected.len();
        if expanded || n == 1 {
            Some(format!("{n} selected"))
        } else {
            Some(format!("{} & {} more", first.display_name(), n - 1))
        }
    }
}

/// Two-digit current calendar year, the default class-year filter.
pub fn current_class_year() -> u8 {
    (chrono::Local::now().year().rem_euclid(100)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(uid: &str, name: &str, affiliation: &str, class: Option<&str>) -> DirectoryUser {
        serde_json::from_value(json!({
            "uid": uid,
            "displayName": name,
            "eduPersonPrimaryAffiliation": affiliation,
            "dcAffiliation": affiliation,
            "dcDeptclass": class,
            "mail": format!("{uid}@dartmouth.edu"),
        }))
        .unwrap()
    }

    fn response(users: Vec<DirectoryUser>) -> Result<LookupResponse> {
        Ok(LookupResponse {
            truncated: false,
            users,
        })
    }

    fn sample() -> Vec<DirectoryUser> {
        vec![
            user("f001", "Jordan A. Mann", "Student", Some("'25")),
            user("d002", "Pat Staffer", "Staff", None),
        ]
    }

    #[test]
    fn new_session_is_idle() {
        let s = SearchSession::new(25);
        assert_eq!(s.status(), SearchStatus::New);
        assert!(s.raw_results().is_empty());
        assert_eq!(s.filter_kind(), FilterKind::All);
    }

    #[test]
    fn non_empty_text_issues_once() {
        let mut s = SearchSession::new(25);
        let ticket = s.set_search_text("Jordan").unwrap();
        assert_eq!(ticket.query, "Jordan");
        assert_eq!(s.status(), SearchStatus::Searching);
        assert_eq!(s.last_issued_search_text(), "Jordan");
        assert!(s.set_search_text("Jordan").is_none());
    }

    #[test]
    fn refresh_reissues_unchanged_text() {
        let mut s = SearchSession::new(25);
        let first = s.set_search_text("Jordan").unwrap();
        assert!(s.complete(first.seq, response(sample())));
        let again = s.refresh().unwrap();
        assert_eq!(again.query, "Jordan");
        assert!(again.seq > first.seq);
        assert_eq!(s.status(), SearchStatus::Searching);
    }

    #[test]
    fn results_and_no_results() {
        let mut s = SearchSession::new(25);
        let t = s.set_search_text("Jordan").unwrap();
        assert!(s.complete(t.seq, response(sample())));
        assert_eq!(s.status(), SearchStatus::Results);
        assert_eq!(s.raw_results().len(), 2);

        let t = s.set_search_text("Nobody").unwrap();
        assert!(s.complete(t.seq, response(vec![])));
        assert_eq!(s.status(), SearchStatus::NoResults);
        assert!(s.raw_results().is_empty());
    }

    #[test]
    fn empty_text_resets_and_orphans_in_flight() {
        let mut s = SearchSession::new(25);
        let t = s.set_search_text("Jordan").unwrap();
        assert!(s.set_search_text("").is_none());
        assert_eq!(s.status(), SearchStatus::New);
        assert!(!s.complete(t.seq, response(sample())));
        assert!(s.raw_results().is_empty());

        // The same text typed again after clearing is a fresh search.
        assert!(s.set_search_text("Jordan").is_some());
    }

    #[test]
    fn refresh_with_empty_text_resets() {
        let mut s = SearchSession::new(25);
        assert!(s.refresh().is_none());
        assert_eq!(s.status(), SearchStatus::New);
    }

    #[test]
    fn error_keeps_stale_results() {
        let mut s = SearchSession::new(25);
        let t = s.set_search_text("Jordan").unwrap();
        s.complete(t.seq, response(sample()));
        let t = s.set_search_text("Jordan M").unwrap();
        assert!(s.complete(t.seq, Err(LookupError::EmptySearch)));
        assert_eq!(s.status(), SearchStatus::Error);
        assert_eq!(s.raw_results().len(), 2);
        assert!(s.last_error().is_some());
    }

    #[test]
    fn cancellation_is_ignored() {
        let mut s = SearchSession::new(25);
        let t = s.set_search_text("Jordan").unwrap();
        assert!(!s.complete(t.seq, Err(LookupError::CancelError)));
        assert_eq!(s.status(), SearchStatus::Searching);
    }

    #[test]
    fn rapid_queries_settle_on_the_last() {
        let mut s = SearchSession::new(25);
        let tickets: Vec<LookupTicket> = ["J", "Jo", "Jor", "Jord"]
            .into_iter()
            .filter_map(|q| s.set_search_text(q))
            .collect();
        assert_eq!(tickets.len(), 4);

        let (last, earlier) = tickets.split_last().unwrap();
        // Older lookups resolve late and out of order; none of them may land.
        for t in earlier.iter().rev() {
            assert!(!s.complete(t.seq, response(sample())));
            assert!(!s.complete(t.seq, Err(LookupError::CancelError)));
        }
        assert_eq!(s.status(), SearchStatus::Searching);

        assert!(s.complete(last.seq, response(vec![sample()[0].clone()])));
        assert_eq!(s.status(), SearchStatus::Results);
        assert_eq!(s.raw_results().len(), 1);

        // A second completion for the same seq is not another transition.
        assert!(!s.complete(last.seq, response(vec![])));
        assert_eq!(s.status(), SearchStatus::Results);
    }

    #[test]
    fn truncated_flag_is_surfaced() {
        let mut s = SearchSession::new(25);
        let t = s.set_search_text("a").unwrap();
        s.complete(
            t.seq,
            Ok(LookupResponse {
                truncated: true,
                users: sample(),
            }),
        );
        assert!(s.truncated());
    }

    #[test]
    fn filtering_reads_session_state() {
        let mut s = SearchSession::new(25);
        let t = s.set_search_text("a").unwrap();
        s.complete(t.seq, response(sample()));

        s.set_filter(FilterKind::ByYear);
        assert_eq!(s.visible().len(), 1);
        s.set_filter_year(26);
        assert!(s.visible().is_empty());
        s.set_filter(FilterKind::StaffOnly);
        assert_eq!(s.visible()[0].uid(), "d002");
    }

    #[test]
    fn selection_is_unique_and_excluded() {
        let mut s = SearchSession::new(25);
        let t = s.set_search_text("a").unwrap();
        s.complete(t.seq, response(sample()));

        let jordan = sample()[0].clone();
        assert!(s.select(jordan.clone()));
        assert!(!s.select(jordan));
        assert_eq!(s.selected().len(), 1);

        let rest = s.visible_excluding_selected();
        assert!(rest.iter().all(|u| !s.is_selected(u.uid())));
        assert_eq!(rest.len(), 1);

        assert!(!s.deselect("nobody"));
        assert!(s.deselect("f001"));
        assert!(s.selected().is_empty());
    }

    #[test]
    fn selection_survives_new_results() {
        let mut s = SearchSession::new(25);
        let t = s.set_search_text("a").unwrap();
        s.complete(t.seq, response(sample()));
        s.select(sample()[1].clone());

        let t = s.set_search_text("zzz").unwrap();
        s.complete(t.seq, response(vec![]));
        s.set_filter(FilterKind::StudentsOnly);
        assert_eq!(s.selected().len(), 1);
        assert!(s.find("d002").is_some());

        s.clear_selection();
        assert!(s.selected().is_empty());
    }

    #[test]
    fn summary_collapses_after_first() {
        let mut s = SearchSession::new(25);
        assert_eq!(s.selection_summary(true), None);
        for u in sample() {
            s.select(u);
        }
        assert_eq!(s.selection_summary(true).as_deref(), Some("2 selected"));
        assert_eq!(
            s.selection_summary(false).as_deref(),
            Some("Jordan A. Mann & 1 more")
        );
    }

    #[test]
    fn mailless_user_selects_but_blocks_batch_export() {
        let mut s = SearchSession::new(25);
        let no_mail: DirectoryUser = serde_json::from_value(json!({
            "uid": "d003",
            "displayName": "Sam Nomail",
            "eduPersonPrimaryAffiliation": "Staff",
            "dcAffiliation": "Staff",
        }))
        .unwrap();
        s.select(sample().remove(0));
        assert!(s.select(no_mail));
        assert!(s.is_selected("d003"));

        let mut clipboard = crate::export::WriterClipboard::new(Vec::new());
        let err = crate::export::copy_all(s.selected(), &mut clipboard).unwrap_err();
        assert!(matches!(err, LookupError::MissingContactInfo { ref uid, .. } if uid == "d003"));
        assert!(clipboard.into_inner().is_empty());
    }
}
