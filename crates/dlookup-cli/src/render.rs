//! Plain-text rendering of results and session state.

use std::fmt::Write;

use dlookup_client::{SearchSession, SearchStatus};
use dlookup_common::models::{
    ContactRecord, DirectoryUser, FilterKind, TRUNCATION_THRESHOLD, class_label,
};

const HEADERS: [&str; 6] = ["UID", "NAME", "CLASS", "EMAIL", "PHONE", "AFFILIATION"];

/// Aligned table, one user per row.
pub fn table(users: &[&DirectoryUser]) -> String {
    let rows: Vec<[&str; 6]> = users
        .iter()
        .map(|u| {
            [
                u.uid(),
                u.display_name(),
                u.department_or_class().unwrap_or("-"),
                u.mail().unwrap_or("-"),
                u.telephone_number().unwrap_or("-"),
                u.dc_affiliation(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&HEADERS).chain(rows.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

pub fn json(users: &[&DirectoryUser]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(users)
}

/// One vCard per user, concatenated.
pub fn vcards(users: &[&DirectoryUser]) -> String {
    users
        .iter()
        .map(|u| ContactRecord::from(*u).to_vcard())
        .collect()
}

pub fn truncation_warning(count: usize) -> String {
    format!(
        "warning: the directory capped results at {count} (limit {TRUNCATION_THRESHOLD}); \
         refine the search to see everyone"
    )
}

fn filter_label(kind: FilterKind, year: u8) -> String {
    match kind {
        FilterKind::All => "all".to_owned(),
        FilterKind::StudentsOnly => "students".to_owned(),
        FilterKind::StaffOnly => "staff".to_owned(),
        FilterKind::ByYear => format!("class of {}", class_label(year)),
    }
}

/// Status line, selection block, then the remaining visible results.
pub fn session_view(session: &SearchSession, selection_only: bool) -> String {
    let mut out = String::new();

    let status = match session.status() {
        SearchStatus::New => "Type a name to search".to_owned(),
        SearchStatus::Searching => {
            format!("Searching for {:?}…", session.last_issued_search_text())
        }
        SearchStatus::Results => format!(
            "{} results for {:?} ({})",
            session.raw_results().len(),
            session.last_issued_search_text(),
            filter_label(session.filter_kind(), session.filter_year()),
        ),
        SearchStatus::NoResults => "No results".to_owned(),
        SearchStatus::Error => format!(
            "Lookup failed: {}",
            session.last_error().unwrap_or("unknown error")
        ),
    };
    let _ = writeln!(out, "{status}");
    if session.truncated() {
        let _ = writeln!(out, "{}", truncation_warning(session.raw_results().len()));
    }

    if let Some(summary) = session.selection_summary(true) {
        let selected: Vec<&DirectoryUser> = session.selected().iter().collect();
        let _ = writeln!(out, "\n== {summary} ==");
        out.push_str(&table(&selected));
    }

    if !selection_only {
        let rest = session.visible_excluding_selected();
        if !rest.is_empty() {
            out.push('\n');
            out.push_str(&table(&rest));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlookup_common::models::LookupResponse;
    use serde_json::json;

    fn users() -> Vec<DirectoryUser> {
        serde_json::from_value(json!([
            {
                "uid": "f001",
                "displayName": "Jordan A. Mann",
                "eduPersonPrimaryAffiliation": "Student",
                "dcAffiliation": "Undergraduate Student",
                "dcDeptclass": "'25",
                "mail": "jordan@dartmouth.edu",
            },
            {
                "uid": "d002",
                "displayName": "Pat Staffer",
                "eduPersonPrimaryAffiliation": "Staff",
                "dcAffiliation": "Staff",
            },
        ]))
        .unwrap()
    }

    #[test]
    fn table_aligns_columns() {
        let all = users();
        let refs: Vec<&DirectoryUser> = all.iter().collect();
        let out = table(&refs);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("UID   NAME"));
        assert!(lines[1].starts_with("f001  Jordan A. Mann  '25"));
        assert!(lines[2].contains("Pat Staffer     -"));
        assert!(lines[0].ends_with("AFFILIATION"));
        assert!(lines[1].ends_with("Undergraduate Student"));
        assert!(lines[2].ends_with("Staff"));
    }

    #[test]
    fn truncation_warning_names_the_limit() {
        let warning = truncation_warning(50);
        assert!(warning.contains("capped results at 50"));
        assert!(warning.contains("limit 50"));
    }

    #[test]
    fn session_view_separates_selection() {
        let mut session = SearchSession::new(25);
        let ticket = session.set_search_text("a").unwrap();
        session.complete(
            ticket.seq,
            Ok(LookupResponse {
                truncated: true,
                users: users(),
            }),
        );
        session.select(users()[0].clone());

        let out = session_view(&session, false);
        assert!(out.starts_with("2 results for \"a\" (all)"));
        assert!(out.contains("capped results"));
        assert!(out.contains("== 1 selected =="));
        assert_eq!(out.matches("f001").count(), 1);
        assert!(out.contains("d002"));

        let only = session_view(&session, true);
        assert!(!only.contains("d002"));
    }

    #[test]
    fn vcards_concatenate() {
        let all = users();
        let refs: Vec<&DirectoryUser> = all.iter().collect();
        assert_eq!(vcards(&refs).matches("BEGIN:VCARD").count(), 2);
    }
}
