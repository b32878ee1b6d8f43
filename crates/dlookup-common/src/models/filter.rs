//! Result filtering. Pure functions over a result list; nothing here is cached.

use serde::{Deserialize, Serialize};

use super::user::DirectoryUser;

/// Which subset of the raw results is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Only users whose class field equals the selected `'YY` year.
    ByYear,
    StudentsOnly,
    StaffOnly,
    #[default]
    All,
}

impl FilterKind {
    /// Whether `user` passes this filter. `year` is only read for [`FilterKind::ByYear`].
    pub fn matches(self, user: &DirectoryUser, year: u8) -> bool {
        match self {
            Self::ByYear => user.department_or_class() == Some(class_label(year).as_str()),
            Self::StudentsOnly => user.is_student(),
            Self::StaffOnly => !user.is_student(),
            Self::All => true,
        }
    }
}

/// `25` → `'25`, the directory's spelling of a graduating class.
pub fn class_label(year: u8) -> String {
    format!("'{:02}", year % 100)
}

/// Users from `results` that pass the filter, in result order.
pub fn visible(results: &[DirectoryUser], kind: FilterKind, year: u8) -> Vec<&DirectoryUser> {
    results.iter().filter(|u| kind.matches(u, year)).collect()
}

/// [`visible`] minus anything whose uid is in `selected`.
pub fn visible_excluding_selected<'a>(
    results: &'a [DirectoryUser],
    kind: FilterKind,
    year: u8,
    selected: &[DirectoryUser],
) -> Vec<&'a DirectoryUser> {
    visible(results, kind, year)
        .into_iter()
        .filter(|u| !selected.iter().any(|s| s.uid() == u.uid()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results() -> Vec<DirectoryUser> {
        serde_json::from_value(json!([
            {
                "uid": "f001",
                "displayName": "Student One",
                "eduPersonPrimaryAffiliation": "Student",
                "dcAffiliation": "Undergraduate Student",
                "dcDeptclass": "'25",
            },
            {
                "uid": "d002",
                "displayName": "Staff Two",
                "eduPersonPrimaryAffiliation": "Staff",
                "dcAffiliation": "Staff",
                "dcDeptclass": null,
            },
        ]))
        .unwrap()
    }

    fn uids(users: &[&DirectoryUser]) -> Vec<String> {
        users.iter().map(|u| u.uid().to_owned()).collect()
    }

    #[test]
    fn filter_kinds_partition_results() {
        let raw = results();
        assert_eq!(uids(&visible(&raw, FilterKind::StudentsOnly, 0)), ["f001"]);
        assert_eq!(uids(&visible(&raw, FilterKind::ByYear, 25)), ["f001"]);
        assert_eq!(uids(&visible(&raw, FilterKind::StaffOnly, 0)), ["d002"]);
        assert_eq!(uids(&visible(&raw, FilterKind::All, 0)), ["f001", "d002"]);
    }

    #[test]
    fn other_year_matches_nothing() {
        let raw = results();
        assert!(visible(&raw, FilterKind::ByYear, 26).is_empty());
    }

    #[test]
    fn class_label_pads_single_digits() {
        assert_eq!(class_label(25), "'25");
        assert_eq!(class_label(5), "'05");
    }

    #[test]
    fn selected_users_are_excluded() {
        let raw = results();
        let selected = vec![raw[0].clone()];
        let rest = visible_excluding_selected(&raw, FilterKind::All, 0, &selected);
        assert_eq!(uids(&rest), ["d002"]);
    }
}
