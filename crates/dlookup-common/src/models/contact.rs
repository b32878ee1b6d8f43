//! Contact card built from a directory entry.
//!
//! This is what an address-book surface consumes. The directory uid is kept
//! in the note so a saved card can be traced back to its source entry.

use serde::Serialize;

use super::user::{DirectoryUser, PostalAddress};

/// Label attached to a contact field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactLabel {
    School,
    Work,
    Main,
}

impl ContactLabel {
    fn vcard_type(self) -> &'static str {
        match self {
            Self::School => "HOME",
            Self::Work => "WORK",
            Self::Main => "VOICE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labeled<T> {
    pub label: ContactLabel,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    pub given_name: String,
    pub middle_name: Option<String>,
    pub family_name: Option<String>,
    /// Full display name as the directory spells it.
    pub display_name: String,
    pub job_title: Option<String>,
    /// Directory affiliation detail, e.g. `Undergraduate Student`.
    pub role: Option<String>,
    pub email: Option<Labeled<String>>,
    pub postal_address: Option<Labeled<PostalAddress>>,
    pub phone: Option<Labeled<String>>,
    pub nickname: Option<String>,
    pub note: String,
}

impl From<&DirectoryUser> for ContactRecord {
    fn from(u: &DirectoryUser) -> Self {
        let name = u.parsed_name();
        let email_label = if u.is_student() {
            ContactLabel::School
        } else {
            ContactLabel::Work
        };
        Self {
            given_name: name.first,
            middle_name: name.middle,
            family_name: name.last,
            display_name: u.display_name().to_owned(),
            job_title: u.department_or_class().map(|c| format!("{c} at Dartmouth")),
            role: Some(u.dc_affiliation())
                .filter(|r| !r.is_empty())
                .map(str::to_owned),
            email: u.mail().map(|m| Labeled {
                label: email_label,
                value: m.to_owned(),
            }),
            postal_address: u.postal_address().map(|a| Labeled {
                label: ContactLabel::School,
                value: a,
            }),
            phone: u.telephone_number().map(|p| Labeled {
                label: ContactLabel::Main,
                value: p.to_owned(),
            }),
            nickname: u.nickname().map(str::to_owned),
            note: format!("Dartmouth ID: {}", u.uid()),
        }
    }
}

impl ContactRecord {
    /// Render as a vCard 3.0 card with CRLF line endings, folding long lines.
    pub fn to_vcard(&self) -> String {
        let mut lines = vec!["BEGIN:VCARD".to_owned(), "VERSION:3.0".to_owned()];
        lines.push(format!(
            "N:{};{};{};;",
            escape(self.family_name.as_deref().unwrap_or_default()),
            escape(&self.given_name),
            escape(self.middle_name.as_deref().unwrap_or_default()),
        ));
        lines.push(format!("FN:{}", escape(&self.display_name)));
        if let Some(nick) = &self.nickname {
            lines.push(format!("NICKNAME:{}", escape(nick)));
        }
        if let Some(title) = &self.job_title {
            lines.push(format!("TITLE:{}", escape(title)));
        }
        if let Some(role) = &self.role {
            lines.push(format!("ROLE:{}", escape(role)));
        }
        if let Some(email) = &self.email {
            lines.push(format!(
                "EMAIL;TYPE=INTERNET,{}:{}",
                email.label.vcard_type(),
                escape(&email.value)
            ));
        }
        if let Some(phone) = &self.phone {
            lines.push(format!(
                "TEL;TYPE={}:{}",
                phone.label.vcard_type(),
                escape(&phone.value)
            ));
        }
        if let Some(addr) = &self.postal_address {
            let a = &addr.value;
            lines.push(format!(
                "ADR;TYPE={}:;;{};{};{};{};{}",
                addr.label.vcard_type(),
                escape(&a.street),
                escape(a.city),
                escape(a.state),
                escape(a.postal_code),
                escape(a.country),
            ));
        }
        lines.push(format!("NOTE:{}", escape(&self.note)));
        lines.push("END:VCARD".to_owned());

        let mut card = String::new();
        for line in &lines {
            fold_into(&mut card, line);
        }
        card
    }
}

/// Longest physical line in octets, CRLF excluded (RFC 2426 §2.6).
const FOLD_WIDTH: usize = 75;

/// Append `line` to `out` as CRLF-terminated physical lines of at most
/// [`FOLD_WIDTH`] octets; continuation lines start with a single space.
fn fold_into(out: &mut String, line: &str) {
    let mut width = 0;
    for c in line.chars() {
        if width + c.len_utf8() > FOLD_WIDTH {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += c.len_utf8();
    }
    out.push_str("\r\n");
}

/// Text value escaping (RFC 2426 §5).
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn student() -> DirectoryUser {
        serde_json::from_value(json!({
            "uid": "f00abc",
            "displayName": "Jordan A. Mann",
            "eduPersonPrimaryAffiliation": "Student",
            "dcAffiliation": "Undergraduate Student",
            "dcDeptclass": "'25",
            "mail": "jordan.a.mann.25@dartmouth.edu",
            "eduPersonNickname": "Jordy",
            "telephoneNumber": "603-555-0100",
            "dcHinmanaddr": "HB 2154",
        }))
        .unwrap()
    }

    #[test]
    fn student_maps_to_school_labels() {
        let record = ContactRecord::from(&student());
        assert_eq!(record.given_name, "Jordan");
        assert_eq!(record.middle_name.as_deref(), Some("A."));
        assert_eq!(record.family_name.as_deref(), Some("Mann"));
        assert_eq!(record.job_title.as_deref(), Some("'25 at Dartmouth"));
        assert_eq!(record.email.as_ref().map(|e| e.label), Some(ContactLabel::School));
        assert_eq!(
            record.postal_address.as_ref().map(|a| a.value.street.as_str()),
            Some("2154 Hinman")
        );
        assert_eq!(record.phone.as_ref().map(|p| p.label), Some(ContactLabel::Main));
        assert_eq!(record.nickname.as_deref(), Some("Jordy"));
        assert_eq!(record.note, "Dartmouth ID: f00abc");
    }

    #[test]
    fn staff_email_is_work() {
        let staff: DirectoryUser = serde_json::from_value(json!({
            "uid": "d999",
            "displayName": "Cher",
            "eduPersonPrimaryAffiliation": "Staff",
            "dcAffiliation": "Staff",
            "mail": "cher@dartmouth.edu",
        }))
        .unwrap();
        let record = ContactRecord::from(&staff);
        assert_eq!(record.email.map(|e| e.label), Some(ContactLabel::Work));
        assert_eq!(record.given_name, "Cher");
        assert_eq!(record.family_name, None);
        assert_eq!(record.job_title, None);
        assert_eq!(record.postal_address, None);
    }

    #[test]
    fn vcard_has_expected_properties() {
        let card = ContactRecord::from(&student()).to_vcard();
        assert!(card.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(card.contains("N:Mann;Jordan;A.;;\r\n"));
        assert!(card.contains("FN:Jordan A. Mann\r\n"));
        assert!(card.contains("EMAIL;TYPE=INTERNET,HOME:jordan.a.mann.25@dartmouth.edu\r\n"));
        assert!(card.contains("ADR;TYPE=HOME:;;2154 Hinman;Hanover;NH;03755;United States\r\n"));
        assert!(card.ends_with("END:VCARD\r\n"));
    }

    #[test]
    fn vcard_carries_affiliation_as_role() {
        let card = ContactRecord::from(&student()).to_vcard();
        assert!(card.contains("ROLE:Undergraduate Student\r\n"));
    }

    #[test]
    fn long_lines_are_folded() {
        let user: DirectoryUser = serde_json::from_value(json!({
            "uid": "f00abc",
            "displayName": "Jordan A. Mann",
            "eduPersonPrimaryAffiliation": "Student",
            "dcAffiliation": "Graduate Student in Comparative Literature and Éducation Studies",
            "dcDeptclass": "Thayer School of Engineering Doctoral Program in Engineering Sciences",
        }))
        .unwrap();
        let card = ContactRecord::from(&user).to_vcard();

        for physical in card.split("\r\n") {
            assert!(physical.len() <= FOLD_WIDTH, "{physical:?}");
        }
        let unfolded = card.replace("\r\n ", "");
        let title = "TITLE:Thayer School of Engineering Doctoral Program in Engineering Sciences";
        assert!(unfolded.contains(&format!("\r\n{title} at Dartmouth\r\n")));
        assert!(unfolded.contains(
            "\r\nROLE:Graduate Student in Comparative Literature and Éducation Studies\r\n"
        ));
    }

    #[test]
    fn vcard_escapes_separators() {
        assert_eq!(escape("a,b;c\\d"), "a\\,b\\;c\\\\d");
    }
}
