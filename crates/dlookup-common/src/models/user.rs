//! Directory user model: one entry in a lookup response.
//!
//! Records are immutable once decoded. Everything beyond the wire fields
//! (dorm number, postal address, structured name) is derived on each access
//! from the stored strings.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Affiliation value the directory uses for students.
pub const STUDENT_AFFILIATION: &str = "Student";

/// Result count at which the directory sets `truncated`.
pub const TRUNCATION_THRESHOLD: usize = 50;

/// Hinman mailbox, e.g. `HB 2154`.
static HINMAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^HB\s(\d{4})$").expect("hinman pattern is valid"));

/// `first middle? last` over whitespace-separated tokens.
static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(?:(\S+)\s+)?(\S+)$").expect("name pattern is valid")
});

/// Decoded response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    /// The server capped the result list; there is no way to page further.
    pub truncated: bool,
    pub users: Vec<DirectoryUser>,
}

/// A student or staff entry from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    uid: String,

    #[serde(rename = "displayName")]
    display_name: String,

    #[serde(rename = "eduPersonPrimaryAffiliation")]
    affiliation: String,

    #[serde(rename = "dcAffiliation")]
    dc_affiliation: String,

    /// Class year (`'25`) for students, department otherwise.
    #[serde(rename = "dcDeptclass", default)]
    department_or_class: Option<String>,

    #[serde(default)]
    mail: Option<String>,

    #[serde(rename = "telephoneNumber", default)]
    telephone_number: Option<String>,

    #[serde(rename = "eduPersonNickname", default)]
    nickname: Option<String>,

    #[serde(rename = "dcHinmanaddr", default)]
    dorm_address_raw: Option<String>,
}

impl DirectoryUser {
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn affiliation(&self) -> &str {
        &self.affiliation
    }

    pub fn dc_affiliation(&self) -> &str {
        &self.dc_affiliation
    }

    pub fn department_or_class(&self) -> Option<&str> {
        self.department_or_class.as_deref()
    }

    pub fn mail(&self) -> Option<&str> {
        self.mail.as_deref()
    }

    pub fn telephone_number(&self) -> Option<&str> {
        self.telephone_number.as_deref()
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn is_student(&self) -> bool {
        self.affiliation == STUDENT_AFFILIATION
    }

    /// Hinman mailbox number, if `dcHinmanaddr` has the `HB ####` shape.
    pub fn dorm_number(&self) -> Option<u16> {
        let raw = self.dorm_address_raw.as_deref()?;
        let caps = HINMAN_REGEX.captures(raw)?;
        caps.get(1)?.as_str().parse().ok()
    }

    /// Campus mailing address built from the Hinman mailbox.
    pub fn postal_address(&self) -> Option<PostalAddress> {
        self.dorm_number().map(PostalAddress::hinman)
    }

    /// Best-effort split of the display name.
    pub fn parsed_name(&self) -> ParsedName {
        ParsedName::parse(&self.display_name)
    }
}

// ─── Derived: postal address ─────────────────────────────────────────────────

/// Mailing address for a Hinman box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostalAddress {
    pub street: String,
    pub city: &'static str,
    pub state: &'static str,
    pub postal_code: &'static str,
    pub country: &'static str,
}

impl PostalAddress {
    pub fn hinman(box_number: u16) -> Self {
        Self {
            street: format!("{box_number} Hinman"),
            city: "Hanover",
            state: "NH",
            postal_code: "03755",
            country: "United States",
        }
    }
}

/// US layout: street, `city state zip`, country, one per line.
impl fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{} {} {}\n{}",
            self.street, self.city, self.state, self.postal_code, self.country
        )
    }
}

// ─── Derived: name ───────────────────────────────────────────────────────────

/// Structured view of a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedName {
    pub first: String,
    pub middle: Option<String>,
    pub last: Option<String>,
}

impl ParsedName {
    /// Names that don't fit `first middle? last` keep the whole string as `first`.
    pub fn parse(display_name: &str) -> Self {
        let Some(caps) = NAME_REGEX.captures(display_name) else {
            return Self {
                first: display_name.to_owned(),
                middle: None,
                last: None,
            };
        };
        let token = |i: usize| caps.get(i).map(|m| m.as_str().to_owned());
        Self {
            first: token(1).unwrap_or_default(),
            middle: token(2),
            last: token(3),
        }
    }
}
