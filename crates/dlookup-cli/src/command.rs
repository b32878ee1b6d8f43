//! Interactive-session input parsing.
//!
//! A line starting with `:` is a command; anything else is the new search text.

use dlookup_common::models::FilterKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Search(String),
    Refresh,
    Filter(FilterKind, Option<u8>),
    Select(String),
    Unselect(String),
    Clear,
    List,
    Selected,
    Show(String),
    Mail(String),
    MailAll,
    Call(String),
    Copy(String),
    CopyName(String),
    CopyAddr(String),
    CopyAll,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command ':{0}' (try :help)")]
    Unknown(String),

    #[error(":{0} needs a uid")]
    MissingUid(&'static str),

    #[error("unknown filter '{0}' (all, students, staff, year)")]
    BadFilter(String),

    #[error("class year must be 0-99, got '{0}'")]
    BadYear(String),
}

pub const HELP: &str = "\
Type a name or email fragment to search; an empty line clears.
  :refresh              re-run the current search
  :filter <kind> [yy]   all | students | staff | year
  :select <uid>         add to the selection
  :unselect <uid>       remove from the selection
  :clear                clear the selection
  :list                 show results and selection
  :selected             show only the selection
  :show <uid>           print a contact card
  :mail <uid>           compose mail
  :mailall              compose mail to the whole selection
  :call <uid>           call
  :copy <uid>           copy email address
  :copyname <uid>       copy display name
  :copyaddr <uid>       copy Hinman mailing address
  :copyall              copy every selected address
  :quit";

pub fn parse(line: &str) -> Result<Input, ParseError> {
    let line = line.trim();
    let Some(cmd) = line.strip_prefix(':') else {
        return Ok(Input::Search(line.to_owned()));
    };

    let mut words = cmd.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next();

    let uid = |cmd: &'static str| {
        arg.map(str::to_owned).ok_or(ParseError::MissingUid(cmd))
    };

    Ok(match name {
        "refresh" | "r" => Input::Refresh,
        "filter" | "f" => {
            let kind = match arg.unwrap_or("all") {
                "all" => FilterKind::All,
                "students" | "student" => FilterKind::StudentsOnly,
                "staff" => FilterKind::StaffOnly,
                "year" => FilterKind::ByYear,
                other => return Err(ParseError::BadFilter(other.to_owned())),
            };
            let year = match words.next() {
                Some(y) => Some(parse_year(y)?),
                None => None,
            };
            Input::Filter(kind, year)
        }
        "select" | "s" => Input::Select(uid("select")?),
        "unselect" | "u" => Input::Unselect(uid("unselect")?),
        "clear" => Input::Clear,
        "list" | "l" => Input::List,
        "selected" => Input::Selected,
        "show" => Input::Show(uid("show")?),
        "mail" => Input::Mail(uid("mail")?),
        "mailall" => Input::MailAll,
        "call" => Input::Call(uid("call")?),
        "copy" => Input::Copy(uid("copy")?),
        "copyname" => Input::CopyName(uid("copyname")?),
        "copyaddr" => Input::CopyAddr(uid("copyaddr")?),
        "copyall" => Input::CopyAll,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => return Err(ParseError::Unknown(other.to_owned())),
    })
}

fn parse_year(raw: &str) -> Result<u8, ParseError> {
    let digits = raw.trim_start_matches('\'');
    match digits.parse::<u8>() {
        Ok(y) if y < 100 => Ok(y),
        _ => Err(ParseError::BadYear(raw.to_owned())),
    }
}
