//! Export actions: compose mail, place a call, copy to the clipboard.
//!
//! Side effects go through two seams, [`UrlLauncher`] for `mailto:`/`tel:`
//! targets and [`Clipboard`] for copied text. Batch actions are
//! all-or-nothing: if any targeted user lacks the field, nothing is launched
//! or copied.

use std::io::Write;

use dlookup_common::models::DirectoryUser;
use tracing::debug;

use crate::error::{ContactField, LookupError, Result};

/// Opens a URL with whatever the platform registers for its scheme.
pub trait UrlLauncher {
    fn open(&self, url: &str) -> Result<()>;
}

/// Receives copied text.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

// ─── System implementations ──────────────────────────────────────────────────

/// Launches through the desktop's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl UrlLauncher for SystemLauncher {
    fn open(&self, url: &str) -> Result<()> {
        debug!("Opening {}", url);
        open::that_detached(url).map_err(|source| LookupError::Launch {
            url: url.to_owned(),
            source,
        })
    }
}

/// The desktop clipboard.
#[cfg(feature = "desktop")]
pub struct SystemClipboard {
    ctx: clipboard::ClipboardContext,
}

#[cfg(feature = "desktop")]
impl SystemClipboard {
    pub fn new() -> Result<Self> {
        use clipboard::ClipboardProvider;
        let ctx = ClipboardProvider::new().map_err(|e| LookupError::Clipboard(e.to_string()))?;
        Ok(Self { ctx })
    }
}

#[cfg(feature = "desktop")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        use clipboard::ClipboardProvider;
        self.ctx
            .set_contents(text.to_owned())
            .map_err(|e| LookupError::Clipboard(e.to_string()))
    }
}

/// Writes copied text as a line to any writer, e.g. stdout for piping into
/// a platform copy tool.
pub struct WriterClipboard<W: Write> {
    out: W,
}

impl<W: Write> WriterClipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for WriterClipboard<W> {
    fn set_text(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")
            .and_then(|()| self.out.flush())
            .map_err(|e| LookupError::Clipboard(e.to_string()))
    }
}

// ─── Single-user actions ─────────────────────────────────────────────────────

/// Compose mail to `user`.
pub fn compose(user: &DirectoryUser, launcher: &dyn UrlLauncher) -> Result<()> {
    let mail = require(user, ContactField::Mail, user.mail())?;
    launcher.open(&mailto_url(&[mail]))
}

/// Call `user`'s listed number.
pub fn call(user: &DirectoryUser, launcher: &dyn UrlLauncher) -> Result<()> {
    let phone = require(user, ContactField::Telephone, user.telephone_number())?;
    launcher.open(&tel_url(phone))
}

pub fn copy_email(user: &DirectoryUser, clipboard: &mut dyn Clipboard) -> Result<()> {
    let mail = require(user, ContactField::Mail, user.mail())?;
    clipboard.set_text(mail)
}

pub fn copy_name(user: &DirectoryUser, clipboard: &mut dyn Clipboard) -> Result<()> {
    clipboard.set_text(user.display_name())
}

/// Copy the formatted Hinman mailing address.
pub fn copy_postal_address(user: &DirectoryUser, clipboard: &mut dyn Clipboard) -> Result<()> {
    let address = user.postal_address().ok_or_else(|| LookupError::MissingContactInfo {
        uid: user.uid().to_owned(),
        field: ContactField::PostalAddress,
    })?;
    clipboard.set_text(&address.to_string())
}

// ─── Batch actions ───────────────────────────────────────────────────────────

/// Compose one mail addressed to every user. An empty set does nothing.
pub fn compose_all(users: &[DirectoryUser], launcher: &dyn UrlLauncher) -> Result<()> {
    let mails = all_mail(users)?;
    if mails.is_empty() {
        return Ok(());
    }
    launcher.open(&mailto_url(&mails))
}

/// Copy every user's address, comma-separated. An empty set does nothing.
pub fn copy_all(users: &[DirectoryUser], clipboard: &mut dyn Clipboard) -> Result<()> {
    let mails = all_mail(users)?;
    if mails.is_empty() {
        return Ok(());
    }
    clipboard.set_text(&mails.join(","))
}

pub fn mailto_url(addresses: &[&str]) -> String {
    format!("mailto:{}", addresses.join(","))
}

/// `tel:` target with whitespace removed.
pub fn tel_url(number: &str) -> String {
    let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    format!("tel:{digits}")
}

fn all_mail(users: &[DirectoryUser]) -> Result<Vec<&str>> {
    users
        .iter()
        .map(|u| require(u, ContactField::Mail, u.mail()))
        .collect()
}

fn require<'a>(
    user: &DirectoryUser,
    field: ContactField,
    value: Option<&'a str>,
) -> Result<&'a str> {
    value.ok_or_else(|| LookupError::MissingContactInfo {
        uid: user.uid().to_owned(),
        field,
    })
}
