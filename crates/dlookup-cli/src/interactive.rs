//! Interactive session loop.
//!
//! One task owns the [`SearchSession`]. Stdin lines and lookup completions are
//! multiplexed with `select!`, so every mutation happens here and nowhere else.

use std::io::{self, Write};

use anyhow::Context;
use dlookup_client::export::{self, Clipboard, SystemLauncher, UrlLauncher, WriterClipboard};
use dlookup_client::{Dispatcher, LookupClient, SearchSession, SearchStatus};
use dlookup_common::models::{ContactRecord, DirectoryUser};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::command::{self, HELP, Input};
use crate::render;

/// What the loop should do after handling one input.
enum Flow {
    Continue,
    Quit,
}

struct Shell {
    session: SearchSession,
    dispatcher: Dispatcher,
    launcher: Box<dyn UrlLauncher>,
    clipboard: Box<dyn Clipboard>,
}

pub async fn run(client: LookupClient) -> anyhow::Result<()> {
    let (dispatcher, mut completions) = Dispatcher::new(client);
    let mut shell = Shell {
        session: SearchSession::default(),
        dispatcher,
        launcher: Box::new(SystemLauncher),
        clipboard: system_clipboard(),
    };

    println!("{HELP}");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match command::parse(&line) {
                    Ok(input) => match shell.handle(input) {
                        Ok(Flow::Quit) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => eprintln!("error: {e}"),
                    },
                    Err(e) => eprintln!("{e}"),
                }
                prompt()?;
            }
            Some(done) = completions.recv() => {
                debug!("Lookup #{} for {:?} finished", done.seq, done.query);
                if shell.session.complete(done.seq, done.result) {
                    print!("\n{}", render::session_view(&shell.session, false));
                    prompt()?;
                }
            }
        }
    }

    info!("Session closed");
    Ok(())
}

impl Shell {
    fn handle(&mut self, input: Input) -> anyhow::Result<Flow> {
        match input {
            Input::Search(text) => {
                match self.session.set_search_text(text) {
                    Some(ticket) => {
                        self.dispatcher.dispatch(ticket);
                    }
                    None if self.session.status() == SearchStatus::New => {
                        self.dispatcher.cancel();
                    }
                    None => {}
                }
                self.print_status();
            }
            Input::Refresh => {
                match self.session.refresh() {
                    Some(ticket) => {
                        self.dispatcher.dispatch(ticket);
                    }
                    None => self.dispatcher.cancel(),
                }
                self.print_status();
            }
            Input::Filter(kind, year) => {
                self.session.set_filter(kind);
                if let Some(y) = year {
                    self.session.set_filter_year(y);
                }
                print!("{}", render::session_view(&self.session, false));
            }
            Input::Select(uid) => {
                let user = self.user(&uid)?.clone();
                if self.session.select(user) {
                    println!("Selected {uid}");
                } else {
                    println!("{uid} is already selected");
                }
            }
            Input::Unselect(uid) => {
                if !self.session.deselect(&uid) {
                    println!("{uid} is not selected");
                }
            }
            Input::Clear => self.session.clear_selection(),
            Input::List => print!("{}", render::session_view(&self.session, false)),
            Input::Selected => print!("{}", render::session_view(&self.session, true)),
            Input::Show(uid) => print!("{}", ContactRecord::from(self.user(&uid)?).to_vcard()),
            Input::Mail(uid) => export::compose(self.user(&uid)?, self.launcher.as_ref())?,
            Input::MailAll => export::compose_all(self.session.selected(), self.launcher.as_ref())?,
            Input::Call(uid) => export::call(self.user(&uid)?, self.launcher.as_ref())?,
            Input::Copy(uid) => {
                let user = self.user(&uid)?.clone();
                export::copy_email(&user, self.clipboard.as_mut())?;
            }
            Input::CopyName(uid) => {
                let user = self.user(&uid)?.clone();
                export::copy_name(&user, self.clipboard.as_mut())?;
            }
            Input::CopyAddr(uid) => {
                let user = self.user(&uid)?.clone();
                export::copy_postal_address(&user, self.clipboard.as_mut())?;
            }
            Input::CopyAll => export::copy_all(self.session.selected(), self.clipboard.as_mut())?,
            Input::Help => println!("{HELP}"),
            Input::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn user(&self, uid: &str) -> anyhow::Result<&DirectoryUser> {
        self.session
            .find(uid)
            .with_context(|| format!("no user {uid} in the results or selection"))
    }

    fn print_status(&self) {
        match self.session.status() {
            SearchStatus::Searching => {
                println!("Searching for {:?}…", self.session.last_issued_search_text());
            }
            _ => print!("{}", render::session_view(&self.session, false)),
        }
    }
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

#[cfg(feature = "desktop")]
fn system_clipboard() -> Box<dyn Clipboard> {
    match export::SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            tracing::warn!("{e}; copied text will be printed instead");
            Box::new(WriterClipboard::new(io::stdout()))
        }
    }
}

#[cfg(not(feature = "desktop"))]
fn system_clipboard() -> Box<dyn Clipboard> {
    Box::new(WriterClipboard::new(io::stdout()))
}
