//! # dlookup-client
//!
//! Directory lookup client and the search-session state that sits on top of it.
//!
//! ## Architecture
//!
//! ```text
//!  input ──► SearchSession::set_search_text ──► LookupTicket
//!                                                   │
//!                               Dispatcher::dispatch ▼
//!                                        LookupClient::lookup_cancellable
//!                                                   │
//!  visible()  ◄── SearchSession::complete ◄── Completion { seq, result }
//! ```
//!
//! ## Key concepts
//!
//! - **Lookup client** (`client.rs`): builds the query URL, issues one GET,
//!   decodes the envelope, and classifies failures.
//! - **Session** (`session.rs`): search text de-duplication, the
//!   New/Searching/Results/NoResults/Error status machine, filter, and selection.
//!   Completions carry the sequence number of the lookup that produced them;
//!   anything but the latest is dropped.
//! - **Dispatcher** (`dispatch.rs`): runs lookups on the tokio runtime and
//!   cancels the one a newer query supersedes.
//! - **Export** (`export.rs`): mail, call, and copy actions behind the
//!   [`export::Clipboard`] and [`export::UrlLauncher`] seams.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod session;

pub use client::LookupClient;
pub use dispatch::{Completion, Dispatcher};
pub use error::{ContactField, LookupError, Result};
pub use session::{LookupTicket, SearchSession, SearchStatus};
