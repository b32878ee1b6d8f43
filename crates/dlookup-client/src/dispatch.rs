//! Background execution of session lookups.
//!
//! The [`Dispatcher`] keeps at most one lookup alive. Dispatching a new ticket
//! cancels the previous request's token, so the superseded lookup finishes
//! with [`LookupError::CancelError`](crate::LookupError::CancelError) and the
//! session drops it. Completions come back over a channel so the owner of the
//! session can apply them on its own loop.

use dlookup_common::models::LookupResponse;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::LookupClient;
use crate::error::Result;
use crate::session::LookupTicket;

/// A finished lookup, tagged with the ticket it was issued for.
#[derive(Debug)]
pub struct Completion {
    pub seq: u64,
    pub query: String,
    pub result: Result<LookupResponse>,
}

pub struct Dispatcher {
    client: LookupClient,
    tx: mpsc::UnboundedSender<Completion>,
    in_flight: Option<CancellationToken>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiving end its completions arrive on.
    pub fn new(client: LookupClient) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            client,
            tx,
            in_flight: None,
        };
        (dispatcher, rx)
    }

    /// Run `ticket` in the background, superseding whatever is in flight.
    pub fn dispatch(&mut self, ticket: LookupTicket) -> JoinHandle<()> {
        self.cancel();

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        let client = self.client.clone();
        let tx = self.tx.clone();

        debug!("Dispatching lookup #{} for {:?}", ticket.seq, ticket.query);
        tokio::spawn(async move {
            let result = client.lookup_cancellable(&ticket.query, &token).await;
            // The receiver only goes away when the session loop has exited.
            let _ = tx.send(Completion {
                seq: ticket.seq,
                query: ticket.query,
                result,
            });
        })
    }

    /// Cancel the in-flight lookup, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
