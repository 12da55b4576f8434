//! # Paginated Search
//!
//! Turns one `*.search` call into a sequence of cursor-driven requests and exposes the
//! records as a [`SearchStream`].
//!
//! Each call runs two tasks wired by bounded channels of [`PAGE_SIZE`] slots:
//!
//! ```text
//!  paginate ──(raw records)──▶ decode_records ──(typed records)──▶ SearchStream
//! ```
//!
//! * `paginate` issues the requests strictly one at a time. While the request for page
//!   `N + 1` is in flight, the records of page `N` are forwarded to the decoder, so network
//!   latency overlaps with consumption but records never cross page boundaries out of order.
//! * `decode_records` decodes each raw record into the caller's type. A record that does not
//!   decode is reported and skipped.
//!
//! A transport failure, a malformed page or a remote error is reported once and ends the
//! stream. Both tasks watch the cancellation token at every step, including inside a
//! channel send, so a slow or vanished consumer never leaves them blocked.
mod decoder;

pub use decoder::decode_record;

use crate::{
    catalog::{ProcedureCatalog, ProcedureKind},
    client::Session,
    encoding::{FormArgs, decode_envelope},
    error::CallError,
    transport::Transport,
};
use futures_util::Stream;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::value::RawValue;
use std::{
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument::WithSubscriber, warn};
use url::Url;

/// Capacity of each channel of the pipeline.
///
/// Matches the default page size of Conduit, so a full page can be handed off without
/// waiting for the consumer.
pub const PAGE_SIZE: usize = 100;

type RawRecord = Result<Box<RawValue>, CallError>;

/// The records of one search call, in server order.
///
/// Every item is a `Result`: an `Err` is either terminal (the stream ends right after it) or
/// a single record that failed to decode (see [`CallError::is_terminal`]).
///
/// Dropping the stream cancels the call. Cancelling the token given to
/// [`search`](crate::client::ConduitClient::search) closes the stream at the next poll.
#[derive(Debug)]
pub struct SearchStream<T> {
    inner: Option<ReceiverStream<Result<T, CallError>>>,
    cancel: CancellationToken,
}

impl<T> Stream for SearchStream<T> {
    type Item = Result<T, CallError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.cancel.is_cancelled() {
            this.inner = None;
        }

        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        let next = Pin::new(inner).poll_next(cx);
        if let Poll::Ready(None) = next {
            this.inner = None;
        }
        next
    }
}

impl<T> Drop for SearchStream<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// One decoded page.
#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    data: Vec<Box<RawValue>>,
    #[serde(default)]
    cursor: Cursor,
}

#[derive(Debug, Default, Deserialize)]
struct Cursor {
    #[serde(default)]
    limit: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "opaque_token")]
    after: Option<String>,
    #[serde(default, deserialize_with = "opaque_token")]
    before: Option<String>,
}

/// Cursor tokens are opaque: Conduit sends them as strings or as bare integers.
fn opaque_token<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::String(token)) => Some(token),
            Some(serde_json::Value::Number(token)) => Some(token.to_string()),
            _ => None,
        },
    )
}

/// Validates the call and starts its pipeline.
pub(crate) fn search<T, R, A>(
    session: &Arc<Session<T>>,
    catalog: &ProcedureCatalog,
    cancel: CancellationToken,
    procedure: &str,
    args: &A,
) -> Result<SearchStream<R>, CallError>
where
    T: Transport,
    R: DeserializeOwned + Send + 'static,
    A: Serialize + ?Sized,
{
    let dispatch = session.dispatch().clone();

    let (url, args) = tracing::dispatcher::with_default(&dispatch, || -> Result<_, CallError> {
        catalog.require(procedure, ProcedureKind::Search)?;
        let url = session.endpoint(procedure)?;
        let args = FormArgs::from_serializable(args).map_err(|err| {
            error!(procedure, error = %err, "Failed to encode the search arguments");
            err
        })?;
        debug!(procedure, %url, "Starting search");
        Ok((url, args))
    })?;

    let cancel = cancel.child_token();
    let (raw_tx, raw_rx) = mpsc::channel(PAGE_SIZE);
    let (tx, rx) = mpsc::channel(PAGE_SIZE);

    tokio::spawn(
        paginate(
            Arc::clone(session),
            procedure.to_string(),
            url,
            args,
            raw_tx,
            cancel.clone(),
        )
        .with_subscriber(dispatch.clone()),
    );

    tokio::spawn(
        decode_records::<R>(procedure.to_string(), raw_rx, tx, cancel.clone())
            .with_subscriber(dispatch),
    );

    Ok(SearchStream {
        inner: Some(ReceiverStream::new(rx)),
        cancel,
    })
}

/// The pagination loop.
///
/// Requests are issued one at a time. The request for the next page is sent together with
/// the forwarding of the current page's records, and both must finish before the following
/// iteration starts.
async fn paginate<T: Transport>(
    session: Arc<Session<T>>,
    procedure: String,
    url: Url,
    args: FormArgs,
    records: mpsc::Sender<RawRecord>,
    cancel: CancellationToken,
) {
    let mut pending: Vec<Box<RawValue>> = Vec::new();
    let mut after: Option<String> = None;
    let mut requests: usize = 0;

    loop {
        if cancel.is_cancelled() {
            debug!(%procedure, requests, "Search cancelled");
            return;
        }

        let mut form = args.clone();
        if let Some(after) = &after {
            form.push("after", after.as_str());
        }
        let body = session.authenticated(form).encode();

        requests += 1;
        debug!(%procedure, page = requests, after = ?after, "Requesting page");

        let (page, forwarded) = tokio::join!(
            fetch_page(&session, &procedure, &url, body),
            forward(&records, &cancel, std::mem::take(&mut pending)),
        );

        if !forwarded {
            debug!(%procedure, requests, "Search abandoned while forwarding records");
            return;
        }

        let page = match page {
            Ok(page) => page,
            Err(err) => {
                send(&records, &cancel, Err(err)).await;
                return;
            }
        };

        debug!(
            %procedure,
            page = requests,
            records = page.data.len(),
            limit = ?page.cursor.limit,
            before = ?page.cursor.before,
            after = ?page.cursor.after,
            "Received page"
        );

        pending = page.data;

        match page.cursor.after {
            Some(next) if !next.is_empty() => after = Some(next),
            _ => {
                if forward(&records, &cancel, pending).await {
                    debug!(%procedure, requests, "Search complete");
                }
                return;
            }
        }
    }
}

async fn fetch_page<T: Transport>(
    session: &Session<T>,
    procedure: &str,
    url: &Url,
    body: String,
) -> Result<Page, CallError> {
    let response = session.post(procedure, url, body).await?;
    decode_envelope(procedure, &response)
}

/// Forwards the records of one page in order. Returns `false` once the pipeline is gone.
async fn forward(
    records: &mpsc::Sender<RawRecord>,
    cancel: &CancellationToken,
    page: Vec<Box<RawValue>>,
) -> bool {
    for record in page {
        if !send(records, cancel, Ok(record)).await {
            return false;
        }
    }
    true
}

/// Sends `item`, giving up if `cancel` fires first or the receiver is gone.
async fn send<I>(tx: &mpsc::Sender<I>, cancel: &CancellationToken, item: I) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}

/// The decode stage: raw records in, typed records out, same order.
async fn decode_records<R: DeserializeOwned>(
    procedure: String,
    mut records: mpsc::Receiver<RawRecord>,
    out: mpsc::Sender<Result<R, CallError>>,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = records.recv() => next,
        };

        let Some(next) = next else {
            break;
        };

        let item = next.and_then(|raw| {
            decode_record(&procedure, &raw).map_err(|err| {
                warn!(%procedure, error = %err, "Skipping a record");
                CallError::from(err)
            })
        });

        if !send(&out, &cancel, item).await {
            break;
        }
    }
}
