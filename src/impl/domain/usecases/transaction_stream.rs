use std::{
    pin::Pin,
    task::{Context, Poll},
};

use fractic_server_error::ServerError;
use futures::Stream;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{entities::FsTransaction, errors::ProducerTaskFailed};

/// Live stream of projected transactions backed by a background producer.
///
/// Read transactions until the stream yields `None`, then call [`finish`] once
/// to obtain the terminal result. Dropping the stream cancels the producer.
///
/// [`finish`]: TransactionStream::finish
pub struct TransactionStream {
    transactions: mpsc::Receiver<FsTransaction>,
    result: oneshot::Receiver<Result<(), ServerError>>,
    cancel: CancellationToken,
    _cancel_on_drop: DropGuard,
}

/// Producer half handed to the background task.
pub(crate) struct TransactionSink {
    pub(crate) transactions: mpsc::Sender<FsTransaction>,
    pub(crate) result: oneshot::Sender<Result<(), ServerError>>,
    pub(crate) cancel: CancellationToken,
}

impl TransactionStream {
    pub(crate) fn channel(capacity: usize) -> (TransactionSink, TransactionStream) {
        let (tx, rx) = mpsc::channel(capacity);
        let (result_tx, result_rx) = oneshot::channel();
        let cancel = CancellationToken::new();
        let sink = TransactionSink {
            transactions: tx,
            result: result_tx,
            cancel: cancel.clone(),
        };
        let stream = TransactionStream {
            transactions: rx,
            result: result_rx,
            _cancel_on_drop: cancel.clone().drop_guard(),
            cancel,
        };
        (sink, stream)
    }

    pub async fn recv(&mut self) -> Option<FsTransaction> {
        self.transactions.recv().await
    }

    /// Asks the producer to stop. Transactions already buffered can still be
    /// read; the terminal result will be a cancellation error unless the
    /// producer had already completed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Terminal result of the stream, delivered exactly once. Transactions not
    /// yet read are discarded; if the producer was still running, including
    /// while waiting on the ledger store, it stops and reports a cancellation
    /// error.
    pub async fn finish(self) -> Result<(), ServerError> {
        let TransactionStream {
            transactions,
            result,
            cancel,
            _cancel_on_drop,
        } = self;
        drop(transactions);
        // No effect once the data channel has closed: the producer has already
        // settled its result by then.
        cancel.cancel();
        result.await.map_err(|_| ProducerTaskFailed::new())?
    }
}

impl Stream for TransactionStream {
    type Item = FsTransaction;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.transactions.poll_recv(cx)
    }
}

impl std::fmt::Debug for TransactionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionStream")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
