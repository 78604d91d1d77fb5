use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Creates the two halves of a forwarder's stop/await-completion contract.
///
/// The owner keeps the [`ShutdownHandle`]; the background loop keeps the
/// [`ShutdownSignal`] and calls [`ShutdownSignal::complete`] once it has
/// released its connection.
pub fn shutdown_pair() -> (ShutdownHandle, ShutdownSignal) {
    let exit = CancellationToken::new();
    let (done_tx, done_rx) = oneshot::channel();

    (
        ShutdownHandle {
            exit: exit.clone(),
            done: done_rx,
        },
        ShutdownSignal {
            exit,
            done: done_tx,
        },
    )
}

#[derive(Debug)]
pub struct ShutdownHandle {
    exit: CancellationToken,
    done: oneshot::Receiver<()>,
}

impl ShutdownHandle {
    /// Requests exit and waits for the loop to finish.
    ///
    /// Also returns if the loop task ended without completing the signal
    /// (the sender half is dropped with the task).
    pub async fn stop(self) {
        self.exit.cancel();
        let _ = self.done.await;
    }
}

#[derive(Debug)]
pub struct ShutdownSignal {
    exit: CancellationToken,
    done: oneshot::Sender<()>,
}

impl ShutdownSignal {
    pub fn token(&self) -> CancellationToken {
        self.exit.clone()
    }

    pub fn is_requested(&self) -> bool {
        self.exit.is_cancelled()
    }

    pub fn complete(self) {
        let _ = self.done.send(());
    }
}
