use tokio::signal;

/// Signal that stopped the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    #[cfg(unix)]
    Terminate,
}

impl ShutdownSignal {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            #[cfg(unix)]
            Self::Terminate => "SIGTERM",
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM, whichever comes first.
///
/// A source whose handler cannot be installed is logged and never fires.
pub async fn shutdown_signal() -> ShutdownSignal {
    let received = tokio::select! {
        Some(s) = interrupt() => s,
        Some(s) = terminate() => s,
        else => std::future::pending().await,
    };
    tracing::info!(
        signal = received.name(),
        "Shutdown signal received, draining connections"
    );
    received
}

async fn interrupt() -> Option<ShutdownSignal> {
    match signal::ctrl_c().await {
        Ok(()) => Some(ShutdownSignal::Interrupt),
        Err(e) => {
            tracing::error!(%e, "Failed to listen for Ctrl+C");
            None
        }
    }
}

#[cfg(unix)]
async fn terminate() -> Option<ShutdownSignal> {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut handler) => {
            handler.recv().await;
            Some(ShutdownSignal::Terminate)
        }
        Err(e) => {
            tracing::error!(%e, "Failed to install SIGTERM handler");
            None
        }
    }
}

#[cfg(not(unix))]
async fn terminate() -> Option<ShutdownSignal> {
    std::future::pending().await
}
