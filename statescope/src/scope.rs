use tokio_util::sync::CancellationToken;

/// Liveness flag for the scope that owns a container.
///
/// Released exactly once when the owning scope is torn down; after that every
/// state mutation routed through the token's container becomes a no-op. The
/// token never aborts an in-flight operation, it only discards its effect.
#[derive(Debug, Clone, Default)]
pub struct ScopeToken {
    token: CancellationToken,
}

impl ScopeToken {
    pub fn new() -> Self {
        ScopeToken {
            token: CancellationToken::new(),
        }
    }

    /// A child token released together with its parent. Wrappers hand these
    /// to the timers they own.
    pub fn child(&self) -> Self {
        ScopeToken {
            token: self.token.child_token(),
        }
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Flip the flag. Idempotent; there is no way back.
    pub fn release(&self) {
        self.token.cancel();
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}
