//! Session guard for protected views
//!
//! Decides whether a protected view may render for the stored credential:
//!
//! ```text
//! NoCredential ──────────────────────────────► redirect to login
//! Checking ── lookup ok, privileged role ────► Allowed  (render)
//!          ── lookup ok, other role ─────────► Denied   (access-denied view)
//!          ── lookup failed ── clear token ──► NoCredential
//! ```
//!
//! A mounted guard re-evaluates only when the stored credential value
//! changes. Tearing the mount down discards any in-flight result; the
//! lookup itself is left to finish on its own.

use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::session::SessionContext;
use async_trait::async_trait;
use shared::client::Identity;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Where the login view lives
pub const LOGIN_ROUTE: &str = "/login";

/// Where the access-denied view lives
pub const ACCESS_DENIED_ROUTE: &str = "/access-denied";

/// Source of the identity behind the stored credential
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn current_identity(&self) -> ClientResult<Identity>;
}

#[async_trait]
impl IdentityProvider for HttpClient {
    async fn current_identity(&self) -> ClientResult<Identity> {
        self.me().await
    }
}

/// Guard evaluation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Nothing stored; terminal
    NoCredential,
    /// Credential present, identity lookup in flight
    Checking,
    /// Identity confirmed with the privileged role; terminal
    Allowed(Identity),
    /// Identity confirmed without the privileged role; terminal
    Denied(Identity),
}

impl GuardState {
    /// What the view should do, or `None` while still checking
    pub fn outcome(&self, attempted_path: &str) -> Option<GuardOutcome> {
        match self {
            GuardState::NoCredential => Some(GuardOutcome::RedirectLogin {
                return_to: attempted_path.to_string(),
            }),
            GuardState::Checking => None,
            GuardState::Allowed(identity) => Some(GuardOutcome::Render(identity.clone())),
            GuardState::Denied(_) => Some(GuardOutcome::RedirectDenied),
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, GuardState::Checking)
    }
}

/// Decision for a protected view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the protected content
    Render(Identity),
    /// Go to login, then come back to `return_to`
    RedirectLogin { return_to: String },
    /// Go to the access-denied view; the credential is kept
    RedirectDenied,
}

impl GuardOutcome {
    /// Redirect target, or `None` when the view should render
    pub fn location(&self) -> Option<String> {
        match self {
            GuardOutcome::Render(_) => None,
            GuardOutcome::RedirectLogin { return_to } => Some(format!(
                "{LOGIN_ROUTE}?redirect={}",
                urlencoding::encode(return_to)
            )),
            GuardOutcome::RedirectDenied => Some(ACCESS_DENIED_ROUTE.to_string()),
        }
    }
}

/// Guard over protected views
pub struct SessionGuard<P: IdentityProvider> {
    session: SessionContext,
    provider: Arc<P>,
}

impl<P: IdentityProvider> Clone for SessionGuard<P> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: IdentityProvider> SessionGuard<P> {
    pub fn new(session: SessionContext, provider: Arc<P>) -> Self {
        Self { session, provider }
    }

    /// Evaluate once for `attempted_path`
    pub async fn evaluate(&self, attempted_path: &str) -> GuardOutcome {
        let state = match self.session.credential() {
            None => GuardState::NoCredential,
            Some(token) => {
                let result = self.provider.current_identity().await;
                self.settle(&token, result)
            }
        };
        state
            .outcome(attempted_path)
            .unwrap_or_else(|| GuardOutcome::RedirectLogin {
                return_to: attempted_path.to_string(),
            })
    }

    /// Turn a lookup result into a terminal state.
    ///
    /// A failed lookup clears `token`, unless it has been replaced meanwhile.
    fn settle(&self, token: &str, result: ClientResult<Identity>) -> GuardState {
        match result {
            Ok(identity) if identity.is_privileged() => {
                tracing::debug!(user_id = %identity.id, "Guard allowed");
                GuardState::Allowed(identity)
            }
            Ok(identity) => {
                tracing::info!(user_id = %identity.id, role = %identity.role, "Guard denied: insufficient role");
                GuardState::Denied(identity)
            }
            Err(e) => {
                tracing::info!(code = %e.code, status = e.status, "Identity lookup failed; clearing credential");
                if let Err(err) = self.session.clear_credential_if(token) {
                    tracing::warn!(error = %err, "Failed to clear rejected credential");
                }
                GuardState::NoCredential
            }
        }
    }

    /// Mount the guard for a view at `attempted_path`
    ///
    /// The returned handle tracks the guard state; dropping it (or calling
    /// [`GuardHandle::teardown`]) stops all further state updates.
    pub fn mount(&self, attempted_path: impl Into<String>) -> GuardHandle {
        let initial = if self.session.has_credential() {
            GuardState::Checking
        } else {
            GuardState::NoCredential
        };
        let (tx, rx) = watch::channel(initial);
        let cancel = CancellationToken::new();

        let guard = self.clone();
        let token = cancel.clone();
        tokio::spawn(async move { guard.run(tx, token).await });

        GuardHandle {
            state: rx,
            attempted_path: attempted_path.into(),
            cancel,
        }
    }

    async fn run(self, tx: watch::Sender<GuardState>, cancel: CancellationToken) {
        let mut credentials = self.session.subscribe();

        loop {
            let current = credentials.borrow_and_update().clone();

            let state = match current {
                None => GuardState::NoCredential,
                Some(token) => {
                    publish(&tx, GuardState::Checking);

                    // The lookup runs detached so teardown drops only its result
                    let provider = Arc::clone(&self.provider);
                    let lookup = tokio::spawn(async move { provider.current_identity().await });

                    let result = tokio::select! {
                        _ = cancel.cancelled() => return,
                        joined = lookup => joined,
                    };
                    if cancel.is_cancelled() {
                        return;
                    }
                    match result {
                        Ok(result) => self.settle(&token, result),
                        Err(e) => {
                            tracing::warn!(error = %e, "Identity lookup task failed");
                            self.settle(&token, Err(shared::ApiError::network(e.to_string())))
                        }
                    }
                }
            };

            publish(&tx, state);

            tokio::select! {
                _ = cancel.cancelled() => return,
                changed = credentials.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

/// Publish a state, waking watchers only if it differs from the current one
fn publish(tx: &watch::Sender<GuardState>, state: GuardState) {
    tx.send_if_modified(|current| {
        if *current == state {
            false
        } else {
            *current = state;
            true
        }
    });
}

/// A mounted guard
#[derive(Debug)]
pub struct GuardHandle {
    state: watch::Receiver<GuardState>,
    attempted_path: String,
    cancel: CancellationToken,
}

impl GuardHandle {
    /// Current state
    pub fn state(&self) -> GuardState {
        self.state.borrow().clone()
    }

    /// Current decision, `None` while checking
    pub fn outcome(&self) -> Option<GuardOutcome> {
        self.state.borrow().outcome(&self.attempted_path)
    }

    /// Wait until the guard reaches a decision
    ///
    /// Returns `None` if the guard task has stopped.
    pub async fn settled(&mut self) -> Option<GuardOutcome> {
        let state = self.state.wait_for(GuardState::is_settled).await.ok()?.clone();
        state.outcome(&self.attempted_path)
    }

    /// Wait for the next state change after the current one
    pub async fn changed(&mut self) -> Option<GuardState> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    /// Stop the guard; any in-flight result is discarded
    pub fn teardown(self) {
        drop(self);
    }
}

impl Drop for GuardHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
