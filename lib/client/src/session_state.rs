//! Cached client-side view of the server session.
//!
//! A single in-memory cell holds the last known auth result plus a
//! monotonically increasing invalidation token. `get` serves the cached
//! result until `invalidate` (or `refresh`) bumps the token; there is
//! deliberately no automatic revalidation trigger, so the only
//! verification calls are the initial fetch and explicit refreshes
//! after login and logout.

use std::sync::atomic::{AtomicU64, Ordering};

use fitbook_identity::{AuthError, AuthenticatedIdentity};
use serde::Deserialize;
use tokio::sync::{Mutex, watch};

/// Point-in-time view of the session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// The authenticated identity, or `None` when anonymous.
    pub identity: Option<AuthenticatedIdentity>,
    /// True while a fetch is in flight.
    pub is_loading: bool,
    /// True when the last fetch failed (network or server fault, not
    /// "anonymous", which is a normal result).
    pub is_error: bool,
}

/// The session-state cell.
pub struct SessionState {
    http: reqwest::Client,
    me_url: String,
    /// Invalidation token; bumping it makes the next `get` re-fetch.
    version: AtomicU64,
    /// Version last fetched; doubles as a single-flight guard.
    fetched: Mutex<Option<u64>>,
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionState {
    /// Creates a new cell. The HTTP client must share its cookie store
    /// with the one used for the session exchange.
    #[must_use]
    pub fn new(http: reqwest::Client, me_url: String) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self {
            http,
            me_url,
            version: AtomicU64::new(0),
            fetched: Mutex::new(None),
            tx,
        }
    }

    /// Returns the last published snapshot without fetching.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Subscribes to snapshot updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Marks the cached result stale; the next `get` re-fetches.
    pub fn invalidate(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns the session state, fetching from the server only when
    /// the cache is empty or has been invalidated.
    pub async fn get(&self) -> SessionSnapshot {
        let current = self.version.load(Ordering::SeqCst);
        let mut fetched = self.fetched.lock().await;
        if *fetched == Some(current) {
            return self.snapshot();
        }

        let previous = self.snapshot();
        self.tx.send_replace(SessionSnapshot {
            is_loading: true,
            ..previous
        });

        let next = match self.fetch().await {
            Ok(identity) => SessionSnapshot {
                identity,
                is_loading: false,
                is_error: false,
            },
            Err(err) => {
                tracing::warn!(error = %err, "session state fetch failed");
                SessionSnapshot {
                    identity: None,
                    is_loading: false,
                    is_error: true,
                }
            }
        };

        self.tx.send_replace(next.clone());
        *fetched = Some(current);
        next
    }

    /// Invalidates and re-fetches; called after login and logout to
    /// keep the client view consistent with the server session.
    pub async fn refresh(&self) -> SessionSnapshot {
        self.invalidate();
        self.get().await
    }

    async fn fetch(&self) -> Result<Option<AuthenticatedIdentity>, AuthError> {
        let response = self
            .http
            .get(&self.me_url)
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // The validator answers 200 for anonymous callers; anything
            // else is a server fault.
            return Err(AuthError::ServiceUnavailable {
                reason: format!("session status endpoint returned {status}"),
            });
        }

        let body: MeBody = response
            .json()
            .await
            .map_err(|e| AuthError::ServiceUnavailable {
                reason: format!("unparsable session status response: {e}"),
            })?;

        if !body.authenticated {
            return Ok(None);
        }

        let Some(uid) = body.uid else {
            return Err(AuthError::ServiceUnavailable {
                reason: "session status response missing uid".to_string(),
            });
        };

        Ok(Some(AuthenticatedIdentity {
            uid,
            email: body.email,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct MeBody {
    authenticated: bool,
    uid: Option<String>,
    email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn me_body_parses_anonymous() {
        let body: MeBody = serde_json::from_str(r#"{"authenticated": false}"#).expect("parse");
        assert!(!body.authenticated);
        assert!(body.uid.is_none());
    }

    #[test]
    fn me_body_parses_authenticated() {
        let body: MeBody = serde_json::from_str(
            r#"{"authenticated": true, "uid": "alice-uid", "email": "alice@example.com"}"#,
        )
        .expect("parse");
        assert!(body.authenticated);
        assert_eq!(body.uid.as_deref(), Some("alice-uid"));
    }

    #[test]
    fn default_snapshot_is_anonymous_and_idle() {
        let snapshot = SessionSnapshot::default();
        assert!(snapshot.identity.is_none());
        assert!(!snapshot.is_loading);
        assert!(!snapshot.is_error);
    }
}
