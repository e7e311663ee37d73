//! Signed-in session state and change notifications.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::AuthClient;

#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

pub struct SessionManager {
    auth: Option<Arc<AuthClient>>,
    state: watch::Sender<Option<Session>>,
}

impl SessionManager {
    pub fn new(auth: Option<Arc<AuthClient>>) -> Self {
        let (state, _) = watch::channel(None);
        Self { auth, state }
    }

    pub fn is_enabled(&self) -> bool {
        self.auth.is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().as_ref().map(|s| s.user.clone())
    }

    fn auth(&self) -> Result<&AuthClient> {
        self.auth
            .as_deref()
            .ok_or_else(|| AppError::Auth("Sign-in is not configured".to_string()))
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.access_token.clone())
    }

    /// Returns the provider URL the user must visit to sign in.
    pub fn sign_in(&self, provider: &str, redirect_to: Option<&str>) -> Result<Url> {
        self.auth()?.authorize_url(provider, redirect_to)
    }

    /// Validates the access token returned by the provider and stores the session.
    pub async fn complete_sign_in(&self, access_token: &str) -> Result<User> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(AppError::Auth("Access token is empty".to_string()));
        }

        let user = self.auth()?.get_user(access_token).await?;
        tracing::info!(user_id = %user.id, "Signed in");
        self.publish(Some(Session {
            access_token: access_token.to_string(),
            user: user.clone(),
        }));
        Ok(user)
    }

    /// Clears the session. A failed revoke is logged; the local session is cleared regardless.
    pub async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.state.borrow().clone() else {
            return Ok(());
        };

        if let Ok(auth) = self.auth() {
            if let Err(e) = auth.sign_out(&session.access_token).await {
                tracing::warn!("Failed to revoke session: {}", e);
            }
        }

        self.publish(None);
        tracing::info!(user_id = %session.user.id, "Signed out");
        Ok(())
    }

    /// Runs `callback` with the new user after every session change.
    ///
    /// Notifications stop when the returned handle is dropped.
    pub fn on_session_change<F>(&self, mut callback: F) -> SessionSubscription
    where
        F: FnMut(Option<User>) + Send + 'static,
    {
        let mut rx = self.state.subscribe();
        let task = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let user = rx.borrow_and_update().as_ref().map(|s| s.user.clone());
                callback(user);
            }
        });
        SessionSubscription { task }
    }

    fn publish(&self, session: Option<Session>) {
        self.state.send_replace(session);
    }
}

#[must_use = "dropping the subscription stops session notifications"]
pub struct SessionSubscription {
    task: JoinHandle<()>,
}

impl SessionSubscription {
    pub fn unsubscribe(self) {}
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;

    fn session(id: &str) -> Session {
        Session {
            access_token: format!("token-{id}"),
            user: User {
                id: id.to_string(),
                email: None,
            },
        }
    }

    #[tokio::test]
    async fn subscription_sees_sign_in_and_sign_out() {
        let manager = SessionManager::new(None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = manager.on_session_change(move |user| {
            let _ = tx.send(user);
        });

        manager.publish(Some(session("alice")));
        let user = rx.recv().await.unwrap();
        assert_eq!(user.map(|u| u.id), Some("alice".to_string()));
        assert_eq!(manager.current_user().map(|u| u.id), Some("alice".to_string()));
        assert_eq!(manager.access_token().as_deref(), Some("token-alice"));

        manager.sign_out().await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), None);
        assert!(manager.current_user().is_none());
        assert!(manager.access_token().is_none());
    }

    #[tokio::test]
    async fn dropping_subscription_stops_callbacks() {
        let manager = SessionManager::new(None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = manager.on_session_change(move |user| {
            let _ = tx.send(user);
        });

        subscription.unsubscribe();
        manager.publish(Some(session("bob")));

        let next = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn sign_in_requires_auth_service() {
        let manager = SessionManager::new(None);
        assert!(!manager.is_enabled());
        assert!(manager.sign_in("github", None).is_err());
        assert!(manager.complete_sign_in("token").await.is_err());
    }
}
