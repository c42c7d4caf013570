use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::DaybookConfig;
use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Apple,
    Email,
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Google => "Google",
            Self::Apple => "Apple",
            Self::Email => "email",
        };
        f.write_str(name)
    }
}

/// The account details an identity provider hands back after sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: AuthProvider,
}

impl CurrentUser {
    pub fn from_profile(profile: ProviderProfile, provider: AuthProvider) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            display_name: profile.display_name,
            avatar_url: profile.avatar_url,
            provider,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Idle,
    /// A sign-in with `provider` is outstanding. `user` is whoever was
    /// signed in when it started and stays signed in until it resolves.
    Pending {
        provider: AuthProvider,
        user: Option<CurrentUser>,
    },
    Resolved(CurrentUser),
}

impl AuthState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            Self::Resolved(user) | Self::Pending { user: Some(user), .. } => Some(user),
            _ => None,
        }
    }

    /// The settled state if the pending attempt were abandoned now.
    fn settled(self) -> Self {
        match self {
            Self::Pending { user: Some(user), .. } => Self::Resolved(user),
            Self::Pending { user: None, .. } => Self::Idle,
            other => other,
        }
    }
}

/// Seam to a third-party sign-in SDK.
pub trait IdentityProvider: Send + Sync {
    /// Run the provider's interactive sign-in flow.
    fn sign_in(
        &self,
        provider: AuthProvider,
    ) -> impl Future<Output = Result<ProviderProfile, AuthError>> + Send;

    /// Recover a session left over from a previous launch, if any.
    fn restore(&self) -> impl Future<Output = Option<(AuthProvider, ProviderProfile)>> + Send;

    fn sign_out(&self, provider: AuthProvider);
}

/// Owns the signed-in user and allows one sign-in attempt at a time.
///
/// State changes are published on a watch channel; a front end can
/// [`subscribe`](Self::subscribe) and re-render when it changes.
pub struct AuthBridge<P> {
    provider: P,
    timeout: Duration,
    state: watch::Sender<AuthState>,
}

/// Settles a pending attempt back to the user it holds unless the attempt
/// resolved. Covers provider errors, timeouts and callers dropping the future.
struct PendingAttempt<'a> {
    state: &'a watch::Sender<AuthState>,
    armed: bool,
}

impl PendingAttempt<'_> {
    fn resolve(mut self, user: CurrentUser) {
        self.armed = false;
        self.state.send_replace(AuthState::Resolved(user));
    }
}

impl Drop for PendingAttempt<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|state| {
                *state = std::mem::take(state).settled();
            });
        }
    }
}

impl<P: IdentityProvider> AuthBridge<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        let (state, _) = watch::channel(AuthState::Idle);
        Self {
            provider,
            timeout,
            state,
        }
    }

    pub fn from_config(provider: P, config: &DaybookConfig) -> Self {
        Self::new(provider, config.sign_in_timeout())
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user().is_some()
    }

    fn begin(&self, provider: AuthProvider) -> Result<PendingAttempt<'_>, AuthError> {
        let started = self.state.send_if_modified(|state| {
            if state.is_pending() {
                return false;
            }
            let user = std::mem::take(state).user().cloned();
            *state = AuthState::Pending { provider, user };
            true
        });

        if started {
            Ok(PendingAttempt {
                state: &self.state,
                armed: true,
            })
        } else {
            Err(AuthError::Busy)
        }
    }

    /// Sign in with `provider`.
    ///
    /// If another attempt is outstanding this resolves to
    /// [`AuthError::Busy`] on first poll, leaving that attempt alone. A flow
    /// that outlasts the configured timeout resolves to
    /// [`AuthError::Cancelled`].
    pub async fn sign_in(&self, provider: AuthProvider) -> Result<CurrentUser, AuthError> {
        let attempt = match self.begin(provider) {
            Ok(attempt) => attempt,
            Err(e) => {
                log::warn!("Sign-in with {} rejected: another attempt is pending", provider);
                return Err(e);
            }
        };
        log::info!("Sign-in with {} started", provider);

        let outcome = match tokio::time::timeout(self.timeout, self.provider.sign_in(provider)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                log::warn!("Sign-in with {} timed out after {:?}", provider, self.timeout);
                Err(AuthError::Cancelled)
            }
        };

        match outcome {
            Ok(profile) => {
                let user = CurrentUser::from_profile(profile, provider);
                log::info!("Signed in as {} via {}", user.email, provider);
                attempt.resolve(user.clone());
                Ok(user)
            }
            Err(e) => {
                log::info!("Sign-in with {} failed: {}", provider, e);
                drop(attempt);
                Err(e)
            }
        }
    }

    /// Pick up a previous session. Only applies while nobody is signed in
    /// and no sign-in is running.
    pub async fn restore(&self) -> Option<CurrentUser> {
        if !matches!(*self.state.borrow(), AuthState::Idle) {
            return None;
        }

        let (provider, profile) = self.provider.restore().await?;
        let user = CurrentUser::from_profile(profile, provider);

        let applied = self.state.send_if_modified(|state| {
            if matches!(state, AuthState::Idle) {
                *state = AuthState::Resolved(user.clone());
                true
            } else {
                false
            }
        });

        if applied {
            log::info!("Restored session for {} via {}", user.email, provider);
            Some(user)
        } else {
            log::debug!("Discarded restored session: state changed meanwhile");
            None
        }
    }

    /// Sign out the current user. During a pending sign-in the user held
    /// by the attempt is dropped, so a failed attempt ends signed out.
    pub fn sign_out(&self) {
        let mut signed_out = None;
        self.state.send_if_modified(|state| match state {
            AuthState::Resolved(user) => {
                signed_out = Some(user.provider);
                *state = AuthState::Idle;
                true
            }
            AuthState::Pending { user, .. } => match user.take() {
                Some(user) => {
                    signed_out = Some(user.provider);
                    true
                }
                None => false,
            },
            AuthState::Idle => false,
        });

        if let Some(provider) = signed_out {
            self.provider.sign_out(provider);
            log::info!("Signed out of {}", provider);
        }
    }
}
