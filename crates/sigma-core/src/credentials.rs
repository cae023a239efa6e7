//! Provider credential pools with circular rotation.
//!
//! One [`CredentialPool`] exists per external provider and is shared as an
//! `Arc<CredentialPool>` by every component that calls that provider, so a
//! rotation made by one caller is seen by all others on their next call.
//!
//! [`call_with_rotation`] is the retry policy every provider client uses: read
//! the active credential, call, and on a rate-limit signal rotate and try again,
//! at most once per credential in the pool, with no delay between attempts.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors that can tell a rate-limit response apart from other failures.
pub trait RateLimitSignal {
    fn is_rate_limited(&self) -> bool;
}

/// Outcome of a rotated call that did not produce a value.
#[derive(Debug, Error)]
pub enum RotationError<E> {
    /// The pool is empty; the operation was never attempted.
    #[error("no {provider} credentials configured")]
    NoCredentials { provider: String },

    /// Every attempt was rate limited.
    #[error("all {attempts} {provider} credential attempts were rate limited")]
    Exhausted { provider: String, attempts: usize },

    /// A non-rate-limit failure; not retried.
    #[error("{0}")]
    Failed(E),
}

/// Ordered pool of credentials for one provider plus the current position.
///
/// The index is always in `[0, len)` when the pool is non-empty.
pub struct CredentialPool {
    provider: String,
    credentials: Vec<String>,
    index: Mutex<usize>,
}

impl CredentialPool {
    /// Builds a pool, dropping blank entries and surrounding whitespace.
    #[must_use]
    pub fn new<I, S>(provider: &str, credentials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let credentials = credentials
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        Self {
            provider: provider.to_string(),
            credentials,
            index: Mutex::new(0),
        }
    }

    /// Builds a pool from a comma-separated list such as `"key-a, key-b"`.
    #[must_use]
    pub fn from_csv(provider: &str, raw: &str) -> Self {
        Self::new(provider, raw.split(','))
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Current position in the pool (0-based).
    #[must_use]
    pub fn position(&self) -> usize {
        *self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The credential at the current position, or `None` for an empty pool.
    ///
    /// Callers must treat `None` as "provider unavailable" and not retry.
    #[must_use]
    pub fn active(&self) -> Option<String> {
        let index = self.index.lock().unwrap_or_else(PoisonError::into_inner);
        self.credentials.get(*index).cloned()
    }

    /// Advances to the next credential, wrapping after the last one, and
    /// returns it. An empty pool is left untouched and yields `None`.
    pub fn rotate(&self) -> Option<String> {
        if self.credentials.is_empty() {
            return None;
        }
        let mut index = self.index.lock().unwrap_or_else(PoisonError::into_inner);
        *index = (*index + 1) % self.credentials.len();
        self.credentials.get(*index).cloned()
    }
}

impl std::fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPool")
            .field("provider", &self.provider)
            .field("credentials", &format!("[{} redacted]", self.credentials.len()))
            .field("position", &self.position())
            .finish()
    }
}

/// Runs `operation` with the pool's active credential, rotating on rate limits.
///
/// The credential is read from the pool right before every attempt, so a
/// rotation made elsewhere is picked up. At most `pool.len()` attempts are made;
/// every rate-limited attempt rotates the pool, including the last one.
///
/// # Errors
///
/// - [`RotationError::NoCredentials`] if the pool is empty.
/// - [`RotationError::Exhausted`] if every attempt was rate limited.
/// - [`RotationError::Failed`] on the first non-rate-limit error.
pub async fn call_with_rotation<T, E, F, Fut>(
    pool: &CredentialPool,
    mut operation: F,
) -> Result<T, RotationError<E>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RateLimitSignal + std::fmt::Display,
{
    let max_attempts = pool.len();
    let mut attempt = 0usize;

    loop {
        let Some(credential) = pool.active() else {
            return Err(RotationError::NoCredentials {
                provider: pool.provider().to_string(),
            });
        };
        attempt += 1;

        match operation(credential).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_rate_limited() => {
                pool.rotate();
                tracing::warn!(
                    provider = %pool.provider(),
                    attempt,
                    max_attempts,
                    position = pool.position() + 1,
                    error = %err,
                    "provider rate limited; rotated to next credential"
                );
                if attempt >= max_attempts {
                    return Err(RotationError::Exhausted {
                        provider: pool.provider().to_string(),
                        attempts: attempt,
                    });
                }
            }
            Err(err) => return Err(RotationError::Failed(err)),
        }
    }
}
