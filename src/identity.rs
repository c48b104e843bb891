use std::sync::{Arc, RwLock};

/// "Current identity or null", queried synchronously at the time of
/// identity-sensitive cart mutations.
pub trait IdentityProvider: Send + Sync {
    fn current_identity(&self) -> Option<String>;
}

/// Shared, settable identity source.
///
/// Clones share state, so the embedding can hold one handle for its
/// login/logout flow while the cart engine holds another.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity {
    inner: Arc<RwLock<Option<String>>>,
}

impl StaticIdentity {
    /// A guest session with no identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(identity.into()))),
        }
    }

    pub fn set(&self, identity: Option<String>) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = identity;
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<String> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
