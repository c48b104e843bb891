use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::entities::cart::CartSnapshot;
use crate::errors::CartError;

/// Durable store for the cart's persistent subset.
///
/// Implementations persist the serialized snapshot keyed by whatever scope
/// the embedding uses (session, browser profile, request context) and
/// restore it on engine construction. Round-trip fidelity is required:
/// loading a saved snapshot must reproduce equal lines and identity.
pub trait CartStore: Send + Sync {
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), CartError>;
    fn load(&self) -> Result<Option<CartSnapshot>, CartError>;
}

/// In-memory store holding the serialized JSON form.
///
/// Keeping the serialized text rather than the snapshot value means every
/// save/load pair exercises the same round-trip a durable backend would.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    slot: RwLock<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for InMemoryStore {
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), CartError> {
        let json = serde_json::to_string(snapshot)?;
        let mut guard = match self.slot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(json);
        Ok(())
    }

    fn load(&self) -> Result<Option<CartSnapshot>, CartError> {
        let guard = match self.slot.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }
}

/// JSON-file store, the browser-local-storage analog for native embeddings.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStore for JsonFileStore {
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), CartError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<CartSnapshot>, CartError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::cart::Cart;
    use crate::entities::product::Product;
    use rust_decimal_macros::dec;

    fn populated_snapshot() -> CartSnapshot {
        let mut cart = Cart::new();
        cart.associate(Some("user-a"));
        cart.add(Product::new("p1", "Widget", dec!(19.99)), None, 2)
            .unwrap();
        cart.snapshot()
    }

    #[test]
    fn test_in_memory_round_trip() {
        let store = InMemoryStore::new();
        let snapshot = populated_snapshot();

        store.save(&snapshot).unwrap();
        let restored = store.load().unwrap().unwrap();

        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_in_memory_empty_loads_none() {
        let store = InMemoryStore::new();
        assert!(store.load().unwrap().is_none());
    }
}
