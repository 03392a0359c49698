//! Key-value storage
//!
//! Carts and orders are kept in a small string-keyed store holding JSON documents. Two
//! backends are provided: [`MemoryStore`] for tests and embedding, and [`FileStore`] which
//! keeps every key in one JSON file on disk.

use std::io;

use mockall::automock;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the current cart.
pub const CART_KEY: &str = "cart";

/// Key holding the order history, newest first.
pub const ORDERS_KEY: &str = "orders";

/// Key holding the most recent order.
pub const LAST_ORDER_KEY: &str = "lastOrder";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Io(#[from] io::Error),

    #[error("stored value for \"{key}\" is not valid JSON")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for \"{key}\"")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed store of JSON documents.
///
/// Writes are last-write-wins. Implementations serialize access internally.
#[automock]
pub trait KeyValueStore: Send + Sync {
    /// Raw JSON stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the JSON stored under `key`.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Typed access to a [`KeyValueStore`].
pub trait JsonStore {
    /// Decode the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] when the stored value does not decode as `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>;

    /// Encode `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding or writing fails.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> JsonStore for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.get(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;

        self.set(key, raw)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn json_values_round_trip_through_raw_store() -> TestResult {
        let store = MemoryStore::new();

        store.set_json("numbers", &[1, 2, 3])?;

        assert_eq!(store.get("numbers")?.as_deref(), Some("[1,2,3]"));
        assert_eq!(store.get_json::<Vec<u8>>("numbers")?, Some(vec![1, 2, 3]));

        Ok(())
    }

    #[test]
    fn missing_key_decodes_to_none() -> TestResult {
        let store = MemoryStore::new();

        assert_eq!(store.get_json::<Vec<u8>>("missing")?, None);

        Ok(())
    }

    #[test]
    fn corrupt_value_is_reported_not_reset() -> TestResult {
        let store = MemoryStore::new();

        store.set("cart", "{not json".to_string())?;

        let result = store.get_json::<Vec<u8>>("cart");

        assert!(
            matches!(result, Err(StoreError::Corrupt { ref key, .. }) if key == "cart"),
            "expected Corrupt, got {result:?}"
        );
        assert_eq!(store.get("cart")?.as_deref(), Some("{not json"));

        Ok(())
    }

    #[test]
    fn mock_store_errors_propagate_through_json_helpers() {
        let mut store = MockKeyValueStore::new();

        store
            .expect_get()
            .once()
            .returning(|_| Err(StoreError::Io(io::Error::other("disk gone"))));

        let result = store.get_json::<Vec<u8>>("orders");

        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
