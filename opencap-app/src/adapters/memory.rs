//! In-process store for tests and throwaway servers.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use opencap_core::error::{CoreError, CoreResult};
use opencap_core::traits::AddressRegistry;
use opencap_core::types::{AddressKey, AddressRecord, AddressTypeId, UserCredential};

type UserKey = (String, String);
type RecordKey = (String, String, AddressTypeId);

#[derive(Default)]
struct State {
    users: HashMap<UserKey, String>,
    addresses: BTreeMap<RecordKey, AddressRecord>,
    public_keys: HashMap<String, Vec<u8>>,
}

/// `AddressRegistry` kept entirely in memory.
///
/// One lock guards all tables, so every operation (including the user
/// cascade) is atomic. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn record_key(key: &AddressKey) -> RecordKey {
    (key.domain.clone(), key.username.clone(), key.address_type)
}

#[async_trait]
impl AddressRegistry for MemoryStore {
    async fn get_address(&self, key: &AddressKey) -> CoreResult<Option<AddressRecord>> {
        Ok(self.state.read().await.addresses.get(&record_key(key)).cloned())
    }

    async fn list_addresses(&self, domain: &str, username: &str) -> CoreResult<Vec<AddressRecord>> {
        let state = self.state.read().await;
        let start = (domain.to_string(), username.to_string(), AddressTypeId::MIN);
        let end = (domain.to_string(), username.to_string(), AddressTypeId::MAX);
        Ok(state
            .addresses
            .range(start..=end)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn put_address(&self, record: &AddressRecord) -> CoreResult<()> {
        let mut state = self.state.write().await;
        if !state
            .users
            .contains_key(&(record.domain.clone(), record.username.clone()))
        {
            return Err(CoreError::UserNotFound(format!(
                "{}${}",
                record.username, record.domain
            )));
        }
        state
            .addresses
            .insert(record_key(&record.key()), record.clone());
        Ok(())
    }

    async fn delete_address(&self, key: &AddressKey) -> CoreResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .addresses
            .remove(&record_key(key))
            .is_some())
    }

    async fn create_user(&self, credential: &UserCredential) -> CoreResult<()> {
        let mut state = self.state.write().await;
        let key = (credential.domain.clone(), credential.username.clone());
        if state.users.contains_key(&key) {
            return Err(CoreError::Duplicate(format!(
                "{}${}",
                credential.username, credential.domain
            )));
        }
        state.users.insert(key, credential.password_hash.clone());
        Ok(())
    }

    async fn delete_user(&self, domain: &str, username: &str) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        state
            .addresses
            .retain(|(d, u, _), _| !(d == domain && u == username));
        Ok(state
            .users
            .remove(&(domain.to_string(), username.to_string()))
            .is_some())
    }

    async fn get_password_hash(&self, domain: &str, username: &str) -> CoreResult<Option<String>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .get(&(domain.to_string(), username.to_string()))
            .cloned())
    }

    async fn get_public_key(&self, domain: &str) -> CoreResult<Option<Vec<u8>>> {
        Ok(self.state.read().await.public_keys.get(domain).cloned())
    }

    async fn set_public_key(&self, domain: &str, public_key: &[u8]) -> CoreResult<()> {
        self.state
            .write()
            .await
            .public_keys
            .insert(domain.to_string(), public_key.to_vec());
        Ok(())
    }

    async fn delete_public_key(&self, domain: &str) -> CoreResult<bool> {
        Ok(self.state.write().await.public_keys.remove(domain).is_some())
    }
}
