//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use opencap_resolver::{DomainAdvertisement, ResolverError, ResolverResult};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{AddressRegistry, DomainResolver};
use crate::types::{AddressKey, AddressRecord, AddressTypeId, UserCredential};

// ===== MockRegistry =====

type UserKey = (String, String);

#[derive(Default)]
struct RegistryState {
    users: HashMap<UserKey, String>,
    addresses: BTreeMap<(String, String, AddressTypeId), AddressRecord>,
    public_keys: HashMap<String, Vec<u8>>,
}

pub struct MockRegistry {
    state: RwLock<RegistryState>,
    /// 为 true 时所有操作返回 StorageError
    fail: RwLock<bool>,
    /// trait 方法被调用的次数
    calls: RwLock<usize>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            fail: RwLock::new(false),
            calls: RwLock::new(0),
        }
    }

    /// 直接插入用户（不计入调用次数）
    pub async fn add_user(&self, domain: &str, username: &str) {
        self.state.write().await.users.insert(
            (domain.to_string(), username.to_string()),
            "pbkdf2-sha256$1$AA==$AA==".to_string(),
        );
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    pub async fn call_count(&self) -> usize {
        *self.calls.read().await
    }

    async fn enter(&self) -> CoreResult<()> {
        *self.calls.write().await += 1;
        if *self.fail.read().await {
            return Err(CoreError::StorageError("injected failure".to_string()));
        }
        Ok(())
    }
}

fn address_key(key: &AddressKey) -> (String, String, AddressTypeId) {
    (key.domain.clone(), key.username.clone(), key.address_type)
}

#[async_trait]
impl AddressRegistry for MockRegistry {
    async fn get_address(&self, key: &AddressKey) -> CoreResult<Option<AddressRecord>> {
        self.enter().await?;
        Ok(self.state.read().await.addresses.get(&address_key(key)).cloned())
    }

    async fn list_addresses(&self, domain: &str, username: &str) -> CoreResult<Vec<AddressRecord>> {
        self.enter().await?;
        Ok(self
            .state
            .read()
            .await
            .addresses
            .values()
            .filter(|r| r.domain == domain && r.username == username)
            .cloned()
            .collect())
    }

    async fn put_address(&self, record: &AddressRecord) -> CoreResult<()> {
        self.enter().await?;
        let mut state = self.state.write().await;
        let owner = (record.domain.clone(), record.username.clone());
        if !state.users.contains_key(&owner) {
            return Err(CoreError::UserNotFound(format!(
                "{}${}",
                record.username, record.domain
            )));
        }
        state
            .addresses
            .insert(address_key(&record.key()), record.clone());
        Ok(())
    }

    async fn delete_address(&self, key: &AddressKey) -> CoreResult<bool> {
        self.enter().await?;
        Ok(self
            .state
            .write()
            .await
            .addresses
            .remove(&address_key(key))
            .is_some())
    }

    async fn create_user(&self, user: &UserCredential) -> CoreResult<()> {
        self.enter().await?;
        let mut state = self.state.write().await;
        let key = (user.domain.clone(), user.username.clone());
        if state.users.contains_key(&key) {
            return Err(CoreError::Duplicate(format!(
                "{}${}",
                user.username, user.domain
            )));
        }
        state.users.insert(key, user.password_hash.clone());
        Ok(())
    }

    async fn delete_user(&self, domain: &str, username: &str) -> CoreResult<bool> {
        self.enter().await?;
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
        self.enter().await?;
        Ok(self
            .state
            .read()
            .await
            .users
            .get(&(domain.to_string(), username.to_string()))
            .cloned())
    }

    async fn get_public_key(&self, domain: &str) -> CoreResult<Option<Vec<u8>>> {
        self.enter().await?;
        Ok(self.state.read().await.public_keys.get(domain).cloned())
    }

    async fn set_public_key(&self, domain: &str, public_key: &[u8]) -> CoreResult<()> {
        self.enter().await?;
        self.state
            .write()
            .await
            .public_keys
            .insert(domain.to_string(), public_key.to_vec());
        Ok(())
    }

    async fn delete_public_key(&self, domain: &str) -> CoreResult<bool> {
        self.enter().await?;
        Ok(self.state.write().await.public_keys.remove(domain).is_some())
    }
}

// ===== MockResolver =====

pub struct MockResolver {
    public_keys: RwLock<HashMap<String, [u8; 32]>>,
    /// 如果 Some，resolve 时返回此错误
    error: RwLock<Option<ResolverError>>,
    delay: RwLock<Option<Duration>>,
    calls: RwLock<usize>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            public_keys: RwLock::new(HashMap::new()),
            error: RwLock::new(None),
            delay: RwLock::new(None),
            calls: RwLock::new(0),
        }
    }

    pub async fn set_public_key(&self, domain: &str, key: Option<[u8; 32]>) {
        let mut keys = self.public_keys.write().await;
        match key {
            Some(key) => keys.insert(domain.to_string(), key),
            None => keys.remove(domain),
        };
    }

    pub async fn set_error(&self, err: Option<ResolverError>) {
        *self.error.write().await = err;
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub async fn call_count(&self) -> usize {
        *self.calls.read().await
    }
}

#[async_trait]
impl DomainResolver for MockResolver {
    async fn resolve(&self, domain: &str) -> ResolverResult<DomainAdvertisement> {
        *self.calls.write().await += 1;

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.error.read().await.clone() {
            return Err(err);
        }

        Ok(DomainAdvertisement {
            domain: domain.to_string(),
            servers: Vec::new(),
            public_key: self.public_keys.read().await.get(domain).copied(),
            dns_signature: false,
        })
    }
}

// ===== 工厂方法 =====

/// 创建使用 mock 依赖的服务上下文
pub fn test_context() -> (Arc<ServiceContext>, Arc<MockRegistry>, Arc<MockResolver>) {
    let registry = Arc::new(MockRegistry::new());
    let resolver = Arc::new(MockResolver::new());
    let ctx = Arc::new(ServiceContext::new(
        Arc::clone(&registry) as Arc<dyn AddressRegistry>,
        Arc::clone(&resolver) as Arc<dyn DomainResolver>,
    ));
    (ctx, registry, resolver)
}
