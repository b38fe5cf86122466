//! Address lookup and maintenance

use std::sync::Arc;

use crate::address::AddressTypeRegistry;
use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{AddressKey, AddressRecord, AddressTypeId, Alias, SubtypeId};

/// Address service
///
/// Validates payloads before they reach the registry; the registry never
/// sees a rejected address.
pub struct AddressService {
    ctx: Arc<ServiceContext>,
}

impl AddressService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Get the record of one type.
    pub async fn lookup(
        &self,
        domain: &str,
        username: &str,
        address_type: AddressTypeId,
    ) -> CoreResult<AddressRecord> {
        let key = AddressKey::new(domain, username, address_type);
        self.ctx
            .registry
            .get_address(&key)
            .await?
            .ok_or_else(|| CoreError::AddressNotFound(key.to_string()))
    }

    /// Resolve an alias string (`user$domain` or `user@domain`).
    ///
    /// With a type, yields at most that one record (`AddressNotFound` when
    /// absent); without, every record of the user. The alias is validated
    /// before the registry is touched.
    pub async fn lookup_alias(
        &self,
        alias: &str,
        address_type: Option<AddressTypeId>,
    ) -> CoreResult<Vec<AddressRecord>> {
        let alias = Alias::parse(alias)?;

        match address_type {
            Some(address_type) => Ok(vec![
                self.lookup(&alias.domain, &alias.username, address_type)
                    .await?,
            ]),
            None => {
                self.ctx
                    .registry
                    .list_addresses(&alias.domain, &alias.username)
                    .await
            }
        }
    }

    /// Validate and upsert an address.
    pub async fn update(
        &self,
        domain: &str,
        username: &str,
        address_type: AddressTypeId,
        subtype: SubtypeId,
        payload: Vec<u8>,
    ) -> CoreResult<()> {
        AddressTypeRegistry::validate(address_type, subtype, &payload)?;

        let record = AddressRecord {
            domain: domain.to_string(),
            username: username.to_string(),
            address_type,
            subtype,
            payload,
        };
        self.ctx.registry.put_address(&record).await?;

        log::info!("Address updated: {}", record.key());
        Ok(())
    }

    /// Delete the record of one type.
    pub async fn delete(
        &self,
        domain: &str,
        username: &str,
        address_type: AddressTypeId,
    ) -> CoreResult<()> {
        let key = AddressKey::new(domain, username, address_type);
        if self.ctx.registry.delete_address(&key).await? {
            log::info!("Address deleted: {key}");
            Ok(())
        } else {
            Err(CoreError::AddressNotFound(key.to_string()))
        }
    }
}
