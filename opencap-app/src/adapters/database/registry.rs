//! `AddressRegistry` implementation for `DatabaseStore`.

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr,
    TransactionTrait,
};

use opencap_core::error::{CoreError, CoreResult};
use opencap_core::traits::AddressRegistry;
use opencap_core::types::{AddressKey, AddressRecord, AddressTypeId, SubtypeId, UserCredential};

use super::entity::{address, domain, user};
use super::DatabaseStore;

impl address::Model {
    /// Convert a `SeaORM` row model into a domain `AddressRecord`.
    fn into_record(self) -> CoreResult<AddressRecord> {
        let address_type = AddressTypeId::try_from(self.address_type).map_err(|e| {
            CoreError::SerializationError(format!("Invalid address_type column: {e}"))
        })?;
        let subtype = SubtypeId::try_from(self.subtype)
            .map_err(|e| CoreError::SerializationError(format!("Invalid subtype column: {e}")))?;

        Ok(AddressRecord {
            domain: self.domain,
            username: self.username,
            address_type,
            subtype,
            payload: self.address,
        })
    }
}

fn storage_error(action: &str, e: &DbErr) -> CoreError {
    CoreError::StorageError(format!("Failed to {action}: {e}"))
}

#[async_trait]
impl AddressRegistry for DatabaseStore {
    async fn get_address(&self, key: &AddressKey) -> CoreResult<Option<AddressRecord>> {
        let row = address::Entity::find_by_id((
            key.domain.clone(),
            key.username.clone(),
            i32::from(key.address_type),
        ))
        .one(&self.db)
        .await
        .map_err(|e| storage_error("query address", &e))?;

        row.map(address::Model::into_record).transpose()
    }

    async fn list_addresses(&self, domain: &str, username: &str) -> CoreResult<Vec<AddressRecord>> {
        let rows = address::Entity::find()
            .filter(address::Column::Domain.eq(domain))
            .filter(address::Column::Username.eq(username))
            .order_by_asc(address::Column::AddressType)
            .all(&self.db)
            .await
            .map_err(|e| storage_error("query addresses", &e))?;

        rows.into_iter().map(address::Model::into_record).collect()
    }

    async fn put_address(&self, record: &AddressRecord) -> CoreResult<()> {
        let active_model = address::ActiveModel {
            domain: Set(record.domain.clone()),
            username: Set(record.username.clone()),
            address_type: Set(i32::from(record.address_type)),
            subtype: Set(i32::from(record.subtype)),
            address: Set(record.payload.clone()),
        };

        // Single statement upsert; the users foreign key rejects orphans.
        address::Entity::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    address::Column::Domain,
                    address::Column::Username,
                    address::Column::AddressType,
                ])
                .update_columns([address::Column::Subtype, address::Column::Address])
                .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => CoreError::UserNotFound(
                    format!("{}${}", record.username, record.domain),
                ),
                _ => storage_error("save address", &e),
            })?;

        Ok(())
    }

    async fn delete_address(&self, key: &AddressKey) -> CoreResult<bool> {
        let result = address::Entity::delete_many()
            .filter(address::Column::Domain.eq(&key.domain))
            .filter(address::Column::Username.eq(&key.username))
            .filter(address::Column::AddressType.eq(i32::from(key.address_type)))
            .exec(&self.db)
            .await
            .map_err(|e| storage_error("delete address", &e))?;

        Ok(result.rows_affected > 0)
    }

    async fn create_user(&self, credential: &UserCredential) -> CoreResult<()> {
        let active_model = user::ActiveModel {
            domain: Set(credential.domain.clone()),
            username: Set(credential.username.clone()),
            password_hash: Set(credential.password_hash.clone()),
        };

        user::Entity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => CoreError::Duplicate(format!(
                    "{}${}",
                    credential.username, credential.domain
                )),
                _ => storage_error("create user", &e),
            })?;

        Ok(())
    }

    async fn delete_user(&self, domain: &str, username: &str) -> CoreResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", &e))?;

        // Explicit cascade; engines without foreign key enforcement rely on it.
        address::Entity::delete_many()
            .filter(address::Column::Domain.eq(domain))
            .filter(address::Column::Username.eq(username))
            .exec(&txn)
            .await
            .map_err(|e| storage_error("delete user addresses", &e))?;

        let result = user::Entity::delete_many()
            .filter(user::Column::Domain.eq(domain))
            .filter(user::Column::Username.eq(username))
            .exec(&txn)
            .await
            .map_err(|e| storage_error("delete user", &e))?;

        txn.commit()
            .await
            .map_err(|e| storage_error("commit transaction", &e))?;

        Ok(result.rows_affected > 0)
    }

    async fn get_password_hash(&self, domain: &str, username: &str) -> CoreResult<Option<String>> {
        let row = user::Entity::find_by_id((domain.to_string(), username.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| storage_error("query user", &e))?;

        Ok(row.map(|m| m.password_hash))
    }

    async fn get_public_key(&self, domain_name: &str) -> CoreResult<Option<Vec<u8>>> {
        let row = domain::Entity::find_by_id(domain_name.to_string())
            .one(&self.db)
            .await
            .map_err(|e| storage_error("query domain", &e))?;

        Ok(row.and_then(|m| m.public_key))
    }

    async fn set_public_key(&self, domain_name: &str, public_key: &[u8]) -> CoreResult<()> {
        let active_model = domain::ActiveModel {
            domain: Set(domain_name.to_string()),
            public_key: Set(Some(public_key.to_vec())),
        };

        domain::Entity::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(domain::Column::Domain)
                    .update_column(domain::Column::PublicKey)
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| storage_error("save public key", &e))?;

        Ok(())
    }

    async fn delete_public_key(&self, domain_name: &str) -> CoreResult<bool> {
        let result = domain::Entity::delete_many()
            .filter(domain::Column::Domain.eq(domain_name))
            .filter(domain::Column::PublicKey.is_not_null())
            .exec(&self.db)
            .await
            .map_err(|e| storage_error("delete public key", &e))?;

        Ok(result.rows_affected > 0)
    }
}
