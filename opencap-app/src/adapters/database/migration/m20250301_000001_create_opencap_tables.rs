use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users 表
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Domain).string_len(253).not_null())
                    .col(ColumnDef::new(User::Username).string_len(25).not_null())
                    .col(ColumnDef::new(User::PasswordHash).string().not_null())
                    .primary_key(Index::create().col(User::Domain).col(User::Username))
                    .to_owned(),
            )
            .await?;

        // addresses 表，随用户级联删除
        manager
            .create_table(
                Table::create()
                    .table(Address::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Address::Domain).string_len(253).not_null())
                    .col(ColumnDef::new(Address::Username).string_len(25).not_null())
                    .col(ColumnDef::new(Address::AddressType).integer().not_null())
                    .col(ColumnDef::new(Address::Subtype).integer().not_null())
                    .col(ColumnDef::new(Address::Address).blob().not_null())
                    .primary_key(
                        Index::create()
                            .col(Address::Domain)
                            .col(Address::Username)
                            .col(Address::AddressType),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_addresses_users")
                            .from(Address::Table, (Address::Domain, Address::Username))
                            .to(User::Table, (User::Domain, User::Username))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // domains 表
        manager
            .create_table(
                Table::create()
                    .table(Domain::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Domain::Domain)
                            .string_len(253)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Domain::PublicKey).blob().null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Domain::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Address::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Domain,
    Username,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Address {
    #[sea_orm(iden = "addresses")]
    Table,
    Domain,
    Username,
    AddressType,
    Subtype,
    Address,
}

#[derive(DeriveIden)]
enum Domain {
    #[sea_orm(iden = "domains")]
    Table,
    Domain,
    PublicKey,
}
