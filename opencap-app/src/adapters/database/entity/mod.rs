//! `SeaORM` entities for `DatabaseStore`.

pub mod address;
pub mod domain;
pub mod user;
