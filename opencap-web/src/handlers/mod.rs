//! Route handlers

pub mod address;
pub mod auth;
pub mod domain;
pub mod user;
