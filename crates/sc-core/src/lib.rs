//! sc-core - Core library for Scrooge
//!
//! This crate provides the content digest used for drift detection,
//! configuration loading, and the strongly-typed names shared by the
//! storage and migration crates.

pub mod checksum;
pub mod config;
pub mod error;
pub mod migration_version;
mod newtype_string;
pub mod setting_name;
pub mod table_name;

pub use checksum::{calc_digest, calc_sql_digest, compute_checksum};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use migration_version::MigrationVersion;
pub use setting_name::SettingName;
pub use table_name::TableName;
