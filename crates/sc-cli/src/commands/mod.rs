//! CLI command implementations

pub(crate) mod apply;
pub(crate) mod common;
pub(crate) mod digest;
pub(crate) mod migrate;
pub(crate) mod status;
