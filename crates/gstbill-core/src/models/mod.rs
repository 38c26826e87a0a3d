//! Data models for gstbill.

pub mod config;
pub mod invoice;
