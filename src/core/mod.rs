//! Core functionality: documents, persistence, export and configuration

pub mod config;
pub mod document;
pub mod export;
pub mod storage;
pub mod store;
