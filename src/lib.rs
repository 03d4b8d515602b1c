//! DTE Ingest API Library
//!
//! This crate provides the core functionality for the purchase-document
//! ingestion service: DTE XML extraction, supplier reconciliation and
//! purchase-document assembly.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod dte;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

use std::sync::Arc;

use crate::db::DbPool;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}
