// src/lib.rs

//! MMSpider library
//!
//! Polls the St Andrews MMS portal, extracts coursework state from its
//! HTML, diffs it against a persistent snapshot store, and composes an
//! email report for anything new or changed.

pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod session;
pub mod storage;
pub mod utils;
