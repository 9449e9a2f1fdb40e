//! Folio - A small content and contact backend
//!
//! CRUD over contacts, pages, posts, content blocks and config entries,
//! with queued email notifications and optional reCAPTCHA protection.

pub mod api;
pub mod backoff;
pub mod config;
pub mod db;
pub mod mail;
pub mod models;
pub mod queue;
pub mod recaptcha;
pub mod services;
