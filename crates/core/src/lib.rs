//! Core domain logic for the scenegen workflow-config builder.
//!
//! Holds the session data model, the pre-submit validator, the request
//! builder and the application state container. Everything in this crate
//! is synchronous and side-effect free; transport and downloads live in
//! `scenegen-client`.

pub mod catalog;
pub mod error;
pub mod request;
pub mod scene;
pub mod settings;
pub mod state;
pub mod types;
pub mod validation;
