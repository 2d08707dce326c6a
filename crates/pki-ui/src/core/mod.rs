//! Core, DOM-free primitives for the console widgets.
//!
//! Everything in here runs on the native target so the table, dialog and
//! navigation state machines can be tested without a browser.
pub mod attributes;
pub mod collection;
pub mod config;
pub mod dialog;
pub mod error;
pub mod events;
pub mod model;
pub mod navigation;
pub mod notify;
pub mod pagination;
pub mod query;
pub mod table;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
