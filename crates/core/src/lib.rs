//! Domain building blocks shared by every pdfdesk crate.
//!
//! Nothing in here talks to the database or the network. The record store
//! lives in `pdfdesk-db`, rendering in `pdfdesk-render`, and the lifecycle
//! service that ties them together in `pdfdesk-api`.

pub mod clock;
pub mod error;
pub mod naming;
pub mod pagination;
pub mod pdf;
pub mod storage;
pub mod types;
pub mod validation;
