//! Trust assessment for consumer products.
//!
//! Fuses two independent evidence sources into one explainable result: a
//! regulatory authority record and the product's consumer review history.
//! The scoring core is pure; catalog ingestion and the HTTP/CLI surfaces
//! live at the edges.

pub mod assessment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod telemetry;
