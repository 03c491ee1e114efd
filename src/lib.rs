//! appmeta - AppStream metainfo library
//!
//! This library provides the core functionality for working with the
//! application metadata files shipped by Linux desktop applications
//! (`*.metainfo.xml`, formerly `*.appdata.xml`):
//! - Decoding and canonical re-encoding of the XML
//! - Release queries and format-preserving release insertion
//! - Rule-based validation with optional URL reachability checks

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metainfo;
pub mod net;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod validate;
