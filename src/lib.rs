//! Hackspot - PO template extraction for XScreenSaver hack configurations
//!
//! Hackspot unpacks XScreenSaver source distributions, extracts the
//! translatable strings from every `hacks/config/*.xml` file and writes a
//! single PO template covering all given releases. Each entry lists the
//! source locations from the newest release it appears in, and entries
//! missing from the newest release are marked with a `last-release` comment.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, reporting, exit status)
//! - `config`: Fixed locations and run options
//! - `release`: Release IDs parsed from archive names
//! - `archive`: Unpacking archives into the scratch directory
//! - `extract`: XML string extraction
//! - `message`: Extracted message and source reference types
//! - `catalog`: Cross-release aggregation
//! - `pot`: PO template writer
//! - `pipeline`: The end-to-end run

pub mod archive;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod extract;
pub mod message;
pub mod pipeline;
pub mod pot;
pub mod release;
