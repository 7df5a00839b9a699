//! Input/output helpers.
//!
//! - CSV ingest of experimental and replayed curves (`ingest`)
//! - candidate recording to CSV (`export`)
//! - profile JSON export (`profile`)

pub mod export;
pub mod ingest;
pub mod profile;

pub use export::*;
pub use ingest::*;
pub use profile::*;
