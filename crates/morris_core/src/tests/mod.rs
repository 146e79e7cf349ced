//! Integration tests for the Morris screening engine
//!
//! Tests are organized by topic:
//! - `scenarios` - End-to-end screening runs with known answers
//! - `properties` - Structural guarantees of designs and results
//! - `two_phase` - Sample / analyze workflow against the combined call

mod properties;
