//! Inspection and dump tools for project files.
//!
//! This crate wraps the reader for use from a terminal:
//!
//! - Open a structured-storage file as a [`reader::Container`]
//! - List its streams, optionally filtered by a glob
//! - Render a hydrated project as JSON or as indented text
//!
//! # Design Principles
//!
//! - **The core stays container-agnostic** - Only this crate knows the
//!   compound-file format; the reader sees named streams.
//! - **Human-readable output** - Make it easy to see what the reader did
//!   with each stream.

mod cfb_container;
mod render;

pub use cfb_container::{list_streams, CfbContainer, StreamEntry};
pub use render::{dump_json, format_identity, format_pretty, DumpOutput, StageLine};
