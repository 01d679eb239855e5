//! Service layer for hypoview.
//!
//! Session logic separated from presentation. Used by both the web server
//! and the CLI.

pub mod export;
pub mod navigator;

pub use export::{export_hypotheses, write_export, ExportFile};
pub use navigator::{ContentRegion, Navigator, Notice, Session, SubtopicRow, TopicNode};
