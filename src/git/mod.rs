//! Git integration for release workflows.
//!
//! The workflow talks to a `VersionControl` capability. `GitCli` drives the
//! real git executable; `FakeVersionControl` records commands in memory.

mod fake;
mod git_adapter;
mod operations;

pub use fake::{FakeVersionControl, RecordedCommand};
pub use git_adapter::GitCli;
pub use operations::{GitCommand, VersionControl};
