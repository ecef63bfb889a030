//! Projects materialized from downloaded templates.
//!
//! A project is any directory holding a `project.yml` that records the
//! kernel it was created from. [`create_project`] copies a template into
//! a fresh project, [`upgrade_project`] copies a newer template's upgrade
//! files over an existing one, and [`create_template`] goes the other way,
//! describing a directory as a template.

pub mod file;
pub mod materialize;
pub mod template;

pub use file::{KernelRecord, ProjectFile, PROJECT_FILE};
pub use materialize::{create_project, upgrade_project};
pub use template::create_template;
