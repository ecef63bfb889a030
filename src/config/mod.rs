//! Settings and the conductor home.
//!
//! Everything conductor keeps on disk lives under one home directory,
//! chosen by `--home`, then `CONDUCTOR_HOME`, then `~/.conductor`:
//!
//! - `config.yml` holds optional [`Settings`]
//! - `depots.yml` holds the registered depots
//! - `templates/<depot>/<name>@<version>/` holds downloaded templates
//!
//! # Example
//!
//! ```
//! use conductor::config::Workspace;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let workspace = Workspace::open(temp.path()).unwrap();
//! let registry = workspace.registry().unwrap();
//! assert_eq!(registry.len(), 1);
//! ```

pub mod settings;
pub mod workspace;

pub use settings::{default_home, Settings, HOME_ENV, SETTINGS_FILE};
pub use workspace::{Workspace, TEMPLATES_DIR};
