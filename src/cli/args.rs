//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::catalog::TemplateKind;
use crate::config::HOME_ENV;
use crate::depot::RegistrarKind;

/// Conductor - download kernel and library templates and build projects
/// from them.
#[derive(Debug, Parser)]
#[command(name = "conductor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Conductor home holding depots and downloaded templates
    /// (default ~/.conductor)
    #[arg(long, global = true, env = HOME_ENV, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Never prompt; take defaults or CONDUCTOR_PROMPT_* answers
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered depots
    #[command(visible_alias = "lsdepot", alias = "lsde")]
    ListDepots(ListDepotsArgs),

    /// Register a new depot
    #[command(visible_alias = "new-depot", aliases = ["add-provider", "new-provider"])]
    AddDepot(AddDepotArgs),

    /// Remove a depot and everything downloaded from it
    #[command(visible_alias = "rm-depot")]
    RemoveDepot(RemoveDepotArgs),

    /// List available templates
    #[command(visible_alias = "lstemplate")]
    ListTemplates(ListTemplatesArgs),

    /// Download a template
    #[command(visible_alias = "dl")]
    Download(DownloadArgs),

    /// Create a new project from a downloaded kernel
    #[command(
        visible_alias = "create",
        aliases = ["new-proj", "new-project", "create-proj", "create-project"]
    )]
    New(NewArgs),

    /// Upgrade an existing project to a downloaded kernel
    #[command(visible_alias = "update")]
    Upgrade(UpgradeArgs),

    /// Describe a directory as a template
    CreateTemplate(CreateTemplateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `list-depots` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListDepotsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add-depot` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AddDepotArgs {
    /// Unique name of the new depot
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Registrar of the new depot
    #[arg(long, value_enum, value_name = "REGISTRAR")]
    pub registrar: Option<RegistrarKind>,

    /// Location of the new depot (URL or directory)
    #[arg(long, value_name = "LOCATION")]
    pub location: Option<String>,
}

/// Arguments for the `remove-depot` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RemoveDepotArgs {
    /// Name of the depot
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

/// Arguments for the `list-templates` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListTemplatesArgs {
    /// List only kernels
    #[arg(long, conflicts_with_all = ["libraries", "all"])]
    pub kernels: bool,

    /// List only libraries
    #[arg(long, conflicts_with = "all")]
    pub libraries: bool,

    /// List kernels and libraries (default)
    #[arg(long)]
    pub all: bool,

    /// List downloaded templates only, without contacting depots
    #[arg(long)]
    pub offline: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only query depots whose name matches one of these patterns
    #[arg(value_name = "REGEX")]
    pub filters: Vec<String>,
}

impl ListTemplatesArgs {
    /// Template kinds selected by the flags.
    pub fn kinds(&self) -> Vec<TemplateKind> {
        if self.kernels {
            vec![TemplateKind::Kernel]
        } else if self.libraries {
            vec![TemplateKind::Library]
        } else {
            TemplateKind::all()
        }
    }
}

/// Arguments for the `download` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DownloadArgs {
    /// Template name (`latest` means the latest kernel)
    #[arg(default_value = "kernel")]
    pub name: String,

    /// Template version
    #[arg(id = "template_version", value_name = "VERSION", default_value = "latest")]
    pub version: String,

    /// Depot to download from
    #[arg(default_value = "auto")]
    pub depot: String,

    /// When name, version and depot are all given, skip checking the
    /// listing before downloading
    #[arg(long, visible_alias = "nc")]
    pub no_check: bool,
}

impl Default for DownloadArgs {
    fn default() -> Self {
        Self {
            name: "kernel".to_string(),
            version: "latest".to_string(),
            depot: "auto".to_string(),
            no_check: false,
        }
    }
}

/// Arguments for the `new` command.
#[derive(Debug, Clone, clap::Args)]
pub struct NewArgs {
    /// Directory to create the project in
    pub location: PathBuf,

    /// Kernel version
    #[arg(default_value = "latest")]
    pub kernel: String,

    /// Depot the kernel was downloaded from
    #[arg(default_value = "auto")]
    pub depot: String,
}

/// Arguments for the `upgrade` command.
#[derive(Debug, Clone, clap::Args)]
pub struct UpgradeArgs {
    /// Project directory
    pub location: PathBuf,

    /// Kernel version
    #[arg(default_value = "latest")]
    pub kernel: String,

    /// Depot the kernel was downloaded from
    #[arg(default_value = "auto")]
    pub depot: String,
}

/// Arguments for the `create-template` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CreateTemplateArgs {
    /// Template name
    pub name: String,

    /// Template version
    #[arg(id = "template_version", value_name = "VERSION")]
    pub version: String,

    /// Depot the template will be published to
    pub depot: String,

    /// Directory holding the template files (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub location: Option<PathBuf>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
