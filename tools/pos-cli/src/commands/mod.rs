//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod drafts;
pub mod payroll;
pub mod route;
pub mod session;

use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// List the items in the cart.
    Show,
    /// Add a product.
    Add {
        /// Product id.
        id: String,
        /// Display name (defaults to the id).
        #[arg(short, long)]
        name: Option<String>,
        /// Unit price.
        #[arg(short, long)]
        price: Option<f64>,
        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        qty: f64,
    },
    /// Set a product's quantity; zero removes it.
    Set {
        /// Product id.
        id: String,
        /// New quantity.
        qty: f64,
    },
    /// Remove a product.
    Remove {
        /// Product id.
        id: String,
    },
    /// Empty the cart.
    Clear,
    /// Print the number of units in the cart.
    Count,
}

/// Arguments for the drafts command.
#[derive(Args)]
pub struct DraftsArgs {
    #[command(subcommand)]
    pub command: Option<DraftsCommand>,
}

#[derive(Subcommand)]
pub enum DraftsCommand {
    /// List saved drafts.
    List,
    /// Save the current cart as a draft.
    Save,
    /// Replace the cart with a draft's items.
    Load {
        /// Draft id.
        id: String,
    },
    /// Delete a draft.
    Delete {
        /// Draft id.
        id: String,
    },
}

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: Option<SessionCommand>,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Show the signed-in user.
    Show,
    /// Sign out.
    Clear,
}

/// Arguments for the route command.
#[derive(Args)]
pub struct RouteArgs {
    /// Fragment to dispatch, e.g. `#/company/acme?tab=orders`. Empty
    /// dispatches the home path.
    #[arg(default_value = "")]
    pub fragment: String,
}

/// Arguments for the payroll command.
#[derive(Args)]
pub struct PayrollArgs {
    /// JSON file holding an array of attendance records.
    pub file: String,

    /// Hourly rate (defaults to the configured rate).
    #[arg(short, long)]
    pub rate: Option<f64>,

    /// First day of the period (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the period, inclusive (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only count records for this user id.
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Application name.
        #[arg(default_value = "pos")]
        name: String,
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
