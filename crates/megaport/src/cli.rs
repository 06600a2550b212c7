//! Clap derive structures for the `megaport` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// megaport -- operator CLI for Megaport provisioning
#[derive(Debug, Parser)]
#[command(
    name = "megaport",
    version,
    about = "Operate Megaport ports, MCRs and VXCs from the command line",
    long_about = "Operator utilities for the Megaport provisioning API.\n\n\
        Fetch or reset API tokens, search locations and partner ports,\n\
        inspect products, check VLAN availability and delete products,\n\
        waiting until the provider has released them.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "MEGAPORT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API environment (overrides profile)
    #[arg(long, short = 'e', value_enum, global = true)]
    pub environment: Option<ApiEnvironment>,

    /// Explicit API base URL (overrides profile and --environment)
    #[arg(long, env = "MEGAPORT_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// API token
    #[arg(long, env = "MEGAPORT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MEGAPORT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MEGAPORT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApiEnvironment {
    /// https://api.megaport.com
    Production,
    /// https://api-staging.megaport.com (orders are never billed)
    Staging,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print an API token, or revoke the current one
    Token(TokenArgs),

    /// List or search data-centre locations
    #[command(alias = "loc")]
    Locations(LocationsArgs),

    /// List or search partner (cloud and marketplace) ports
    #[command(alias = "pp")]
    PartnerPorts(PartnerPortsArgs),

    /// Inspect products owned by the account
    #[command(alias = "p")]
    Product(ProductArgs),

    /// Check VLAN availability on a port
    Vlan(VlanArgs),

    /// Quote monthly prices from the price book
    Price(PriceArgs),

    /// Cancel a product and wait until it is gone
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Inspect the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Token ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Revoke the current token (from --token / MEGAPORT_TOKEN / profile)
    #[arg(long, conflicts_with_all = ["username", "save"])]
    pub reset: bool,

    /// Username (prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// One-time password, for accounts with MFA enabled
    #[arg(long)]
    pub otp: Option<String>,

    /// Store the new token in the system keyring for the active profile
    #[arg(long)]
    pub save: bool,
}

// ── Reference data ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LocationsArgs {
    /// Return the single location whose name matches this regex
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct PartnerPortsArgs {
    /// Connect type: AWS, GOOGLE, or DEFAULT for marketplace ports
    #[arg(long, short = 't', default_value = "AWS")]
    pub connect_type: String,

    /// Return the single port whose title matches this regex
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Only ports in this location
    #[arg(long, short = 'l')]
    pub location_id: Option<u64>,

    /// Only ports that accept (true) or refuse (false) new VXCs
    #[arg(long)]
    pub vxc_permitted: Option<bool>,
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List products owned by the account
    #[command(alias = "ls")]
    List {
        /// Only products whose name matches this regex (exactly one)
        #[arg(long, short = 'n')]
        name: Option<String>,
    },

    /// Show a port, MCR or VXC by product UID
    Get {
        /// Product UID
        uid: String,
    },
}

// ── VLANs ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VlanArgs {
    #[command(subcommand)]
    pub command: VlanCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlanCommand {
    /// Exit 0 if the VLAN is free on the port, 6 if it is taken
    Check {
        /// Port product UID
        port_uid: String,
        /// VLAN id (1-4094)
        #[arg(value_parser = clap::value_parser!(u16).range(1..=4094))]
        vlan: u16,
    },
}

// ── Price book ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PriceArgs {
    #[command(subcommand)]
    pub command: PriceCommand,
}

#[derive(Debug, Subcommand)]
pub enum PriceCommand {
    /// Price a port
    Port {
        #[arg(long, short = 'l')]
        location_id: u64,
        /// Port speed in Mbps
        #[arg(long, short = 's')]
        speed: u64,
        /// Contract term in months
        #[arg(long, short = 't', default_value_t = 1)]
        term: u64,
        /// Existing port, to price a speed change
        #[arg(long)]
        product_uid: Option<String>,
    },

    /// Price an MCR
    Mcr {
        #[arg(long, short = 'l')]
        location_id: u64,
        /// Rate limit in Mbps
        #[arg(long, short = 's')]
        speed: u64,
        /// Existing MCR, to price a speed change
        #[arg(long)]
        product_uid: Option<String>,
    },

    /// Price a VXC between two locations
    Vxc {
        #[arg(long)]
        a_location_id: u64,
        #[arg(long)]
        b_location_id: u64,
        /// Rate limit in Mbps
        #[arg(long, short = 's')]
        speed: u64,
    },
}

// ── Delete ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Product UID
    pub uid: String,

    /// Return right after the cancel instead of waiting for release
    #[arg(long)]
    pub no_wait: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the effective configuration (secrets redacted)
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
