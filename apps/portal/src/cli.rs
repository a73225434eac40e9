//! # Command-line interface
//!
//! Every subcommand maps to one portal view. Grid views share [`GridArgs`]; create forms take
//! optional fields so `--resume` can fill the rest from a saved draft.

use clap::{Args, Parser, Subcommand};
use ctn::domain::models::{
    AuditAction, ContactType, DataCategory, EndpointType, MemberStatus, MembershipLevel,
    ValidationStatus,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ctn-portal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Administrative portal for the CTN Association Register")]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Explicit configuration file (otherwise `portal.toml` in the working directory, if any)
    #[arg(short, long, global = true, env = "CTN_PORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Landing page when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Dashboard (landing page)
    Dashboard,
    /// Cache a session token acquired from the sign-in page
    Login {
        #[arg(long, env = "CTN_PORTAL_TOKEN", hide_env_values = true)]
        token: String,
        /// Account recorded as the actor of every change
        #[arg(long)]
        account: String,
        /// Minutes until the token expires
        #[arg(long, default_value_t = 60)]
        expires_in: u32,
    },
    /// Forget the cached session
    Logout,
    /// Association members and their legal entities
    Members {
        #[command(subcommand)]
        action: MemberAction,
    },
    /// Legal entity details
    Entity {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Legal identifiers (KVK, LEI, EORI, ...)
    Identifiers {
        #[command(subcommand)]
        action: IdentifierAction,
    },
    /// Contacts of a legal entity
    Contacts {
        #[command(subcommand)]
        action: ContactAction,
    },
    /// Data endpoints of a legal entity
    Endpoints {
        #[command(subcommand)]
        action: EndpointAction,
    },
    /// Access tokens of an endpoint
    Tokens {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Audit log
    Audit(AuditArgs),
    /// KvK document verification
    Kvk {
        #[command(subcommand)]
        action: KvkAction,
    },
    /// Saved grid preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Help topics (`help identifiers`, `help KVK`, ...)
    Help { topic: Option<String> },
}

/// Search, sort, paging and column choice of a grid. Everything but `--search` and `--page` is
/// remembered per grid.
#[derive(Debug, Clone, Default, Args)]
pub struct GridArgs {
    /// Case-insensitive text filter over the visible columns
    #[arg(long)]
    pub search: Option<String>,
    /// Sort column, optionally `:desc` (e.g. `legalName:desc`)
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long)]
    pub page: Option<usize>,
    /// One of 10, 20, 50, 100
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Comma-separated column keys to show
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum MemberAction {
    List(GridArgs),
    /// Member detail with the legal entity and one tab
    Show {
        member_id: String,
        #[arg(long, value_enum, default_value_t = Tab::Identifiers)]
        tab: Tab,
        #[command(flatten)]
        grid: GridArgs,
    },
    Create(MemberFields),
    Update {
        member_id: String,
        #[arg(long)]
        legal_name: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        status: Option<MemberStatus>,
        #[arg(long)]
        level: Option<MembershipLevel>,
    },
    Delete { member_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Tab {
    Identifiers,
    Contacts,
    Endpoints,
    Kvk,
}

#[derive(Debug, Clone, Default, Args)]
pub struct MemberFields {
    #[arg(long)]
    pub legal_name: Option<String>,
    /// `org:<name>`
    #[arg(long)]
    pub org_id: Option<String>,
    #[arg(long)]
    pub domain: Option<String>,
    /// Two-letter country code
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub level: Option<MembershipLevel>,
    #[arg(long)]
    pub legal_form: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum EntityAction {
    Show { legal_entity_id: String },
    /// Blank values clear optional fields
    Update {
        legal_entity_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        postal_code: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        legal_form: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct IdentifierFields {
    #[arg(long)]
    pub country: Option<String>,
    /// Identifier type offered for the country (see `help identifiers`)
    #[arg(long = "type")]
    pub identifier_type: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
    /// Overrides the registry filled in from the type
    #[arg(long)]
    pub registry_name: Option<String>,
    #[arg(long)]
    pub registry_url: Option<String>,
    #[arg(long)]
    pub status: Option<ValidationStatus>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Start from the saved draft of this form
    #[arg(long)]
    pub resume: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum IdentifierAction {
    List {
        legal_entity_id: String,
        #[command(flatten)]
        grid: GridArgs,
    },
    Add {
        legal_entity_id: String,
        #[command(flatten)]
        fields: IdentifierFields,
    },
    Update {
        legal_entity_id: String,
        identifier_id: String,
        #[command(flatten)]
        fields: IdentifierFields,
    },
    Delete { identifier_id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ContactFields {
    #[arg(long = "type")]
    pub contact_type: Option<ContactType>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub job_title: Option<String>,
    #[arg(long)]
    pub primary: Option<bool>,
    #[arg(long)]
    pub resume: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ContactAction {
    List {
        legal_entity_id: String,
        #[command(flatten)]
        grid: GridArgs,
    },
    Add {
        legal_entity_id: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    Update {
        legal_entity_id: String,
        contact_id: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    Delete { contact_id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct EndpointFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long = "type")]
    pub endpoint_type: Option<EndpointType>,
    #[arg(long)]
    pub category: Option<DataCategory>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
    #[arg(long)]
    pub resume: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum EndpointAction {
    List {
        legal_entity_id: String,
        #[command(flatten)]
        grid: GridArgs,
    },
    Add {
        legal_entity_id: String,
        #[command(flatten)]
        fields: EndpointFields,
    },
    Update {
        legal_entity_id: String,
        endpoint_id: String,
        #[command(flatten)]
        fields: EndpointFields,
    },
    Activate { legal_entity_id: String, endpoint_id: String },
    Deactivate { legal_entity_id: String, endpoint_id: String },
    Delete { endpoint_id: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum TokenAction {
    List {
        endpoint_id: String,
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Issue a token; the secret is shown once
    Issue {
        endpoint_id: String,
        /// 1 to 365 days, 90 when omitted
        #[arg(long)]
        days: Option<u32>,
    },
    Revoke { token_id: String },
}

#[derive(Debug, Clone, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub action: Option<AuditAction>,
    #[arg(long)]
    pub resource_type: Option<String>,
    #[arg(long)]
    pub actor: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 10)]
    pub page_size: u32,
}

#[derive(Debug, Clone, Subcommand)]
pub enum KvkAction {
    /// Upload a KvK extract (PDF) for a legal entity
    Upload {
        legal_entity_id: String,
        file: PathBuf,
        /// Poll until the verification finishes
        #[arg(long)]
        wait: bool,
    },
    /// Latest verification with the field comparison
    Status {
        legal_entity_id: String,
        #[arg(long)]
        wait: bool,
    },
    /// Flagged verifications awaiting review
    Queue(GridArgs),
    Review {
        verification_id: String,
        #[arg(long, conflicts_with = "reject", required_unless_present = "reject")]
        approve: bool,
        #[arg(long)]
        reject: bool,
        /// Required when rejecting
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PrefsAction {
    /// Forget the saved columns, sort and page size of a grid
    Reset { grid: String },
}
