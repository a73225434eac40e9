#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the register portal crates.
//!
//! * [`ctn_error`] turns an enum into a `thiserror` error with a `.context()` extension trait.
//! * [`ctn_slice`] turns a struct into an `Arc`-backed feature slice handle.
//! * [`api_model`] / [`api_handler`] keep DTOs and sandbox handlers consistent with the
//!   `OpenAPI` document.
//! * [`GridRow`] declares which DTO fields appear as grid columns.
//! * [`main`] boots an async `main` on a tuned Tokio runtime.
//!
//! Examples are `ignore`d; the consuming crates exercise them.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the application runtime.
///
/// Transforms an `async fn main` into a plain `fn main` that builds a Tokio runtime from
/// one of the `ctn_runtime::RuntimeConfig` profiles and blocks on the body.
///
/// # Arguments
///
/// * `interactive` - Few workers, short keep-alive. Used by the portal CLI.
/// * `service` - Full worker pool. Used by the sandbox API.
/// * `default` - Worker count from `TOKIO_WORKER_THREADS` or available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[ctn_runtime::main(interactive)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for API data models (structs and enums).
///
/// # Injected Behaviors
///
/// * **Derives**: adds `Debug`, `Serialize` and `Deserialize` when missing.
/// * **`OpenAPI`**: adds `utoipa::ToSchema` when the consuming crate enables `server`.
/// * **Serde policy for structs**: `rename_all = "camelCase"` and `deny_unknown_fields`,
///   both overridable. Response DTOs mirrored from the backend usually pass
///   `deny_unknown_fields = false`.
/// * **Serde policy for enums**: `rename_all = "SCREAMING_SNAKE_CASE"`, overridable.
///
/// # Example
///
/// ```rust,ignore
/// use ctn_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct Member {
///     pub member_id: String,
///     pub legal_name: String,
/// }
///
/// #[api_model]
/// pub enum MemberStatus {
///     Active,
///     Suspended,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts standard `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `params(...)`, `responses(...)`, `tag = "..."`) and only emits the `utoipa::path`
/// attribute when the `server` feature of the consuming crate is enabled.
///
/// # Example
///
/// ```rust,ignore
/// #[api_handler(
///     get,
///     path = "/api/v1/members",
///     responses((status = OK, body = Vec<Member>)),
///     tag = MEMBERS_TAG
/// )]
/// pub(crate) async fn list_members(State(state): State<SandboxState>) -> Json<Vec<Member>> {
///     Json(state.register.members())
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Defines a domain error enum with context support.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` when missing.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` of every variant holding a `source`.
/// * `From<SourceError>` impls for variants with a source field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant is present.
/// * A private `format_context` helper used inside `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. Only enums with named-field variants are accepted.
/// 2. `context` fields must be `Option<Cow<'static, str>>`.
/// 3. Variants with a `source` must also carry a `context`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[ctn_derive::ctn_error]
/// pub enum StorageError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn ctn_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Defines a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`, and `<Name>` is generated as a cheap
/// `Arc` wrapper with `Deref` to the inner state and a `FeatureSlice` impl for the
/// portal state registry.
///
/// # Example
/// ```rust,ignore
/// #[ctn_derive::ctn_slice]
/// pub struct Members {
///     client: ApiClient,
/// }
///
/// let slice = Members::new(MembersInner { client });
/// ```
#[proc_macro_attribute]
pub fn ctn_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}

/// Derives `ctn_domain::grid::GridRow` for a DTO.
///
/// Only fields marked with `#[grid(...)]` become columns, in declaration order.
///
/// # Attributes
///
/// * Container: `#[grid(id = "field")]` names the field used as the row id (required).
/// * Field: `#[grid(label = "Legal name", sortable)]`; `key = "..."` overrides the
///   column key (defaults to the camelCase field name).
///
/// Field types must implement `ctn_domain::grid::GridCell`.
///
/// # Example
/// ```rust,ignore
/// #[derive(GridRow)]
/// #[grid(id = "member_id")]
/// pub struct Member {
///     pub member_id: String,
///     #[grid(label = "Legal name", sortable)]
///     pub legal_name: String,
/// }
/// ```
#[proc_macro_derive(GridRow, attributes(grid))]
pub fn derive_grid_row(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::grid::expand_grid_row(input).into()
}
