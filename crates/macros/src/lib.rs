//! dynmsg Proc Macros
//!
//! This crate provides `#[derive(MessageContract)]`, which turns a struct
//! wrapping a `Record` into a typed view of a runtime-synthesized record type.
//!
//! # Example
//!
//! ```ignore
//! use std::marker::PhantomData;
//! use dynmsg_core::{MessageContract, Record, TypeRegistry};
//!
//! #[derive(MessageContract)]
//! #[contract(name = "Contracts.OrderPlaced")]
//! pub struct OrderPlaced {
//!     record: Record,
//!
//!     #[contract(field = "order_id")]
//!     order_id: PhantomData<String>,
//!
//!     #[contract(field = "quantity")]
//!     quantity: PhantomData<i64>,
//!
//!     #[contract(field = "shipping", record = "Contracts.Address")]
//!     shipping: PhantomData<Option<Record>>,
//! }
//!
//! // Generated methods allow type-safe access:
//! // - order.order_id() -> Result<String, RecordError>
//! // - order.set_order_id(String) -> Result<(), RecordError>
//! // - order.quantity() / order.set_quantity(i64)
//! // - order.shipping() / order.set_shipping(Option<Record>)
//! ```
//!
//! # Attributes
//!
//! ## Struct Attributes
//!
//! - `#[contract(name = "TypeName")]` - **Required.** The record type name.
//!
//! ## Field Attributes
//!
//! - `#[contract(field = "name")]` - Mark as a record field with the given name.
//! - `#[contract(record = "TypeName")]` - Nested record field (`Option<Record>`).
//! - `#[contract(readonly)]` - Don't generate a setter.
//!
//! Member types may be written directly (`i64`) or as `PhantomData<i64>`.

mod message_contract;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for typed message contract views
///
/// # Generated Code
///
/// For each `#[contract(field = "...")]` member, the macro generates:
///
/// - A getter method (`fn quantity(&self) -> Result<i64, RecordError>`)
/// - A setter method (`fn set_quantity(&mut self, value: i64)`) unless `readonly`
/// - A constant holding the record field name (`QUANTITY_FIELD`)
///
/// Plus a `MessageContract` implementation whose `schema()` lists the fields
/// in declaration order.
///
/// # Supported Member Types
///
/// | Rust type | Field kind |
/// |-----------|------------|
/// | `i64` | integer |
/// | `f64` | float |
/// | `String` | text |
/// | `bool` | boolean |
/// | `Vec<u8>` | bytes |
/// | `Option<Record>` + `record = "..."` | nested record |
#[proc_macro_derive(MessageContract, attributes(contract))]
pub fn derive_message_contract(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    message_contract::derive_message_contract(input).into()
}
