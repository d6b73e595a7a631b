//! Attribute parsing for the MessageContract derive macro

use darling::{FromDeriveInput, FromField};
use syn::{DeriveInput, Ident, Type};

/// Name of the struct member that holds the wrapped record
pub const RECORD_MEMBER: &str = "record";

/// Parsed #[contract(...)] attributes on the struct
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(contract), supports(struct_named))]
pub struct ContractArgs {
    /// Struct identifier
    pub ident: Ident,

    /// Struct fields
    pub data: darling::ast::Data<(), ContractFieldArgs>,

    /// Contract (record type) name, e.g. "Contracts.OrderPlaced"
    pub name: String,
}

/// Parsed #[contract(...)] attributes on a field
#[derive(Debug, FromField)]
#[darling(attributes(contract))]
pub struct ContractFieldArgs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// Record field name. Members without it are not part of the contract.
    #[darling(rename = "field")]
    pub field_name: Option<String>,

    /// Nested record type name, for `Option<Record>` members
    #[darling(default)]
    pub record: Option<String>,

    /// Whether this field is read-only (no setter generated)
    #[darling(default)]
    pub readonly: bool,
}

impl ContractFieldArgs {
    /// Check if this member maps to a record field
    pub fn is_contract_field(&self) -> bool {
        self.field_name.is_some()
    }

    /// Check if this is the wrapped record member
    pub fn is_record_member(&self) -> bool {
        self.ident
            .as_ref()
            .map(|i| i == RECORD_MEMBER)
            .unwrap_or(false)
    }
}

/// Parse a DeriveInput into ContractArgs
pub fn parse_contract(input: &DeriveInput) -> darling::Result<ContractArgs> {
    ContractArgs::from_derive_input(input)
}
