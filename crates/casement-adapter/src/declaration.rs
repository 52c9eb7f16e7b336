//! Binding declaration files (`*.bindings.toml`).
//!
//! A declaration file carries one interface description with its
//! operations and bindings:
//!
//! ```toml
//! [interface]
//! name = "demo.CounterView"
//!
//! [[operations]]
//! name = "increment"
//! signature = "(Llang.Object;[Llang.Object;)I"
//!
//! [[operations.bindings]]
//! handler = "v1"
//! owner = "demo.Counter"
//! member = "increment"
//! signature = "(I)I"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DeclarationError;
use crate::interface::{InterfaceSpec, OperationSpec};

/// A complete binding declaration parsed from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingDeclaration {
    /// The interface header.
    pub interface: InterfaceHeader,
    /// The declared operations.
    #[serde(default)]
    pub operations: Vec<OperationSpec>,
}

/// The `[interface]` table of a declaration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceHeader {
    /// Interface name.
    pub name: String,
}

impl BindingDeclaration {
    /// Parse a declaration from a TOML string and validate it.
    pub fn parse(input: &str) -> Result<BindingDeclaration, DeclarationError> {
        let declaration: BindingDeclaration = toml::from_str(input)?;
        if declaration.interface.name.is_empty() {
            return Err(DeclarationError::MissingInterfaceName);
        }
        declaration.spec().validate()?;
        Ok(declaration)
    }

    /// Parse a declaration from a file path.
    pub fn load(path: &Path) -> Result<BindingDeclaration, DeclarationError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// The interface description this declaration carries.
    pub fn spec(&self) -> InterfaceSpec {
        InterfaceSpec {
            name: self.interface.name.clone(),
            operations: self.operations.clone(),
        }
    }

    /// Consume the declaration into its interface description.
    pub fn into_spec(self) -> InterfaceSpec {
        InterfaceSpec {
            name: self.interface.name,
            operations: self.operations,
        }
    }
}
