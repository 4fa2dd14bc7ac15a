//! Declarative contract manifests.
//!
//! A contract can be described in JSON and turned into signatures and
//! event specs through the type registry's name parser, so bindings can
//! ship contract descriptions as data instead of code. Type names follow
//! the registry grammar (`i32`, `string?`, `f64[]`, `$0`, registered
//! names). Explicit parameter defaults are not expressible here; omitted
//! optionals fall back to type defaults.

use serde::{Deserialize, Serialize};

use crate::contract::{EventSpec, MemberSignature, ParamSpec};
use crate::error::ContractError;
use crate::types::TypeRegistry;

/// Root of a JSON contract description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractManifest {
    #[serde(default)]
    pub members: Vec<MemberManifest>,
    #[serde(default)]
    pub events: Vec<EventManifest>,
}

/// One member entry of a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberManifest {
    pub name: String,
    /// Number of generic type slots the member declares.
    #[serde(default)]
    pub generics: u32,
    #[serde(default)]
    pub params: Vec<ParamManifest>,
}

/// One parameter entry of a member manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamManifest {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub variadic: bool,
}

/// One event entry of a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventManifest {
    pub name: String,
    /// Payload parameter type names.
    #[serde(default)]
    pub params: Vec<String>,
}

impl ContractManifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ContractError> {
        serde_json::from_str(text).map_err(|e| ContractError::Manifest {
            message: e.to_string(),
        })
    }

    /// Build validated member signatures, resolving type names through
    /// the registry.
    pub fn signatures(&self, types: &TypeRegistry) -> Result<Vec<MemberSignature>, ContractError> {
        self.members
            .iter()
            .map(|member| {
                let params = member
                    .params
                    .iter()
                    .map(|p| {
                        let ty = types.parse_type(&p.ty)?;
                        Ok(if p.variadic {
                            ParamSpec::variadic(ty)
                        } else if p.optional {
                            ParamSpec::optional(ty)
                        } else {
                            ParamSpec::required(ty)
                        })
                    })
                    .collect::<Result<Vec<_>, ContractError>>()?;
                MemberSignature::build(member.name.as_str(), member.generics, params)
            })
            .collect()
    }

    /// Build event specs, resolving payload type names through the
    /// registry.
    pub fn event_specs(&self, types: &TypeRegistry) -> Result<Vec<EventSpec>, ContractError> {
        self.events
            .iter()
            .map(|event| {
                let params = event
                    .params
                    .iter()
                    .map(|name| types.parse_type(name))
                    .collect::<Result<Vec<_>, ContractError>>()?;
                Ok(EventSpec::new(event.name.as_str(), params))
            })
            .collect()
    }
}
