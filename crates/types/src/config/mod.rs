// Path: crates/types/src/config/mod.rs

//! Shared configuration structures for a Verdant node (`verdant.toml`).
use crate::app::{AccountId, InitiativeBounds};
use crate::error::CoreError;
use crate::service_configs::VerificationParams;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Selects the backing store for committed state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum StateBackend {
    /// A volatile in-memory map. State is lost on exit.
    #[default]
    Memory,
    /// A durable `redb` database file.
    Redb,
}

/// Node-level settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// The state backend to open at startup.
    #[serde(default)]
    pub state_backend: StateBackend,
    /// The path of the database file, required for the `Redb` backend.
    #[serde(default)]
    pub state_file: Option<String>,
    /// The identity that holds both the owner and admin roles at genesis.
    pub deployer: AccountId,
}

/// One entry of the static initiative catalog.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct InitiativeConfig {
    /// The initiative id submissions refer to.
    pub id: u64,
    /// The smallest accepted magnitude, inclusive.
    pub min: u64,
    /// The largest accepted magnitude, inclusive.
    pub max: u64,
}

impl InitiativeConfig {
    /// Returns the bounds this entry describes.
    pub fn bounds(&self) -> InitiativeBounds {
        InitiativeBounds {
            min: self.min,
            max: self.max,
        }
    }
}

/// The state access policy of a service.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ServicePolicy {
    /// List of system key prefixes this service is allowed to access.
    pub allowed_system_prefixes: Vec<String>,
}

/// Generates the default set of service access policies.
pub fn default_service_policies() -> BTreeMap<String, ServicePolicy> {
    let mut map = BTreeMap::new();
    map.insert(
        "verification".to_string(),
        ServicePolicy {
            allowed_system_prefixes: vec!["system::initiatives::".to_string()],
        },
    );
    map.insert(
        "initiatives".to_string(),
        ServicePolicy {
            allowed_system_prefixes: vec!["system::initiatives::".to_string()],
        },
    );
    map
}

/// The full node configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VerdantConfig {
    /// Node-level settings.
    pub node: NodeConfig,
    /// Parameters of the verification service.
    #[serde(default)]
    pub verification: VerificationParams,
    /// Initiatives known to the static catalog.
    #[serde(default)]
    pub initiatives: Vec<InitiativeConfig>,
    /// Map of service id to its state access policy.
    /// Defaults to the standard policy set if omitted.
    #[serde(default = "default_service_policies")]
    pub service_policies: BTreeMap<String, ServicePolicy>,
}

impl Default for VerdantConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig {
                state_backend: StateBackend::Memory,
                state_file: None,
                deployer: AccountId::default(),
            },
            verification: VerificationParams::default(),
            initiatives: vec![InitiativeConfig {
                id: 1,
                min: 100,
                max: 10_000,
            }],
            service_policies: default_service_policies(),
        }
    }
}

impl VerdantConfig {
    /// Validates the configuration for semantic correctness.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.node.state_backend == StateBackend::Redb && self.node.state_file.is_none() {
            return Err(CoreError::Config(
                "'node.state_file' is required when using the Redb backend".into(),
            ));
        }
        self.verification.validate()?;

        let mut seen = BTreeSet::new();
        for initiative in &self.initiatives {
            if initiative.min > initiative.max {
                return Err(CoreError::Config(format!(
                    "initiative {} has min {} greater than max {}",
                    initiative.id, initiative.min, initiative.max
                )));
            }
            if !seen.insert(initiative.id) {
                return Err(CoreError::Config(format!(
                    "initiative {} is declared more than once",
                    initiative.id
                )));
            }
        }
        Ok(())
    }
}
