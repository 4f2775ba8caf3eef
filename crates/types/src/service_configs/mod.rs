// Path: crates/types/src/service_configs/mod.rs
//! Parameter structures for the verification service and service capability flags.

use crate::error::CoreError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Tunable parameters for the verification service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct VerificationParams {
    /// The number of distinct endorsing oracles required for consensus.
    pub quorum_threshold: u32,
    /// The number of blocks a submission remains readable after creation.
    pub validity_window: u64,
    /// The maximum metadata length, in bytes.
    pub max_metadata_len: u32,
    /// The maximum number of endorsers a single submission can hold.
    pub max_endorsers: u32,
    /// The reputation assigned to newly registered oracles.
    pub initial_reputation: u64,
}

impl Default for VerificationParams {
    fn default() -> Self {
        Self {
            quorum_threshold: 2,
            validity_window: 1440, // ~1 day at 60s/block
            max_metadata_len: 256,
            max_endorsers: 10,
            initial_reputation: 100,
        }
    }
}

impl VerificationParams {
    /// Rejects parameter sets under which consensus could never be reached.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quorum_threshold == 0 {
            return Err(CoreError::Config(
                "verification.quorum_threshold must be at least 1".into(),
            ));
        }
        if self.quorum_threshold > self.max_endorsers {
            return Err(CoreError::Config(format!(
                "verification.quorum_threshold ({}) exceeds max_endorsers ({})",
                self.quorum_threshold, self.max_endorsers
            )));
        }
        if self.validity_window == 0 {
            return Err(CoreError::Config(
                "verification.validity_window must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

bitflags::bitflags! {
    /// A bitmask of the cross-service capabilities a service exposes.
    /// This is distinct from the service's callable methods, which are defined in its ABI.
    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[serde(transparent)]
    pub struct Capabilities: u32 {
        /// Implements the `InitiativeCatalog` trait and resolves initiative bounds.
        const INITIATIVE_CATALOG = 0b0001;
    }
}

impl Encode for Capabilities {
    fn encode_to<T: parity_scale_codec::Output + ?Sized>(&self, dest: &mut T) {
        self.bits().encode_to(dest)
    }
}

impl Decode for Capabilities {
    fn decode<I: parity_scale_codec::Input>(
        input: &mut I,
    ) -> Result<Self, parity_scale_codec::Error> {
        let bits = u32::decode(input)?;
        Self::from_bits(bits).ok_or_else(|| "Invalid bits for Capabilities".into())
    }
}

impl Capabilities {
    /// Parses a list of capability names into a bitmask.
    pub fn from_strings(strings: &[String]) -> Result<Self, CoreError> {
        let mut caps = Capabilities::empty();
        for s in strings {
            match s.as_str() {
                "InitiativeCatalog" => caps |= Capabilities::INITIATIVE_CATALOG,
                _ => return Err(CoreError::Config(format!("Unknown capability: {}", s))),
            }
        }
        Ok(caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    #[test]
    fn test_default_params_are_valid() {
        let params = VerificationParams::default();
        assert_eq!(params.quorum_threshold, 2);
        assert_eq!(params.validity_window, 1440);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_unreachable_quorum_is_rejected() {
        let params = VerificationParams {
            quorum_threshold: 11,
            ..Default::default()
        };
        assert!(params.validate().is_err());
        let zero = VerificationParams {
            quorum_threshold: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_capabilities_decode_rejects_unknown_bits() {
        let bytes = codec::to_bytes_canonical(&0b1000u32).unwrap();
        assert!(codec::from_bytes_canonical::<Capabilities>(&bytes).is_err());
        let caps = Capabilities::from_strings(&["InitiativeCatalog".to_string()]).unwrap();
        assert!(caps.contains(Capabilities::INITIATIVE_CATALOG));
        assert!(Capabilities::from_strings(&["OnEndBlock".to_string()]).is_err());
    }
}
