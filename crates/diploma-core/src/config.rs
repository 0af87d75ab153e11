use serde::{Deserialize, Serialize};

use crate::types::Address;

/// Parameters fixed when a registry is deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// The single admin identity. Cannot be changed after deployment.
    #[serde(default = "default_admin")]
    pub admin: Address,
    /// Buffer size of the event broadcast channel.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_admin() -> Address {
    Address::repeat_byte(0x01)
}
fn default_event_channel_capacity() -> usize {
    256
}

impl DeploymentConfig {
    /// Deployment with the given admin and default settings.
    pub fn with_admin(admin: Address) -> Self {
        Self {
            admin,
            ..Default::default()
        }
    }
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}
