//! Shared types for the `Microsoft.Network` API.

use serde::{Deserialize, Serialize};

/// API version of all `Microsoft.Network` requests.
pub(crate) const API_VERSION: &str = "2023-11-01";

/// Address prefixes in CIDR notation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_prefixes: Option<Vec<String>>,
}

/// A reference to another resource by ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SubResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

/// BGP communities sent over ExpressRoute with traffic from a virtual network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkBgpCommunities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_community: Option<String>,
    pub virtual_network_community: String,
}
