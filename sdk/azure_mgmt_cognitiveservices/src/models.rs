//! Shared types for the `Microsoft.CognitiveServices` API.

use serde::{Deserialize, Serialize};

/// API version of all `Microsoft.CognitiveServices` requests.
pub(crate) const API_VERSION: &str = "2023-05-01";

azure_mgmt_core::string_enum! {
    /// Pricing tier of a SKU.
    pub enum SkuTier {
        Basic => "Basic",
        Enterprise => "Enterprise",
        Free => "Free",
        Premium => "Premium",
        Standard => "Standard",
    }
}

/// The resource model definition representing a SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<SkuTier>,
}

impl Sku {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
