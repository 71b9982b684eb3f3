//! Shared types for the `Microsoft.SecurityInsights` API.

use serde::{Deserialize, Serialize};

/// API version of all `Microsoft.SecurityInsights` requests.
pub(crate) const API_VERSION: &str = "2024-09-01";

azure_mgmt_core::string_enum! {
    /// MITRE ATT&CK tactic associated with a rule or setting.
    pub enum AttackTactic {
        Collection => "Collection",
        CommandAndControl => "CommandAndControl",
        CredentialAccess => "CredentialAccess",
        DefenseEvasion => "DefenseEvasion",
        Discovery => "Discovery",
        Execution => "Execution",
        Exfiltration => "Exfiltration",
        Impact => "Impact",
        ImpairProcessControl => "ImpairProcessControl",
        InhibitResponseFunction => "InhibitResponseFunction",
        InitialAccess => "InitialAccess",
        LateralMovement => "LateralMovement",
        Persistence => "Persistence",
        PreAttack => "PreAttack",
        PrivilegeEscalation => "PrivilegeEscalation",
        Reconnaissance => "Reconnaissance",
        ResourceDevelopment => "ResourceDevelopment",
    }
}

/// A data connector a rule depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityMLAnalyticsSettingsDataSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_types: Option<Vec<String>>,
}
