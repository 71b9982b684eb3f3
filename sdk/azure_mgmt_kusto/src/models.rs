//! Shared types for the `Microsoft.Kusto` API.

/// API version of all `Microsoft.Kusto` requests.
pub(crate) const API_VERSION: &str = "2023-08-15";

azure_mgmt_core::string_enum! {
    /// Provisioned state of a Kusto resource.
    pub enum ProvisioningState {
        Canceled => "Canceled",
        Creating => "Creating",
        Deleting => "Deleting",
        Failed => "Failed",
        Moving => "Moving",
        Running => "Running",
        Succeeded => "Succeeded",
    }
}

azure_mgmt_core::string_enum! {
    /// Whether a connection routes to a single database or lets each event pick one.
    pub enum DatabaseRouting {
        Multi => "Multi",
        Single => "Single",
    }
}
