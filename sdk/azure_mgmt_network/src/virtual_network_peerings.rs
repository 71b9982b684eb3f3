//! Virtual network peerings.
//!
//! A peering connects two virtual networks so that resources in either can
//! reach each other over the Azure backbone. Peerings are child resources of
//! the local virtual network; each side of a connection has its own peering.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_network::models::SubResource;
//! use azure_mgmt_network::virtual_network_peerings::{
//!     self, CreateOrUpdateOperationOptions, VirtualNetworkPeering,
//!     VirtualNetworkPeeringId, VirtualNetworkPeeringPropertiesFormat,
//! };
//!
//! # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
//! let id = VirtualNetworkPeeringId::new("sub", "network-rg", "hub", "hub-to-spoke");
//! let peering = VirtualNetworkPeering {
//!     properties: Some(VirtualNetworkPeeringPropertiesFormat {
//!         allow_virtual_network_access: Some(true),
//!         remote_virtual_network: Some(SubResource::new(
//!             "/subscriptions/sub/resourceGroups/network-rg/providers/Microsoft.Network/virtualNetworks/spoke",
//!         )),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! virtual_network_peerings::create_or_update_then_poll(
//!     client,
//!     &id,
//!     &peering,
//!     CreateOrUpdateOperationOptions::default(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::{ArmResult, OperationContext};
use azure_mgmt_core::paging::{self, Page};
use azure_mgmt_core::polling::{LongRunningResponse, PollerResponse};
use azure_mgmt_core::resource_id::{ParseResult, ResourceId, ResourceIdError, Segment};
use futures::stream::{Stream, TryStreamExt};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::{AddressSpace, SubResource, VirtualNetworkBgpCommunities, API_VERSION};

// ---------------------------------------------------------------------------
// Resource IDs
// ---------------------------------------------------------------------------

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualNetworks/{virtualNetworkName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualNetworkId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub virtual_network_name: String,
}

impl VirtualNetworkId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        virtual_network_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            virtual_network_name: virtual_network_name.into(),
        }
    }
}

impl ResourceId for VirtualNetworkId {
    const ID_TYPE: &'static str = "Virtual Network";

    fn segments() -> Vec<Segment> {
        vec![
            Segment::static_segment("staticSubscriptions", "subscriptions"),
            Segment::subscription_id("subscriptionId"),
            Segment::static_segment("staticResourceGroups", "resourceGroups"),
            Segment::resource_group("resourceGroupName"),
            Segment::static_segment("staticProviders", "providers"),
            Segment::resource_provider("staticMicrosoftNetwork", "Microsoft.Network"),
            Segment::static_segment("staticVirtualNetworks", "virtualNetworks"),
            Segment::user_specified("virtualNetworkName", "virtualNetworkValue"),
        ]
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            subscription_id: parsed.get_owned("subscriptionId")?,
            resource_group_name: parsed.get_owned("resourceGroupName")?,
            virtual_network_name: parsed.get_owned("virtualNetworkName")?,
        })
    }

    fn id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/virtualNetworks/{}",
            self.subscription_id, self.resource_group_name, self.virtual_network_name
        )
    }
}

impl fmt::Display for VirtualNetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualNetworks/{virtualNetworkName}/virtualNetworkPeerings/{virtualNetworkPeeringName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualNetworkPeeringId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub virtual_network_name: String,
    pub virtual_network_peering_name: String,
}

impl VirtualNetworkPeeringId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        virtual_network_name: impl Into<String>,
        virtual_network_peering_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            virtual_network_name: virtual_network_name.into(),
            virtual_network_peering_name: virtual_network_peering_name.into(),
        }
    }

    /// The virtual network this peering belongs to.
    pub fn virtual_network(&self) -> VirtualNetworkId {
        VirtualNetworkId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.virtual_network_name,
        )
    }
}

impl ResourceId for VirtualNetworkPeeringId {
    const ID_TYPE: &'static str = "Virtual Network Peering";

    fn segments() -> Vec<Segment> {
        let mut segments = VirtualNetworkId::segments();
        segments.push(Segment::static_segment(
            "staticVirtualNetworkPeerings",
            "virtualNetworkPeerings",
        ));
        segments.push(Segment::user_specified(
            "virtualNetworkPeeringName",
            "virtualNetworkPeeringValue",
        ));
        segments
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            subscription_id: parsed.get_owned("subscriptionId")?,
            resource_group_name: parsed.get_owned("resourceGroupName")?,
            virtual_network_name: parsed.get_owned("virtualNetworkName")?,
            virtual_network_peering_name: parsed.get_owned("virtualNetworkPeeringName")?,
        })
    }

    fn id(&self) -> String {
        format!(
            "{}/virtualNetworkPeerings/{}",
            self.virtual_network().id(),
            self.virtual_network_peering_name
        )
    }
}

impl fmt::Display for VirtualNetworkPeeringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

azure_mgmt_core::string_enum! {
    /// Provisioning state of a network resource.
    pub enum ProvisioningState {
        Deleting => "Deleting",
        Failed => "Failed",
        Succeeded => "Succeeded",
        Updating => "Updating",
    }
}

azure_mgmt_core::string_enum! {
    /// Whether unencrypted traffic is allowed into an encrypted network.
    pub enum VirtualNetworkEncryptionEnforcement {
        AllowUnencrypted => "AllowUnencrypted",
        DropUnencrypted => "DropUnencrypted",
    }
}

azure_mgmt_core::string_enum! {
    /// Sync level of the peering with the remote virtual network's address space.
    pub enum VirtualNetworkPeeringLevel {
        FullyInSync => "FullyInSync",
        LocalAndRemoteNotInSync => "LocalAndRemoteNotInSync",
        LocalNotInSync => "LocalNotInSync",
        RemoteNotInSync => "RemoteNotInSync",
    }
}

azure_mgmt_core::string_enum! {
    /// Connection state of a peering.
    pub enum VirtualNetworkPeeringState {
        Connected => "Connected",
        Disconnected => "Disconnected",
        Initiated => "Initiated",
    }
}

azure_mgmt_core::string_enum! {
    /// Request that the peering resync the remote address space.
    pub enum SyncRemoteAddressSpace {
        True => "true",
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Encryption settings of a virtual network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualNetworkEncryption {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforcement: Option<VirtualNetworkEncryptionEnforcement>,
}

/// Peerings in a virtual network resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualNetworkPeering {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<VirtualNetworkPeeringPropertiesFormat>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// Properties of a virtual network peering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkPeeringPropertiesFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_forwarded_traffic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_gateway_transit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_virtual_network_access: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_verify_remote_gateways: Option<bool>,
    #[serde(rename = "enableOnlyIPv6Peering", skip_serializing_if = "Option::is_none")]
    pub enable_only_ipv6_peering: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_address_space: Option<AddressSpace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_subnet_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_virtual_network_address_space: Option<AddressSpace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_complete_vnets: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peering_state: Option<VirtualNetworkPeeringState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peering_sync_level: Option<VirtualNetworkPeeringLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_address_space: Option<AddressSpace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_bgp_communities: Option<VirtualNetworkBgpCommunities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_subnet_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_virtual_network: Option<SubResource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_virtual_network_address_space: Option<AddressSpace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_virtual_network_encryption: Option<VirtualNetworkEncryption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_remote_gateways: Option<bool>,
}

/// Filter for [`list_complete_matching_predicate`]. Unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct VirtualNetworkPeeringOperationPredicate {
    pub etag: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub resource_type: Option<String>,
}

impl VirtualNetworkPeeringOperationPredicate {
    pub fn matches(&self, input: &VirtualNetworkPeering) -> bool {
        field_matches(&self.etag, &input.etag)
            && field_matches(&self.id, &input.id)
            && field_matches(&self.name, &input.name)
            && field_matches(&self.resource_type, &input.resource_type)
    }
}

fn list_url(client: &ArmClient, id: &VirtualNetworkId) -> ArmResult<Url> {
    client.resource_url(
        &format!("{}/virtualNetworkPeerings", id.id()),
        &[("api-version", API_VERSION)],
    )
}

fn field_matches(expected: &Option<String>, actual: &Option<String>) -> bool {
    expected.is_none() || expected == actual
}

/// Options for [`create_or_update`].
#[derive(Debug, Clone, Default)]
pub struct CreateOrUpdateOperationOptions {
    /// Sync the peering with the current address space of the remote network.
    pub sync_remote_address_space: Option<SyncRemoteAddressSpace>,
}

impl CreateOrUpdateOperationOptions {
    fn query(&self) -> Vec<(&'static str, &str)> {
        let mut query = vec![("api-version", API_VERSION)];
        if let Some(sync) = &self.sync_remote_address_space {
            query.push(("syncRemoteAddressSpace", sync.as_str()));
        }
        query
    }
}

/// The response of [`create_or_update`].
pub type CreateOrUpdateOperationResponse = PollerResponse<VirtualNetworkPeering>;

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Fetch the first page of peerings in a virtual network.
///
/// Use [`list_pages`] or [`list_complete`] to follow `nextLink`.
#[tracing::instrument(
    name = "arm::virtual_network_peerings::list",
    skip(client, id),
    fields(virtual_network_id = %id)
)]
pub async fn list(client: &ArmClient, id: &VirtualNetworkId) -> ArmResult<Page<VirtualNetworkPeering>> {
    tracing::debug!("listing virtual network peerings");

    let url = list_url(client, id).operation("virtualnetworkpeerings.List")?;
    paging::get_page(client, url.as_str())
        .await
        .operation("virtualnetworkpeerings.List")
}

/// Stream every page of peerings in a virtual network.
#[tracing::instrument(
    name = "arm::virtual_network_peerings::list_pages",
    skip(client, id),
    fields(virtual_network_id = %id)
)]
pub fn list_pages<'a>(
    client: &'a ArmClient,
    id: &VirtualNetworkId,
) -> impl Stream<Item = ArmResult<Page<VirtualNetworkPeering>>> + 'a {
    tracing::debug!("streaming virtual network peerings");
    paging::pages(client, list_url(client, id)).map_err(|e| e.with_operation("virtualnetworkpeerings.List"))
}

/// List every peering in a virtual network.
#[tracing::instrument(
    name = "arm::virtual_network_peerings::list_complete",
    skip(client, id),
    fields(virtual_network_id = %id)
)]
pub async fn list_complete(
    client: &ArmClient,
    id: &VirtualNetworkId,
) -> ArmResult<Vec<VirtualNetworkPeering>> {
    list_complete_matching_predicate(client, id, VirtualNetworkPeeringOperationPredicate::default())
        .await
}

/// List every peering in a virtual network that matches `predicate`.
#[tracing::instrument(
    name = "arm::virtual_network_peerings::list_complete_matching_predicate",
    skip(client, id, predicate),
    fields(virtual_network_id = %id)
)]
pub async fn list_complete_matching_predicate(
    client: &ArmClient,
    id: &VirtualNetworkId,
    predicate: VirtualNetworkPeeringOperationPredicate,
) -> ArmResult<Vec<VirtualNetworkPeering>> {
    let url = list_url(client, id).operation("virtualnetworkpeerings.ListComplete")?;
    let items = paging::collect_matching(client, url, |item| predicate.matches(item))
        .await
        .operation("virtualnetworkpeerings.ListComplete")?;

    tracing::debug!(count = items.len(), "listed virtual network peerings");
    Ok(items)
}

/// Get a peering.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_core::resource_id::ResourceId;
/// # use azure_mgmt_network::virtual_network_peerings::{self, VirtualNetworkPeeringId};
/// # async fn example(client: &ArmClient) -> Result<(), Box<dyn std::error::Error>> {
/// let id = VirtualNetworkPeeringId::parse_insensitively(
///     "/subscriptions/sub/resourcegroups/rg/providers/microsoft.network/virtualnetworks/hub/virtualnetworkpeerings/to-spoke",
/// )?;
/// let peering = virtual_network_peerings::get(client, &id).await?;
/// println!("{:?}", peering.properties.and_then(|p| p.peering_state));
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    name = "arm::virtual_network_peerings::get",
    skip(client, id),
    fields(peering_id = %id)
)]
pub async fn get(client: &ArmClient, id: &VirtualNetworkPeeringId) -> ArmResult<VirtualNetworkPeering> {
    tracing::debug!("getting virtual network peering");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("virtualnetworkpeerings.Get")?;
    let peering: VirtualNetworkPeering = client
        .get_json(url.as_str())
        .await
        .operation("virtualnetworkpeerings.Get")?;

    tracing::debug!(name = ?peering.name, "virtual network peering fetched");
    Ok(peering)
}

/// Create or update a peering. Returns once ARM has accepted the request.
#[tracing::instrument(
    name = "arm::virtual_network_peerings::create_or_update",
    skip(client, id, input, options),
    fields(peering_id = %id)
)]
pub async fn create_or_update(
    client: &ArmClient,
    id: &VirtualNetworkPeeringId,
    input: &VirtualNetworkPeering,
    options: CreateOrUpdateOperationOptions,
) -> ArmResult<CreateOrUpdateOperationResponse> {
    tracing::debug!("creating or updating virtual network peering");

    let url = client
        .resource_url(&id.id(), &options.query())
        .operation("virtualnetworkpeerings.CreateOrUpdate")?;
    let response = client
        .send_long_running(Method::PUT, url.as_str(), Some(input))
        .await
        .and_then(LongRunningResponse::into_typed::<VirtualNetworkPeering>)
        .operation("virtualnetworkpeerings.CreateOrUpdate")?;

    tracing::debug!(status = response.http_status, "create or update accepted");
    Ok(response)
}

/// Create or update a peering and wait for the operation to finish.
#[tracing::instrument(
    name = "arm::virtual_network_peerings::create_or_update_then_poll",
    skip(client, id, input, options),
    fields(peering_id = %id)
)]
pub async fn create_or_update_then_poll(
    client: &ArmClient,
    id: &VirtualNetworkPeeringId,
    input: &VirtualNetworkPeering,
    options: CreateOrUpdateOperationOptions,
) -> ArmResult<()> {
    let mut response = create_or_update(client, id, input, options).await?;
    response
        .poller
        .poll_until_done()
        .await
        .operation("virtualnetworkpeerings.CreateOrUpdate")
}

/// Delete a peering. Returns once ARM has accepted the request.
#[tracing::instrument(
    name = "arm::virtual_network_peerings::delete",
    skip(client, id),
    fields(peering_id = %id)
)]
pub async fn delete(client: &ArmClient, id: &VirtualNetworkPeeringId) -> ArmResult<LongRunningResponse> {
    tracing::debug!("deleting virtual network peering");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("virtualnetworkpeerings.Delete")?;
    let response = client
        .send_long_running::<()>(Method::DELETE, url.as_str(), None)
        .await
        .operation("virtualnetworkpeerings.Delete")?;

    tracing::debug!(status = response.status, "delete accepted");
    Ok(response)
}

/// Delete a peering and wait for the operation to finish.
#[tracing::instrument(
    name = "arm::virtual_network_peerings::delete_then_poll",
    skip(client, id),
    fields(peering_id = %id)
)]
pub async fn delete_then_poll(client: &ArmClient, id: &VirtualNetworkPeeringId) -> ArmResult<()> {
    let mut response = delete(client, id).await?;
    response
        .poller
        .poll_until_done()
        .await
        .operation("virtualnetworkpeerings.Delete")
}
