//! Database data connections.
//!
//! A data connection continuously ingests events from an external source into
//! a table of a Kusto database. The source is selected by the connection's
//! `kind`, so [`DataConnection`] is a union with one variant per known kind.

use std::fmt;

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::discriminated::{self, RawModel};
use azure_mgmt_core::error::{ArmResult, OperationContext};
use azure_mgmt_core::paging::Page;
use azure_mgmt_core::polling::{LongRunningResponse, PollerResponse};
use azure_mgmt_core::resource_id::{ParseResult, ResourceId, ResourceIdError, Segment};
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::models::{DatabaseRouting, ProvisioningState, API_VERSION};

// ---------------------------------------------------------------------------
// Resource IDs
// ---------------------------------------------------------------------------

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Kusto/clusters/{clusterName}/databases/{databaseName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub cluster_name: String,
    pub database_name: String,
}

impl DatabaseId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        cluster_name: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            cluster_name: cluster_name.into(),
            database_name: database_name.into(),
        }
    }
}

impl ResourceId for DatabaseId {
    const ID_TYPE: &'static str = "Database";

    fn segments() -> Vec<Segment> {
        vec![
            Segment::static_segment("staticSubscriptions", "subscriptions"),
            Segment::subscription_id("subscriptionId"),
            Segment::static_segment("staticResourceGroups", "resourceGroups"),
            Segment::resource_group("resourceGroupName"),
            Segment::static_segment("staticProviders", "providers"),
            Segment::resource_provider("staticMicrosoftKusto", "Microsoft.Kusto"),
            Segment::static_segment("staticClusters", "clusters"),
            Segment::user_specified("clusterName", "clusterValue"),
            Segment::static_segment("staticDatabases", "databases"),
            Segment::user_specified("databaseName", "databaseValue"),
        ]
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            subscription_id: parsed.get_owned("subscriptionId")?,
            resource_group_name: parsed.get_owned("resourceGroupName")?,
            cluster_name: parsed.get_owned("clusterName")?,
            database_name: parsed.get_owned("databaseName")?,
        })
    }

    fn id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Kusto/clusters/{}/databases/{}",
            self.subscription_id, self.resource_group_name, self.cluster_name, self.database_name
        )
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Kusto/clusters/{clusterName}/databases/{databaseName}/dataConnections/{dataConnectionName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataConnectionId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub cluster_name: String,
    pub database_name: String,
    pub data_connection_name: String,
}

impl DataConnectionId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        cluster_name: impl Into<String>,
        database_name: impl Into<String>,
        data_connection_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            cluster_name: cluster_name.into(),
            database_name: database_name.into(),
            data_connection_name: data_connection_name.into(),
        }
    }

    /// The database this connection ingests into.
    pub fn database(&self) -> DatabaseId {
        DatabaseId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.cluster_name,
            &self.database_name,
        )
    }
}

impl ResourceId for DataConnectionId {
    const ID_TYPE: &'static str = "Data Connection";

    fn segments() -> Vec<Segment> {
        let mut segments = DatabaseId::segments();
        segments.push(Segment::static_segment("staticDataConnections", "dataConnections"));
        segments.push(Segment::user_specified("dataConnectionName", "dataConnectionValue"));
        segments
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            subscription_id: parsed.get_owned("subscriptionId")?,
            resource_group_name: parsed.get_owned("resourceGroupName")?,
            cluster_name: parsed.get_owned("clusterName")?,
            database_name: parsed.get_owned("databaseName")?,
            data_connection_name: parsed.get_owned("dataConnectionName")?,
        })
    }

    fn id(&self) -> String {
        format!("{}/dataConnections/{}", self.database().id(), self.data_connection_name)
    }
}

impl fmt::Display for DataConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

azure_mgmt_core::string_enum! {
    /// Compression of ingested event payloads.
    pub enum Compression {
        GZip => "GZip",
        None => "None",
    }
}

azure_mgmt_core::string_enum! {
    /// Storage event that triggers an Event Grid ingestion.
    pub enum BlobStorageEventType {
        BlobCreated => "Microsoft.Storage.BlobCreated",
        BlobRenamed => "Microsoft.Storage.BlobRenamed",
    }
}

azure_mgmt_core::string_enum! {
    /// Payload format of Event Hub messages.
    pub enum EventHubDataFormat {
        ApacheAvro => "APACHEAVRO",
        Avro => "AVRO",
        Csv => "CSV",
        Json => "JSON",
        MultiJson => "MULTIJSON",
        Orc => "ORC",
        Parquet => "PARQUET",
        Psv => "PSV",
        Raw => "RAW",
        Scsv => "SCSV",
        SingleJson => "SINGLEJSON",
        Sohsv => "SOHSV",
        Tsv => "TSV",
        Tsve => "TSVE",
        Txt => "TXT",
        W3cLogFile => "W3CLOGFILE",
    }
}

azure_mgmt_core::string_enum! {
    /// Payload format of IoT Hub messages.
    pub enum IotHubDataFormat {
        ApacheAvro => "APACHEAVRO",
        Avro => "AVRO",
        Csv => "CSV",
        Json => "JSON",
        MultiJson => "MULTIJSON",
        Orc => "ORC",
        Parquet => "PARQUET",
        Psv => "PSV",
        Raw => "RAW",
        Scsv => "SCSV",
        SingleJson => "SINGLEJSON",
        Sohsv => "SOHSV",
        Tsv => "TSV",
        Tsve => "TSVE",
        Txt => "TXT",
        W3cLogFile => "W3CLOGFILE",
    }
}

azure_mgmt_core::string_enum! {
    /// Format of blobs announced through Event Grid.
    pub enum EventGridDataFormat {
        ApacheAvro => "APACHEAVRO",
        Avro => "AVRO",
        Csv => "CSV",
        Json => "JSON",
        MultiJson => "MULTIJSON",
        Orc => "ORC",
        Parquet => "PARQUET",
        Psv => "PSV",
        Raw => "RAW",
        Scsv => "SCSV",
        SingleJson => "SINGLEJSON",
        Sohsv => "SOHSV",
        Tsv => "TSV",
        Tsve => "TSVE",
        Txt => "TXT",
        W3cLogFile => "W3CLOGFILE",
    }
}

/// The JSON property that selects the data connection variant.
const KIND_FIELD: &str = "kind";

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Ingestion from an Event Hub.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventHubDataConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<EventHubConnectionProperties>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHubConnectionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<Compression>,
    pub consumer_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format: Option<EventHubDataFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_routing: Option<DatabaseRouting>,
    pub event_hub_resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_system_properties: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_identity_object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_identity_resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_rule_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

/// Ingestion from an IoT Hub.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IotHubDataConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IotHubConnectionProperties>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IotHubConnectionProperties {
    pub consumer_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format: Option<IotHubDataFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_routing: Option<DatabaseRouting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_system_properties: Option<Vec<String>>,
    pub iot_hub_resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_rule_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_start_date: Option<String>,
    pub shared_access_policy_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

/// Ingestion of blobs announced by an Event Grid subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventGridDataConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<EventGridConnectionProperties>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGridConnectionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_storage_event_type: Option<BlobStorageEventType>,
    pub consumer_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format: Option<EventGridDataFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_routing: Option<DatabaseRouting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_grid_resource_id: Option<String>,
    pub event_hub_resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_first_record: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_identity_object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_identity_resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_rule_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    pub storage_account_resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

/// Ingestion from the change feed of a Cosmos DB container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CosmosDbDataConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<CosmosDbConnectionProperties>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosDbConnectionProperties {
    pub cosmos_db_account_resource_id: String,
    pub cosmos_db_container: String,
    pub cosmos_db_database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_identity_object_id: Option<String>,
    pub managed_identity_resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_rule_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_start_date: Option<String>,
    pub table_name: String,
}

/// A data connection of any kind.
///
/// Connections whose `kind` is not recognised deserialize into
/// [`DataConnection::Raw`] and serialize back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum DataConnection {
    EventHub(EventHubDataConnection),
    IotHub(IotHubDataConnection),
    EventGrid(EventGridDataConnection),
    CosmosDb(CosmosDbDataConnection),
    Raw(RawModel),
}

impl DataConnection {
    /// The `kind` discriminator of this connection.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::EventHub(_) => Some("EventHub"),
            Self::IotHub(_) => Some("IotHub"),
            Self::EventGrid(_) => Some("EventGrid"),
            Self::CosmosDb(_) => Some("CosmosDb"),
            Self::Raw(raw) => raw.kind(KIND_FIELD),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::EventHub(m) => m.id.as_deref(),
            Self::IotHub(m) => m.id.as_deref(),
            Self::EventGrid(m) => m.id.as_deref(),
            Self::CosmosDb(m) => m.id.as_deref(),
            Self::Raw(raw) => raw.str_field("id"),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::EventHub(m) => m.name.as_deref(),
            Self::IotHub(m) => m.name.as_deref(),
            Self::EventGrid(m) => m.name.as_deref(),
            Self::CosmosDb(m) => m.name.as_deref(),
            Self::Raw(raw) => raw.str_field("name"),
        }
    }

    /// The provisioning state, when the variant is known and reports one.
    pub fn provisioning_state(&self) -> Option<&ProvisioningState> {
        match self {
            Self::EventHub(m) => m.properties.as_ref()?.provisioning_state.as_ref(),
            Self::IotHub(m) => m.properties.as_ref()?.provisioning_state.as_ref(),
            Self::EventGrid(m) => m.properties.as_ref()?.provisioning_state.as_ref(),
            Self::CosmosDb(m) => m.properties.as_ref()?.provisioning_state.as_ref(),
            Self::Raw(_) => None,
        }
    }
}

impl Serialize for DataConnection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            Self::EventHub(m) => discriminated::encode(m, KIND_FIELD, "EventHub"),
            Self::IotHub(m) => discriminated::encode(m, KIND_FIELD, "IotHub"),
            Self::EventGrid(m) => discriminated::encode(m, KIND_FIELD, "EventGrid"),
            Self::CosmosDb(m) => discriminated::encode(m, KIND_FIELD, "CosmosDb"),
            Self::Raw(raw) => return raw.serialize(serializer),
        }
        .map_err(serde::ser::Error::custom)?;

        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataConnection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;

        let decoded = if discriminated::is_kind(&value, KIND_FIELD, "EventHub") {
            discriminated::decode(value).map(Self::EventHub)
        } else if discriminated::is_kind(&value, KIND_FIELD, "IotHub") {
            discriminated::decode(value).map(Self::IotHub)
        } else if discriminated::is_kind(&value, KIND_FIELD, "EventGrid") {
            discriminated::decode(value).map(Self::EventGrid)
        } else if discriminated::is_kind(&value, KIND_FIELD, "CosmosDb") {
            discriminated::decode(value).map(Self::CosmosDb)
        } else {
            discriminated::decode(value).map(Self::Raw)
        };

        decoded.map_err(serde::de::Error::custom)
    }
}

impl From<EventHubDataConnection> for DataConnection {
    fn from(value: EventHubDataConnection) -> Self {
        Self::EventHub(value)
    }
}

impl From<IotHubDataConnection> for DataConnection {
    fn from(value: IotHubDataConnection) -> Self {
        Self::IotHub(value)
    }
}

impl From<EventGridDataConnection> for DataConnection {
    fn from(value: EventGridDataConnection) -> Self {
        Self::EventGrid(value)
    }
}

impl From<CosmosDbDataConnection> for DataConnection {
    fn from(value: CosmosDbDataConnection) -> Self {
        Self::CosmosDb(value)
    }
}

/// The response of [`create_or_update`] and [`update`].
pub type DataConnectionOperationResponse = PollerResponse<DataConnection>;

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// List every data connection of a database.
///
/// The service returns all connections in one response; there is no `nextLink`.
#[tracing::instrument(
    name = "arm::data_connections::list_by_database",
    skip(client, id),
    fields(database_id = %id)
)]
pub async fn list_by_database(client: &ArmClient, id: &DatabaseId) -> ArmResult<Vec<DataConnection>> {
    tracing::debug!("listing data connections");

    let url = client
        .resource_url(
            &format!("{}/dataConnections", id.id()),
            &[("api-version", API_VERSION)],
        )
        .operation("dataconnections.ListByDatabase")?;
    let page: Page<DataConnection> = client
        .get_json(url.as_str())
        .await
        .operation("dataconnections.ListByDatabase")?;

    tracing::debug!(count = page.value.len(), "listed data connections");
    Ok(page.value)
}

/// Get a data connection.
#[tracing::instrument(
    name = "arm::data_connections::get",
    skip(client, id),
    fields(data_connection_id = %id)
)]
pub async fn get(client: &ArmClient, id: &DataConnectionId) -> ArmResult<DataConnection> {
    tracing::debug!("getting data connection");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("dataconnections.Get")?;
    let connection: DataConnection = client
        .get_json(url.as_str())
        .await
        .operation("dataconnections.Get")?;

    tracing::debug!(kind = ?connection.kind(), "data connection fetched");
    Ok(connection)
}

/// Create or replace a data connection. Returns once ARM has accepted the request.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// use azure_mgmt_kusto::data_connections::{
///     self, DataConnectionId, EventHubConnectionProperties, EventHubDataConnection, EventHubDataFormat,
/// };
///
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let id = DataConnectionId::new("sub", "adx-rg", "adxcluster", "telemetry", "from-hub");
/// let connection = EventHubDataConnection {
///     location: Some("westeurope".into()),
///     properties: Some(EventHubConnectionProperties {
///         event_hub_resource_id: "/subscriptions/sub/resourceGroups/adx-rg/providers/Microsoft.EventHub/namespaces/ns/eventhubs/hub".into(),
///         consumer_group: "$Default".into(),
///         table_name: Some("Events".into()),
///         data_format: Some(EventHubDataFormat::Json),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
///
/// data_connections::create_or_update_then_poll(client, &id, &connection.into()).await?;
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    name = "arm::data_connections::create_or_update",
    skip(client, id, input),
    fields(data_connection_id = %id, kind = ?input.kind())
)]
pub async fn create_or_update(
    client: &ArmClient,
    id: &DataConnectionId,
    input: &DataConnection,
) -> ArmResult<DataConnectionOperationResponse> {
    tracing::debug!("creating or updating data connection");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("dataconnections.CreateOrUpdate")?;
    let response = client
        .send_long_running(Method::PUT, url.as_str(), Some(input))
        .await
        .and_then(LongRunningResponse::into_typed::<DataConnection>)
        .operation("dataconnections.CreateOrUpdate")?;

    tracing::debug!(status = response.http_status, "create or update accepted");
    Ok(response)
}

/// Create or replace a data connection and wait for the operation to finish.
#[tracing::instrument(
    name = "arm::data_connections::create_or_update_then_poll",
    skip(client, id, input),
    fields(data_connection_id = %id)
)]
pub async fn create_or_update_then_poll(
    client: &ArmClient,
    id: &DataConnectionId,
    input: &DataConnection,
) -> ArmResult<()> {
    let mut response = create_or_update(client, id, input).await?;
    response
        .poller
        .poll_until_done()
        .await
        .operation("dataconnections.CreateOrUpdate")
}

/// Update a data connection. Returns once ARM has accepted the request.
#[tracing::instrument(
    name = "arm::data_connections::update",
    skip(client, id, input),
    fields(data_connection_id = %id, kind = ?input.kind())
)]
pub async fn update(
    client: &ArmClient,
    id: &DataConnectionId,
    input: &DataConnection,
) -> ArmResult<DataConnectionOperationResponse> {
    tracing::debug!("updating data connection");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("dataconnections.Update")?;
    let response = client
        .send_long_running(Method::PATCH, url.as_str(), Some(input))
        .await
        .and_then(LongRunningResponse::into_typed::<DataConnection>)
        .operation("dataconnections.Update")?;

    tracing::debug!(status = response.http_status, "update accepted");
    Ok(response)
}

/// Update a data connection and wait for the operation to finish.
#[tracing::instrument(
    name = "arm::data_connections::update_then_poll",
    skip(client, id, input),
    fields(data_connection_id = %id)
)]
pub async fn update_then_poll(
    client: &ArmClient,
    id: &DataConnectionId,
    input: &DataConnection,
) -> ArmResult<()> {
    let mut response = update(client, id, input).await?;
    response
        .poller
        .poll_until_done()
        .await
        .operation("dataconnections.Update")
}

/// Delete a data connection. Returns once ARM has accepted the request.
#[tracing::instrument(
    name = "arm::data_connections::delete",
    skip(client, id),
    fields(data_connection_id = %id)
)]
pub async fn delete(client: &ArmClient, id: &DataConnectionId) -> ArmResult<LongRunningResponse> {
    tracing::debug!("deleting data connection");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("dataconnections.Delete")?;
    let response = client
        .send_long_running::<()>(Method::DELETE, url.as_str(), None)
        .await
        .operation("dataconnections.Delete")?;

    tracing::debug!(status = response.status, "delete accepted");
    Ok(response)
}

/// Delete a data connection and wait for the operation to finish.
#[tracing::instrument(
    name = "arm::data_connections::delete_then_poll",
    skip(client, id),
    fields(data_connection_id = %id)
)]
pub async fn delete_then_poll(client: &ArmClient, id: &DataConnectionId) -> ArmResult<()> {
    let mut response = delete(client, id).await?;
    response
        .poller
        .poll_until_done()
        .await
        .operation("dataconnections.Delete")
}
