//! Security ML analytics settings.
//!
//! Each Microsoft Sentinel workspace carries one setting per built-in
//! machine learning analytics rule. Settings are extension resources: their
//! IDs nest a second `providers` segment under the Log Analytics workspace.

use std::fmt;

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::discriminated::{self, RawModel};
use azure_mgmt_core::error::{ArmError, ArmResult, OperationContext};
use azure_mgmt_core::models::{format_time, parse_time, SystemData};
use azure_mgmt_core::paging::{self, Page};
use azure_mgmt_core::resource_id::{ParseResult, ResourceId, ResourceIdError, Segment};
use chrono::{DateTime, FixedOffset};
use futures::stream::{Stream, TryStreamExt};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use url::Url;

use crate::models::{AttackTactic, SecurityMLAnalyticsSettingsDataSource, API_VERSION};

// ---------------------------------------------------------------------------
// Resource IDs
// ---------------------------------------------------------------------------

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.OperationalInsights/workspaces/{workspaceName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub workspace_name: String,
}

impl WorkspaceId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        workspace_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            workspace_name: workspace_name.into(),
        }
    }
}

impl ResourceId for WorkspaceId {
    const ID_TYPE: &'static str = "Workspace";

    fn segments() -> Vec<Segment> {
        vec![
            Segment::static_segment("staticSubscriptions", "subscriptions"),
            Segment::subscription_id("subscriptionId"),
            Segment::static_segment("staticResourceGroups", "resourceGroups"),
            Segment::resource_group("resourceGroupName"),
            Segment::static_segment("staticProviders", "providers"),
            Segment::resource_provider(
                "staticMicrosoftOperationalInsights",
                "Microsoft.OperationalInsights",
            ),
            Segment::static_segment("staticWorkspaces", "workspaces"),
            Segment::user_specified("workspaceName", "workspaceValue"),
        ]
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            subscription_id: parsed.get_owned("subscriptionId")?,
            resource_group_name: parsed.get_owned("resourceGroupName")?,
            workspace_name: parsed.get_owned("workspaceName")?,
        })
    }

    fn id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.OperationalInsights/workspaces/{}",
            self.subscription_id, self.resource_group_name, self.workspace_name
        )
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.OperationalInsights/workspaces/{workspaceName}/providers/Microsoft.SecurityInsights/securityMLAnalyticsSettings/{settingsResourceName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityMLAnalyticsSettingId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub workspace_name: String,
    pub settings_resource_name: String,
}

impl SecurityMLAnalyticsSettingId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        workspace_name: impl Into<String>,
        settings_resource_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            workspace_name: workspace_name.into(),
            settings_resource_name: settings_resource_name.into(),
        }
    }

    /// The Sentinel workspace this setting belongs to.
    pub fn workspace(&self) -> WorkspaceId {
        WorkspaceId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.workspace_name,
        )
    }
}

impl ResourceId for SecurityMLAnalyticsSettingId {
    const ID_TYPE: &'static str = "Security ML Analytics Setting";

    fn segments() -> Vec<Segment> {
        let mut segments = WorkspaceId::segments();
        segments.extend([
            Segment::static_segment("staticProviders2", "providers"),
            Segment::resource_provider(
                "staticMicrosoftSecurityInsights",
                "Microsoft.SecurityInsights",
            ),
            Segment::static_segment(
                "staticSecurityMLAnalyticsSettings",
                "securityMLAnalyticsSettings",
            ),
            Segment::user_specified("settingsResourceName", "settingsResourceValue"),
        ]);
        segments
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            subscription_id: parsed.get_owned("subscriptionId")?,
            resource_group_name: parsed.get_owned("resourceGroupName")?,
            workspace_name: parsed.get_owned("workspaceName")?,
            settings_resource_name: parsed.get_owned("settingsResourceName")?,
        })
    }

    fn id(&self) -> String {
        format!(
            "{}/providers/Microsoft.SecurityInsights/securityMLAnalyticsSettings/{}",
            self.workspace().id(),
            self.settings_resource_name
        )
    }
}

impl fmt::Display for SecurityMLAnalyticsSettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

azure_mgmt_core::string_enum! {
    /// Whether an anomaly rule runs in production or in flighting (shadow) mode.
    pub enum SettingsStatus {
        Flighting => "Flighting",
        Production => "Production",
    }
}

const KIND_FIELD: &str = "kind";

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Settings of a built-in anomaly detection rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalySecurityMLAnalyticsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<AnomalySecurityMLAnalyticsSettingsProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalySecurityMLAnalyticsSettingsProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly_settings_version: Option<i64>,
    pub anomaly_version: String,
    /// Rule-specific tuning knobs; the shape differs per rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customizable_observations: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub display_name: String,
    pub enabled: bool,
    /// ISO 8601 duration, e.g. `PT1H`.
    pub frequency: String,
    pub is_default_settings: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_utc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_data_connectors: Option<Vec<SecurityMLAnalyticsSettingsDataSource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_definition_id: Option<String>,
    pub settings_status: SettingsStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tactics: Option<Vec<AttackTactic>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub techniques: Option<Vec<String>>,
}

impl AnomalySecurityMLAnalyticsSettingsProperties {
    /// Properties carrying the fields the service requires.
    pub fn new(
        anomaly_version: impl Into<String>,
        display_name: impl Into<String>,
        enabled: bool,
        frequency: impl Into<String>,
        is_default_settings: bool,
        settings_status: SettingsStatus,
    ) -> Self {
        Self {
            anomaly_settings_version: None,
            anomaly_version: anomaly_version.into(),
            customizable_observations: None,
            description: None,
            display_name: display_name.into(),
            enabled,
            frequency: frequency.into(),
            is_default_settings,
            last_modified_utc: None,
            required_data_connectors: None,
            settings_definition_id: None,
            settings_status,
            tactics: None,
            techniques: None,
        }
    }

    pub fn last_modified_utc_as_time(&self) -> Option<DateTime<FixedOffset>> {
        parse_time(self.last_modified_utc.as_deref())
    }

    pub fn set_last_modified_utc_as_time(&mut self, value: DateTime<FixedOffset>) {
        self.last_modified_utc = Some(format_time(&value));
    }
}

/// A Security ML analytics setting of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SecurityMLAnalyticsSetting {
    Anomaly(AnomalySecurityMLAnalyticsSettings),
    Raw(RawModel),
}

impl SecurityMLAnalyticsSetting {
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Anomaly(_) => Some("Anomaly"),
            Self::Raw(raw) => raw.kind(KIND_FIELD),
        }
    }

    pub fn etag(&self) -> Option<&str> {
        match self {
            Self::Anomaly(m) => m.etag.as_deref(),
            Self::Raw(raw) => raw.str_field("etag"),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Anomaly(m) => m.id.as_deref(),
            Self::Raw(raw) => raw.str_field("id"),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Anomaly(m) => m.name.as_deref(),
            Self::Raw(raw) => raw.str_field("name"),
        }
    }

    pub fn resource_type(&self) -> Option<&str> {
        match self {
            Self::Anomaly(m) => m.resource_type.as_deref(),
            Self::Raw(raw) => raw.str_field("type"),
        }
    }
}

impl Serialize for SecurityMLAnalyticsSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Anomaly(m) => discriminated::encode(m, KIND_FIELD, "Anomaly")
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer),
            Self::Raw(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SecurityMLAnalyticsSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;

        let decoded = if discriminated::is_kind(&value, KIND_FIELD, "Anomaly") {
            discriminated::decode(value).map(Self::Anomaly)
        } else {
            discriminated::decode(value).map(Self::Raw)
        };

        decoded.map_err(serde::de::Error::custom)
    }
}

impl From<AnomalySecurityMLAnalyticsSettings> for SecurityMLAnalyticsSetting {
    fn from(value: AnomalySecurityMLAnalyticsSettings) -> Self {
        Self::Anomaly(value)
    }
}

/// Filter for [`list_complete_matching_predicate`]. Unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct SecurityMLAnalyticsSettingOperationPredicate {
    pub etag: Option<String>,
    pub id: Option<String>,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub resource_type: Option<String>,
}

impl SecurityMLAnalyticsSettingOperationPredicate {
    pub fn matches(&self, input: &SecurityMLAnalyticsSetting) -> bool {
        let field = |expected: &Option<String>, actual: Option<&str>| {
            expected.as_deref().is_none_or(|e| Some(e) == actual)
        };

        field(&self.etag, input.etag())
            && field(&self.id, input.id())
            && field(&self.kind, input.kind())
            && field(&self.name, input.name())
            && field(&self.resource_type, input.resource_type())
    }
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

fn list_url(client: &ArmClient, id: &WorkspaceId) -> ArmResult<Url> {
    client.resource_url(
        &format!(
            "{}/providers/Microsoft.SecurityInsights/securityMLAnalyticsSettings",
            id.id()
        ),
        &[("api-version", API_VERSION)],
    )
}

/// Fetch the first page of settings of a workspace.
#[tracing::instrument(
    name = "arm::security_ml_analytics_settings::list",
    skip(client, id),
    fields(workspace_id = %id)
)]
pub async fn list(client: &ArmClient, id: &WorkspaceId) -> ArmResult<Page<SecurityMLAnalyticsSetting>> {
    tracing::debug!("listing security ML analytics settings");
    let url = list_url(client, id).operation("securitymlanalyticssettings.List")?;
    paging::get_page(client, url.as_str())
        .await
        .operation("securitymlanalyticssettings.List")
}

/// Stream every page of settings of a workspace.
#[tracing::instrument(
    name = "arm::security_ml_analytics_settings::list_pages",
    skip(client, id),
    fields(workspace_id = %id)
)]
pub fn list_pages<'a>(
    client: &'a ArmClient,
    id: &WorkspaceId,
) -> impl Stream<Item = ArmResult<Page<SecurityMLAnalyticsSetting>>> + 'a {
    tracing::debug!("streaming security ML analytics settings");
    paging::pages(client, list_url(client, id))
        .map_err(|e| e.with_operation("securitymlanalyticssettings.List"))
}

/// List every setting of a workspace.
#[tracing::instrument(
    name = "arm::security_ml_analytics_settings::list_complete",
    skip(client, id),
    fields(workspace_id = %id)
)]
pub async fn list_complete(
    client: &ArmClient,
    id: &WorkspaceId,
) -> ArmResult<Vec<SecurityMLAnalyticsSetting>> {
    list_complete_matching_predicate(
        client,
        id,
        SecurityMLAnalyticsSettingOperationPredicate::default(),
    )
    .await
}

/// List every setting of a workspace that matches `predicate`.
#[tracing::instrument(
    name = "arm::security_ml_analytics_settings::list_complete_matching_predicate",
    skip(client, id, predicate),
    fields(workspace_id = %id)
)]
pub async fn list_complete_matching_predicate(
    client: &ArmClient,
    id: &WorkspaceId,
    predicate: SecurityMLAnalyticsSettingOperationPredicate,
) -> ArmResult<Vec<SecurityMLAnalyticsSetting>> {
    let url = list_url(client, id).operation("securitymlanalyticssettings.ListComplete")?;
    let items = paging::collect_matching(client, url, |item| predicate.matches(item))
        .await
        .operation("securitymlanalyticssettings.ListComplete")?;

    tracing::debug!(count = items.len(), "listed security ML analytics settings");
    Ok(items)
}

/// Get a setting.
#[tracing::instrument(
    name = "arm::security_ml_analytics_settings::get",
    skip(client, id),
    fields(setting_id = %id)
)]
pub async fn get(
    client: &ArmClient,
    id: &SecurityMLAnalyticsSettingId,
) -> ArmResult<SecurityMLAnalyticsSetting> {
    tracing::debug!("getting security ML analytics setting");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("securitymlanalyticssettings.Get")?;
    let setting: SecurityMLAnalyticsSetting = client
        .get_json(url.as_str())
        .await
        .operation("securitymlanalyticssettings.Get")?;

    tracing::debug!(kind = ?setting.kind(), "security ML analytics setting fetched");
    Ok(setting)
}

/// Create or replace a setting.
///
/// This is a synchronous PUT: the returned setting is the stored state.
#[tracing::instrument(
    name = "arm::security_ml_analytics_settings::create_or_update",
    skip(client, id, input),
    fields(setting_id = %id, kind = ?input.kind())
)]
pub async fn create_or_update(
    client: &ArmClient,
    id: &SecurityMLAnalyticsSettingId,
    input: &SecurityMLAnalyticsSetting,
) -> ArmResult<SecurityMLAnalyticsSetting> {
    tracing::debug!("creating or updating security ML analytics setting");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("securitymlanalyticssettings.CreateOrUpdate")?;
    let response = client
        .put(url.as_str(), input)
        .await
        .operation("securitymlanalyticssettings.CreateOrUpdate")?;
    let result = response
        .json::<SecurityMLAnalyticsSetting>()
        .await
        .map_err(ArmError::from)
        .operation("securitymlanalyticssettings.CreateOrUpdate")?;

    tracing::debug!("security ML analytics setting stored");
    Ok(result)
}

/// Delete a setting. Deleting a setting that does not exist succeeds.
#[tracing::instrument(
    name = "arm::security_ml_analytics_settings::delete",
    skip(client, id),
    fields(setting_id = %id)
)]
pub async fn delete(client: &ArmClient, id: &SecurityMLAnalyticsSettingId) -> ArmResult<()> {
    tracing::debug!("deleting security ML analytics setting");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("securitymlanalyticssettings.Delete")?;
    let response = client
        .delete(url.as_str())
        .await
        .operation("securitymlanalyticssettings.Delete")?;

    tracing::debug!(status = response.status().as_u16(), "security ML analytics setting deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_client, TEST_SUBSCRIPTION};
    use azure_mgmt_core::resource_id::validate_segments;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SETTING: &str = "f209187f-1d17-4431-94af-c141bf5f23db";

    fn workspace_id() -> WorkspaceId {
        WorkspaceId::new(TEST_SUBSCRIPTION, "sentinel-rg", "sentinel-ws")
    }

    fn setting_id() -> SecurityMLAnalyticsSettingId {
        SecurityMLAnalyticsSettingId::new(TEST_SUBSCRIPTION, "sentinel-rg", "sentinel-ws", SETTING)
    }

    fn anomaly_json(name: &str, enabled: bool) -> Value {
        json!({
            "id": format!("{}/providers/Microsoft.SecurityInsights/securityMLAnalyticsSettings/{name}", workspace_id().id()),
            "name": name,
            "type": "Microsoft.SecurityInsights/securityMLAnalyticsSettings",
            "etag": "\"260090e2-0000-0d00-0000-5d6fb8670000\"",
            "kind": "Anomaly",
            "properties": {
                "anomalyVersion": "1.0.5",
                "anomalySettingsVersion": 0,
                "customizableObservations": {"multiSelectObservations": null},
                "description": "Detects unusual sign-in locations.",
                "displayName": "Anomalous sign-in location",
                "enabled": enabled,
                "frequency": "PT1H",
                "isDefaultSettings": true,
                "lastModifiedUtc": "2024-03-05T12:15:00Z",
                "requiredDataConnectors": [
                    {"connectorId": "AzureActiveDirectory", "dataTypes": ["SigninLogs"]}
                ],
                "settingsDefinitionId": "f209187f-1d17-4431-94af-c141bf5f23db",
                "settingsStatus": "Production",
                "tactics": ["InitialAccess"],
                "techniques": ["T1078"]
            }
        })
    }

    // --- Resource IDs ---

    #[test]
    fn test_setting_id_round_trip() {
        let id = setting_id();
        assert_eq!(
            id.id(),
            format!(
                "/subscriptions/{TEST_SUBSCRIPTION}/resourceGroups/sentinel-rg/providers/Microsoft.OperationalInsights/workspaces/sentinel-ws/providers/Microsoft.SecurityInsights/securityMLAnalyticsSettings/{SETTING}"
            )
        );
        assert_eq!(SecurityMLAnalyticsSettingId::parse(&id.id()).unwrap(), id);
        assert_eq!(id.workspace(), workspace_id());
        assert_eq!(WorkspaceId::parse(&workspace_id().id()).unwrap(), workspace_id());
    }

    #[test]
    fn test_setting_id_casing() {
        let lower = workspace_id().id().to_lowercase()
            + "/PROVIDERS/microsoft.securityinsights/securitymlanalyticssettings/MySetting";

        assert!(SecurityMLAnalyticsSettingId::parse(&lower).is_err());

        let id = SecurityMLAnalyticsSettingId::parse_insensitively(&lower).expect("should parse");
        assert_eq!(id.settings_resource_name, "MySetting");
        assert_eq!(id.workspace_name, "sentinel-ws");
        assert!(id
            .id()
            .contains("/providers/Microsoft.SecurityInsights/securityMLAnalyticsSettings/MySetting"));
    }

    #[test]
    fn test_ids_reject_malformed_input() {
        let workspace = workspace_id().id();
        let setting = setting_id().id();

        for input in [
            String::new(),
            workspace.clone(),
            format!("{workspace}/providers/Microsoft.SecurityInsights/securityMLAnalyticsSettings"),
            format!("{setting}/extra"),
        ] {
            assert!(SecurityMLAnalyticsSettingId::parse(&input).is_err(), "{input:?}");
            assert!(SecurityMLAnalyticsSettingId::parse_insensitively(&input).is_err(), "{input:?}");
        }
        assert!(WorkspaceId::parse(&setting).is_err());
    }

    #[test]
    fn test_both_providers_segments_have_unique_names() {
        let segments = SecurityMLAnalyticsSettingId::segments();
        assert!(validate_segments(SecurityMLAnalyticsSettingId::ID_TYPE, &segments).is_ok());
        assert!(validate_segments(WorkspaceId::ID_TYPE, &WorkspaceId::segments()).is_ok());
    }

    // --- Models ---

    #[test]
    fn test_anomaly_setting_deserialization() {
        let setting: SecurityMLAnalyticsSetting =
            serde_json::from_value(anomaly_json(SETTING, true)).unwrap();

        let SecurityMLAnalyticsSetting::Anomaly(anomaly) = &setting else {
            panic!("expected an anomaly setting, got {setting:?}");
        };
        let properties = anomaly.properties.as_ref().expect("properties");
        assert!(properties.enabled);
        assert_eq!(properties.settings_status, SettingsStatus::Production);
        assert_eq!(properties.tactics.as_deref(), Some(&[AttackTactic::InitialAccess][..]));
        assert_eq!(
            properties.required_data_connectors.as_ref().map(Vec::len),
            Some(1)
        );
        assert_eq!(
            properties.last_modified_utc_as_time().map(|t| t.to_rfc3339()),
            Some("2024-03-05T12:15:00+00:00".to_string())
        );
        assert_eq!(setting.kind(), Some("Anomaly"));
    }

    #[test]
    fn test_unknown_kind_round_trips() {
        let value = json!({"name": "x", "kind": "Behavioral", "properties": {"threshold": 3}});

        let setting: SecurityMLAnalyticsSetting = serde_json::from_value(value.clone()).unwrap();
        assert!(matches!(setting, SecurityMLAnalyticsSetting::Raw(_)));
        assert_eq!(setting.kind(), Some("Behavioral"));
        assert_eq!(serde_json::to_value(&setting).unwrap(), value);
    }

    #[test]
    fn test_serialization_writes_kind() {
        let setting: SecurityMLAnalyticsSetting = AnomalySecurityMLAnalyticsSettings {
            properties: Some(AnomalySecurityMLAnalyticsSettingsProperties::new(
                "1.0.5",
                "Anomalous sign-in location",
                false,
                "PT1H",
                false,
                SettingsStatus::Flighting,
            )),
            ..Default::default()
        }
        .into();

        let value = serde_json::to_value(&setting).unwrap();
        assert_eq!(value["kind"], "Anomaly");
        assert_eq!(value["properties"]["settingsStatus"], "Flighting");
        assert_eq!(value["properties"]["enabled"], false);
    }

    #[test]
    fn test_settings_status_is_required_and_lenient() {
        let mut properties = anomaly_json(SETTING, true)["properties"].clone();

        properties["settingsStatus"] = json!("production");
        let parsed: AnomalySecurityMLAnalyticsSettingsProperties =
            serde_json::from_value(properties.clone()).unwrap();
        assert_eq!(parsed.settings_status, SettingsStatus::Production);

        properties["settingsStatus"] = json!("Preview");
        let parsed: AnomalySecurityMLAnalyticsSettingsProperties =
            serde_json::from_value(properties.clone()).unwrap();
        assert_eq!(parsed.settings_status, SettingsStatus::Other("Preview".into()));

        properties.as_object_mut().unwrap().remove("settingsStatus");
        assert!(serde_json::from_value::<AnomalySecurityMLAnalyticsSettingsProperties>(properties).is_err());
    }

    #[test]
    fn test_last_modified_setter() {
        let mut properties = AnomalySecurityMLAnalyticsSettingsProperties::new(
            "1.0.5",
            "Anomalous sign-in location",
            true,
            "PT1H",
            true,
            SettingsStatus::Production,
        );
        let time = DateTime::parse_from_rfc3339("2024-06-01T08:00:00Z").unwrap();

        properties.set_last_modified_utc_as_time(time);
        assert_eq!(properties.last_modified_utc.as_deref(), Some("2024-06-01T08:00:00Z"));
        assert_eq!(properties.last_modified_utc_as_time(), Some(time));
    }

    #[test]
    fn test_predicate_on_union() {
        let anomaly: SecurityMLAnalyticsSetting =
            serde_json::from_value(anomaly_json(SETTING, true)).unwrap();
        let raw: SecurityMLAnalyticsSetting =
            serde_json::from_value(json!({"name": "other", "kind": "Behavioral"})).unwrap();

        let predicate = SecurityMLAnalyticsSettingOperationPredicate {
            kind: Some("Anomaly".into()),
            ..Default::default()
        };
        assert!(predicate.matches(&anomaly));
        assert!(!predicate.matches(&raw));
        assert!(SecurityMLAnalyticsSettingOperationPredicate::default().matches(&raw));
    }

    // --- API functions ---

    #[tokio::test]
    async fn test_list_follows_next_link() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let list_path = format!(
            "{}/providers/Microsoft.SecurityInsights/securityMLAnalyticsSettings",
            workspace_id().id()
        );
        let next = format!("{}{list_path}?api-version=2024-09-01&$skipToken=2", server.uri());

        Mock::given(method("GET"))
            .and(path(list_path.as_str()))
            .and(query_param("$skipToken", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [anomaly_json("second", false)]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(list_path.as_str()))
            .and(query_param("api-version", "2024-09-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [anomaly_json("first", true)],
                "nextLink": next
            })))
            .mount(&server)
            .await;

        let first = list(&client, &workspace_id()).await.expect("should list");
        assert_eq!(first.value.len(), 1);
        assert!(first.next().is_some());

        let all = list_complete(&client, &workspace_id()).await.expect("should list");
        let names: Vec<_> = all.iter().filter_map(SecurityMLAnalyticsSetting::name).collect();
        assert_eq!(names, ["first", "second"]);

        let only_second = list_complete_matching_predicate(
            &client,
            &workspace_id(),
            SecurityMLAnalyticsSettingOperationPredicate {
                name: Some("second".into()),
                ..Default::default()
            },
        )
        .await
        .expect("should list");
        assert_eq!(only_second.len(), 1);

        let pages: Vec<_> = list_pages(&client, &workspace_id())
            .try_collect()
            .await
            .expect("should list pages");
        assert_eq!(pages.len(), 2);
    }

    #[tokio::test]
    async fn test_get_setting() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("GET"))
            .and(path(setting_id().id()))
            .and(query_param("api-version", "2024-09-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(anomaly_json(SETTING, true)))
            .expect(1)
            .mount(&server)
            .await;

        let setting = get(&client, &setting_id()).await.expect("should get");
        assert_eq!(setting.name(), Some(SETTING));
    }

    #[tokio::test]
    async fn test_create_or_update_sends_kind() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("PUT"))
            .and(path(setting_id().id()))
            .and(body_partial_json(json!({"kind": "Anomaly", "properties": {"enabled": false}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(anomaly_json(SETTING, false)))
            .expect(1)
            .mount(&server)
            .await;

        let mut input: SecurityMLAnalyticsSetting =
            serde_json::from_value(anomaly_json(SETTING, true)).unwrap();
        if let SecurityMLAnalyticsSetting::Anomaly(anomaly) = &mut input {
            if let Some(properties) = anomaly.properties.as_mut() {
                properties.enabled = false;
            }
        }

        let stored = create_or_update(&client, &setting_id(), &input)
            .await
            .expect("should store");
        assert_eq!(stored, input);
    }

    #[tokio::test]
    async fn test_create_or_update_conflict_names_the_operation() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("PUT"))
            .and(path(setting_id().id()))
            .respond_with(ResponseTemplate::new(412).set_body_json(json!({
                "error": {"code": "PreconditionFailed", "message": "ETag mismatch."}
            })))
            .mount(&server)
            .await;

        let input: SecurityMLAnalyticsSetting =
            serde_json::from_value(anomaly_json(SETTING, true)).unwrap();
        let err = create_or_update(&client, &setting_id(), &input).await.unwrap_err();

        assert_eq!(err.status(), Some(412));
        assert_eq!(err.code(), Some("PreconditionFailed"));
        assert!(matches!(
            err,
            ArmError::Operation {
                operation: "securitymlanalyticssettings.CreateOrUpdate",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("DELETE"))
            .and(path(setting_id().id()))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        delete(&client, &setting_id()).await.expect("should delete");
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_get_emits_span() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("GET"))
            .and(path(setting_id().id()))
            .respond_with(ResponseTemplate::new(200).set_body_json(anomaly_json(SETTING, true)))
            .mount(&server)
            .await;

        get(&client, &setting_id()).await.expect("should get");
        assert!(logs_contain("arm::security_ml_analytics_settings::get"));
    }
}
