//! Shared commitment plans.
//!
//! A commitment plan prepays a quantity of a Cognitive Services capability
//! (for example, a number of text records per month) at a discounted tier.
//! Plans live in a resource group and can be associated with several
//! accounts.

use std::fmt;

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::{ArmResult, OperationContext};
use azure_mgmt_core::models::{SystemData, Tags};
use azure_mgmt_core::paging::{self, Page};
use azure_mgmt_core::polling::{LongRunningResponse, PollerResponse};
use azure_mgmt_core::resource_id::{
    ParseResult, ResourceGroupId, ResourceId, ResourceIdError, Segment, SubscriptionId,
};
use futures::stream::{Stream, TryStreamExt};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::{Sku, API_VERSION};

// ---------------------------------------------------------------------------
// Resource IDs
// ---------------------------------------------------------------------------

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.CognitiveServices/commitmentPlans/{commitmentPlanName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitmentPlanId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub commitment_plan_name: String,
}

impl CommitmentPlanId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        commitment_plan_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            commitment_plan_name: commitment_plan_name.into(),
        }
    }

    /// The resource group holding this plan.
    pub fn resource_group(&self) -> ResourceGroupId {
        ResourceGroupId::new(&self.subscription_id, &self.resource_group_name)
    }
}

impl ResourceId for CommitmentPlanId {
    const ID_TYPE: &'static str = "Commitment Plan";

    fn segments() -> Vec<Segment> {
        vec![
            Segment::static_segment("staticSubscriptions", "subscriptions"),
            Segment::subscription_id("subscriptionId"),
            Segment::static_segment("staticResourceGroups", "resourceGroups"),
            Segment::resource_group("resourceGroupName"),
            Segment::static_segment("staticProviders", "providers"),
            Segment::resource_provider(
                "staticMicrosoftCognitiveServices",
                "Microsoft.CognitiveServices",
            ),
            Segment::static_segment("staticCommitmentPlans", "commitmentPlans"),
            Segment::user_specified("commitmentPlanName", "commitmentPlanValue"),
        ]
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            subscription_id: parsed.get_owned("subscriptionId")?,
            resource_group_name: parsed.get_owned("resourceGroupName")?,
            commitment_plan_name: parsed.get_owned("commitmentPlanName")?,
        })
    }

    fn id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.CognitiveServices/commitmentPlans/{}",
            self.subscription_id, self.resource_group_name, self.commitment_plan_name
        )
    }
}

impl fmt::Display for CommitmentPlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

azure_mgmt_core::string_enum! {
    /// Provisioning state of a commitment plan.
    pub enum CommitmentPlanProvisioningState {
        Accepted => "Accepted",
        Canceled => "Canceled",
        Creating => "Creating",
        Deleting => "Deleting",
        Failed => "Failed",
        Moving => "Moving",
        Succeeded => "Succeeded",
    }
}

azure_mgmt_core::string_enum! {
    /// Where the committed capacity is consumed.
    pub enum HostingModel {
        ConnectedContainer => "ConnectedContainer",
        DisconnectedContainer => "DisconnectedContainer",
        ProvisionedWeb => "ProvisionedWeb",
        Web => "Web",
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// A commitment plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<CommitmentPlanProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// Properties of a commitment plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentPlanProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment_plan_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CommitmentPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosting_model: Option<HostingModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<CommitmentPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<CommitmentPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<CommitmentPlanProvisioningState>,
}

/// A commitment period: the tier, count and quota in force for a span of time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentPeriod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<CommitmentQuota>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

/// Committed quantity per period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitmentQuota {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// The body of [`update_plan`]: only tags and SKU can be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchResourceTagsAndSku {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

/// Filter for the `*_complete_matching_predicate` functions. Unset fields
/// match anything.
#[derive(Debug, Clone, Default)]
pub struct CommitmentPlanOperationPredicate {
    pub etag: Option<String>,
    pub id: Option<String>,
    pub kind: Option<String>,
    pub location: Option<String>,
    pub name: Option<String>,
    pub resource_type: Option<String>,
}

impl CommitmentPlanOperationPredicate {
    pub fn matches(&self, input: &CommitmentPlan) -> bool {
        let field = |expected: &Option<String>, actual: &Option<String>| {
            expected.is_none() || expected == actual
        };

        field(&self.etag, &input.etag)
            && field(&self.id, &input.id)
            && field(&self.kind, &input.kind)
            && field(&self.location, &input.location)
            && field(&self.name, &input.name)
            && field(&self.resource_type, &input.resource_type)
    }
}

/// The response of [`create_or_update_plan`] and [`update_plan`].
pub type CommitmentPlanOperationResponse = PollerResponse<CommitmentPlan>;

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

fn resource_group_plans_url(client: &ArmClient, id: &ResourceGroupId) -> ArmResult<Url> {
    client.resource_url(
        &format!("{}/providers/Microsoft.CognitiveServices/commitmentPlans", id.id()),
        &[("api-version", API_VERSION)],
    )
}

fn subscription_plans_url(client: &ArmClient, id: &SubscriptionId) -> ArmResult<Url> {
    client.resource_url(
        &format!("{}/providers/Microsoft.CognitiveServices/commitmentPlans", id.id()),
        &[("api-version", API_VERSION)],
    )
}

/// Fetch the first page of commitment plans in a resource group.
#[tracing::instrument(
    name = "arm::commitment_plans::list_plans_by_resource_group",
    skip(client, id),
    fields(resource_group_id = %id)
)]
pub async fn list_plans_by_resource_group(
    client: &ArmClient,
    id: &ResourceGroupId,
) -> ArmResult<Page<CommitmentPlan>> {
    tracing::debug!("listing commitment plans");
    let url = resource_group_plans_url(client, id).operation("commitmentplans.ListPlansByResourceGroup")?;
    paging::get_page(client, url.as_str())
        .await
        .operation("commitmentplans.ListPlansByResourceGroup")
}

/// Stream every page of commitment plans in a resource group.
#[tracing::instrument(
    name = "arm::commitment_plans::list_plans_by_resource_group_pages",
    skip(client, id),
    fields(resource_group_id = %id)
)]
pub fn list_plans_by_resource_group_pages<'a>(
    client: &'a ArmClient,
    id: &ResourceGroupId,
) -> impl Stream<Item = ArmResult<Page<CommitmentPlan>>> + 'a {
    tracing::debug!("streaming commitment plans");
    paging::pages(client, resource_group_plans_url(client, id))
        .map_err(|e| e.with_operation("commitmentplans.ListPlansByResourceGroup"))
}

/// List every commitment plan in a resource group.
#[tracing::instrument(
    name = "arm::commitment_plans::list_plans_by_resource_group_complete",
    skip(client, id),
    fields(resource_group_id = %id)
)]
pub async fn list_plans_by_resource_group_complete(
    client: &ArmClient,
    id: &ResourceGroupId,
) -> ArmResult<Vec<CommitmentPlan>> {
    list_plans_by_resource_group_complete_matching_predicate(
        client,
        id,
        CommitmentPlanOperationPredicate::default(),
    )
    .await
}

/// List every commitment plan in a resource group that matches `predicate`.
#[tracing::instrument(
    name = "arm::commitment_plans::list_plans_by_resource_group_complete_matching_predicate",
    skip(client, id, predicate),
    fields(resource_group_id = %id)
)]
pub async fn list_plans_by_resource_group_complete_matching_predicate(
    client: &ArmClient,
    id: &ResourceGroupId,
    predicate: CommitmentPlanOperationPredicate,
) -> ArmResult<Vec<CommitmentPlan>> {
    let url = resource_group_plans_url(client, id).operation("commitmentplans.ListPlansByResourceGroupComplete")?;
    let items = paging::collect_matching(client, url, |item| {
        predicate.matches(item)
    })
    .await
    .operation("commitmentplans.ListPlansByResourceGroupComplete")?;

    tracing::debug!(count = items.len(), "listed commitment plans");
    Ok(items)
}

/// Fetch the first page of commitment plans in a subscription.
#[tracing::instrument(
    name = "arm::commitment_plans::list_plans_by_subscription",
    skip(client, id),
    fields(subscription_id = %id)
)]
pub async fn list_plans_by_subscription(
    client: &ArmClient,
    id: &SubscriptionId,
) -> ArmResult<Page<CommitmentPlan>> {
    tracing::debug!("listing commitment plans");
    let url = subscription_plans_url(client, id).operation("commitmentplans.ListPlansBySubscription")?;
    paging::get_page(client, url.as_str())
        .await
        .operation("commitmentplans.ListPlansBySubscription")
}

/// Stream every page of commitment plans in a subscription.
#[tracing::instrument(
    name = "arm::commitment_plans::list_plans_by_subscription_pages",
    skip(client, id),
    fields(subscription_id = %id)
)]
pub fn list_plans_by_subscription_pages<'a>(
    client: &'a ArmClient,
    id: &SubscriptionId,
) -> impl Stream<Item = ArmResult<Page<CommitmentPlan>>> + 'a {
    tracing::debug!("streaming commitment plans");
    paging::pages(client, subscription_plans_url(client, id))
        .map_err(|e| e.with_operation("commitmentplans.ListPlansBySubscription"))
}

/// List every commitment plan in a subscription.
#[tracing::instrument(
    name = "arm::commitment_plans::list_plans_by_subscription_complete",
    skip(client, id),
    fields(subscription_id = %id)
)]
pub async fn list_plans_by_subscription_complete(
    client: &ArmClient,
    id: &SubscriptionId,
) -> ArmResult<Vec<CommitmentPlan>> {
    list_plans_by_subscription_complete_matching_predicate(
        client,
        id,
        CommitmentPlanOperationPredicate::default(),
    )
    .await
}

/// List every commitment plan in a subscription that matches `predicate`.
#[tracing::instrument(
    name = "arm::commitment_plans::list_plans_by_subscription_complete_matching_predicate",
    skip(client, id, predicate),
    fields(subscription_id = %id)
)]
pub async fn list_plans_by_subscription_complete_matching_predicate(
    client: &ArmClient,
    id: &SubscriptionId,
    predicate: CommitmentPlanOperationPredicate,
) -> ArmResult<Vec<CommitmentPlan>> {
    let url = subscription_plans_url(client, id).operation("commitmentplans.ListPlansBySubscriptionComplete")?;
    let items = paging::collect_matching(client, url, |item| {
        predicate.matches(item)
    })
    .await
    .operation("commitmentplans.ListPlansBySubscriptionComplete")?;

    tracing::debug!(count = items.len(), "listed commitment plans");
    Ok(items)
}

/// Get a commitment plan.
#[tracing::instrument(
    name = "arm::commitment_plans::get_plan",
    skip(client, id),
    fields(commitment_plan_id = %id)
)]
pub async fn get_plan(client: &ArmClient, id: &CommitmentPlanId) -> ArmResult<CommitmentPlan> {
    tracing::debug!("getting commitment plan");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("commitmentplans.GetPlan")?;
    let plan: CommitmentPlan = client
        .get_json(url.as_str())
        .await
        .operation("commitmentplans.GetPlan")?;

    tracing::debug!(provisioning_state = ?plan.properties.as_ref().and_then(|p| p.provisioning_state.as_ref()), "commitment plan fetched");
    Ok(plan)
}

/// Create or replace a commitment plan. Returns once ARM has accepted the request.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// use azure_mgmt_cognitiveservices::commitment_plans::{
///     self, CommitmentPeriod, CommitmentPlan, CommitmentPlanId, CommitmentPlanProperties, HostingModel,
/// };
/// use azure_mgmt_cognitiveservices::models::Sku;
///
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let id = CommitmentPlanId::new("sub", "ai-rg", "text-analytics-plan");
/// let plan = CommitmentPlan {
///     kind: Some("TextAnalytics".into()),
///     location: Some("westeurope".into()),
///     sku: Some(Sku::new("S")),
///     properties: Some(CommitmentPlanProperties {
///         hosting_model: Some(HostingModel::Web),
///         plan_type: Some("TA".into()),
///         auto_renew: Some(true),
///         current: Some(CommitmentPeriod {
///             tier: Some("T1".into()),
///             ..Default::default()
///         }),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
///
/// let mut response = commitment_plans::create_or_update_plan(client, &id, &plan).await?;
/// response.poller.poll_until_done().await?;
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    name = "arm::commitment_plans::create_or_update_plan",
    skip(client, id, input),
    fields(commitment_plan_id = %id)
)]
pub async fn create_or_update_plan(
    client: &ArmClient,
    id: &CommitmentPlanId,
    input: &CommitmentPlan,
) -> ArmResult<CommitmentPlanOperationResponse> {
    tracing::debug!("creating or updating commitment plan");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("commitmentplans.CreateOrUpdatePlan")?;
    let response = client
        .send_long_running(Method::PUT, url.as_str(), Some(input))
        .await
        .and_then(LongRunningResponse::into_typed::<CommitmentPlan>)
        .operation("commitmentplans.CreateOrUpdatePlan")?;

    tracing::debug!(status = response.http_status, "create or update accepted");
    Ok(response)
}

/// Create or replace a commitment plan and wait for the operation to finish.
#[tracing::instrument(
    name = "arm::commitment_plans::create_or_update_plan_then_poll",
    skip(client, id, input),
    fields(commitment_plan_id = %id)
)]
pub async fn create_or_update_plan_then_poll(
    client: &ArmClient,
    id: &CommitmentPlanId,
    input: &CommitmentPlan,
) -> ArmResult<()> {
    let mut response = create_or_update_plan(client, id, input).await?;
    response
        .poller
        .poll_until_done()
        .await
        .operation("commitmentplans.CreateOrUpdatePlan")
}

/// Update the tags or SKU of a commitment plan.
#[tracing::instrument(
    name = "arm::commitment_plans::update_plan",
    skip(client, id, input),
    fields(commitment_plan_id = %id)
)]
pub async fn update_plan(
    client: &ArmClient,
    id: &CommitmentPlanId,
    input: &PatchResourceTagsAndSku,
) -> ArmResult<CommitmentPlanOperationResponse> {
    tracing::debug!("updating commitment plan");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("commitmentplans.UpdatePlan")?;
    let response = client
        .send_long_running(Method::PATCH, url.as_str(), Some(input))
        .await
        .and_then(LongRunningResponse::into_typed::<CommitmentPlan>)
        .operation("commitmentplans.UpdatePlan")?;

    tracing::debug!(status = response.http_status, "update accepted");
    Ok(response)
}

/// Update the tags or SKU of a commitment plan and wait for the operation to finish.
#[tracing::instrument(
    name = "arm::commitment_plans::update_plan_then_poll",
    skip(client, id, input),
    fields(commitment_plan_id = %id)
)]
pub async fn update_plan_then_poll(
    client: &ArmClient,
    id: &CommitmentPlanId,
    input: &PatchResourceTagsAndSku,
) -> ArmResult<()> {
    let mut response = update_plan(client, id, input).await?;
    response
        .poller
        .poll_until_done()
        .await
        .operation("commitmentplans.UpdatePlan")
}

/// Delete a commitment plan. Returns once ARM has accepted the request.
#[tracing::instrument(
    name = "arm::commitment_plans::delete_plan",
    skip(client, id),
    fields(commitment_plan_id = %id)
)]
pub async fn delete_plan(client: &ArmClient, id: &CommitmentPlanId) -> ArmResult<LongRunningResponse> {
    tracing::debug!("deleting commitment plan");

    let url = client
        .resource_url(&id.id(), &[("api-version", API_VERSION)])
        .operation("commitmentplans.DeletePlan")?;
    let response = client
        .send_long_running::<()>(Method::DELETE, url.as_str(), None)
        .await
        .operation("commitmentplans.DeletePlan")?;

    tracing::debug!(status = response.status, "delete accepted");
    Ok(response)
}

/// Delete a commitment plan and wait for the operation to finish.
#[tracing::instrument(
    name = "arm::commitment_plans::delete_plan_then_poll",
    skip(client, id),
    fields(commitment_plan_id = %id)
)]
pub async fn delete_plan_then_poll(client: &ArmClient, id: &CommitmentPlanId) -> ArmResult<()> {
    let mut response = delete_plan(client, id).await?;
    response
        .poller
        .poll_until_done()
        .await
        .operation("commitmentplans.DeletePlan")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkuTier;
    use crate::test_utils::{setup_mock_client, TEST_SUBSCRIPTION};
    use azure_mgmt_core::enums::CreatedByType;
    use azure_mgmt_core::error::ArmError;
    use azure_mgmt_core::resource_id::validate_segments;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn plan_id() -> CommitmentPlanId {
        CommitmentPlanId::new(TEST_SUBSCRIPTION, "ai-rg", "ta-plan")
    }

    fn plan_json(name: &str, kind: &str, state: &str) -> serde_json::Value {
        serde_json::json!({
            "id": format!("/subscriptions/{TEST_SUBSCRIPTION}/resourceGroups/ai-rg/providers/Microsoft.CognitiveServices/commitmentPlans/{name}"),
            "name": name,
            "kind": kind,
            "location": "westeurope",
            "type": "Microsoft.CognitiveServices/commitmentPlans",
            "sku": {"name": "S", "tier": "Standard"},
            "tags": {"env": "test"},
            "systemData": {
                "createdAt": "2023-09-01T10:00:00Z",
                "createdBy": "ops@example.com",
                "createdByType": "User"
            },
            "properties": {
                "autoRenew": true,
                "hostingModel": "Web",
                "planType": "TA",
                "provisioningState": state,
                "current": {
                    "tier": "T1",
                    "count": 1,
                    "quota": {"quantity": 1000000, "unit": "Transaction"},
                    "startDate": "2023-09-01",
                    "endDate": "2023-10-01"
                }
            }
        })
    }

    // --- Resource IDs ---

    #[test]
    fn test_commitment_plan_id_round_trip() {
        let id = plan_id();
        assert_eq!(
            id.id(),
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/ai-rg/providers/Microsoft.CognitiveServices/commitmentPlans/ta-plan"
        );
        assert_eq!(CommitmentPlanId::parse(&id.id()).unwrap(), id);
        assert_eq!(id.resource_group(), ResourceGroupId::new(TEST_SUBSCRIPTION, "ai-rg"));
    }

    #[test]
    fn test_commitment_plan_id_casing() {
        let lower = "/subscriptions/sub/resourcegroups/AI-RG/providers/microsoft.cognitiveservices/commitmentplans/TA-Plan";

        assert!(matches!(
            CommitmentPlanId::parse(lower).unwrap_err(),
            ResourceIdError::UnexpectedSegment { .. }
        ));

        let id = CommitmentPlanId::parse_insensitively(lower).expect("should parse");
        assert_eq!(id, CommitmentPlanId::new("sub", "AI-RG", "TA-Plan"));
        assert!(id.id().contains("/providers/Microsoft.CognitiveServices/commitmentPlans/"));
    }

    #[test]
    fn test_commitment_plan_id_rejects_malformed_input() {
        let full = plan_id().id();
        let truncated = full.trim_end_matches("/ta-plan").to_string();
        for input in ["".to_string(), truncated, format!("{full}/accounts/a")] {
            assert!(CommitmentPlanId::parse(&input).is_err(), "{input:?}");
            assert!(CommitmentPlanId::parse_insensitively(&input).is_err(), "{input:?}");
        }
    }

    #[test]
    fn test_segment_names_are_unique() {
        assert!(validate_segments(CommitmentPlanId::ID_TYPE, &CommitmentPlanId::segments()).is_ok());
    }

    // --- Models ---

    #[test]
    fn test_commitment_plan_deserialization() {
        let plan: CommitmentPlan =
            serde_json::from_value(plan_json("ta-plan", "TextAnalytics", "Succeeded")).unwrap();

        let properties = plan.properties.as_ref().expect("properties");
        assert_eq!(properties.hosting_model, Some(HostingModel::Web));
        assert_eq!(
            properties.provisioning_state,
            Some(CommitmentPlanProvisioningState::Succeeded)
        );
        let current = properties.current.as_ref().expect("current period");
        assert_eq!(current.quota.as_ref().and_then(|q| q.quantity), Some(1_000_000));

        assert_eq!(plan.sku.as_ref().and_then(|s| s.tier.clone()), Some(SkuTier::Standard));
        assert_eq!(plan.tags.as_ref().and_then(|t| t.get("env")).map(String::as_str), Some("test"));

        let system_data = plan.system_data.as_ref().expect("system data");
        assert_eq!(system_data.created_by_type, Some(CreatedByType::User));
        assert!(system_data.created_at_as_time().is_some());
    }

    #[test]
    fn test_unknown_hosting_model_is_preserved() {
        let model: HostingModel = serde_json::from_str("\"Edge\"").unwrap();
        assert_eq!(model, HostingModel::Other("Edge".into()));
        assert_eq!(serde_json::to_string(&model).unwrap(), "\"Edge\"");
        assert_eq!(
            "connectedcontainer".parse::<HostingModel>().unwrap(),
            HostingModel::ConnectedContainer
        );
    }

    #[test]
    fn test_predicate_matches_kind_and_location() {
        let plan: CommitmentPlan =
            serde_json::from_value(plan_json("ta-plan", "TextAnalytics", "Succeeded")).unwrap();

        let predicate = CommitmentPlanOperationPredicate {
            kind: Some("TextAnalytics".into()),
            location: Some("westeurope".into()),
            ..Default::default()
        };
        assert!(predicate.matches(&plan));

        let predicate = CommitmentPlanOperationPredicate {
            kind: Some("SpeechServices".into()),
            ..Default::default()
        };
        assert!(!predicate.matches(&plan));
    }

    // --- API functions ---

    #[tokio::test]
    async fn test_list_plans_by_resource_group_complete_with_predicate() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let list_path = format!(
            "/subscriptions/{TEST_SUBSCRIPTION}/resourceGroups/ai-rg/providers/Microsoft.CognitiveServices/commitmentPlans"
        );
        let next = format!("{}{list_path}?api-version=2023-05-01&$skiptoken=p2", server.uri());

        Mock::given(method("GET"))
            .and(path(list_path.as_str()))
            .and(query_param("$skiptoken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [plan_json("speech", "SpeechServices", "Succeeded")]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(list_path.as_str()))
            .and(query_param("api-version", "2023-05-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [plan_json("ta-plan", "TextAnalytics", "Succeeded")],
                "nextLink": next
            })))
            .mount(&server)
            .await;

        let group = ResourceGroupId::new(TEST_SUBSCRIPTION, "ai-rg");

        let first = list_plans_by_resource_group(&client, &group)
            .await
            .expect("should list");
        assert_eq!(first.value.len(), 1);
        assert!(first.next().is_some());

        let all = list_plans_by_resource_group_complete(&client, &group)
            .await
            .expect("should list");
        assert_eq!(all.len(), 2);

        let speech = list_plans_by_resource_group_complete_matching_predicate(
            &client,
            &group,
            CommitmentPlanOperationPredicate {
                kind: Some("SpeechServices".into()),
                ..Default::default()
            },
        )
        .await
        .expect("should list");
        assert_eq!(speech.len(), 1);
        assert_eq!(speech[0].name.as_deref(), Some("speech"));

        let pages: Vec<_> = list_plans_by_resource_group_pages(&client, &group)
            .try_collect()
            .await
            .expect("should list pages");
        assert_eq!(pages.len(), 2);
    }

    #[tokio::test]
    async fn test_list_plans_by_subscription() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{TEST_SUBSCRIPTION}/providers/Microsoft.CognitiveServices/commitmentPlans"
            )))
            .and(query_param("api-version", "2023-05-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [
                    plan_json("ta-plan", "TextAnalytics", "Succeeded"),
                    plan_json("speech", "SpeechServices", "Succeeded")
                ]
            })))
            .mount(&server)
            .await;

        let subscription = SubscriptionId::new(TEST_SUBSCRIPTION);

        let page = list_plans_by_subscription(&client, &subscription)
            .await
            .expect("should list");
        assert_eq!(page.value.len(), 2);
        assert!(page.next().is_none());

        let plans = list_plans_by_subscription_complete(&client, &subscription)
            .await
            .expect("should list");
        assert_eq!(plans.len(), 2);

        let matching = list_plans_by_subscription_complete_matching_predicate(
            &client,
            &subscription,
            CommitmentPlanOperationPredicate {
                name: Some("ta-plan".into()),
                ..Default::default()
            },
        )
        .await
        .expect("should list");
        assert_eq!(matching.len(), 1);

        let pages: Vec<_> = list_plans_by_subscription_pages(&client, &subscription)
            .try_collect()
            .await
            .expect("should list pages");
        assert_eq!(pages.len(), 1);
    }

    #[tokio::test]
    async fn test_get_plan_error_names_the_operation() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("GET"))
            .and(path(plan_id().id()))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": "AuthorizationFailed", "message": "The client does not have authorization."}
            })))
            .mount(&server)
            .await;

        let err = get_plan(&client, &plan_id()).await.unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(matches!(
            err,
            ArmError::Operation {
                operation: "commitmentplans.GetPlan",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_or_update_plan_then_poll_uses_provisioning_state() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let gets = Arc::new(AtomicU32::new(0));
        let counter = gets.clone();

        Mock::given(method("PUT"))
            .and(path(plan_id().id()))
            .and(query_param("api-version", "2023-05-01"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(plan_json("ta-plan", "TextAnalytics", "Creating")),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(plan_id().id()))
            .respond_with(move |_req: &wiremock::Request| {
                let state = if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    "Creating"
                } else {
                    "Succeeded"
                };
                ResponseTemplate::new(200).set_body_json(plan_json("ta-plan", "TextAnalytics", state))
            })
            .mount(&server)
            .await;

        let input = CommitmentPlan {
            kind: Some("TextAnalytics".into()),
            location: Some("westeurope".into()),
            sku: Some(Sku::new("S")),
            ..Default::default()
        };

        create_or_update_plan_then_poll(&client, &plan_id(), &input)
            .await
            .expect("should complete");
        assert_eq!(gets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_update_plan_sends_patch_body() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("PATCH"))
            .and(path(plan_id().id()))
            .and(body_json(serde_json::json!({"tags": {"env": "prod"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(plan_json("ta-plan", "TextAnalytics", "Succeeded")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let input = PatchResourceTagsAndSku {
            tags: Some(Tags::from([("env".to_string(), "prod".to_string())])),
            sku: None,
        };

        let response = update_plan(&client, &plan_id(), &input)
            .await
            .expect("should be accepted");
        assert_eq!(response.http_status, 200);
        assert!(response.model.is_some());

        update_plan_then_poll(&client, &plan_id(), &input)
            .await
            .expect("should complete");
    }

    #[tokio::test]
    async fn test_delete_plan_then_poll_follows_location() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let location = format!("{}/operationResults/plan-delete", server.uri());
        let polls = Arc::new(AtomicU32::new(0));
        let counter = polls.clone();

        Mock::given(method("DELETE"))
            .and(path(plan_id().id()))
            .respond_with(ResponseTemplate::new(202).insert_header("Location", location.as_str()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operationResults/plan-delete"))
            .respond_with(move |_req: &wiremock::Request| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(202)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .mount(&server)
            .await;

        delete_plan_then_poll(&client, &plan_id())
            .await
            .expect("should complete");
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_delete_plan_synchronous_no_content() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("DELETE"))
            .and(path(plan_id().id()))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut response = delete_plan(&client, &plan_id()).await.expect("should delete");
        assert_eq!(response.status, 204);
        response.poller.poll_until_done().await.expect("nothing to poll");
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_delete_plan_emits_span() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("DELETE"))
            .and(path(plan_id().id()))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let _ = delete_plan(&client, &plan_id()).await;
        assert!(logs_contain("arm::commitment_plans::delete_plan"));
    }
}
