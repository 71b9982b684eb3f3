//! Resource IDs shared by every resource provider.

use std::fmt;

use super::{ParseResult, ResourceId, ResourceIdError, Segment};

/// `/subscriptions/{subscriptionId}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    pub subscription_id: String,
}

impl SubscriptionId {
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
        }
    }
}

impl ResourceId for SubscriptionId {
    const ID_TYPE: &'static str = "Subscription";

    fn segments() -> Vec<Segment> {
        vec![
            Segment::static_segment("staticSubscriptions", "subscriptions"),
            Segment::subscription_id("subscriptionId"),
        ]
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            subscription_id: parsed.get_owned("subscriptionId")?,
        })
    }

    fn id(&self) -> String {
        format!("/subscriptions/{}", self.subscription_id)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceGroupId {
    pub subscription_id: String,
    pub resource_group_name: String,
}

impl ResourceGroupId {
    pub fn new(subscription_id: impl Into<String>, resource_group_name: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
        }
    }

    /// The subscription this resource group belongs to.
    pub fn subscription(&self) -> SubscriptionId {
        SubscriptionId::new(&self.subscription_id)
    }
}

impl ResourceId for ResourceGroupId {
    const ID_TYPE: &'static str = "Resource Group";

    fn segments() -> Vec<Segment> {
        vec![
            Segment::static_segment("staticSubscriptions", "subscriptions"),
            Segment::subscription_id("subscriptionId"),
            Segment::static_segment("staticResourceGroups", "resourceGroups"),
            Segment::resource_group("resourceGroupName"),
        ]
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            subscription_id: parsed.get_owned("subscriptionId")?,
            resource_group_name: parsed.get_owned("resourceGroupName")?,
        })
    }

    fn id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}",
            self.subscription_id, self.resource_group_name
        )
    }
}

impl fmt::Display for ResourceGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// An arbitrary scope, such as a subscription, resource group or resource.
///
/// The scope is stored with its leading `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeId {
    pub scope: String,
}

impl ScopeId {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }
}

impl ResourceId for ScopeId {
    const ID_TYPE: &'static str = "Scope";

    fn segments() -> Vec<Segment> {
        vec![Segment::scope(
            "scope",
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/some-resource-group",
        )]
    }

    fn from_parse_result(parsed: &ParseResult) -> Result<Self, ResourceIdError> {
        Ok(Self {
            scope: parsed.get_owned("scope")?,
        })
    }

    fn id(&self) -> String {
        format!("/{}", self.scope.trim_start_matches('/'))
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl From<SubscriptionId> for ScopeId {
    fn from(id: SubscriptionId) -> Self {
        Self::new(id.id())
    }
}

impl From<ResourceGroupId> for ScopeId {
    fn from(id: ResourceGroupId) -> Self {
        Self::new(id.id())
    }
}
