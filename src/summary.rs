//! Org-wide metadata inventory.
//!
//! Builds a map of every metadata component in an org by describing the
//! type catalog, filtering out unsupported types, and listing the
//! remaining types in small batches.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::connection::{MetadataCatalog, OrgConnection};
use crate::error::{Error, ErrorKind, Result};
use crate::retry::{with_retry, RetryConfig};

/// Types the list endpoint cannot handle. They are skipped during
/// inventory, both at top level and as child type names.
pub static UNSUPPORTED_TYPES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "AccountForecastSettings",
        "Icon",
        "GlobalValueSet",
        "StandardValueSet",
        "CustomPermission",
        "EscalationRules",
        "RecordActionDeployment",
        "EscalationRule",
        "ApprovalProcess",
        "SiteDotCom",
        "BrandingSet",
        "NetworkBranding",
        "AuthProvider",
        "ContentAsset",
        "CustomSite",
        "EmbeddedServiceConfig",
        "UIObjectRelationConfig",
        "CareProviderSearchConfig",
        "EmbeddedServiceBranding",
        "EmbeddedServiceFlowConfig",
        "EmbeddedServiceMenuSettings",
        "SalesAgreementSettings",
        "ActionLinkGroupTemplate",
        "TransactionSecurityPolicy",
        "SynonymDictionary",
        "RecommendationStrategy",
        "UserCriteria",
        "ModerationRule",
        "CMSConnectSource",
        "FlowCategory",
        "Settings",
        "PlatformCachePartition",
        "LightningBolt",
        "LightningExperienceTheme",
        "LightningOnboardingConfig",
        "CorsWhitelistOrigin",
        "CustomHelpMenuSection",
        "Prompt",
        "Report",
        "Dashboard",
        "AnalyticSnapshot",
        "Role",
        "Group",
        "Community",
        "ChatterExtension",
        "PlatformEventChannel",
        "CommunityThemeDefinition",
        "CommunityTemplateDefinition",
        "NavigationMenu",
        "ManagedTopics",
        "ManagedTopic",
        "KeywordList",
        "InstalledPackage",
        "Scontrol",
        "Certificate",
        "LightningMessageChannel",
        "CaseSubjectParticle",
        "ExternalDataSource",
        "ExternalServiceRegistration",
        "Index",
        "CustomFeedFilter",
        "PostTemplate",
        "ProfilePasswordPolicy",
        "ProfileSessionSetting",
        "MyDomainDiscoverableLogin",
        "OauthCustomScope",
        "LeadConvertSettings",
        "DataCategoryGroup",
        "RemoteSiteSetting",
        "CspTrustedSite",
        "RedirectWhitelistUrl",
        "CleanDataService",
        "Skill",
        "ServiceChannel",
        "QueueRoutingConfig",
        "ServicePresenceStatus",
        "PresenceDeclineReason",
        "PresenceUserConfig",
        "EclairGeoData",
        "ChannelLayout",
        "CallCenter",
        "TimeSheetTemplate",
        "CanvasMetadata",
        "MobileApplicationDetail",
        "CustomNotificationType",
        "NotificationTypeConfig",
        "DelegateGroup",
        "ManagedContentType",
        "EmailServicesFunction",
        "SamlSsoConfig",
        "EmbeddedServiceLiveAgent",
    ]
    .into_iter()
    .collect()
});

/// Number of type names submitted per list call.
const LIST_BATCH_SIZE: usize = 3;

const LIST_RETRY: RetryConfig = RetryConfig::new(3, Duration::from_secs(2));

/// Summary of one metadata component discovered in the org.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, rename = "type")]
    pub metadata_type: String,
}

/// Fetch a summary of every supported metadata component in the org,
/// keyed by component id. Applies the built-in [`UNSUPPORTED_TYPES`]
/// denylist.
pub async fn fetch_metadata_summary_from_org<C: OrgConnection>(
    conn: &C,
) -> Result<HashMap<String, MetadataSummary>> {
    fetch_metadata_summary_with_denylist(conn, &UNSUPPORTED_TYPES).await
}

/// Same as [`fetch_metadata_summary_from_org`], with a caller-supplied
/// denylist of type names to skip.
pub async fn fetch_metadata_summary_with_denylist<C: OrgConnection>(
    conn: &C,
    denylist: &HashSet<&str>,
) -> Result<HashMap<String, MetadataSummary>> {
    let catalog = conn.describe_metadata().await?;
    let types = candidate_types(&catalog, denylist);
    tracing::info!(count = types.len(), "fetching metadata types from the org");

    let mut summaries = HashMap::new();
    for batch in types.chunks(LIST_BATCH_SIZE) {
        match fetch_metadata_summary_by_types(conn, batch, &mut summaries).await {
            Ok(()) => {
                tracing::info!(
                    retrieved = summaries.len(),
                    total = types.len(),
                    "retrieved metadata summaries"
                );
            }
            Err(err) if matches!(err.kind, ErrorKind::UnknownMetadataType) => {
                // The org does not recognize one of the types in this
                // batch; drop the batch and keep going.
                tracing::warn!(
                    types = ?batch,
                    "unknown metadata types encountered while listing, skipping batch"
                );
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(count = summaries.len(), "metadata summary fetch complete");
    Ok(summaries)
}

/// List one batch of types and merge the results into `summaries`,
/// keyed by component id. Later entries overwrite earlier ones with the
/// same id.
///
/// A non-sequence list response maps to
/// [`ErrorKind::UnknownMetadataType`], which callers treat as "skip
/// this batch" rather than a failure.
pub async fn fetch_metadata_summary_by_types<C: OrgConnection>(
    conn: &C,
    types: &[String],
    summaries: &mut HashMap<String, MetadataSummary>,
) -> Result<()> {
    let listed = with_retry(LIST_RETRY, || conn.list_metadata(types)).await?;

    let rows = listed
        .as_array()
        .ok_or_else(|| Error::new(ErrorKind::UnknownMetadataType))?;

    for row in rows {
        let summary: MetadataSummary = serde_json::from_value(row.clone()).map_err(|err| {
            Error::with_source(
                ErrorKind::InvalidResponse("malformed list metadata row".to_string()),
                err,
            )
        })?;
        summaries.insert(summary.id.clone(), summary);
    }

    Ok(())
}

/// Flatten the catalog into the list of type names to fetch: every
/// top-level name not in the denylist, plus every child name not in the
/// denylist.
fn candidate_types(catalog: &MetadataCatalog, denylist: &HashSet<&str>) -> Vec<String> {
    let mut types = Vec::new();
    for descriptor in &catalog.metadata_objects {
        if !denylist.contains(descriptor.xml_name.as_str()) {
            types.push(descriptor.xml_name.clone());
        }
        for child in &descriptor.child_xml_names {
            if !denylist.contains(child.as_str()) {
                types.push(child.clone());
            }
        }
    }
    types
}
