//! Listing records returned by the customization collections.

use anyhow::anyhow;
use serde::Deserialize;
use serde_json::Value;

use super::kind::CustomizationKind;

/// One entry from a language or acoustic customization listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomizationRecord {
    /// Vendor-assigned identifier, unique within the account and kind
    pub id: String,
    /// Human-readable name, not guaranteed unique
    pub display_name: String,
    pub kind: CustomizationKind,
}

impl std::fmt::Display for CustomizationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}", self.id, self.display_name)
    }
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    customization_id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    customizations: Vec<ListingEntry>,
}

/// Extracts records from a `{"customizations": [...]}` listing body.
///
/// Records keep the order the service returned them in. Fields other than
/// `customization_id` and `name` are ignored.
///
/// # Errors
/// - If the body does not have the listing shape
pub fn parse_listing(
    kind: CustomizationKind,
    body: &Value,
) -> anyhow::Result<Vec<CustomizationRecord>> {
    let listing = Listing::deserialize(body)
        .map_err(|e| anyhow!("Unexpected {} listing response: {e}", kind.name()))?;

    Ok(listing
        .customizations
        .into_iter()
        .map(|entry| CustomizationRecord {
            id: entry.customization_id,
            display_name: entry.name,
            kind,
        })
        .collect())
}
