//! Administrative resources as returned by the managed-cloud REST endpoint.

use serde::{Deserialize, Serialize};

/// A database known to the administrative endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseResource {
    pub id: String,
    #[serde(rename = "_rid")]
    pub rid: String,
    /// Resource link other resources (offers) refer to.
    #[serde(rename = "_self")]
    pub self_link: String,
}

/// A collection listed through the administrative feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionResource {
    pub id: String,
    #[serde(rename = "_rid", default)]
    pub rid: String,
    #[serde(rename = "_self", default)]
    pub self_link: String,
}

/// Throughput allocation attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferContent {
    pub offer_throughput: u32,
}

/// Throughput offer tied to a database through its resource link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    #[serde(rename = "_rid")]
    pub rid: String,
    #[serde(rename = "_self", default)]
    pub self_link: String,
    /// Self link of the resource this offer provisions.
    pub resource: String,
    pub offer_resource_id: String,
    #[serde(default)]
    pub offer_version: String,
    #[serde(default)]
    pub offer_type: String,
    pub content: OfferContent,
}

impl Offer {
    /// Builds the replacement for this offer carrying `throughput`.
    ///
    /// Replacement offers are always version 2, which requires the legacy
    /// offer type to be `Invalid`.
    pub fn with_throughput(&self, throughput: u32) -> Self {
        Self {
            offer_version: "V2".to_string(),
            offer_type: "Invalid".to_string(),
            content: OfferContent {
                offer_throughput: throughput,
            },
            ..self.clone()
        }
    }

    pub fn throughput(&self) -> u32 {
        self.content.offer_throughput
    }
}
