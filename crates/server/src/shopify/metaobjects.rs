//! Swatch metaobject queries for the Admin API.
//!
//! Fetches pages of `swatches` metaobjects and resolves `MediaImage` nodes
//! to plain image URLs.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ShopifyError;
use super::client::AdminClient;
use super::queries;
use crate::config::ImageSource;

/// Metaobject type queried from the shop.
pub const METAOBJECT_TYPE: &str = "swatches";

/// Records requested per page.
pub const PAGE_SIZE: i64 = 250;

/// Field key carrying the swatch image reference.
pub const MAIN_IMAGE_KEY: &str = "main_image";

/// GID prefix identifying a resolvable media image value.
pub const MEDIA_IMAGE_PREFIX: &str = "gid://shopify/MediaImage/";

// =============================================================================
// Domain Types
// =============================================================================

/// A swatch metaobject, serialized exactly as API clients receive it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swatch {
    /// Metaobject GID.
    pub id: String,
    /// URL-safe handle.
    pub handle: String,
    /// Key/value fields, in upstream order.
    pub fields: Vec<SwatchField>,
    /// Resolved image URL, duplicated at the top level once resolution ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image_url: Option<String>,
}

/// A single key/value field on a swatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwatchField {
    /// Field key (e.g., `main_image`).
    pub key: String,
    /// Field value; stays null in the output when upstream sent null.
    pub value: Option<String>,
    /// Inline media reference from the page query; never serialized back out.
    #[serde(default, skip_serializing)]
    pub reference: Option<MediaReference>,
}

/// Inline media reference payload.
///
/// Non-`MediaImage` references deserialize as an empty object, so every
/// layer here is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaReference {
    /// Image payload when the reference is a `MediaImage`.
    #[serde(default)]
    pub image: Option<MediaImage>,
}

/// Image nested under a media reference.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaImage {
    /// CDN URL of the image.
    #[serde(default)]
    pub url: Option<String>,
}

/// One fetched page of swatches.
#[derive(Debug, Clone)]
pub struct SwatchPage {
    /// Swatches in this page, upstream order.
    pub swatches: Vec<Swatch>,
    /// Whether more pages follow.
    pub has_next_page: bool,
    /// Cursor of the last edge; the continuation point for the next page.
    pub last_cursor: Option<String>,
}

impl Swatch {
    /// The `main_image` field, if the swatch has one.
    #[must_use]
    pub fn main_image_field(&self) -> Option<&SwatchField> {
        self.fields.iter().find(|f| f.key == MAIN_IMAGE_KEY)
    }

    fn main_image_field_mut(&mut self) -> Option<&mut SwatchField> {
        self.fields.iter_mut().find(|f| f.key == MAIN_IMAGE_KEY)
    }

    /// Record a resolution outcome: the `main_image` value becomes the URL
    /// (or null), mirrored to `main_image_url`. The inline reference is
    /// consumed so re-resolution falls through to the untouched path.
    pub(crate) fn apply_main_image(&mut self, url: Option<String>) {
        self.main_image_url = url.clone();
        if let Some(field) = self.main_image_field_mut() {
            field.value = url;
            field.reference = None;
        }
    }
}

impl SwatchField {
    /// URL carried by an inline media reference, if the page query fetched one.
    #[must_use]
    pub fn inline_image_url(&self) -> Option<String> {
        self.reference
            .as_ref()
            .and_then(|r| r.image.as_ref())
            .and_then(|i| i.url.clone())
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SwatchPageData {
    metaobjects: MetaobjectConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaobjectConnection {
    page_info: PageInfo,
    edges: Vec<SwatchEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct SwatchEdge {
    cursor: String,
    node: Swatch,
}

#[derive(Debug, Deserialize)]
struct MediaImageNodeData {
    node: Option<MediaImageNode>,
}

#[derive(Debug, Deserialize)]
struct MediaImageNode {
    #[serde(default)]
    image: Option<MediaImage>,
}

// =============================================================================
// AdminClient Metaobject Methods
// =============================================================================

impl AdminClient {
    /// Fetch one page of swatch metaobjects.
    ///
    /// The `source` picks the query shape: `Inline` also asks for each
    /// field's resolved media reference.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the API call fails.
    #[instrument(skip(self), fields(after = ?after))]
    pub async fn swatch_page(
        &self,
        source: ImageSource,
        after: Option<String>,
    ) -> Result<SwatchPage, ShopifyError> {
        let variables = serde_json::json!({
            "type": METAOBJECT_TYPE,
            "first": PAGE_SIZE,
            "cursor": after,
        });

        let data: SwatchPageData = self.execute(queries::page_query(source), variables).await?;

        let connection = data.metaobjects;
        let last_cursor = connection.edges.last().map(|edge| edge.cursor.clone());
        let swatches = connection.edges.into_iter().map(|edge| edge.node).collect();

        Ok(SwatchPage {
            swatches,
            has_next_page: connection.page_info.has_next_page,
            last_cursor,
        })
    }

    /// Resolve a `MediaImage` GID to its image URL.
    ///
    /// Returns `None` when the node does not exist, is not a `MediaImage`,
    /// or carries no image.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the API call fails.
    #[instrument(skip(self), fields(media_id = %id))]
    pub async fn media_image_url(&self, id: &str) -> Result<Option<String>, ShopifyError> {
        let variables = serde_json::json!({ "id": id });

        let data: MediaImageNodeData = self.execute(queries::MEDIA_IMAGE, variables).await?;

        Ok(data.node.and_then(|n| n.image).and_then(|i| i.url))
    }
}
