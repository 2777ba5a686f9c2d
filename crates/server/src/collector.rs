//! Swatch collection assembly: full pagination plus image resolution.
//!
//! The collector owns everything it needs at construction time; nothing is
//! read from the environment while a request is in flight.

use futures::future::join_all;
use thiserror::Error;
use tracing::instrument;

use crate::config::ImageSource;
use crate::shopify::{AdminClient, MEDIA_IMAGE_PREFIX, ShopifyError, Swatch, SwatchField};

/// Errors from assembling the full swatch collection.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Upstream call failed; partial results are discarded.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// Upstream reported another page but returned no edge to continue from.
    #[error("Page {page} reported more results but contained no cursor to continue from")]
    EmptyPage {
        /// 1-based number of the offending page.
        page: usize,
    },
}

/// Walks the complete `swatches` metaobject collection and resolves the
/// `main_image` field of every record to an image URL.
#[derive(Clone)]
pub struct SwatchCollector {
    client: AdminClient,
    source: ImageSource,
}

impl SwatchCollector {
    /// Create a collector backed by the given client.
    #[must_use]
    pub const fn new(client: AdminClient, source: ImageSource) -> Self {
        Self { client, source }
    }

    /// Fetch every swatch, then resolve their images.
    ///
    /// # Errors
    ///
    /// Returns `CollectError` if any pagination call fails; image resolution
    /// failures only null out the affected records.
    #[instrument(skip(self))]
    pub async fn collect(&self) -> Result<Vec<Swatch>, CollectError> {
        let mut swatches = self.fetch_all().await?;
        self.resolve_images(&mut swatches).await;
        Ok(swatches)
    }

    /// Fetch all pages of swatch metaobjects, in upstream order.
    ///
    /// Pagination is strictly sequential since each request needs the cursor
    /// of the previous page's last edge.
    ///
    /// # Errors
    ///
    /// Returns `CollectError::Shopify` if any page fetch fails, and
    /// `CollectError::EmptyPage` if upstream claims more pages while
    /// returning an empty one.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Swatch>, CollectError> {
        let mut swatches = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0usize;

        loop {
            page += 1;
            let fetched = self.client.swatch_page(self.source, cursor.take()).await?;

            swatches.extend(fetched.swatches);

            if !fetched.has_next_page {
                break;
            }

            match fetched.last_cursor {
                Some(last) => cursor = Some(last),
                // Continuing with a stale cursor would refetch the same page forever
                None => return Err(CollectError::EmptyPage { page }),
            }
        }

        tracing::debug!(
            count = swatches.len(),
            pages = page,
            "fetched swatch collection"
        );
        Ok(swatches)
    }

    /// Resolve `main_image` media references across the collection.
    ///
    /// Fields whose value does not carry the media GID prefix are left
    /// untouched, which also makes a second pass over already-resolved
    /// records a no-op. Inline reference data short-circuits without a
    /// request; remaining records get one node lookup each, dispatched
    /// concurrently under the `Lookup` strategy. A failed or empty
    /// resolution nulls the field and moves on.
    #[instrument(skip(self, swatches), fields(count = swatches.len()))]
    pub async fn resolve_images(&self, swatches: &mut [Swatch]) {
        let mut pending: Vec<(usize, String)> = Vec::new();

        for (index, swatch) in swatches.iter_mut().enumerate() {
            let field = swatch.main_image_field();
            let inline_url = field.and_then(SwatchField::inline_image_url);
            let media_gid = field
                .and_then(|f| f.value.as_deref())
                .filter(|v| v.starts_with(MEDIA_IMAGE_PREFIX))
                .map(str::to_string);

            // Only media references participate; anything else stays
            // untouched even when stray inline data is attached
            let Some(gid) = media_gid else {
                continue;
            };

            if let Some(url) = inline_url {
                swatch.apply_main_image(Some(url));
                continue;
            }

            match self.source {
                ImageSource::Lookup => pending.push((index, gid)),
                ImageSource::Inline => {
                    tracing::debug!(id = %swatch.id, "media reference missing inline image data");
                    swatch.apply_main_image(None);
                }
            }
        }

        if pending.is_empty() {
            return;
        }

        let lookups = pending.into_iter().map(|(index, gid)| {
            let client = self.client.clone();
            async move {
                let resolved = match client.media_image_url(&gid).await {
                    Ok(url) => {
                        if url.is_none() {
                            tracing::debug!(media_id = %gid, "media image has no URL");
                        }
                        url
                    }
                    Err(error) => {
                        tracing::warn!(media_id = %gid, error = %error, "image resolution failed");
                        None
                    }
                };
                (index, resolved)
            }
        });

        for (index, url) in join_all(lookups).await {
            if let Some(swatch) = swatches.get_mut(index) {
                swatch.apply_main_image(url);
            }
        }
    }
}
