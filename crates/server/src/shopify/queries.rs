//! GraphQL documents for the Admin API.
//!
//! Plain query strings, parameterized through GraphQL variables so the
//! constants in [`super::metaobjects`] stay on the Rust side.

use crate::config::ImageSource;

/// One page of swatch metaobjects with per-edge cursors.
pub const SWATCH_PAGE: &str = r"
    query SwatchPage($type: String!, $first: Int!, $cursor: String) {
        metaobjects(type: $type, first: $first, after: $cursor) {
            pageInfo {
                hasNextPage
            }
            edges {
                cursor
                node {
                    id
                    handle
                    fields {
                        key
                        value
                    }
                }
            }
        }
    }
";

/// Same page query, with the media image resolved inline on each field.
pub const SWATCH_PAGE_WITH_REFERENCES: &str = r"
    query SwatchPage($type: String!, $first: Int!, $cursor: String) {
        metaobjects(type: $type, first: $first, after: $cursor) {
            pageInfo {
                hasNextPage
            }
            edges {
                cursor
                node {
                    id
                    handle
                    fields {
                        key
                        value
                        reference {
                            ... on MediaImage {
                                image {
                                    url
                                }
                            }
                        }
                    }
                }
            }
        }
    }
";

/// Resolve a single `MediaImage` node to its image URL.
pub const MEDIA_IMAGE: &str = r"
    query MediaImage($id: ID!) {
        node(id: $id) {
            ... on MediaImage {
                image {
                    url
                }
            }
        }
    }
";

/// Page query matching the configured image source.
#[must_use]
pub const fn page_query(source: ImageSource) -> &'static str {
    match source {
        ImageSource::Lookup => SWATCH_PAGE,
        ImageSource::Inline => SWATCH_PAGE_WITH_REFERENCES,
    }
}
