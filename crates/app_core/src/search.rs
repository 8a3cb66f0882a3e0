//! Image search collaborator interface

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;

/// One search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Authorization credential forwarded to the provider
    pub access_key: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: None,
            per_page: None,
            access_key: access_key.into(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    /// `Authorization` header value
    pub fn authorization(&self) -> String {
        format!("Client-ID {}", self.access_key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub total: u64,
    pub total_pages: u32,
    pub results: Vec<ImageRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub urls: ImageUrls,
    pub width: u32,
    pub height: u32,
    #[serde(default, rename = "aspectRatio", skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(default)]
    pub alt_description: Option<String>,
    pub user: Attribution,
}

impl ImageRecord {
    /// Width over height, from the record or its dimensions
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio.or_else(|| {
            (self.height > 0).then(|| f64::from(self.width) / f64::from(self.height))
        })
    }
}

/// Image URLs from largest to smallest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub name: String,
    pub links: AttributionLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionLinks {
    pub html: String,
}

/// Provider of image search results.
///
/// Errors surface as [`crate::AppError::Fetch`]; callers do not retry.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResults>;
}
