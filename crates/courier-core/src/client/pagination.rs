//! Pagination helper for list endpoints

use super::types::ApiClient;
use crate::error::{CourierError, CourierResult};
use crate::transport::ApiRequest;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page-numbered pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Query parameter carrying the page number
    pub page_param: String,
    /// Query parameter carrying the page size
    pub per_page_param: String,
    /// Requested page size
    pub per_page: u32,
    /// Hard bound on pages fetched; `None` runs until an empty page
    pub max_pages: Option<u32>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_param: "page".to_string(),
            per_page_param: "per_page".to_string(),
            per_page: 10,
            max_pages: None,
        }
    }
}

impl PageConfig {
    /// Rename the pagination query parameters
    pub fn with_params(
        mut self,
        page_param: impl Into<String>,
        per_page_param: impl Into<String>,
    ) -> Self {
        self.page_param = page_param.into();
        self.per_page_param = per_page_param.into();
        self
    }

    /// Set the page size
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Bound the number of pages fetched
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

impl ApiClient {
    /// Fetch every page of a list endpoint
    ///
    /// Pages are requested with increasing page numbers until a page comes
    /// back empty or `max_pages` is reached. Each page body must be a JSON
    /// array; each page request goes through the full cache → admit →
    /// retry path.
    pub async fn fetch_all_pages(
        &self,
        path: &str,
        query: &[(&str, &str)],
        pages: &PageConfig,
    ) -> CourierResult<Vec<serde_json::Value>> {
        let mut all_items = Vec::new();
        let mut page = 1u32;

        loop {
            let mut request = ApiRequest::get(path);
            for (key, value) in query {
                request = request.with_query(*key, *value);
            }
            request = request
                .with_query(&pages.page_param, page.to_string())
                .with_query(&pages.per_page_param, pages.per_page.to_string());

            let response = self.call(&request).await?;
            let items: Vec<serde_json::Value> = response.json().map_err(|_| {
                CourierError::json(format!("page {page} of {path} is not a JSON array"))
            })?;

            if items.is_empty() {
                break;
            }

            debug!(page, items = items.len(), "page fetched");
            all_items.extend(items);

            if let Some(max_pages) = pages.max_pages {
                if page >= max_pages {
                    break;
                }
            }
            page += 1;
        }

        Ok(all_items)
    }
}
