//! Work-order queries against the ticketing API.
//!
//! Status-filtered pages of records; the paginated variant follows the
//! `next` continuation link until exhausted. A safety cap bounds runaway
//! pagination.

use serde::Deserialize;

use super::{TicketApiError, WorkOrder};

/// Hard ceiling on continuation-link follows per query.
const MAX_PAGES: usize = 50;

pub struct TicketClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct WorkOrderPage {
    #[serde(default, alias = "workOrders", alias = "items")]
    pub records: Vec<WorkOrder>,
    #[serde(default, alias = "nextPage", alias = "@odata.nextLink")]
    pub next: Option<String>,
}

impl TicketClient {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Fetch all work orders with the given status, following continuation
    /// links up to the page cap.
    pub async fn fetch_work_orders(
        &self,
        status: &str,
        page_size: u32,
    ) -> Result<Vec<WorkOrder>, TicketApiError> {
        let first = format!(
            "{}/workorders?status={}&limit={}",
            self.base_url,
            urlencode(status),
            page_size
        );

        let mut records = Vec::new();
        let mut next_url = Some(first);
        let mut pages = 0usize;

        while let Some(url) = next_url {
            if pages >= MAX_PAGES {
                log::warn!("Work-order pagination stopped at {} pages", MAX_PAGES);
                break;
            }
            pages += 1;

            let page = self.fetch_page(&url).await?;
            records.extend(page.records);
            next_url = page.next.map(|n| self.absolute(&n));
        }

        log::debug!("Fetched {} work orders in {} page(s)", records.len(), pages);
        Ok(records)
    }

    async fn fetch_page(&self, url: &str) -> Result<WorkOrderPage, TicketApiError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TicketApiError::ApiError {
                status,
                message: message.chars().take(200).collect(),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        parse_work_order_page(&body)
    }

    /// Continuation links come back either absolute or server-relative.
    fn absolute(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}/{}", self.base_url, link.trim_start_matches('/'))
        }
    }
}

/// Decode one page. The record array has appeared under `records`,
/// `workOrders` and `items` across API versions.
pub fn parse_work_order_page(body: &serde_json::Value) -> Result<WorkOrderPage, TicketApiError> {
    serde_json::from_value(body.clone())
        .map_err(|e| TicketApiError::InvalidResponse(format!("work-order page: {}", e)))
}

fn urlencode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
