// Work-order overlay service. Token exchange plus a paged query; any
// failure degrades to an empty ticket list with an error message, never an
// error that halts the rest of the view.

use serde::Serialize;

use crate::tickets::auth::exchange_token;
use crate::tickets::client::TicketClient;
use crate::tickets::WorkOrder;
use crate::types::Config;

/// Result type for the ticket overlay.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TicketsResult {
    Success { tickets: Vec<WorkOrder> },
    Disabled { message: String },
    Error { message: String, tickets: Vec<WorkOrder> },
}

/// Fetch work orders with the given status ("OPEN" by default upstream).
pub async fn fetch_open_tickets(config: &Config, status: &str) -> TicketsResult {
    let Some(tickets_config) = config.tickets.as_ref() else {
        return TicketsResult::Disabled {
            message: "Ticket API not configured.".to_string(),
        };
    };

    let http = reqwest::Client::new();
    let token = match exchange_token(&http, tickets_config).await {
        Ok(token) => token,
        Err(e) => {
            log::warn!("Ticket token exchange failed: {}", e);
            return TicketsResult::Error {
                message: format!("Could not authenticate to ticket API: {}", e),
                tickets: Vec::new(),
            };
        }
    };

    let client = TicketClient::new(&tickets_config.base_url, &token.access_token);
    match client
        .fetch_work_orders(status, tickets_config.page_size)
        .await
    {
        Ok(tickets) => TicketsResult::Success { tickets },
        Err(e) => {
            log::warn!("Work-order query failed: {}", e);
            TicketsResult::Error {
                message: format!("Work-order query failed: {}", e),
                tickets: Vec::new(),
            }
        }
    }
}
