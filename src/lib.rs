//! Facility project dashboard core.
//!
//! Loads a spreadsheet-backed project tracker, filters it by facility key
//! (facility > city > state precedence), throttles "request an update"
//! actions against an external append-only request log (7-day cooldown),
//! posts a notification webhook, and overlays work-order data from a
//! ticketing API. The UI is an external collaborator: services return
//! serializable result types and never panic past a boundary.

pub mod facility;
pub mod notify;
pub mod request_log;
pub mod services;
pub mod sheet;
pub mod state;
pub mod throttle;
pub mod tickets;
pub mod tracker;
pub mod types;
