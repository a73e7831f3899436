pub mod client;
pub mod ticket;

pub use client::{JiraClient, TicketFetcher};
pub use ticket::TrackerTicket;
