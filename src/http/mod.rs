//! HTTP control surface: route table and the HTML panel.
//!
//! Everything here is transport-agnostic; the ESP-IDF server glue lives
//! in [`crate::adapters::http_server`].

pub mod page;
pub mod routes;

use crate::app::events::StatusSnapshot;
use crate::inbox;

use routes::Route;

/// A finished response, ready for whatever server sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
        }
    }
}

/// Answer one request.  Commands go to the inbox; the acknowledgement is
/// known up front, so the handler never waits for the control loop.
pub fn respond(uri: &str) -> Reply {
    match routes::parse_request(uri) {
        Some(Route::Page) => Reply {
            status: 200,
            content_type: "text/html",
            body: page::render_page(&inbox::latest_status()),
        },
        Some(Route::Status) => status_reply(&inbox::latest_status()),
        Some(Route::Command(cmd)) => {
            if inbox::push_command(cmd) {
                Reply::text(200, cmd.ack())
            } else {
                log::warn!("Command inbox full, dropped {:?}", cmd);
                Reply::text(503, "Busy")
            }
        }
        None => Reply::text(404, "Not Found"),
    }
}

fn status_reply(status: &StatusSnapshot) -> Reply {
    match serde_json::to_string(status) {
        Ok(body) => Reply {
            status: 200,
            content_type: "application/json",
            body,
        },
        Err(e) => {
            log::error!("Status encode failed: {}", e);
            Reply::text(500, "Internal Error")
        }
    }
}
