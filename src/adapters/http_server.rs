//! ESP-IDF HTTP server glue.
//!
//! Registers every control-panel path on `EspHttpServer`; each handler
//! hands the raw URI to [`http::respond`](crate::http::respond) and
//! writes back whatever it returns.  A trailing wildcard route answers
//! unknown paths with the same 404 the router produces.
//!
//! The server runs in its own ESP-IDF task.  Handlers only touch the
//! inbox and the status board, never the relays.

use esp_idf_svc::http::Method;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::io::Write;
use log::{info, warn};

use crate::error::CommsError;
use crate::http::{self, routes};

/// Start the server and register the routes.  The returned handle must
/// be kept alive for as long as the panel should answer.
pub fn start() -> Result<EspHttpServer<'static>, CommsError> {
    let config = Configuration {
        uri_match_wildcard: true,
        max_uri_handlers: routes::PATHS.len() + 2,
        ..Default::default()
    };
    let mut server = EspHttpServer::new(&config).map_err(|e| {
        warn!("HTTP: server start failed: {}", e);
        CommsError::HttpServerFailed
    })?;

    for path in routes::PATHS.iter().copied().chain(core::iter::once("/*")) {
        server
            .fn_handler(path, Method::Get, |req| -> anyhow::Result<()> {
                let reply = http::respond(req.uri());
                let mut resp = req.into_response(
                    reply.status,
                    None,
                    &[("Content-Type", reply.content_type)],
                )?;
                resp.write_all(reply.body.as_bytes())?;
                Ok(())
            })
            .map_err(|e| {
                warn!("HTTP: registering {} failed: {}", path, e);
                CommsError::HttpServerFailed
            })?;
    }

    info!("HTTP: {} routes registered", routes::PATHS.len());
    Ok(server)
}
