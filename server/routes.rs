use std::io::Cursor;

use log::{error, info, warn};
use tiny_http::{Header, Request, Response, StatusCode};

use dense_nn::control::{status_for, Command, Reply};

use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub fn text_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        vec![Header::from_bytes(&b"Content-Type"[..], &b"text/plain; charset=utf-8"[..]).unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    text_response(404, "404 Not Found".to_owned())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Parses the request into a [`Command`], runs it against the shared
/// network and responds. A stop command unblocks the accept loop after
/// its reply has been sent.
pub fn dispatch(request: Request, state: SharedState) {
    let url = request.url().to_owned();
    info!("{} {}", request.method(), url);

    let (path, query) = match url.find('?') {
        Some(pos) => (&url[..pos], &url[pos + 1..]),
        None => (url.as_str(), ""),
    };

    let mut stopping = false;
    let response = match Command::from_request(path, query) {
        Ok(None) => not_found(),
        Err(err) => text_response(status_for(&err), err.to_string()),
        Ok(Some(command)) => match state.network.lock() {
            Err(_) => {
                error!("network lock poisoned");
                text_response(500, "network unavailable".to_owned())
            }
            Ok(mut network) => match command.execute(&mut network) {
                Ok(Reply::Text(body)) => text_response(200, body),
                Ok(Reply::Stopping(body)) => {
                    stopping = true;
                    text_response(200, body)
                }
                Err(err) => text_response(status_for(&err), err.to_string()),
            },
        },
    };

    if let Err(err) = request.respond(response) {
        warn!("failed to send response for {}: {}", url, err);
    }
    if stopping {
        info!("stop requested");
        state.server.unblock();
    }
}
