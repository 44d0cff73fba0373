// This file is part of Sponsor.
//
// Sponsor is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Sponsor is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Sponsor.
// If not, see https://www.gnu.org/licenses/.

//! Minimal JSON-RPC server for exercising the clients over real HTTP.

use std::{thread, time::Duration};

use serde_json::{json, Value};
use tiny_http::{Header, Response, Server};

/// Serve JSON-RPC on an ephemeral port, answering every request with the
/// result `handler` computes from the request. Returns the server URL.
pub(crate) fn serve<F>(handler: F) -> String
where
    F: Fn(&Value) -> Value + Send + 'static,
{
    serve_delayed(Duration::ZERO, handler)
}

/// Like [`serve`], waiting `delay` before each answer
pub(crate) fn serve_delayed<F>(delay: Duration, handler: F) -> String
where
    F: Fn(&Value) -> Value + Send + 'static,
{
    serve_raw(delay, move |request| {
        json!({
            "jsonrpc": "2.0",
            "id": request["id"].clone(),
            "result": handler(request),
        })
    })
}

/// Serve JSON-RPC answering every request with the full response object
/// `handler` computes from the full request object
pub(crate) fn serve_raw<F>(delay: Duration, handler: F) -> String
where
    F: Fn(&Value) -> Value + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body).unwrap();
            let body: Value = serde_json::from_str(&body).unwrap();

            thread::sleep(delay);
            let response = Response::from_string(handler(&body).to_string()).with_header(
                Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
            );
            let _ = request.respond(response);
        }
    });

    format!("http://127.0.0.1:{port}")
}
