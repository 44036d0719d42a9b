//! JSON request handling: the transport-agnostic core of the generation
//! endpoint.

use crate::pipeline::{self, Automata};
use serde::Deserialize;
use serde_json::{Value, json};

/// A generation request.
#[derive(Debug, Deserialize)]
pub struct Request {
    /// The pattern to compile. Defaults to empty when the key is missing,
    /// which [`respond`] rejects the same way as an empty pattern.
    #[serde(default)]
    pub regex: String,
}

/// An HTTP-style response: a status code plus a JSON body. Embedding this
/// in an actual server is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP-style status code.
    pub status: u16,
    /// JSON body.
    pub body: Value,
}

impl Response {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn bad_request(body: Value) -> Self {
        Self { status: 400, body }
    }

    fn server_error(body: Value) -> Self {
        Self { status: 500, body }
    }
}

/// Handle one request body.
///
/// Malformed JSON and a missing or empty `regex` answer 400 with an
/// `error` field; a pipeline failure answers 400 with the stage error in
/// `details`; success answers 200 with the `nfa`, `dfa`, and `min_dfa`
/// objects.
pub fn respond(body: &str) -> Response {
    let request: Request = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(error) => {
            return Response::bad_request(json!({
                "error": format!("malformed request: {error}"),
            }));
        }
    };

    if request.regex.is_empty() {
        return Response::bad_request(json!({
            "error": "regex parameter is required",
        }));
    }

    log::debug!("generation request for pattern {:?}", request.regex);
    let automata = match pipeline::compile(&request.regex) {
        Ok(automata) => automata,
        Err(error) => {
            return Response::bad_request(json!({
                "error": "failed to generate automata",
                "details": error.to_string(),
            }));
        }
    };

    match envelope(&automata) {
        Ok(body) => Response::ok(body),
        Err(error) => Response::server_error(json!({
            "error": format!("serialization failed: {error}"),
        })),
    }
}

/// Bundle the three automata into the response envelope, renumbered the
/// same way the JSON files are written.
fn envelope(automata: &Automata) -> serde_json::Result<Value> {
    Ok(json!({
        "nfa": serde_json::to_value(automata.nfa.renumbered())?,
        "dfa": serde_json::to_value(automata.dfa.renumbered())?,
        "min_dfa": serde_json::to_value(automata.min_dfa.renumbered())?,
    }))
}
