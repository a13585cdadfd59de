//! JSON wire format for the run-code API.
//!
//! Request body:
//!
//! ```json
//! { "code": "print(1)", "inputs": ["Ada"], "input_index": 1 }
//! ```
//!
//! Every field is optional. Responses are built from [`RunCodeResponse`] or,
//! for rejected requests, a bare `{"error": ...}` object.
//! [`handle_run_code`] is the transport-agnostic entry point: it takes the
//! HTTP method and raw body and returns a status code plus JSON body.

use serde::{Deserialize, Deserializer, Serialize};

use crate::executor::Executor;
use crate::types::{ExecutionOutcome, ExecutionRequest, RequestError};

/// Separator between partial output and the error line
pub const ERROR_BANNER: &str = "\n--- EXECUTION ERROR ---\n";

/// Decoded request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunCodeRequest {
    pub code: String,
    #[serde(deserialize_with = "answers_as_text")]
    pub inputs: Vec<String>,
    pub input_index: i64,
}

/// Response body for a request that reached evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunCodeResponse {
    Success {
        output: String,
        image: Option<String>,
        /// Reserved for rich HTML output; always null
        html: Option<String>,
    },
    InputRequired {
        prompt: String,
        next_input_index: usize,
        output: String,
    },
    Error {
        output: String,
    },
}

/// Body of a rejected request (wrong method, bad body)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub error: String,
}

/// JSON body of a [`WireResponse`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WireBody {
    Response(RunCodeResponse),
    Rejected(Rejection),
}

/// Status code plus body, ready for any HTTP layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub status_code: u16,
    pub body: WireBody,
}

impl WireResponse {
    fn ok(response: RunCodeResponse) -> Self {
        Self {
            status_code: 200,
            body: WireBody::Response(response),
        }
    }

    fn rejected(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            body: WireBody::Rejected(Rejection {
                error: error.into(),
            }),
        }
    }

    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Serialize the body; struct field order is the key order on the wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.body)
    }
}

/// Parse a request body into an [`ExecutionRequest`].
///
/// The blank-script check runs before cursor validation so an empty editor
/// always gets "No code provided".
pub fn decode_request(body: &[u8]) -> Result<ExecutionRequest, RequestError> {
    let request: RunCodeRequest = serde_json::from_slice(body).map_err(RequestError::Malformed)?;
    if request.code.trim().is_empty() {
        return Err(RequestError::EmptyScript);
    }
    ExecutionRequest::new(request.code, request.inputs, request.input_index)
}

/// Map an outcome onto the response shape clients expect.
pub fn encode_outcome(outcome: ExecutionOutcome) -> RunCodeResponse {
    match outcome {
        ExecutionOutcome::Completed { output, image } => RunCodeResponse::Success {
            output,
            image,
            html: None,
        },
        ExecutionOutcome::Paused {
            prompt,
            output,
            next_cursor,
        } => RunCodeResponse::InputRequired {
            prompt,
            next_input_index: next_cursor,
            output,
        },
        ExecutionOutcome::Failed {
            output,
            error_kind,
            error_detail,
        } => RunCodeResponse::Error {
            output: format!("{output}{ERROR_BANNER}{error_kind}: {error_detail}"),
        },
    }
}

/// Handle one run-code call end to end.
pub fn handle_run_code(method: &str, body: &[u8], executor: &Executor) -> WireResponse {
    if !method.eq_ignore_ascii_case("POST") {
        tracing::warn!(method, "rejected run-code request");
        return WireResponse::rejected(405, "Only POST requests are allowed");
    }

    match decode_request(body) {
        Ok(request) => WireResponse::ok(encode_outcome(executor.execute(&request))),
        Err(RequestError::EmptyScript) => WireResponse::ok(RunCodeResponse::Error {
            output: RequestError::EmptyScript.to_string(),
        }),
        Err(err @ RequestError::Malformed(_)) => {
            tracing::warn!(error = ?err, "rejected run-code request");
            WireResponse::rejected(400, err.to_string())
        }
        Err(err @ RequestError::CursorOutOfRange { .. }) => {
            tracing::warn!(error = %err, "rejected run-code request");
            WireResponse::rejected(400, "Invalid input_index")
        }
    }
}

// Answers typed into a form may arrive as numbers or booleans; they are
// passed to the script as text.
fn answers_as_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    values
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "input values must be strings, numbers or booleans, got {other}"
            ))),
        })
        .collect()
}
