//! Single-shot dispatch of catalog operations

use serde_json::{Value, json};
use tracing::{debug, info};

use crate::client::ComposeClient;
use crate::error::Result;
use crate::operation::Operation;

/// What came back from a successful call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Parsed response body
    Body(Value),
    /// Status-only operation answered with a success status
    Accepted { status: u16 },
}

impl Outcome {
    /// JSON view used by the structured output modes
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Body(value) => value,
            Outcome::Accepted { status } => json!({ "status": "removed", "http_status": status }),
        }
    }
}

/// Sends one operation and waits for its response
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: ComposeClient,
}

impl Dispatcher {
    pub fn new(client: ComposeClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ComposeClient {
        &self.client
    }

    pub async fn dispatch(&self, operation: &Operation) -> Result<Outcome> {
        let request = operation.request();
        info!("Dispatching {}", operation.command_name());

        let response = self.client.execute(&request).await?;

        if operation.expects_body() {
            Ok(Outcome::Body(response.json()?))
        } else {
            debug!(
                "{} is status-only, ignoring {} byte body",
                operation.command_name(),
                response.body.len()
            );
            Ok(Outcome::Accepted {
                status: response.status,
            })
        }
    }
}
