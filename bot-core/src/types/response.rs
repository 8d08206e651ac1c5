//! Handler chain result type and the channel's send acknowledgement.

use serde::{Deserialize, Serialize};

/// Handler result for the chain; the final value is handed to every `after()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// End the handle phase.
    Stop,
}

/// Acknowledgement returned by the channel for a sent activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceResponse {
    #[serde(default)]
    pub id: String,
}
