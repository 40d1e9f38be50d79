use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of a successful price read.
///
/// A field is `null` when it could not be retrieved while other fields could.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PricesResponse {
    pub eth: Option<f64>,
    pub btc: Option<f64>,
}

/// Body returned alongside a non-2xx status
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Number of statically configured wrapper strategies
    pub strategies: usize,
    /// Latest block seen on the RPC endpoint, absent if it could not be reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_block_height: Option<u64>,
}
