use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvmClientError {
    #[error("Unable to parse endpoint: {0}")]
    ParseEndpoint(String),

    #[error("Unable to create web socket provider: {0:#?}")]
    WebSocketProvider(anyhow::Error),

    #[error("Unable to get block height: {0}")]
    BlockHeight(String),
}
