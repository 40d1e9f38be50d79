use alloy_provider::Provider;

use crate::{error::EvmClientError, evm_client::EvmQueryClient};

/// Queries the latest block number, which is enough to tell the RPC endpoint is serving
pub async fn check_evm_block_height(client: &EvmQueryClient) -> Result<u64, EvmClientError> {
    let height = client
        .provider
        .get_block_number()
        .await
        .map_err(|e| EvmClientError::BlockHeight(e.to_string()))?;

    tracing::debug!("Evm endpoint {} is at block {height}", client.endpoint);

    Ok(height)
}
