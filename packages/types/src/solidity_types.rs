mod price_feed {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[derive(Debug)]
        interface IPriceFeed {
            function getEthPrice() external view returns (uint256);
            function getBtcPrice() external view returns (uint256);
            function getMultiplePrices() external view returns (uint256 ethPrice, uint256 btcPrice);
        }
    );
}

pub use price_feed::IPriceFeed;
