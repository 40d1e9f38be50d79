use std::collections::BTreeMap;

use alloy_primitives::U256;
use oracle_types::{FieldId, PricesResponse, PRICE_DECIMALS};

use crate::{
    error::{ErrorKind, RetrievalError},
    orchestrator::FieldOutcome,
};

/// Decimal prices for the fields that were retrieved, plus the fatal error if there was one
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalResult {
    pub prices: BTreeMap<FieldId, f64>,
    pub error: Option<RetrievalError>,
}

impl RetrievalResult {
    pub fn failed(error: RetrievalError) -> Self {
        Self {
            prices: BTreeMap::new(),
            error: Some(error),
        }
    }

    pub fn get(&self, field: FieldId) -> Option<f64> {
        self.prices.get(&field).copied()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(RetrievalError::kind)
    }

    /// The success body, `null` for each field that is missing
    pub fn to_response(&self) -> PricesResponse {
        PricesResponse {
            eth: self.get(FieldId::Eth),
            btc: self.get(FieldId::Btc),
        }
    }

    /// Ok with the response body unless a fatal error was recorded
    pub fn into_prices(self) -> Result<PricesResponse, RetrievalError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.to_response()),
        }
    }
}

/// Converts an 8-decimal fixed-point raw value into a decimal
pub fn scale(raw: U256) -> f64 {
    // f64 parsing of the full decimal string, so values beyond u128 do not truncate
    let value = raw.to_string().parse::<f64>().unwrap_or(f64::INFINITY);
    value / 10f64.powi(PRICE_DECIMALS as i32)
}

/// Pure: the same outcomes always produce the same result
pub fn normalize(outcomes: &[FieldOutcome]) -> RetrievalResult {
    let mut prices = BTreeMap::new();
    let mut failures = Vec::new();

    for outcome in outcomes {
        match &outcome.result {
            Ok(served) => {
                prices.insert(outcome.field, scale(served.raw));
            }
            Err(err) => failures.push(err.clone()),
        }
    }

    let error = if !outcomes.is_empty() && prices.is_empty() {
        Some(RetrievalError::AllFieldsUnavailable(failures))
    } else {
        None
    };

    RetrievalResult { prices, error }
}

#[cfg(test)]
mod tests {
    use oracle_types::Protocol;

    use super::*;
    use crate::error::{FallbackError, FieldUnavailable, TransportError};

    fn unavailable(field: FieldId) -> FieldOutcome {
        FieldOutcome::unavailable(FieldUnavailable {
            field,
            primary: TransportError::Payload("gateway down".to_string()),
            fallback: FallbackError::Call(TransportError::Payload("gateway down".to_string())),
        })
    }

    #[test]
    fn scales_by_eight_decimals() {
        assert_eq!(scale(U256::from(350000000000u64)), 3500.0);
        assert_eq!(scale(U256::from(6000000000000u64)), 60000.0);
        assert_eq!(scale(U256::ZERO), 0.0);
        assert_eq!(scale(U256::from(1u64)), 0.00000001);
    }

    #[test]
    fn normalize_is_pure() {
        let outcomes = vec![
            FieldOutcome::success(FieldId::Eth, U256::from(350000000000u64), Protocol::Modern),
            unavailable(FieldId::Btc),
        ];

        let first = normalize(&outcomes);
        let second = normalize(&outcomes);
        assert_eq!(first, second);
        assert_eq!(first.get(FieldId::Eth), Some(3500.0));
        assert_eq!(first.get(FieldId::Btc), None);
        assert_eq!(first.error, None);
    }

    #[test]
    fn every_field_failing_is_fatal() {
        let result = normalize(&[unavailable(FieldId::Eth), unavailable(FieldId::Btc)]);

        assert!(result.prices.is_empty());
        assert_eq!(result.error_kind(), Some(ErrorKind::AllFieldsUnavailable));
        match result.into_prices().unwrap_err() {
            RetrievalError::AllFieldsUnavailable(causes) => assert_eq!(causes.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nothing_requested_is_not_an_error() {
        let result = normalize(&[]);
        assert_eq!(result.error, None);
        assert_eq!(
            result.to_response(),
            PricesResponse {
                eth: None,
                btc: None
            }
        );
    }
}
