//! Node API response bodies and their decoding.

use nsg_types::{AssetBalance, BlockHeader, ChainClientError, Transaction};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Error body sent with non-200 responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    /// Status text.
    #[serde(default)]
    pub status: String,
    /// Application error code.
    #[serde(default)]
    pub code: i64,
    /// Error message.
    #[serde(default)]
    pub error: String,
}

/// `GET /api/blocks/getHeight`
#[derive(Debug, Deserialize)]
pub struct HeightResponse {
    /// Chain height.
    pub height: u64,
}

/// `GET /api/blocks/get`
#[derive(Debug, Deserialize)]
pub struct BlockResponse {
    /// Block header, absent when the height is unknown.
    pub block: Option<BlockHeader>,
}

/// `GET /api/transactions` and `GET /api/uia/transactions/get`
#[derive(Debug, Deserialize)]
pub struct TransactionsResponse {
    /// Transactions, possibly empty.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// `GET /api/accounts/getBalance`
#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    /// Balance in the smallest unit.
    pub balance: u64,
}

/// `GET /api/uia/balances/{address}/{currency}`
#[derive(Debug, Deserialize)]
pub struct AssetBalanceResponse {
    /// Asset balance, absent when the account holds none.
    pub balance: Option<AssetBalance>,
}

/// Decode a node response body.
///
/// Non-200 statuses carry `{status, code, error}`; a 200 body with
/// `"success": false` is rejected as well.
pub fn decode_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<T, ChainClientError> {
    if status != 200 {
        let error: ErrorResponse = serde_json::from_str(body).map_err(|_| {
            ChainClientError::InvalidResponse(format!(
                "cannot read error response (HTTP {}): {}",
                status, body
            ))
        })?;
        return Err(ChainClientError::Node {
            status: if error.status.is_empty() {
                status.to_string()
            } else {
                error.status
            },
            code: error.code,
            message: error.error,
        });
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ChainClientError::InvalidResponse(format!("body is not JSON: {}", e)))?;
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("success: false");
        return Err(ChainClientError::InvalidResponse(message.to_string()));
    }
    serde_json::from_value(value).map_err(|e| ChainClientError::InvalidResponse(e.to_string()))
}

/// Rejection reason of a broadcast response, `None` when accepted.
pub fn broadcast_rejection(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match value.get("error") {
            None | Some(Value::Null) => None,
            Some(Value::String(message)) => Some(message.clone()),
            Some(other) => Some(other.to_string()),
        },
        Err(_) => Some(format!("unreadable broadcast response: {}", body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsg_types::TxType;

    #[test]
    fn test_decode_block() {
        let body = r#"{"success":true,"block":{"id":"b2","version":0,"timestamp":59049090,
            "height":5093159,"previousBlock":"b1","numberOfTransactions":2,
            "totalAmount":0,"totalFee":0}}"#;

        let response: BlockResponse = decode_response(200, body).unwrap();
        let block = response.block.unwrap();

        assert_eq!(block.height, 5093159);
        assert_eq!(block.previous_hash(), "b1");
        assert_eq!(block.number_of_transactions, 2);
    }

    #[test]
    fn test_decode_transactions() {
        let body = r#"{"success":true,"transactions":[{"id":"t1","height":"7","blockId":"b7",
            "type":14,"timestamp":59049090,"senderId":"NA","recipientId":"NX","amount":0,
            "fee":10000000,"signature":"aa","message":"",
            "asset":{"uiaTransfer":{"transactionId":"t1","currency":"ABC.COIN","amount":"1234","precision":2}}}],
            "count":1}"#;

        let response: TransactionsResponse = decode_response(200, body).unwrap();

        assert_eq!(response.transactions.len(), 1);
        let tx = &response.transactions[0];
        assert_eq!(tx.tx_type, TxType::AssetTransfer);
        assert_eq!(tx.block_height(), Some(7));
        assert_eq!(tx.uia_transfer().unwrap().amount, "1234");
    }

    #[test]
    fn test_decode_height_and_balances() {
        let height: HeightResponse = decode_response(200, r#"{"success":true,"height":42}"#).unwrap();
        assert_eq!(height.height, 42);

        let balance: BalanceResponse =
            decode_response(200, r#"{"success":true,"balance":123450000}"#).unwrap();
        assert_eq!(balance.balance, 123_450_000);

        let asset: AssetBalanceResponse = decode_response(
            200,
            r#"{"balance":{"currency":"ABC.COIN","balance":"1234","precision":2}}"#,
        )
        .unwrap();
        assert_eq!(asset.balance.unwrap().balance, "1234");
    }

    #[test]
    fn test_node_error_body() {
        let result: Result<HeightResponse, _> =
            decode_response(500, r#"{"status":"error","code":7,"error":"db locked"}"#);

        match result {
            Err(ChainClientError::Node { status, code, message }) => {
                assert_eq!(status, "error");
                assert_eq!(code, 7);
                assert_eq!(message, "db locked");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_error_body() {
        let result: Result<HeightResponse, _> = decode_response(502, "<html>bad gateway</html>");
        assert!(matches!(result, Err(ChainClientError::InvalidResponse(_))));
    }

    #[test]
    fn test_success_false_is_rejected() {
        let result: Result<BlockResponse, _> =
            decode_response(200, r#"{"success":false,"error":"Block not found"}"#);
        match result {
            Err(ChainClientError::InvalidResponse(message)) => assert_eq!(message, "Block not found"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_invalid() {
        let result: Result<HeightResponse, _> = decode_response(200, r#"{"success":true}"#);
        assert!(matches!(result, Err(ChainClientError::InvalidResponse(_))));
    }

    #[test]
    fn test_broadcast_rejection() {
        assert_eq!(broadcast_rejection(r#"{"success":true,"transactionId":"t1"}"#), None);
        assert_eq!(
            broadcast_rejection(r#"{"success":false,"error":"Insufficient balance"}"#).as_deref(),
            Some("Insufficient balance")
        );
        assert!(broadcast_rejection("not json").is_some());
    }
}
