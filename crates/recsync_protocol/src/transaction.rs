//! Client transactions.

use crate::error::{ProtocolError, ProtocolResult};
use crate::operation::{collect_pointers, Operation};
use crate::record::RecordPointer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An ordered batch of operations submitted by one client.
///
/// Operations are applied strictly in order; later operations observe the
/// effects of earlier ones on the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Client-generated transaction ID.
    pub tx_id: Uuid,
    /// Authenticated author of the transaction.
    pub author_id: Uuid,
    /// Operations, in application order.
    pub operations: Vec<Operation>,
    /// Client wall-clock time when the transaction was built (millis).
    pub client_timestamp: u64,
}

impl Transaction {
    /// Creates a transaction with a fresh random ID.
    pub fn new(author_id: Uuid, operations: Vec<Operation>, client_timestamp: u64) -> Self {
        Self {
            tx_id: Uuid::new_v4(),
            author_id,
            operations,
            client_timestamp,
        }
    }

    /// Returns the distinct records this transaction touches, in first-seen order.
    pub fn pointers(&self) -> Vec<RecordPointer> {
        collect_pointers(&self.operations)
    }

    /// Checks the envelope constraints and every operation in it.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.operations.is_empty() {
            return Err(ProtocolError::invalid_transaction(
                "operations must contain at least one operation",
            ));
        }
        if self.client_timestamp == 0 {
            return Err(ProtocolError::invalid_transaction(
                "clientTimestamp must be a positive integer",
            ));
        }
        for (index, op) in self.operations.iter().enumerate() {
            op.validate().map_err(|e| {
                ProtocolError::invalid_transaction(format!("operation {index}: {e}"))
            })?;
        }
        Ok(())
    }

    /// Decodes a transaction from an untyped body and validates it.
    pub fn from_value(value: Value) -> ProtocolResult<Self> {
        let transaction: Transaction = serde_json::from_value(value)?;
        transaction.validate()?;
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(operations: Value, client_timestamp: Value) -> Value {
        json!({
            "txId": "00000000-0000-0000-0000-000000000001",
            "authorId": "00000000-0000-0000-0000-000000000002",
            "operations": operations,
            "clientTimestamp": client_timestamp
        })
    }

    fn set_name() -> Value {
        json!({
            "type": "set",
            "table": "users",
            "id": "00000000-0000-0000-0000-000000000003",
            "key": "name",
            "value": "Grace"
        })
    }

    #[test]
    fn parses_valid_transaction() {
        let operations = json!([set_name(), set_name()]);
        let tx = Transaction::from_value(body(operations, json!(1_700_000_000_000u64))).unwrap();

        assert_eq!(tx.tx_id, Uuid::from_u128(1));
        assert_eq!(tx.author_id, Uuid::from_u128(2));
        assert_eq!(tx.operations.len(), 2);
        assert_eq!(tx.pointers().len(), 1);
    }

    #[test]
    fn rejects_empty_operations() {
        let result = Transaction::from_value(body(json!([]), json!(1)));
        assert!(matches!(
            result,
            Err(ProtocolError::InvalidTransaction { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_timestamp() {
        let zero = Transaction::from_value(body(json!([set_name()]), json!(0)));
        assert!(matches!(zero, Err(ProtocolError::InvalidTransaction { .. })));

        let negative = Transaction::from_value(body(json!([set_name()]), json!(-5)));
        assert!(matches!(negative, Err(ProtocolError::Json(_))));

        let fractional = Transaction::from_value(body(json!([set_name()]), json!(1.5)));
        assert!(fractional.is_err());
    }

    #[test]
    fn reports_invalid_operation_index() {
        let mut bad = set_name();
        bad["key"] = json!("");

        let err = Transaction::from_value(body(json!([set_name(), bad]), json!(1))).unwrap_err();
        assert!(err.to_string().contains("operation 1"));
    }

    #[test]
    fn rejects_bad_author_uuid() {
        let mut value = body(json!([set_name()]), json!(1));
        value["authorId"] = json!("nobody");
        assert!(Transaction::from_value(value).is_err());
    }
}
