//! Request handlers for Write and GetRecords.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::store::{CommitOutcome, RecordStore};
use recsync_engine::{Clock, TransactionApplier};
use recsync_protocol::{GetRecordsRequest, GetRecordsResponse, WriteRequest, WriteResponse};
use std::sync::Arc;
use tracing::{info, warn};

/// Context shared by request handlers.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Record store (shared across all handlers).
    pub store: Arc<dyn RecordStore>,
    applier: TransactionApplier,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(config: ServerConfig, store: Arc<dyn RecordStore>) -> Self {
        let applier = TransactionApplier::new(config.engine.clone());
        Self {
            config,
            store,
            applier,
        }
    }

    /// Replaces the clock used for `setNow`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.applier = self.applier.with_clock(clock);
        self
    }
}

/// Handler for client requests.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Handles a write.
    ///
    /// Loads the referenced records, applies the transaction to a copy, and
    /// commits only if none of the touched records changed in the meantime.
    /// A version conflict is returned as `Ok(WriteResponse::Conflict)`.
    pub fn handle_write(&self, request: WriteRequest) -> ServerResult<WriteResponse> {
        request.validate()?;
        let max = self.context.config.max_operations_per_transaction;
        if request.operations.len() > max {
            return Err(ServerError::InvalidRequest(format!(
                "too many operations: {} > {}",
                request.operations.len(),
                max
            )));
        }

        let original = self.context.store.load(&request.pointers())?;
        let outcome = match self.context.applier.apply_transaction(&original, &request) {
            Ok(outcome) => outcome,
            Err(err) => {
                let record = err.pointer().map(|p| p.to_string());
                warn!(
                    tx_id = %request.tx_id,
                    record = record.as_deref().unwrap_or("-"),
                    error = %err,
                    "transaction failed to apply"
                );
                return Err(err.into());
            }
        };

        match self
            .context
            .store
            .commit(&original, &outcome.records, &outcome.modified)?
        {
            CommitOutcome::Committed => {
                info!(
                    tx_id = %request.tx_id,
                    records = outcome.modified.len(),
                    "committed transaction"
                );
                Ok(WriteResponse::success(outcome.modified_records()))
            }
            CommitOutcome::Rejected { conflicts, missing } => {
                warn!(
                    tx_id = %request.tx_id,
                    conflicts = conflicts.len(),
                    missing = missing.len(),
                    "rejected transaction"
                );
                Ok(WriteResponse::rejected(conflicts, missing))
            }
        }
    }

    /// Handles a GetRecords request.
    pub fn handle_get_records(
        &self,
        request: GetRecordsRequest,
    ) -> ServerResult<GetRecordsResponse> {
        request.validate()?;
        let max = self.context.config.max_pointers_per_request;
        if request.pointers.len() > max {
            return Err(ServerError::InvalidRequest(format!(
                "too many pointers: {} > {}",
                request.pointers.len(),
                max
            )));
        }

        let record_map = self.context.store.load(&request.pointers)?;
        Ok(GetRecordsResponse::new(record_map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;
    use recsync_engine::FixedClock;
    use recsync_protocol::{ListPosition, Operation, RecordPointer, Transaction};
    use recsync_testkit::prelude::*;
    use serde_json::json;

    fn create_handler(store: Arc<MemoryRecordStore>) -> RequestHandler {
        let context = Arc::new(HandlerContext::new(ServerConfig::default(), store));
        RequestHandler::new(context)
    }

    fn seeded_store() -> Arc<MemoryRecordStore> {
        Arc::new(MemoryRecordStore::with_records(record_map([
            ("users", record(1, 1, json!({"name": "Ada"}))),
            ("lists", record(2, 3, json!({"items": ["a", "c"]}))),
            ("users", record(3, 1, json!({}))),
        ])))
    }

    #[test]
    fn write_returns_only_updated_records() {
        let store = seeded_store();
        let handler = create_handler(Arc::clone(&store));

        let response = handler
            .handle_write(transaction(vec![
                Operation::set("users", uuid(1), "name", json!("Grace")),
                Operation::set("users", uuid(1), "bio", json!("Admiral")),
            ]))
            .unwrap();

        let WriteResponse::Success { record_map } = response else {
            panic!("expected success");
        };
        assert_eq!(record_map.len(), 1);
        let user = record_map.get("users", &uuid(1)).unwrap();
        assert_eq!(user.version, 3);
        assert_eq!(store.get(&pointer("users", 1)).unwrap(), user.clone());
    }

    #[test]
    fn write_to_missing_record_fails_without_persisting() {
        let store = seeded_store();
        let handler = create_handler(Arc::clone(&store));
        let before = store.snapshot();

        let err = handler
            .handle_write(transaction(vec![
                Operation::set("users", uuid(1), "name", json!("Grace")),
                Operation::set("posts", uuid(404), "title", json!("x")),
            ]))
            .unwrap_err();

        assert!(matches!(err, ServerError::Engine(_)));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn write_to_protected_field_fails() {
        let handler = create_handler(seeded_store());
        let err = handler
            .handle_write(transaction(vec![Operation::set(
                "users",
                uuid(1),
                "version",
                json!(100),
            )]))
            .unwrap_err();
        assert_eq!(err.code(), recsync_protocol::ErrorCode::ProtectedField);
    }

    #[test]
    fn write_rejects_invalid_envelope() {
        let handler = create_handler(seeded_store());
        let mut tx = transaction(vec![Operation::set_now("users", uuid(1), "seen")]);
        tx.client_timestamp = 0;
        assert!(matches!(
            handler.handle_write(tx),
            Err(ServerError::Protocol(_))
        ));

        let empty = Transaction::new(uuid(7), vec![], 1);
        assert!(handler.handle_write(empty).is_err());
    }

    #[test]
    fn write_enforces_operation_limit() {
        let store = seeded_store();
        let context = Arc::new(HandlerContext::new(
            ServerConfig::default().with_max_operations(1),
            store,
        ));
        let handler = RequestHandler::new(context);

        let err = handler
            .handle_write(transaction(vec![
                Operation::set("users", uuid(1), "a", json!(1)),
                Operation::set("users", uuid(1), "b", json!(2)),
            ]))
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));
    }

    #[test]
    fn set_now_uses_context_clock() {
        use chrono::{TimeZone, Utc};

        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let context = HandlerContext::new(ServerConfig::default(), seeded_store())
            .with_clock(Arc::new(clock));
        let handler = RequestHandler::new(Arc::new(context));

        let response = handler
            .handle_write(transaction(vec![Operation::set_now("users", uuid(3), "seen_at")]))
            .unwrap();
        let WriteResponse::Success { record_map } = response else {
            panic!("expected success");
        };
        assert_eq!(
            record_map.get("users", &uuid(3)).unwrap().field("seen_at"),
            Some(&json!("2024-01-02T03:04:05.000Z"))
        );
    }

    #[test]
    fn sequential_writes_build_on_each_other() {
        let store = seeded_store();
        let handler = create_handler(Arc::clone(&store));

        for value in ["b", "d"] {
            let response = handler
                .handle_write(transaction(vec![Operation::list_insert(
                    "lists",
                    uuid(2),
                    "items",
                    json!(value),
                    ListPosition::Append,
                )]))
                .unwrap();
            assert!(response.is_success());
        }

        let list = store.get(&pointer("lists", 2)).unwrap();
        assert_eq!(list.version, 5);
        assert_eq!(list.field("items"), Some(&json!(["a", "c", "b", "d"])));
    }

    #[test]
    fn get_records_returns_existing_subset() {
        let handler = create_handler(seeded_store());
        let response = handler
            .handle_get_records(GetRecordsRequest::new(vec![
                pointer("users", 1),
                pointer("users", 99),
            ]))
            .unwrap();
        assert_eq!(response.record_map.len(), 1);
    }

    #[test]
    fn get_records_enforces_bounds() {
        let handler = create_handler(seeded_store());
        assert!(handler
            .handle_get_records(GetRecordsRequest::new(vec![]))
            .is_err());

        let context = Arc::new(HandlerContext::new(
            ServerConfig::default().with_max_pointers(2),
            seeded_store(),
        ));
        let limited = RequestHandler::new(context);
        let pointers: Vec<RecordPointer> = (1..=3).map(|n| pointer("users", n)).collect();
        assert!(matches!(
            limited.handle_get_records(GetRecordsRequest::new(pointers)),
            Err(ServerError::InvalidRequest(_))
        ));
    }
}
