//! Server facade.

use crate::config::ServerConfig;
use crate::handler::{HandlerContext, RequestHandler};
use crate::store::{MemoryRecordStore, RecordStore};
use recsync_protocol::{
    ErrorResponse, GetRecordsRequest, GetRecordsResponse, Transaction, WriteRequest,
    WriteResponse,
};
use serde_json::Value;
use std::sync::Arc;

/// The recsync server.
///
/// Accepts already-authenticated requests, either typed or as untyped JSON
/// bodies, and answers with responses or error envelopes. Transport is left
/// to the embedding application.
///
/// # Example
///
/// ```
/// use recsync_server::{ServerConfig, SyncServer};
/// use serde_json::json;
///
/// let server = SyncServer::new(ServerConfig::default());
///
/// // In a real application an HTTP route would forward its body here.
/// let response = server.handle_get_records_json(json!({
///     "pointers": [{"table": "users", "id": "00000000-0000-0000-0000-000000000001"}]
/// }));
/// assert!(response.unwrap().record_map.is_empty());
/// ```
pub struct SyncServer {
    handler: RequestHandler,
    context: Arc<HandlerContext>,
}

impl SyncServer {
    /// Creates a server backed by an empty in-memory store.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryRecordStore::new()))
    }

    /// Creates a server backed by `store`.
    pub fn with_store(config: ServerConfig, store: Arc<dyn RecordStore>) -> Self {
        Self::with_context(HandlerContext::new(config, store))
    }

    /// Creates a server from a prepared handler context.
    pub fn with_context(context: HandlerContext) -> Self {
        let context = Arc::new(context);
        let handler = RequestHandler::new(Arc::clone(&context));
        Self { handler, context }
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Returns the record store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.context.store
    }

    /// Handles a write.
    pub fn handle_write(&self, request: WriteRequest) -> Result<WriteResponse, ErrorResponse> {
        self.handler.handle_write(request).map_err(ErrorResponse::from)
    }

    /// Handles a GetRecords request.
    pub fn handle_get_records(
        &self,
        request: GetRecordsRequest,
    ) -> Result<GetRecordsResponse, ErrorResponse> {
        self.handler
            .handle_get_records(request)
            .map_err(ErrorResponse::from)
    }

    /// Decodes and handles a write from an untyped body.
    pub fn handle_write_json(&self, body: Value) -> Result<WriteResponse, ErrorResponse> {
        let request = Transaction::from_value(body)?;
        self.handle_write(request)
    }

    /// Decodes and handles a GetRecords request from an untyped body.
    pub fn handle_get_records_json(
        &self,
        body: Value,
    ) -> Result<GetRecordsResponse, ErrorResponse> {
        let request = GetRecordsRequest::from_value(body)?;
        self.handle_get_records(request)
    }
}
