//! RedisStreamClient - XADD over a managed connection

use std::time::Duration;

use contracts::{
    ComponentContext, ContractError, Disposable, Initializable, SpanContext, StreamError,
    StreamSinkConfig,
};
use redis::aio::ConnectionManager;
use redis::{ConnectionAddr, ConnectionInfo, ErrorKind, RedisConnectionInfo, RedisError};
use tracing::{debug, info, instrument};

use crate::client::StreamClient;
use crate::encoder::{encode_record, RecordEncoding};

const CLIENT_NAME: &str = "redis_stream_client";
const XADD: &str = "XADD";
const PING: &str = "PING";

/// Redis Streams client
pub struct RedisStreamClient {
    client: redis::Client,
    conn: Option<ConnectionManager>,
    encoding: RecordEncoding,
    max_stream_length: Option<usize>,
    command_timeout_ms: Option<u64>,
    redacted_url: String,
}

impl RedisStreamClient {
    /// Build the client from configuration; no connection is opened yet
    ///
    /// # Errors
    /// `ContractError::Initialization` on unusable connection parameters
    pub fn from_config(config: &StreamSinkConfig) -> Result<Self, ContractError> {
        let redacted_url = config.redacted_url();
        let client = redis::Client::open(connection_info(config)).map_err(|e| {
            ContractError::initialization(
                CLIENT_NAME,
                format!("invalid redis connection '{redacted_url}': {e}"),
            )
        })?;

        Ok(Self {
            client,
            conn: None,
            encoding: RecordEncoding::from_base64_flag(config.base64_encode),
            max_stream_length: config.max_stream_length,
            command_timeout_ms: config.command_timeout_ms,
            redacted_url,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn xadd_cmd(&self, stream: &str, key: &str, value: Vec<u8>) -> redis::Cmd {
        let mut cmd = redis::cmd(XADD);
        cmd.arg(stream);
        if let Some(max_len) = self.max_stream_length {
            cmd.arg("MAXLEN").arg("~").arg(max_len);
        }
        cmd.arg("*").arg(key).arg(value);
        cmd
    }
}

/// Structured connection parameters
///
/// Credentials are passed as-is, never through a URL, so reserved
/// characters in a password need no escaping.
fn connection_info(config: &StreamSinkConfig) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
        redis: RedisConnectionInfo {
            db: i64::from(config.db),
            username: config.username.clone(),
            password: config.password.clone(),
            ..Default::default()
        },
    }
}

/// Map a redis error onto the stream error taxonomy
pub(crate) fn map_redis_error(error: RedisError) -> StreamError {
    let message = error.to_string();
    match error.kind() {
        ErrorKind::ParseError | ErrorKind::TypeError => StreamError::parse(message),
        // EXECABORT: the transaction was discarded because of earlier errors
        ErrorKind::ExecAbortError => StreamError::aggregate(message, Vec::new()),
        ErrorKind::IoError
        | ErrorKind::ClusterDown
        | ErrorKind::MasterDown
        | ErrorKind::BusyLoadingError
        | ErrorKind::TryAgain => StreamError::connection(message),
        _ if error.is_connection_dropped() || error.is_connection_refusal() => {
            StreamError::connection(message)
        }
        _ => StreamError::command(message),
    }
}

impl StreamClient for RedisStreamClient {
    #[instrument(
        name = "redis_stream_append",
        skip(self, span_context, key, payload),
        fields(
            stream = %stream,
            message_type = %message_type,
            trace_id = %span_context.trace_id,
            span_id = %span_context.span_id
        )
    )]
    async fn append(
        &self,
        span_context: &SpanContext,
        message_type: &str,
        stream: &str,
        key: &str,
        payload: &serde_json::Value,
    ) -> Result<String, StreamError> {
        let mut conn = self
            .conn
            .clone()
            .ok_or_else(|| StreamError::connection("redis connection is not initialized"))?;

        let value = encode_record(self.encoding, message_type, payload)?;
        let cmd = self.xadd_cmd(stream, key, value);

        let reply = match self.command_timeout_ms {
            Some(timeout_ms) => tokio::time::timeout(
                Duration::from_millis(timeout_ms),
                cmd.query_async::<_, String>(&mut conn),
            )
            .await
            .map_err(|_| StreamError::Timeout { timeout_ms })?,
            None => cmd.query_async::<_, String>(&mut conn).await,
        };

        let id = reply.map_err(map_redis_error)?;
        debug!(id = %id, "XADD ok");
        Ok(id)
    }
}

impl Initializable for RedisStreamClient {
    #[instrument(
        name = "redis_stream_client_initialize",
        skip(self, _context),
        fields(url = %self.redacted_url)
    )]
    async fn initialize(&mut self, _context: &ComponentContext) -> Result<(), ContractError> {
        let mut conn = self.client.get_connection_manager().await.map_err(|e| {
            ContractError::initialization(
                CLIENT_NAME,
                format!("connecting to {}: {e}", self.redacted_url),
            )
        })?;

        redis::cmd(PING)
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| ContractError::initialization(CLIENT_NAME, format!("PING failed: {e}")))?;

        self.conn = Some(conn);
        info!(url = %self.redacted_url, "Redis stream client connected");
        Ok(())
    }
}

impl Disposable for RedisStreamClient {
    #[instrument(name = "redis_stream_client_dispose", skip(self))]
    async fn dispose(&mut self) -> Result<(), ContractError> {
        // Dropping the last manager clone closes the multiplexed connection
        if self.conn.take().is_some() {
            info!(url = %self.redacted_url, "Redis stream client closed");
        }
        Ok(())
    }
}
