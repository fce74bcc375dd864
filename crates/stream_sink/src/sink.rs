//! RedisStreamSink - publishes batches of messages to Redis streams

use std::sync::Arc;

use contracts::{
    ComponentContext, ContractError, Disposable, Initializable, Lifecycle, MetricsRecorder,
    OutputSink, PublishedMessage, RetryContext, SinkGuarantees, StreamError, StreamSinkConfig,
};
use tracing::{debug, error, info, instrument, warn};

use crate::classify::{classify, FailureClass};
use crate::client::{StreamClient, OUTPUT_SINK_STREAM_KEY};
use crate::metrics::{record_msg_published, MetricResult};
use crate::redis_client::RedisStreamClient;

const SINK_NAME: &str = "redis_stream_sink";
const CLIENT_NAME: &str = "redis_stream_client";

type ClientFactory<C> =
    Box<dyn Fn(&StreamSinkConfig) -> Result<C, ContractError> + Send + Sync + 'static>;

/// Output sink appending each message to its Redis stream
///
/// The sink owns its stream client exclusively: it builds the client in
/// `initialize` and releases it in `dispose`.
pub struct RedisStreamSink<C = RedisStreamClient> {
    config: StreamSinkConfig,
    guarantees: SinkGuarantees,
    factory: ClientFactory<C>,
    client: Option<Lifecycle<C>>,
    metrics: Option<Arc<dyn MetricsRecorder>>,
}

impl RedisStreamSink<RedisStreamClient> {
    /// Create a sink backed by the Redis client
    pub fn new(config: StreamSinkConfig) -> Self {
        Self::with_client_factory(config, RedisStreamClient::from_config)
    }
}

impl<C> RedisStreamSink<C> {
    /// Create a sink whose client is built by `factory` during `initialize`
    pub fn with_client_factory<F>(config: StreamSinkConfig, factory: F) -> Self
    where
        F: Fn(&StreamSinkConfig) -> Result<C, ContractError> + Send + Sync + 'static,
    {
        Self {
            config,
            guarantees: SinkGuarantees::none(),
            factory: Box::new(factory),
            client: None,
            metrics: None,
        }
    }

    pub fn config(&self) -> &StreamSinkConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.client.as_ref().is_some_and(|c| c.get().is_ok())
    }

    fn client(&self) -> Result<&C, ContractError> {
        self.client
            .as_ref()
            .ok_or_else(|| ContractError::not_initialized(SINK_NAME))?
            .get()
    }

    fn metrics(&self) -> Result<&dyn MetricsRecorder, ContractError> {
        self.metrics
            .as_deref()
            .ok_or_else(|| ContractError::not_initialized(SINK_NAME))
    }

    /// Decide between bailing the batch and handing the error to the caller
    fn handle_failure(
        &self,
        error: StreamError,
        stream: &str,
        retry: &mut dyn RetryContext,
    ) -> Result<(), ContractError> {
        match classify(error) {
            FailureClass::ParseFailure(error) | FailureClass::AggregateFailure(error) => {
                warn!(
                    stream = %stream,
                    error = %error,
                    attempt = retry.current_attempt(),
                    "Non-retryable append failure, bailing batch"
                );
                retry.bail(ContractError::Stream(error));
                Ok(())
            }
            FailureClass::Other(error) => {
                error!(stream = %stream, error = %error, "Append failed");
                Err(ContractError::Stream(error))
            }
        }
    }
}

impl<C> OutputSink for RedisStreamSink<C>
where
    C: StreamClient + Send + Sync,
{
    fn guarantees(&self) -> SinkGuarantees {
        self.guarantees
    }

    #[instrument(
        name = "redis_stream_sink_sink",
        skip(self, messages, retry),
        fields(default_stream = %self.config.write_stream)
    )]
    async fn sink<I>(&self, messages: I, retry: &mut dyn RetryContext) -> Result<(), ContractError>
    where
        I: IntoIterator<Item = PublishedMessage> + Send,
        I::IntoIter: Send,
    {
        let client = self.client()?;
        let metrics = self.metrics()?;

        let mut published: u64 = 0;
        for msg in messages {
            // Tag for both outcomes of this message
            let stream = msg.resolve_stream(&self.config.write_stream);

            let result = client
                .append(
                    &msg.span_context,
                    &msg.message.message_type,
                    stream,
                    OUTPUT_SINK_STREAM_KEY,
                    &msg.message.payload,
                )
                .await;

            match result {
                Ok(id) => {
                    record_msg_published(metrics, stream, MetricResult::Success);
                    published += 1;
                    debug!(
                        stream = %stream,
                        id = %id,
                        message_type = %msg.message.message_type,
                        "Message published"
                    );
                }
                Err(e) => {
                    record_msg_published(metrics, stream, MetricResult::Error);
                    return self.handle_failure(e, stream, retry);
                }
            }
        }

        debug!(published, "Batch published");
        Ok(())
    }
}

impl<C> Initializable for RedisStreamSink<C>
where
    C: Initializable + Disposable + Send + Sync,
{
    #[instrument(
        name = "redis_stream_sink_initialize",
        skip(self, context),
        fields(stream = %self.config.write_stream)
    )]
    async fn initialize(&mut self, context: &ComponentContext) -> Result<(), ContractError> {
        if self.client.is_some() {
            return Err(ContractError::AlreadyInitialized {
                component: SINK_NAME.to_string(),
            });
        }

        self.metrics = Some(Arc::clone(&context.metrics));

        let client = (self.factory)(&self.config)?;
        let handle = self.client.insert(Lifecycle::new(CLIENT_NAME, client));
        handle.initialize(context).await?;

        info!(
            stream = %self.config.write_stream,
            url = %self.config.redacted_url(),
            "Redis stream sink initialized"
        );
        Ok(())
    }
}

impl<C> Disposable for RedisStreamSink<C>
where
    C: Initializable + Disposable + Send + Sync,
{
    #[instrument(name = "redis_stream_sink_dispose", skip(self))]
    async fn dispose(&mut self) -> Result<(), ContractError> {
        match self.client.as_mut() {
            Some(handle) => {
                handle.dispose().await?;
                info!("Redis stream sink disposed");
            }
            None => debug!("Dispose without initialize, nothing to release"),
        }
        Ok(())
    }
}
