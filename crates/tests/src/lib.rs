//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 模拟 e2e 测试（无需 Redis）：配置 -> sink -> mock client -> metrics

#[cfg(test)]
mod contract_tests {
    use contracts::{ConsistencyLevel, PublishedMessage, SinkGuarantees};
    use serde_json::json;

    #[test]
    fn test_contracts_compile() {
        let guarantees = SinkGuarantees::none();
        assert_eq!(guarantees.consistency, ConsistencyLevel::None);
        assert!(!guarantees.idempotent);
    }

    #[test]
    fn test_published_message_wire_shape() {
        let msg = PublishedMessage::new("orders.Placed", json!({"id": 1})).with_stream("audit");
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["message"]["type"], "orders.Placed");
        assert_eq!(value["message"]["payload"]["id"], 1);
        assert_eq!(value["stream_name"], "audit");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        ComponentContext, ContractError, Disposable, Initializable, OutputSink,
        PublishedMessage, RetryContext, SpanContext, StreamError,
    };
    use observability::InMemoryMetrics;
    use serde_json::json;
    use stream_sink::{
        decode_record, encode_record, MockStreamClient, RecordEncoding, RedisStreamSink,
        MSG_PUBLISHED, OUTPUT_SINK_STREAM_KEY,
    };

    const CONFIG: &str = r#"
host = "localhost"
port = 6379
write_stream = "orders"
"#;

    /// Retry handle recording bail calls
    #[derive(Default)]
    struct RecordingRetry {
        attempt: u32,
        bailed: Vec<ContractError>,
    }

    impl RetryContext for RecordingRetry {
        fn bail(&mut self, error: ContractError) {
            self.bailed.push(error);
        }

        fn current_attempt(&self) -> u32 {
            self.attempt.max(1)
        }

        fn max_attempts(&self) -> u32 {
            3
        }
    }

    async fn build_sink(
        mock: &MockStreamClient,
        metrics: Arc<InMemoryMetrics>,
    ) -> RedisStreamSink<MockStreamClient> {
        let config = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        let client = mock.clone();
        let mut sink =
            RedisStreamSink::with_client_factory(config, move |_| Ok(client.clone()));
        sink.initialize(&ComponentContext::new(metrics)).await.unwrap();
        sink
    }

    fn published(metrics: &InMemoryMetrics, stream: &str, result: &str) -> u64 {
        metrics.count(MSG_PUBLISHED, &[("stream_name", stream), ("result", result)])
    }

    /// End-to-end: config -> sink -> client, default and override streams
    #[tokio::test]
    async fn test_e2e_default_and_override_streams() {
        let mock = MockStreamClient::new();
        let metrics = Arc::new(InMemoryMetrics::new());
        let mut sink = build_sink(&mock, metrics.clone()).await;

        let span = SpanContext::new("trace-1", "span-1");
        let batch = vec![
            PublishedMessage::new("orders.Placed", json!({"id": 1}))
                .with_span_context(span.clone()),
            PublishedMessage::new("orders.Placed", json!({"id": 2}))
                .with_stream("priority-orders"),
            PublishedMessage::new("orders.Shipped", json!({"id": 1})),
        ];

        let mut retry = RecordingRetry::default();
        sink.sink(batch, &mut retry).await.unwrap();

        let records = mock.records();
        let streams: Vec<_> = records.iter().map(|r| r.stream.as_str()).collect();
        assert_eq!(streams, vec!["orders", "priority-orders", "orders"]);
        assert!(records.iter().all(|r| r.key == OUTPUT_SINK_STREAM_KEY));
        assert_eq!(records[0].span_context, span);
        assert_eq!(records[2].message_type, "orders.Shipped");

        assert_eq!(published(&metrics, "orders", "success"), 2);
        assert_eq!(published(&metrics, "priority-orders", "success"), 1);
        assert_eq!(metrics.total(MSG_PUBLISHED), 3);
        assert!(retry.bailed.is_empty());

        sink.dispose().await.unwrap();
        assert_eq!(mock.dispose_count(), 1);
    }

    /// Parse failure bails the batch and the call itself succeeds
    #[tokio::test]
    async fn test_e2e_parse_failure_bails() {
        let mock = MockStreamClient::new().fail_on_append(2, StreamError::parse("bad reply"));
        let metrics = Arc::new(InMemoryMetrics::new());
        let sink = build_sink(&mock, metrics.clone()).await;

        let batch = vec![
            PublishedMessage::new("orders.Placed", json!({"id": 1})),
            PublishedMessage::new("orders.Placed", json!({"id": 2})).with_stream("priority-orders"),
            PublishedMessage::new("orders.Placed", json!({"id": 3})),
        ];

        let mut retry = RecordingRetry::default();
        sink.sink(batch, &mut retry).await.unwrap();

        assert_eq!(retry.bailed.len(), 1);
        assert!(matches!(
            retry.bailed[0].as_stream_error(),
            Some(StreamError::Parse { .. })
        ));
        assert_eq!(mock.append_attempts(), 2);
        assert_eq!(published(&metrics, "orders", "success"), 1);
        assert_eq!(published(&metrics, "priority-orders", "error"), 1);
        assert_eq!(metrics.total(MSG_PUBLISHED), 2);
    }

    /// Connection failure propagates and does not bail
    #[tokio::test]
    async fn test_e2e_connection_failure_propagates() {
        let mock = MockStreamClient::new()
            .fail_on_append(1, StreamError::connection("connection refused"));
        let metrics = Arc::new(InMemoryMetrics::new());
        let sink = build_sink(&mock, metrics.clone()).await;

        let batch = vec![
            PublishedMessage::new("orders.Placed", json!({"id": 1})),
            PublishedMessage::new("orders.Placed", json!({"id": 2})),
        ];

        let mut retry = RecordingRetry::default();
        let err = sink.sink(batch, &mut retry).await.unwrap_err();

        assert!(matches!(
            err.as_stream_error(),
            Some(StreamError::Connection { .. })
        ));
        assert!(retry.bailed.is_empty());
        assert_eq!(mock.append_attempts(), 1);
        assert_eq!(published(&metrics, "orders", "error"), 1);
    }

    /// Empty batch: no appends, no metrics
    #[tokio::test]
    async fn test_e2e_empty_batch() {
        let mock = MockStreamClient::new();
        let metrics = Arc::new(InMemoryMetrics::new());
        let sink = build_sink(&mock, metrics.clone()).await;

        let mut retry = RecordingRetry::default();
        sink.sink(Vec::new(), &mut retry).await.unwrap();

        assert_eq!(mock.append_attempts(), 0);
        assert_eq!(metrics.total(MSG_PUBLISHED), 0);
    }

    /// Records produced by the encoder decode back to the message
    #[test]
    fn test_record_envelope() {
        let payload = json!({"id": 7, "items": ["a", "b"]});
        for encoding in [RecordEncoding::Json, RecordEncoding::Base64Json] {
            let bytes = encode_record(encoding, "orders.Placed", &payload).unwrap();
            let message = decode_record(encoding, &bytes).unwrap();
            assert_eq!(message.message_type, "orders.Placed");
            assert_eq!(message.payload, payload);
        }
    }
}
