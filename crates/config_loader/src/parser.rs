//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use contracts::{ContractError, StreamSinkConfig};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<StreamSinkConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<StreamSinkConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<StreamSinkConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"write_stream = "orders""#;
        let config = parse_toml(content).unwrap();
        assert_eq!(config.write_stream, "orders");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 6379);
        assert_eq!(config.db, 0);
        assert!(!config.base64_encode);
        assert_eq!(config.max_stream_length, None);
    }

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
host = "redis.internal"
port = 6380
db = 2
username = "svc"
password = "secret"
write_stream = "orders"
base64_encode = true
max_stream_length = 10000
command_timeout_ms = 250
"#;
        let config = parse_toml(content).unwrap();
        assert_eq!(config.host, "redis.internal");
        assert_eq!(config.port, 6380);
        assert_eq!(config.db, 2);
        assert_eq!(config.username.as_deref(), Some("svc"));
        assert!(config.base64_encode);
        assert_eq!(config.max_stream_length, Some(10000));
        assert_eq!(config.command_timeout_ms, Some(250));
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{ "write_stream": "orders", "port": 6390 }"#;
        let config = parse_json(content).unwrap();
        assert_eq!(config.write_stream, "orders");
        assert_eq!(config.port, 6390);
    }

    #[test]
    fn test_parse_missing_write_stream() {
        let result = parse_toml(r#"host = "localhost""#);
        assert!(matches!(result, Err(ContractError::ConfigParse { .. })));
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
