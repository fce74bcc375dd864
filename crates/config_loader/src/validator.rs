//! 配置校验模块
//!
//! 校验规则：
//! - write_stream 非空
//! - port != 0
//! - max_stream_length / command_timeout_ms 设置时必须 > 0
//! - 设置 username 时必须同时设置 password

use contracts::{ContractError, StreamSinkConfig};

/// 校验 StreamSinkConfig
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &StreamSinkConfig) -> Result<(), ContractError> {
    validate_write_stream(config)?;
    validate_connection(config)?;
    validate_limits(config)?;
    Ok(())
}

/// 校验默认 stream
fn validate_write_stream(config: &StreamSinkConfig) -> Result<(), ContractError> {
    if config.write_stream.trim().is_empty() {
        return Err(ContractError::config_validation(
            "write_stream",
            "write_stream cannot be empty",
        ));
    }
    Ok(())
}

/// 校验连接参数
fn validate_connection(config: &StreamSinkConfig) -> Result<(), ContractError> {
    if config.host.trim().is_empty() {
        return Err(ContractError::config_validation(
            "host",
            "host cannot be empty",
        ));
    }

    if config.port == 0 {
        return Err(ContractError::config_validation("port", "port must be > 0"));
    }

    // password-only 为 Redis 默认用户认证，合法
    if config.username.is_some() && config.password.is_none() {
        return Err(ContractError::config_validation(
            "password",
            "username is set but password is missing",
        ));
    }

    Ok(())
}

/// 校验长度与超时
fn validate_limits(config: &StreamSinkConfig) -> Result<(), ContractError> {
    if config.max_stream_length == Some(0) {
        return Err(ContractError::config_validation(
            "max_stream_length",
            "max_stream_length must be > 0 when set",
        ));
    }

    if config.command_timeout_ms == Some(0) {
        return Err(ContractError::config_validation(
            "command_timeout_ms",
            "command_timeout_ms must be > 0 when set",
        ));
    }

    Ok(())
}
