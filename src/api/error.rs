// ==========================================
// 质检分析引擎 - API 层错误类型
// ==========================================
// 依据: Rust 错误处理最佳实践
// 工具: thiserror 派生宏
// ==========================================
// 口径: 引擎内部对脏数据只降级不报错;
//       API 层只拒绝契约级违规 (载荷形状 / 配置非法)
// ==========================================

use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 契约违规 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("配置非法: {0}")]
    InvalidConfig(String),

    // ===== 载荷读取 =====
    #[error("载荷读取失败: {0}")]
    PayloadReadError(String),

    #[error("载荷解析失败: {0}")]
    PayloadParseError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::PayloadReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::PayloadParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
