// ==========================================
// 质检分析引擎 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供展示层调用
// ==========================================

pub mod analytics_api;
pub mod error;

// 重导出核心类型
pub use analytics_api::AnalyticsApi;
pub use error::{ApiError, ApiResult};
