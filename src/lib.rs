// ==========================================
// 质检分析引擎 - 核心库
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md
// 系统定位: 检验数据看板的纯计算后端 (展示/传输由外部协作方负责)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 聚合与统计
pub mod engine;

// 入口层 - 弱类型载荷标准化
pub mod ingest;

// 配置层 - 阈值配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DateValue, PeriodWindow, TrendDirection, VolatilityCategory};

// 领域实体
pub use domain::{
    AnalyticsResult, DailyBucket, EntityAggregate, InspectionRecord, InspectorConsistency,
    MissingDefectProfile, QtyPair, Quartiles, SustainabilityMetrics,
};

// 引擎
pub use engine::{
    AggregationPass, AnalyticsEngine, InspectorConsistencyEngine, MissingDefectAnalyzer,
    VolatilityScorer,
};

// 配置
pub use config::{EngineConfig, VolatilityThresholds};

// API
pub use api::{AnalyticsApi, ApiError, ApiResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "质检分析引擎";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
