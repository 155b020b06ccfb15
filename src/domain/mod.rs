// ==========================================
// 质检分析引擎 - 领域模型层
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 3. 数据模型
// ==========================================
// 职责: 定义检验记录实体、聚合结果与基础类型
// 红线: 不含统计逻辑, 不含解析逻辑
// ==========================================

pub mod aggregate;
pub mod record;
pub mod types;

// 重导出核心类型
pub use aggregate::{
    AnalyticsResult, DailyBucket, EntityAggregate, InspectorConsistency, MissingDefectProfile,
    QtyPair, Quartiles, SustainabilityMetrics,
};
pub use record::{identity_key, InspectionRecord, UNKNOWN_LABEL};
pub use types::{DateValue, PeriodWindow, TrendDirection, VolatilityCategory};
