// ==========================================
// 质检分析引擎 - 引擎层
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 2. 系统总览
// ==========================================
// 职责: 周期过滤 / 聚合扫描 / 统计库 / 波动评分 /
//       漏检交叉分析 / 一致性派生 / 结果装配
// 红线: 引擎内部无致命错误; 脏数据只缩小聚合口径, 不中断扫描
// ==========================================

pub mod aggregation;
pub mod assembler;
pub mod consistency;
pub mod date_parser;
pub mod defect_splitter;
pub mod missing_defect;
pub mod period_filter;
pub mod stats;
pub mod volatility;

// 重导出核心引擎
pub use aggregation::{AggregationOutput, AggregationPass};
pub use assembler::AnalyticsEngine;
pub use consistency::InspectorConsistencyEngine;
pub use missing_defect::MissingDefectAnalyzer;
pub use volatility::VolatilityScorer;
