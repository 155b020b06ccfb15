// ==========================================
// 质检分析引擎 - 分析 API
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 6. 对外契约
// ==========================================
// 职责: 面向展示层的薄封装; 配置校验 + 评估时刻注入
// 红线: 不缓存结果, 每次调用全量重算 (幂等)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::EngineConfig;
use crate::domain::aggregate::AnalyticsResult;
use crate::domain::record::InspectionRecord;
use crate::domain::types::PeriodWindow;
use crate::engine::assembler::AnalyticsEngine;
use chrono::{Local, NaiveDate};

// ==========================================
// AnalyticsApi - 分析接口
// ==========================================
pub struct AnalyticsApi {
    engine: AnalyticsEngine,
}

impl AnalyticsApi {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 引擎配置 (构造时一次性校验)
    ///
    /// # 返回
    /// 配置非法时返回 ApiError::InvalidConfig
    pub fn new(config: EngineConfig) -> ApiResult<Self> {
        config.validate().map_err(ApiError::InvalidConfig)?;
        Ok(Self {
            engine: AnalyticsEngine::new(config),
        })
    }

    /// 以默认配置构造
    pub fn with_defaults() -> Self {
        Self {
            engine: AnalyticsEngine::default(),
        }
    }

    /// 计算分析结果 (评估时刻取本地当前日期)
    pub fn compute(
        &self,
        records: &[InspectionRecord],
        window: PeriodWindow,
    ) -> AnalyticsResult {
        self.compute_at(records, window, Local::now().date_naive())
    }

    /// 计算分析结果 (显式评估时刻, 供测试与重放)
    pub fn compute_at(
        &self,
        records: &[InspectionRecord],
        window: PeriodWindow,
        now: NaiveDate,
    ) -> AnalyticsResult {
        self.engine.analyze(records, window, now)
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::DateValue;

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.volatility.base_weight = -1.0;
        let result = AnalyticsApi::new(config);
        assert!(matches!(result, Err(ApiError::InvalidConfig(_))));
    }

    #[test]
    fn test_compute_at_empty_records() {
        let api = AnalyticsApi::with_defaults();
        let result = api.compute_at(
            &[],
            PeriodWindow::All,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        );
        assert_eq!(result.total_validation, 0.0);
        assert_eq!(result.overall_reject_rate, 0.0);
        assert!(result.tqc.is_empty());
    }

    #[test]
    fn test_compute_at_basic() {
        let api = AnalyticsApi::new(EngineConfig::default()).unwrap();
        let record = InspectionRecord {
            inspection_date: DateValue::Text("2025-01-10".to_string()),
            building: None,
            line: None,
            po_number: None,
            model: None,
            inspector_id: None,
            inspector_name: None,
            tqc_id: Some("T01".to_string()),
            tqc_name: None,
            validation_qty: 100.0,
            pass_qty: 97.0,
            reject_qty: 3.0,
            defect_text: "破洞".to_string(),
        };
        let result = api.compute_at(
            &[record],
            PeriodWindow::All,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        );
        assert_eq!(result.total_validation, 100.0);
        assert_eq!(result.overall_reject_rate, 3.0);
        assert_eq!(result.defect_totals["破洞"], 3.0);
    }
}
