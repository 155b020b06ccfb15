// ==========================================
// 质检分析引擎 - 结果装配
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 2. 系统总览 / 6. 对外契约
// ==========================================
// 职责: 周期过滤 → 聚合扫描 → 统计回填 → 汇总输出
// 红线: 纯同步批处理; 相同输入重复计算结果逐位一致
// ==========================================

use crate::config::EngineConfig;
use crate::domain::aggregate::{AnalyticsResult, EntityAggregate};
use crate::domain::record::InspectionRecord;
use crate::domain::types::PeriodWindow;
use crate::engine::aggregation::AggregationPass;
use crate::engine::consistency::InspectorConsistencyEngine;
use crate::engine::missing_defect::MissingDefectAnalyzer;
use crate::engine::period_filter;
use crate::engine::volatility::VolatilityScorer;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::info;

// ==========================================
// AnalyticsEngine - 分析引擎入口
// ==========================================
pub struct AnalyticsEngine {
    config: EngineConfig,
}

impl AnalyticsEngine {
    /// 构造函数
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// 当前配置
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 全量分析
    ///
    /// # 参数
    /// - `records`: 标准化记录序列
    /// - `window`: 统计周期
    /// - `now`: 评估时刻 (显式传入保证可重放)
    ///
    /// # 返回
    /// AnalyticsResult (纯值, 不持有共享状态)
    pub fn analyze(
        &self,
        records: &[InspectionRecord],
        window: PeriodWindow,
        now: NaiveDate,
    ) -> AnalyticsResult {
        // 1. 周期过滤
        let filtered = period_filter::filter(records, window, now);

        // 2. 聚合扫描
        let agg = AggregationPass::new().run(&filtered);

        // 3. 稳定性指标回填 (交叉表口径: TQC/楼栋/款号/稽查员)
        let scorer = VolatilityScorer::new(&self.config);
        let mut tqc = agg.tqc;
        let mut buildings = agg.buildings;
        let mut models = agg.models;
        let mut inspectors = agg.inspectors;
        for map in [&mut tqc, &mut buildings, &mut models, &mut inspectors] {
            attach_sustainability(map, &scorer);
        }

        // 4. 漏检交叉分析 + 稽查员一致性
        let missing_defects = MissingDefectAnalyzer::new().run(&filtered);
        let inspector_consistency = InspectorConsistencyEngine::new().run(&filtered);

        // 5. 日桶派生计数
        let mut daily = agg.daily;
        for bucket in daily.values_mut() {
            bucket.tqc_count = bucket.tqc_ids.len();
            bucket.line_count = bucket.line_ids.len();
        }

        // 6. 总体指标
        let active_days = daily.len();
        let overall_reject_rate = if agg.total_validation == 0.0 {
            0.0
        } else {
            agg.total_reject / agg.total_validation * 100.0
        };
        let overall_pass_rate = if agg.total_validation == 0.0 {
            0.0
        } else {
            agg.total_pass / agg.total_validation * 100.0
        };
        // 日均验货按日桶口径 (只计日期可解析的记录)
        let daily_validation_sum: f64 = daily.values().map(|b| b.validation).sum();
        let avg_daily_validation = if active_days == 0 {
            0.0
        } else {
            daily_validation_sum / active_days as f64
        };

        let result = AnalyticsResult {
            total_validation: agg.total_validation,
            total_reject: agg.total_reject,
            total_pass: agg.total_pass,
            overall_reject_rate,
            overall_pass_rate,
            active_days,
            avg_daily_validation,
            tqc,
            buildings,
            models,
            purchase_orders: agg.purchase_orders,
            lines: agg.lines,
            inspectors,
            daily,
            defect_totals: agg.defect_totals,
            known_buildings: agg.known_buildings.into_iter().collect(),
            known_models: agg.known_models.into_iter().collect(),
            missing_defects,
            inspector_consistency,
        };

        info!(
            window = %window,
            records = records.len(),
            filtered = filtered.len(),
            total_validation = result.total_validation,
            total_reject = result.total_reject,
            active_days = result.active_days,
            "分析完成"
        );

        result
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// 为活跃天数 >= 2 的实体回填稳定性指标
fn attach_sustainability(map: &mut BTreeMap<String, EntityAggregate>, scorer: &VolatilityScorer) {
    for agg in map.values_mut() {
        if agg.daily.len() < 2 {
            continue;
        }
        let rates = agg.daily_reject_rates();
        agg.sustainability = scorer.score(&rates, agg.reject_rate());
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DateValue, VolatilityCategory};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: u32, validation: f64, reject: f64, defects: &str) -> InspectionRecord {
        InspectionRecord {
            inspection_date: DateValue::Date(ymd(2025, 1, day)),
            building: Some("B1".to_string()),
            line: Some("L1".to_string()),
            po_number: Some("PO-1".to_string()),
            model: Some("M-100".to_string()),
            inspector_id: Some("A01".to_string()),
            inspector_name: None,
            tqc_id: Some("T01".to_string()),
            tqc_name: Some("质检一".to_string()),
            validation_qty: validation,
            pass_qty: validation - reject,
            reject_qty: reject,
            defect_text: defects.to_string(),
        }
    }

    #[test]
    fn test_end_to_end_two_records_same_day() {
        // 规格场景: 同 TQC 同日, 验货 {100,50}, 不良 {5,0},
        // 仅第一条带标签 "A,B"
        let records = vec![record(10, 100.0, 5.0, "A,B"), record(10, 50.0, 0.0, "")];
        let engine = AnalyticsEngine::default();
        let result = engine.analyze(&records, PeriodWindow::All, ymd(2025, 1, 15));

        let tqc = &result.tqc["T01 - 质检一"];
        assert_eq!(tqc.total_validation, 150.0);
        assert_eq!(tqc.total_reject, 5.0);
        assert_eq!(tqc.defects["A"], 2.5);
        assert_eq!(tqc.defects["B"], 2.5);

        assert_eq!(result.daily.len(), 1);
        let bucket = &result.daily[&ymd(2025, 1, 10)];
        assert_eq!(bucket.validation, 150.0);
        assert_eq!(bucket.reject, 5.0);
        assert_eq!(bucket.tqc_count, 1);
        assert_eq!(bucket.line_count, 1);

        // 单活跃日 → 不评分
        assert!(tqc.sustainability.is_none());
    }

    #[test]
    fn test_sustainability_attached_with_two_days() {
        let records = vec![record(10, 100.0, 5.0, ""), record(11, 100.0, 5.0, "")];
        let result =
            AnalyticsEngine::default().analyze(&records, PeriodWindow::All, ymd(2025, 1, 15));

        let m = result.tqc["T01 - 质检一"].sustainability.as_ref().unwrap();
        // 两天都是 5% → CV 0 → 稳定
        assert_eq!(m.daily_rates, vec![5.0, 5.0]);
        assert_eq!(m.score, 0.0);
        assert_eq!(m.category, VolatilityCategory::Stable);

        // 交叉表四个维度都回填
        assert!(result.buildings["B1"].sustainability.is_some());
        assert!(result.models["M-100"].sustainability.is_some());
        assert!(result.inspectors["A01"].sustainability.is_some());
        // 订单/生产线维度不参与交叉表
        assert!(result.purchase_orders["PO-1"].sustainability.is_none());
        assert!(result.lines["L1"].sustainability.is_none());
    }

    #[test]
    fn test_overall_metrics() {
        let records = vec![record(10, 100.0, 5.0, ""), record(12, 200.0, 10.0, "")];
        let result =
            AnalyticsEngine::default().analyze(&records, PeriodWindow::All, ymd(2025, 1, 15));

        assert_eq!(result.total_validation, 300.0);
        assert_eq!(result.total_reject, 15.0);
        assert_eq!(result.overall_reject_rate, 5.0);
        assert_eq!(result.overall_pass_rate, 95.0);
        assert_eq!(result.active_days, 2);
        assert_eq!(result.avg_daily_validation, 150.0);
        assert_eq!(result.known_buildings, vec!["B1".to_string()]);
        assert_eq!(result.known_models, vec!["M-100".to_string()]);
    }

    #[test]
    fn test_window_restricts_aggregation() {
        let records = vec![
            record(1, 100.0, 5.0, ""),  // 周窗口外
            record(14, 200.0, 2.0, ""), // 窗口内
        ];
        let result =
            AnalyticsEngine::default().analyze(&records, PeriodWindow::Week, ymd(2025, 1, 15));

        assert_eq!(result.total_validation, 200.0);
        assert_eq!(result.active_days, 1);
    }

    #[test]
    fn test_missing_defect_and_consistency_present() {
        let records = vec![record(10, 100.0, 5.0, "A"), record(11, 100.0, 0.0, "")];
        let result =
            AnalyticsEngine::default().analyze(&records, PeriodWindow::All, ymd(2025, 1, 15));

        let profile = &result.missing_defects["T01 - 质检一"];
        assert_eq!(profile.total_validation, 200.0);
        assert_eq!(profile.defects["A"], 5.0);

        let consistency = &result.inspector_consistency["A01"];
        assert_eq!(consistency.active_days, 2);
        assert_eq!(consistency.avg_daily_validation, 100.0);
    }

    #[test]
    fn test_idempotence_bitwise() {
        let records = vec![
            record(10, 100.0, 5.0, "A,B"),
            record(11, 80.0, 4.0, "C"),
            record(12, 60.0, 0.0, ""),
        ];
        let engine = AnalyticsEngine::default();
        let a = engine.analyze(&records, PeriodWindow::All, ymd(2025, 1, 15));
        let b = engine.analyze(&records, PeriodWindow::All, ymd(2025, 1, 15));

        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
