// ==========================================
// 质检分析引擎 - 稽查员一致性派生
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.8 稽查员一致性
// ==========================================
// 职责: 每个稽查员的逐日验货量 / 去重 TQC 数 / 去重款号数,
//       以及验货量图表 y 轴上界 (Q3 + 1.5×IQR)
// 红线: 轴上界只是展示提示, 不过滤任何记录
// ==========================================

use crate::domain::aggregate::InspectorConsistency;
use crate::domain::record::InspectionRecord;
use crate::engine::{date_parser, stats};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

// ==========================================
// InspectorConsistencyEngine - 一致性派生引擎
// ==========================================
pub struct InspectorConsistencyEngine {
    // 无状态引擎
}

impl InspectorConsistencyEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 派生一致性指标
    ///
    /// # 参数
    /// - `records`: 过滤后的记录序列
    ///
    /// # 返回
    /// 稽查员键 → InspectorConsistency (活跃天数 >= 1 才产生条目)
    pub fn run(&self, records: &[&InspectionRecord]) -> BTreeMap<String, InspectorConsistency> {
        // 中间态: 逐日验货量 + 去重集合
        struct DayStat {
            validation: f64,
            tqc_ids: BTreeSet<String>,
            models: BTreeSet<String>,
        }
        let mut per_inspector: BTreeMap<String, BTreeMap<NaiveDate, DayStat>> = BTreeMap::new();

        for record in records {
            if record.is_all_zero() {
                continue;
            }
            let key = match record.inspector_key() {
                Some(k) => k,
                None => continue,
            };
            // 活跃天要求日期可解析
            let date = match date_parser::parse_date(&record.inspection_date) {
                Some(d) => d,
                None => continue,
            };

            let day = per_inspector
                .entry(key)
                .or_default()
                .entry(date)
                .or_insert_with(|| DayStat {
                    validation: 0.0,
                    tqc_ids: BTreeSet::new(),
                    models: BTreeSet::new(),
                });
            day.validation += record.validation_qty;
            if let Some(t) = record.tqc_key() {
                day.tqc_ids.insert(t);
            }
            day.models.insert(record.model_or_unknown());
        }

        let mut result = BTreeMap::new();
        for (key, days) in per_inspector {
            let mut consistency = InspectorConsistency::default();
            for (date, stat) in &days {
                consistency.daily_validation.insert(*date, stat.validation);
                consistency.daily_tqc_count.insert(*date, stat.tqc_ids.len());
                consistency
                    .daily_model_count
                    .insert(*date, stat.models.len());
                consistency.total_validation += stat.validation;
            }
            let n = days.len();
            consistency.active_days = n;
            consistency.avg_daily_validation = consistency.total_validation / n as f64;
            consistency.avg_daily_tqc_count =
                consistency.daily_tqc_count.values().sum::<usize>() as f64 / n as f64;
            consistency.avg_daily_model_count =
                consistency.daily_model_count.values().sum::<usize>() as f64 / n as f64;

            let daily: Vec<f64> = consistency.daily_validation.values().copied().collect();
            consistency.axis_upper_bound = axis_upper_bound(&daily);

            result.insert(key, consistency);
        }

        debug!(inspectors = result.len(), "稽查员一致性派生完成");
        result
    }
}

impl Default for InspectorConsistencyEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 验货量图表 y 轴上界 = Q3 + 1.5×(Q3 - Q1)
///
/// 标准离群栅栏上界; 独立成函数, 纯展示口径,
/// 聚合正确性不依赖此值
pub fn axis_upper_bound(daily_validation: &[f64]) -> f64 {
    match stats::quartiles(daily_validation) {
        Some(q) => q.q3 + 1.5 * (q.q3 - q.q1),
        None => 0.0,
    }
}
