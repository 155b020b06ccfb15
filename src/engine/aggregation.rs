// ==========================================
// 质检分析引擎 - 聚合扫描
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.4 聚合扫描
// ==========================================
// 职责: 单趟正向遍历, 建立六维累计 + 日桶 + 全局标签统计
// 输入: 过滤后的记录序列
// 输出: AggregationOutput (交由装配层补齐统计指标)
// 红线: 纯交换累加, 最终合计与记录顺序无关
// ==========================================

use crate::domain::aggregate::{DailyBucket, EntityAggregate};
use crate::domain::record::InspectionRecord;
use crate::engine::{date_parser, defect_splitter};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

// ==========================================
// AggregationOutput - 扫描产物
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AggregationOutput {
    /// 累计验货数量
    pub total_validation: f64,
    /// 累计不良数量
    pub total_reject: f64,
    /// 累计合格数量
    pub total_pass: f64,

    /// TQC 维度 (键: 工号+姓名)
    pub tqc: BTreeMap<String, EntityAggregate>,
    /// 楼栋维度
    pub buildings: BTreeMap<String, EntityAggregate>,
    /// 款号维度
    pub models: BTreeMap<String, EntityAggregate>,
    /// 订单维度
    pub purchase_orders: BTreeMap<String, EntityAggregate>,
    /// 生产线维度
    pub lines: BTreeMap<String, EntityAggregate>,
    /// 稽查员维度
    pub inspectors: BTreeMap<String, EntityAggregate>,

    /// 日桶
    pub daily: BTreeMap<NaiveDate, DailyBucket>,

    /// 全局不良标签 → 分摊不良数
    pub defect_totals: BTreeMap<String, f64>,

    /// 已知楼栋集合
    pub known_buildings: BTreeSet<String>,
    /// 已知款号集合
    pub known_models: BTreeSet<String>,
}

// ==========================================
// AggregationPass - 聚合扫描器
// ==========================================
pub struct AggregationPass {
    // 无状态引擎, 每次 run 产出独立结果
}

impl AggregationPass {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 执行单趟扫描
    ///
    /// # 参数
    /// - `records`: 过滤后的记录序列
    ///
    /// # 返回
    /// AggregationOutput
    pub fn run(&self, records: &[&InspectionRecord]) -> AggregationOutput {
        let mut out = AggregationOutput::default();
        let mut skipped_all_zero = 0usize;
        let mut undated = 0usize;

        for record in records {
            // 全零记录不参与任何聚合
            if record.is_all_zero() {
                skipped_all_zero += 1;
                continue;
            }

            let validation = record.validation_qty;
            let reject = record.reject_qty;

            // 1. 总体合计
            out.total_validation += validation;
            out.total_reject += reject;
            out.total_pass += record.pass_qty;

            // 2. 日桶 + 当日去重实体集合
            //    日期不可解析的记录仍计入实体/总体合计,
            //    但不进入任何按日结构 (口径与来源保持一致)
            let date = date_parser::parse_date(&record.inspection_date);
            let tqc_key = record.tqc_key();
            let line_key = record.line_key();
            if let Some(d) = date {
                let bucket = out.daily.entry(d).or_default();
                bucket.validation += validation;
                bucket.reject += reject;
                if let Some(k) = &tqc_key {
                    bucket.tqc_ids.insert(k.clone());
                }
                if let Some(l) = &line_key {
                    bucket.line_ids.insert(l.clone());
                }
            } else {
                undated += 1;
            }

            // 3. 楼栋/款号回退并登记主集合
            let building = record.building_or_unknown();
            let model = record.model_or_unknown();
            out.known_buildings.insert(building.clone());
            out.known_models.insert(model.clone());

            // 不良标签拆分 + 全局分摊
            let labels = if reject > 0.0 && !record.defect_text.trim().is_empty() {
                defect_splitter::split_labels(&record.defect_text)
            } else {
                Vec::new()
            };
            let share = defect_splitter::share_per_label(reject, labels.len());
            for label in &labels {
                *out.defect_totals.entry(label.clone()).or_insert(0.0) += share;
            }

            // 4. 六个维度各自累加
            // TQC: 工号与姓名均缺失时仅跳过本维度
            if let Some(key) = &tqc_key {
                let agg = out.tqc.entry(key.clone()).or_default();
                agg.add_quantities(validation, reject);
                agg.buildings.insert(building.clone());
                agg.apportion_defects(&labels, share, date);
                if let Some(d) = date {
                    agg.add_daily(d, validation, reject);
                }
            }

            // 楼栋
            {
                let agg = out.buildings.entry(building.clone()).or_default();
                agg.add_quantities(validation, reject);
                agg.apportion_defects(&labels, share, None);
                if let Some(d) = date {
                    agg.add_daily(d, validation, reject);
                }
            }

            // 款号
            {
                let agg = out.models.entry(model.clone()).or_default();
                agg.add_quantities(validation, reject);
                agg.apportion_defects(&labels, share, None);
                if let Some(d) = date {
                    agg.add_daily(d, validation, reject);
                }
            }

            // 订单 (缺失即跳过)
            if let Some(po) = record.po_key() {
                let agg = out.purchase_orders.entry(po).or_default();
                agg.add_quantities(validation, reject);
                agg.apportion_defects(&labels, share, None);
            }

            // 生产线 (缺失即跳过)
            if let Some(line) = line_key {
                let agg = out.lines.entry(line).or_default();
                agg.add_quantities(validation, reject);
                agg.apportion_defects(&labels, share, None);
            }

            // 稽查员
            if let Some(key) = record.inspector_key() {
                let agg = out.inspectors.entry(key).or_default();
                agg.add_quantities(validation, reject);
                agg.apportion_defects(&labels, share, None);
                if let Some(d) = date {
                    agg.add_daily(d, validation, reject);
                }
            }
        }

        debug!(
            records = records.len(),
            skipped_all_zero,
            undated,
            tqc_entities = out.tqc.len(),
            active_days = out.daily.len(),
            "聚合扫描完成"
        );

        out
    }
}

impl Default for AggregationPass {
    fn default() -> Self {
        Self::new()
    }
}
