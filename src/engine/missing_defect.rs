// ==========================================
// 质检分析引擎 - 漏检交叉分析
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.7 漏检交叉分析
// ==========================================
// 职责: 把稽查员复检记录按 TQC 归集, 量化 TQC 漏检
// 口径: 同时带稽查员身份与 TQC 身份且验货数 > 0 的记录
// ==========================================

use crate::domain::aggregate::MissingDefectProfile;
use crate::domain::record::InspectionRecord;
use crate::engine::defect_splitter;
use std::collections::BTreeMap;
use tracing::debug;

// ==========================================
// MissingDefectAnalyzer - 漏检分析器
// ==========================================
pub struct MissingDefectAnalyzer {
    // 无状态引擎
}

impl MissingDefectAnalyzer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 归集漏检画像
    ///
    /// # 参数
    /// - `records`: 过滤后的记录序列 (与聚合扫描同一批)
    ///
    /// # 返回
    /// TQC 键 → MissingDefectProfile
    pub fn run(&self, records: &[&InspectionRecord]) -> BTreeMap<String, MissingDefectProfile> {
        let mut profiles: BTreeMap<String, MissingDefectProfile> = BTreeMap::new();

        for record in records {
            // 必须同时具备稽查员身份与 TQC 身份
            let tqc_key = match record.tqc_key() {
                Some(k) => k,
                None => continue,
            };
            if record.inspector_key().is_none() {
                continue;
            }
            if record.validation_qty <= 0.0 {
                continue;
            }

            let profile = profiles.entry(tqc_key).or_default();
            profile.total_validation += record.validation_qty;
            profile.total_reject += record.reject_qty;

            // 标签分摊 (稽查口径)
            if record.reject_qty > 0.0 && !record.defect_text.trim().is_empty() {
                let labels = defect_splitter::split_labels(&record.defect_text);
                let share = defect_splitter::share_per_label(record.reject_qty, labels.len());
                for label in &labels {
                    *profile.defects.entry(label.clone()).or_insert(0.0) += share;
                }
            }

            // 楼栋 / 款号拆分
            profile
                .by_building
                .entry(record.building_or_unknown())
                .or_default()
                .add(record.validation_qty, record.reject_qty);
            profile
                .by_model
                .entry(record.model_or_unknown())
                .or_default()
                .add(record.validation_qty, record.reject_qty);
        }

        debug!(profiles = profiles.len(), "漏检交叉分析完成");
        profiles
    }
}

impl Default for MissingDefectAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
