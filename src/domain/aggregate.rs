// ==========================================
// 质检分析引擎 - 聚合结果模型
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 3. 数据模型 / 6. 对外契约
// ==========================================
// 职责: 定义聚合扫描与统计层的输出结构
// 红线: 输出只读; 全部使用有序容器保证重复计算逐位一致
// ==========================================

use crate::domain::types::{TrendDirection, VolatilityCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// 数量对 (验货/不良)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QtyPair {
    /// 验货数量
    pub validation: f64,
    /// 不良数量
    pub reject: f64,
}

impl QtyPair {
    /// 累加一条记录的数量
    pub fn add(&mut self, validation: f64, reject: f64) {
        self.validation += validation;
        self.reject += reject;
    }

    /// 不良率 (%), 验货数为 0 时定义为 0
    pub fn reject_rate(&self) -> f64 {
        if self.validation == 0.0 {
            0.0
        } else {
            self.reject / self.validation * 100.0
        }
    }
}

// ==========================================
// 四分位数集 (R-7 线性插值法)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

// ==========================================
// 稳定性指标 (Sustainability Metrics)
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.6 波动评分
// 仅当实体活跃天数 >= 2 时计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityMetrics {
    /// 逐日不良率序列 (%, 按日期升序)
    pub daily_rates: Vec<f64>,
    /// 算术平均
    pub mean: f64,
    /// 总体标准差 (除以 n)
    pub std_dev: f64,
    /// 变异系数 (%)
    pub cv: f64,
    /// 四分位数集
    pub quartiles: Quartiles,
    /// 波动评分 = CV / 权重
    pub score: f64,
    /// 波动等级
    pub category: VolatilityCategory,
    /// 逐日不良率的趋势方向 (OLS 拟合后判定)
    pub trend: TrendDirection,
}

// ==========================================
// 实体聚合 (Entity Aggregate)
// ==========================================
// 六个维度 (TQC/楼栋/款号/订单/生产线/稽查员) 共用此结构;
// 首条触及该键的记录惰性创建, 扫描期间只做加法
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityAggregate {
    /// 累计验货数量
    pub total_validation: f64,

    /// 累计不良数量
    pub total_reject: f64,

    /// 关联楼栋集合 (仅 TQC 维度维护)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub buildings: BTreeSet<String>,

    /// 不良标签 → 分摊不良数
    #[serde(default)]
    pub defects: BTreeMap<String, f64>,

    /// 不良标签按日分摊 (仅 TQC 维度, 供趋势图)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defects_by_date: BTreeMap<NaiveDate, BTreeMap<String, f64>>,

    /// 逐日验货/不良 (交叉表口径, 供稳定性计算)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub daily: BTreeMap<NaiveDate, QtyPair>,

    /// 稳定性指标 (活跃天数 >= 2 时由装配层回填)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability: Option<SustainabilityMetrics>,
}

impl EntityAggregate {
    /// 累加记录数量
    pub fn add_quantities(&mut self, validation: f64, reject: f64) {
        self.total_validation += validation;
        self.total_reject += reject;
    }

    /// 按标签分摊不良数量
    ///
    /// # 参数
    /// - `labels`: 该记录解析出的不良标签
    /// - `share`: 每个标签分摊到的不良数 (= reject / k)
    /// - `date`: 解析成功的检验日期 (供按日分摊, 仅 TQC 维度传入)
    pub fn apportion_defects(&mut self, labels: &[String], share: f64, date: Option<NaiveDate>) {
        for label in labels {
            *self.defects.entry(label.clone()).or_insert(0.0) += share;
            if let Some(d) = date {
                *self
                    .defects_by_date
                    .entry(d)
                    .or_default()
                    .entry(label.clone())
                    .or_insert(0.0) += share;
            }
        }
    }

    /// 累加逐日数量 (交叉表口径)
    pub fn add_daily(&mut self, date: NaiveDate, validation: f64, reject: f64) {
        self.daily.entry(date).or_default().add(validation, reject);
    }

    /// 整体不良率 (%)
    pub fn reject_rate(&self) -> f64 {
        if self.total_validation == 0.0 {
            0.0
        } else {
            self.total_reject / self.total_validation * 100.0
        }
    }

    /// 逐日不良率序列 (按日期升序)
    pub fn daily_reject_rates(&self) -> Vec<f64> {
        self.daily.values().map(QtyPair::reject_rate).collect()
    }
}

// ==========================================
// 日桶 (Daily Bucket)
// ==========================================
// 每个出现在过滤后数据中的日历日一个实例
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// 当日验货数量
    pub validation: f64,

    /// 当日不良数量
    pub reject: f64,

    /// 当日活跃的 TQC 身份集合 (中间态, 不对外序列化)
    #[serde(skip)]
    pub tqc_ids: BTreeSet<String>,

    /// 当日活跃的生产线集合 (中间态, 不对外序列化)
    #[serde(skip)]
    pub line_ids: BTreeSet<String>,

    /// 当日去重 TQC 数 (装配层回填, 无条目默认 0)
    #[serde(default)]
    pub tqc_count: usize,

    /// 当日去重生产线数 (装配层回填, 无条目默认 0)
    #[serde(default)]
    pub line_count: usize,
}

// ==========================================
// 漏检画像 (Missing Defect Profile)
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.7 漏检交叉分析
// 键: TQC; 口径: 稽查员复检覆盖到该 TQC 的记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingDefectProfile {
    /// 稽查覆盖的累计验货数量
    pub total_validation: f64,

    /// 稽查覆盖的累计不良数量
    pub total_reject: f64,

    /// 不良标签 → 分摊不良数 (稽查口径)
    #[serde(default)]
    pub defects: BTreeMap<String, f64>,

    /// 按楼栋拆分的验货/不良
    #[serde(default)]
    pub by_building: BTreeMap<String, QtyPair>,

    /// 按款号拆分的验货/不良
    #[serde(default)]
    pub by_model: BTreeMap<String, QtyPair>,
}

impl MissingDefectProfile {
    /// 某标签的漏检率 = 该标签分摊不良数 / 稽查覆盖验货总数
    ///
    /// 验货总数为 0 时定义为 0
    pub fn missed_rate(&self, label: &str) -> f64 {
        if self.total_validation == 0.0 {
            return 0.0;
        }
        self.defects.get(label).copied().unwrap_or(0.0) / self.total_validation
    }
}

// ==========================================
// 稽查员一致性 (Inspector Consistency)
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.8 稽查员一致性派生
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InspectorConsistency {
    /// 逐日验货数量
    pub daily_validation: BTreeMap<NaiveDate, f64>,

    /// 逐日去重 TQC 数
    pub daily_tqc_count: BTreeMap<NaiveDate, usize>,

    /// 逐日去重款号数
    pub daily_model_count: BTreeMap<NaiveDate, usize>,

    /// 累计验货数量 (仅计日期可解析的记录)
    pub total_validation: f64,

    /// 活跃天数
    pub active_days: usize,

    /// 日均验货数量
    pub avg_daily_validation: f64,

    /// 日均去重 TQC 数
    pub avg_daily_tqc_count: f64,

    /// 日均去重款号数
    pub avg_daily_model_count: f64,

    /// 验货量图表 y 轴上界 = Q3 + 1.5×IQR (展示提示, 不过滤数据)
    pub axis_upper_bound: f64,
}

// ==========================================
// 分析结果 (Analytics Result)
// ==========================================
// 对外契约: 引擎输出的全部内容; 纯值, 可整体序列化
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    /// 累计验货数量
    pub total_validation: f64,
    /// 累计不良数量
    pub total_reject: f64,
    /// 累计合格数量
    pub total_pass: f64,
    /// 整体不良率 (%)
    pub overall_reject_rate: f64,
    /// 整体合格率 (%)
    pub overall_pass_rate: f64,
    /// 活跃天数 (日期可解析的日历日数)
    pub active_days: usize,
    /// 日均验货数量 (按日桶口径)
    pub avg_daily_validation: f64,

    /// TQC 维度聚合
    pub tqc: BTreeMap<String, EntityAggregate>,
    /// 楼栋维度聚合
    pub buildings: BTreeMap<String, EntityAggregate>,
    /// 款号维度聚合
    pub models: BTreeMap<String, EntityAggregate>,
    /// 订单维度聚合
    pub purchase_orders: BTreeMap<String, EntityAggregate>,
    /// 生产线维度聚合
    pub lines: BTreeMap<String, EntityAggregate>,
    /// 稽查员维度聚合
    pub inspectors: BTreeMap<String, EntityAggregate>,

    /// 日桶 (含去重 TQC/生产线计数)
    pub daily: BTreeMap<NaiveDate, DailyBucket>,

    /// 全局不良标签 → 分摊不良数
    pub defect_totals: BTreeMap<String, f64>,

    /// 已知楼栋列表 (排序去重)
    pub known_buildings: Vec<String>,
    /// 已知款号列表 (排序去重)
    pub known_models: Vec<String>,

    /// 漏检画像 (键: TQC)
    pub missing_defects: BTreeMap<String, MissingDefectProfile>,

    /// 稽查员一致性派生 (键: 稽查员)
    pub inspector_consistency: BTreeMap<String, InspectorConsistency>,
}
