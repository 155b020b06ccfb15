// ==========================================
// 质检分析引擎 - 领域类型定义
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 3. 数据模型
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 统计周期 (Period Window)
// ==========================================
// 过滤口径: 全部 / 近一周 / 近一月
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodWindow {
    All,   // 全部历史
    Week,  // 近 7 天
    Month, // 近一个自然月
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodWindow::All => write!(f, "ALL"),
            PeriodWindow::Week => write!(f, "WEEK"),
            PeriodWindow::Month => write!(f, "MONTH"),
        }
    }
}

impl PeriodWindow {
    /// 从字符串解析统计周期
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "WEEK" => PeriodWindow::Week,
            "MONTH" => PeriodWindow::Month,
            _ => PeriodWindow::All, // 默认值
        }
    }
}

// ==========================================
// 波动等级 (Volatility Category)
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.6 波动评分
// 顺序: Stable < Watch < HighRisk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityCategory {
    Stable,   // 稳定
    Watch,    // 关注
    HighRisk, // 高风险
}

impl fmt::Display for VolatilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityCategory::Stable => write!(f, "STABLE"),
            VolatilityCategory::Watch => write!(f, "WATCH"),
            VolatilityCategory::HighRisk => write!(f, "HIGH_RISK"),
        }
    }
}

// ==========================================
// 趋势方向 (Trend Direction)
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.5 趋势判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Stable,     // 平稳
    Increasing, // 上升
    Decreasing, // 下降
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Stable => write!(f, "STABLE"),
            TrendDirection::Increasing => write!(f, "INCREASING"),
            TrendDirection::Decreasing => write!(f, "DECREASING"),
        }
    }
}

// ==========================================
// 日期原始值 (Date Value)
// ==========================================
// 来源数据的日期列是弱类型的: 可能为空、已结构化、
// Excel 序列号或自由文本; 解析职责在 engine::date_parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    /// 已结构化日期 (YYYY-MM-DD 文本会被 serde 直接解析到此)
    Date(NaiveDate),
    /// Excel 日期序列号 (1900 日期系统)
    Serial(f64),
    /// 自由文本 (如 "3/5/24"、"2024.3.5")
    Text(String),
    /// 缺失
    Empty,
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue::Empty
    }
}
