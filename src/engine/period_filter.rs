// ==========================================
// 质检分析引擎 - 统计周期过滤
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.3 周期过滤
// ==========================================
// 职责: 按尾随时间窗裁剪记录序列
// 红线: 非全量窗口下, 日期不可解析的记录一律排除
// ==========================================

use crate::domain::record::InspectionRecord;
use crate::domain::types::PeriodWindow;
use crate::engine::date_parser;
use chrono::{Duration, Months, NaiveDate};

/// 计算窗口起点 (含)
///
/// - All: 无起点
/// - Week: now - 7 天
/// - Month: now - 1 个自然月 (月末自动回退, 如 3/31 → 2/28)
pub fn window_cutoff(window: PeriodWindow, now: NaiveDate) -> Option<NaiveDate> {
    match window {
        PeriodWindow::All => None,
        PeriodWindow::Week => Some(now - Duration::days(7)),
        PeriodWindow::Month => now.checked_sub_months(Months::new(1)),
    }
}

/// 过滤记录序列
///
/// # 参数
/// - `records`: 全量记录
/// - `window`: 统计周期
/// - `now`: 评估时刻 (由调用方显式传入, 保证可重放)
///
/// # 返回
/// 通过过滤的记录引用 (保持输入顺序)
pub fn filter<'a>(
    records: &'a [InspectionRecord],
    window: PeriodWindow,
    now: NaiveDate,
) -> Vec<&'a InspectionRecord> {
    let cutoff = match window_cutoff(window, now) {
        None => return records.iter().collect(),
        Some(c) => c,
    };

    records
        .iter()
        .filter(|r| match date_parser::parse_date(&r.inspection_date) {
            Some(d) => d >= cutoff,
            None => false,
        })
        .collect()
}
