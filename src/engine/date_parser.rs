// ==========================================
// 质检分析引擎 - 容错日期解析
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.1 日期解析
// ==========================================
// 职责: 把弱类型日期列解析为日历日
// 红线: 解析失败不是错误, 调用方必须按 "排除出按日聚合" 处理
// ==========================================

use crate::domain::types::DateValue;
use chrono::{DateTime, NaiveDate};

/// Excel 1900 日期系统的序列号基准: 1970-01-01 对应序列号 25569
const EXCEL_EPOCH_OFFSET: f64 = 25569.0;

/// 一天的秒数
const SECONDS_PER_DAY: f64 = 86400.0;

/// 解析弱类型日期值
///
/// 解析顺序:
/// 1. 已结构化日期直接返回
/// 2. 数字按 Excel 序列号换算: (serial - 25569) × 86400 秒 (Unix 纪元起)
/// 3. 文本先按标准日期格式 (YYYY-MM-DD / YYYY/MM/DD) 解析
/// 4. 再退化为数字组提取: 首组 4 位按 YYYY-M-D, 否则按 M-D-YY (年补 2000)
///
/// 任一环节失败返回 None
pub fn parse_date(value: &DateValue) -> Option<NaiveDate> {
    match value {
        DateValue::Date(d) => Some(*d),
        DateValue::Serial(n) => parse_serial(*n),
        DateValue::Text(s) => parse_text(s),
        DateValue::Empty => None,
    }
}

/// Excel 序列号换算
fn parse_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let secs = (serial - EXCEL_EPOCH_OFFSET) * SECONDS_PER_DAY;
    DateTime::from_timestamp(secs as i64, 0).map(|dt| dt.date_naive())
}

/// 文本解析: 标准格式优先, 失败后走数字组提取
///
/// 标准格式仅在首个数字串为 4 位年份时尝试:
/// chrono 的 `%Y` 也接受 1-2 位年份, 不加守卫会把
/// "3/5/24" 这类 M/D/YY 文本误解析成公元 3 年
fn parse_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if leads_with_four_digit_year(trimmed) {
        for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
                return Some(d);
            }
        }
    }

    parse_digit_groups(trimmed)
}

/// 文本是否以恰好 4 位的年份数字串开头
fn leads_with_four_digit_year(text: &str) -> bool {
    text.chars().take_while(|c| c.is_ascii_digit()).count() == 4
}

/// 数字组提取: 取文本中前三个连续数字串
///
/// 首组 4 位 → YYYY-M-D; 否则 → M-D-YY, 年份抬升为 20YY
fn parse_digit_groups(text: &str) -> Option<NaiveDate> {
    let groups: Vec<&str> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    if groups.len() < 3 {
        return None;
    }

    let a: u32 = groups[0].parse().ok()?;
    let b: u32 = groups[1].parse().ok()?;
    let c: u32 = groups[2].parse().ok()?;

    let (y, m, d) = if groups[0].len() == 4 {
        (a as i32, b, c)
    } else {
        (2000 + c as i32, a, b)
    };

    NaiveDate::from_ymd_opt(y, m, d)
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_structured_date_passthrough() {
        let v = DateValue::Date(ymd(2025, 1, 15));
        assert_eq!(parse_date(&v), Some(ymd(2025, 1, 15)));
    }

    #[test]
    fn test_excel_serial() {
        // 25569 即 Unix 纪元当天
        assert_eq!(parse_date(&DateValue::Serial(25569.0)), Some(ymd(1970, 1, 1)));
        // 45658 = 2025-01-01
        assert_eq!(parse_date(&DateValue::Serial(45658.0)), Some(ymd(2025, 1, 1)));
        // 带小数的序列号 (时间部分) 落在同一天
        assert_eq!(parse_date(&DateValue::Serial(45658.5)), Some(ymd(2025, 1, 1)));
    }

    #[test]
    fn test_serial_non_finite() {
        assert_eq!(parse_date(&DateValue::Serial(f64::NAN)), None);
        assert_eq!(parse_date(&DateValue::Serial(f64::INFINITY)), None);
    }

    #[test]
    fn test_text_standard_formats() {
        assert_eq!(
            parse_date(&DateValue::Text("2025-03-05".to_string())),
            Some(ymd(2025, 3, 5))
        );
        assert_eq!(
            parse_date(&DateValue::Text("2025/03/05".to_string())),
            Some(ymd(2025, 3, 5))
        );
        assert_eq!(
            parse_date(&DateValue::Text("  2025-03-05  ".to_string())),
            Some(ymd(2025, 3, 5))
        );
    }

    #[test]
    fn test_text_digit_groups_year_first() {
        // 首组 4 位 → YYYY-M-D
        assert_eq!(
            parse_date(&DateValue::Text("2024.3.5".to_string())),
            Some(ymd(2024, 3, 5))
        );
    }

    #[test]
    fn test_text_digit_groups_month_first() {
        // 首组非 4 位 → M-D-YY, 年抬升为 20YY
        assert_eq!(
            parse_date(&DateValue::Text("3/5/24".to_string())),
            Some(ymd(2024, 3, 5))
        );
        assert_eq!(
            parse_date(&DateValue::Text("12-31-25".to_string())),
            Some(ymd(2025, 12, 31))
        );
    }

    #[test]
    fn test_unparseable_inputs() {
        assert_eq!(parse_date(&DateValue::Empty), None);
        assert_eq!(parse_date(&DateValue::Text("".to_string())), None);
        assert_eq!(parse_date(&DateValue::Text("n/a".to_string())), None);
        assert_eq!(parse_date(&DateValue::Text("3/5".to_string())), None);
        // 非法日历日
        assert_eq!(parse_date(&DateValue::Text("2024.13.45".to_string())), None);
    }
}
