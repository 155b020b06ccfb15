// ==========================================
// 质检分析引擎 - 入口标准化层
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 9. 设计备注
// ==========================================
// 职责: 弱类型原始行 → 强类型 InspectionRecord, 只在边界做一次校验
// 口径: 非法数量 → 0; 负数钳制为 0; 空白文本 → None
// 红线: 载荷不是数组属于契约违规, 直接失败; 其余脏数据只降级
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::record::InspectionRecord;
use crate::domain::types::DateValue;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// 标准化一批原始行
///
/// # 参数
/// - `payload`: JSON 载荷, 必须是对象数组
///
/// # 返回
/// 标准化记录; 非对象行跳过 (记 warn), 非数组载荷返回错误
pub fn normalize_rows(payload: &Value) -> ApiResult<Vec<InspectionRecord>> {
    let rows = payload
        .as_array()
        .ok_or_else(|| ApiError::InvalidInput("记录载荷必须是数组".to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for (idx, row) in rows.iter().enumerate() {
        match row.as_object() {
            Some(obj) => records.push(normalize_row(obj)),
            None => {
                skipped += 1;
                warn!(row = idx, "跳过非对象行");
            }
        }
    }

    debug!(total = rows.len(), skipped, "入口标准化完成");
    Ok(records)
}

/// 从 JSON 文件读取并标准化记录
pub fn load_records_from_file(path: &Path) -> ApiResult<Vec<InspectionRecord>> {
    let content = std::fs::read_to_string(path)?;
    let payload: Value = serde_json::from_str(&content)?;
    normalize_rows(&payload)
}

/// 标准化单行
fn normalize_row(obj: &serde_json::Map<String, Value>) -> InspectionRecord {
    InspectionRecord {
        inspection_date: date_value(obj.get("inspection_date")),
        building: text_field(obj.get("building")),
        line: text_field(obj.get("line")),
        po_number: text_field(obj.get("po_number")),
        model: text_field(obj.get("model")),
        inspector_id: text_field(obj.get("inspector_id")),
        inspector_name: text_field(obj.get("inspector_name")),
        tqc_id: text_field(obj.get("tqc_id")),
        tqc_name: text_field(obj.get("tqc_name")),
        validation_qty: qty_field(obj.get("validation_qty")),
        pass_qty: qty_field(obj.get("pass_qty")),
        reject_qty: qty_field(obj.get("reject_qty")),
        defect_text: text_field(obj.get("defect_text")).unwrap_or_default(),
    }
}

/// 日期列: 保留弱类型原始值, 解析延迟到引擎内
fn date_value(value: Option<&Value>) -> DateValue {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return DateValue::Empty;
            }
            // ISO 文本提前结构化, 其余留给容错解析
            match trimmed.parse::<chrono::NaiveDate>() {
                Ok(d) => DateValue::Date(d),
                Err(_) => DateValue::Text(trimmed.to_string()),
            }
        }
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => DateValue::Serial(f),
            None => DateValue::Empty,
        },
        _ => DateValue::Empty,
    }
}

/// 文本列: TRIM 后空串视同缺失; 数字列转为文本 (工号常被识别成数字)
fn text_field(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// 数量列: 数字或数字文本; 非法值归 0, 负数钳制为 0
fn qty_field(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() && parsed > 0.0 {
        parsed
    } else {
        0.0
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_non_array_payload_is_contract_violation() {
        let result = normalize_rows(&json!({"rows": []}));
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_normalize_typical_row() {
        let payload = json!([{
            "inspection_date": "2025-01-10",
            "building": " B1 ",
            "line": "L1",
            "po_number": "PO-1",
            "model": "M-100",
            "tqc_id": 1024,
            "tqc_name": "质检一",
            "validation_qty": 100,
            "pass_qty": "95",
            "reject_qty": 5.0,
            "defect_text": "破洞,脏污"
        }]);
        let records = normalize_rows(&payload).unwrap();
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(
            r.inspection_date,
            DateValue::Date(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
        );
        assert_eq!(r.building.as_deref(), Some("B1"));
        // 数字工号转文本
        assert_eq!(r.tqc_id.as_deref(), Some("1024"));
        assert_eq!(r.validation_qty, 100.0);
        // 数字文本也能读出
        assert_eq!(r.pass_qty, 95.0);
        assert_eq!(r.defect_text, "破洞,脏污");
    }

    #[test]
    fn test_malformed_quantities_default_to_zero() {
        let payload = json!([{
            "validation_qty": "abc",
            "pass_qty": null,
            "reject_qty": -5
        }]);
        let records = normalize_rows(&payload).unwrap();
        let r = &records[0];
        assert_eq!(r.validation_qty, 0.0);
        assert_eq!(r.pass_qty, 0.0);
        // 负数钳制为 0
        assert_eq!(r.reject_qty, 0.0);
        assert!(r.is_all_zero());
    }

    #[test]
    fn test_date_variants_preserved() {
        let payload = json!([
            {"inspection_date": 45658},
            {"inspection_date": "3/5/24"},
            {"inspection_date": ""},
            {"inspection_date": null}
        ]);
        let records = normalize_rows(&payload).unwrap();
        assert_eq!(records[0].inspection_date, DateValue::Serial(45658.0));
        assert_eq!(
            records[1].inspection_date,
            DateValue::Text("3/5/24".to_string())
        );
        assert_eq!(records[2].inspection_date, DateValue::Empty);
        assert_eq!(records[3].inspection_date, DateValue::Empty);
    }

    #[test]
    fn test_non_object_rows_skipped() {
        let payload = json!([{"validation_qty": 1}, 42, "junk"]);
        let records = normalize_rows(&payload).unwrap();
        assert_eq!(records.len(), 1);
    }
}
