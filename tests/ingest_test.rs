// ==========================================
// 入口标准化层集成测试
// ==========================================
// 测试目标: 验证弱类型载荷 → 标准化记录 → 引擎计算的贯通链路
// 覆盖范围: 文件载入 / 契约违规 / 脏数据钳制
// ==========================================

use chrono::NaiveDate;
use inspection_analytics::domain::types::PeriodWindow;
use inspection_analytics::{ingest, AnalyticsApi, ApiError};
use std::io::Write;
use tempfile::NamedTempFile;

/// 写临时 JSON 文件
fn write_payload(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("创建临时文件失败");
    file.write_all(content.as_bytes()).expect("写入失败");
    file
}

#[test]
fn test_load_and_compute_from_file() {
    let payload = r#"[
        {
            "inspection_date": "2025-01-10",
            "building": "B2",
            "line": "L5",
            "po_number": "PO-77",
            "model": "M-300",
            "inspector_id": "A09",
            "tqc_id": "T55",
            "tqc_name": "质检五",
            "validation_qty": 120,
            "pass_qty": 114,
            "reject_qty": 6,
            "defect_text": "跳线,油污,跳线"
        },
        {
            "inspection_date": 45658,
            "tqc_id": "T55",
            "tqc_name": "质检五",
            "validation_qty": "80",
            "pass_qty": "80",
            "reject_qty": 0
        }
    ]"#;
    let file = write_payload(payload);

    let records = ingest::load_records_from_file(file.path()).unwrap();
    assert_eq!(records.len(), 2);

    let api = AnalyticsApi::with_defaults();
    let result = api.compute_at(
        &records,
        PeriodWindow::All,
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
    );

    let tqc = &result.tqc["T55 - 质检五"];
    assert_eq!(tqc.total_validation, 200.0);
    assert_eq!(tqc.total_reject, 6.0);
    // 标签去重后两个: 跳线/油污, 各分摊 3
    assert_eq!(tqc.defects["跳线"], 3.0);
    assert_eq!(tqc.defects["油污"], 3.0);

    // 序列号 45658 = 2025-01-01
    assert!(result
        .daily
        .contains_key(&NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    assert_eq!(result.active_days, 2);
}

#[test]
fn test_non_array_payload_fails_fast() {
    let file = write_payload(r#"{"rows": []}"#);
    let err = ingest::load_records_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_broken_json_fails_fast() {
    let file = write_payload("not json at all");
    let err = ingest::load_records_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ApiError::PayloadParseError(_)));
}

#[test]
fn test_missing_file_fails_fast() {
    let err =
        ingest::load_records_from_file(std::path::Path::new("/nonexistent/records.json"))
            .unwrap_err();
    assert!(matches!(err, ApiError::PayloadReadError(_)));
}

#[test]
fn test_dirty_rows_degrade_not_fail() {
    // 负数钳制、非法数量归零、非对象行跳过
    let payload = r#"[
        {"tqc_id": "T01", "validation_qty": -50, "reject_qty": "abc"},
        "junk",
        {"tqc_id": "T02", "validation_qty": 30, "pass_qty": 30, "reject_qty": 0}
    ]"#;
    let file = write_payload(payload);
    let records = ingest::load_records_from_file(file.path()).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].is_all_zero());

    let api = AnalyticsApi::with_defaults();
    let result = api.compute_at(
        &records,
        PeriodWindow::All,
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
    );
    // 全零行无贡献
    assert_eq!(result.total_validation, 30.0);
    assert!(!result.tqc.contains_key("T01"));
}
