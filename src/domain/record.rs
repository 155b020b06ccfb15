// ==========================================
// 质检分析引擎 - 检验记录实体
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 3. 数据模型
// ==========================================
// 职责: 定义标准化后的单条检验记录
// 红线: 引擎内部只读, 不回写记录
// ==========================================

use crate::domain::types::DateValue;
use serde::{Deserialize, Serialize};

// ==========================================
// InspectionRecord - 标准化检验记录
// ==========================================
// 一行 = 一次抽检; 数量字段在入口层已钳制为非负
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    /// 检验日期 (弱类型原始值, 允许缺失)
    #[serde(default)]
    pub inspection_date: DateValue,

    /// 楼栋
    #[serde(default)]
    pub building: Option<String>,

    /// 生产线
    #[serde(default)]
    pub line: Option<String>,

    /// 订单号 (PO)
    #[serde(default)]
    pub po_number: Option<String>,

    /// 款号 / 型号
    #[serde(default)]
    pub model: Option<String>,

    /// 稽查员工号 (独立复检方)
    #[serde(default)]
    pub inspector_id: Option<String>,

    /// 稽查员姓名
    #[serde(default)]
    pub inspector_name: Option<String>,

    /// TQC 工号 (一线质检员)
    #[serde(default)]
    pub tqc_id: Option<String>,

    /// TQC 姓名
    #[serde(default)]
    pub tqc_name: Option<String>,

    /// 验货数量
    #[serde(default)]
    pub validation_qty: f64,

    /// 合格数量
    #[serde(default)]
    pub pass_qty: f64,

    /// 不良数量
    #[serde(default)]
    pub reject_qty: f64,

    /// 不良标签文本 (逗号分隔, 可为空)
    #[serde(default)]
    pub defect_text: String,
}

impl InspectionRecord {
    /// 三个数量字段是否全为 0
    ///
    /// 全零记录不参与任何聚合
    pub fn is_all_zero(&self) -> bool {
        self.validation_qty == 0.0 && self.pass_qty == 0.0 && self.reject_qty == 0.0
    }

    /// TQC 维度键 (工号+姓名, 两者均缺失时返回 None)
    pub fn tqc_key(&self) -> Option<String> {
        identity_key(self.tqc_id.as_deref(), self.tqc_name.as_deref())
    }

    /// 稽查员维度键
    pub fn inspector_key(&self) -> Option<String> {
        identity_key(self.inspector_id.as_deref(), self.inspector_name.as_deref())
    }

    /// 楼栋, 缺失时回退为 "Unknown"
    pub fn building_or_unknown(&self) -> String {
        non_empty(self.building.as_deref()).unwrap_or(UNKNOWN_LABEL).to_string()
    }

    /// 款号, 缺失时回退为 "Unknown"
    pub fn model_or_unknown(&self) -> String {
        non_empty(self.model.as_deref()).unwrap_or(UNKNOWN_LABEL).to_string()
    }

    /// 生产线 (不做回退, 缺失即跳过该维度)
    pub fn line_key(&self) -> Option<String> {
        non_empty(self.line.as_deref()).map(|s| s.to_string())
    }

    /// 订单号 (不做回退, 缺失即跳过该维度)
    pub fn po_key(&self) -> Option<String> {
        non_empty(self.po_number.as_deref()).map(|s| s.to_string())
    }
}

/// 楼栋/款号缺失时的占位值
pub const UNKNOWN_LABEL: &str = "Unknown";

/// 身份键拼装: 工号与姓名均存在时拼为 "工号 - 姓名",
/// 只有一个时取其一, 均缺失返回 None
pub fn identity_key(id: Option<&str>, name: Option<&str>) -> Option<String> {
    let id = non_empty(id);
    let name = non_empty(name);
    match (id, name) {
        (Some(i), Some(n)) => Some(format!("{} - {}", i, n)),
        (Some(i), None) => Some(i.to_string()),
        (None, Some(n)) => Some(n.to_string()),
        (None, None) => None,
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|v| !v.is_empty())
}
