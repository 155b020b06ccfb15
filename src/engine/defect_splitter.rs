// ==========================================
// 质检分析引擎 - 不良标签拆分
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.2 标签拆分与分摊
// ==========================================
// 职责: 自由文本 → 去重标签列表; 不良数在标签间均摊
// ==========================================

/// 拆分不良标签文本
///
/// 逗号分隔, 逐项 TRIM, 去掉空项, 保持首次出现顺序去重;
/// 空/纯空白输入返回空列表
pub fn split_labels(text: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for part in text.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !labels.iter().any(|l| l == trimmed) {
            labels.push(trimmed.to_string());
        }
    }
    labels
}

/// 每个标签的分摊不良数 = reject_qty / k
///
/// k = 0 时不发生分摊 (返回 0, 调用方已在非空标签前提下调用)
pub fn share_per_label(reject_qty: f64, label_count: usize) -> f64 {
    if label_count == 0 {
        0.0
    } else {
        reject_qty / label_count as f64
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        assert_eq!(split_labels("破洞,脏污"), vec!["破洞", "脏污"]);
    }

    #[test]
    fn test_split_trims_and_drops_empties() {
        assert_eq!(split_labels(" 破洞 , , 脏污 ,"), vec!["破洞", "脏污"]);
        assert_eq!(split_labels(""), Vec::<String>::new());
        assert_eq!(split_labels("   "), Vec::<String>::new());
        assert_eq!(split_labels(",,,"), Vec::<String>::new());
    }

    #[test]
    fn test_split_dedupes_preserving_order() {
        assert_eq!(split_labels("脏污,破洞,脏污"), vec!["脏污", "破洞"]);
    }

    #[test]
    fn test_share_per_label() {
        assert_eq!(share_per_label(5.0, 2), 2.5);
        assert_eq!(share_per_label(5.0, 0), 0.0);
    }

    #[test]
    fn test_shares_sum_to_reject_qty() {
        // 分摊总和应等于记录不良数
        let labels = split_labels("A,B,C,D");
        let share = share_per_label(7.0, labels.len());
        let total: f64 = labels.iter().map(|_| share).sum();
        assert!((total - 7.0).abs() < 1e-9);
    }
}
