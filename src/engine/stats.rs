// ==========================================
// 质检分析引擎 - 统计函数库
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.5 统计库
// ==========================================
// 职责: 均值/方差/变异系数/四分位/相关/趋势拟合/移动平均
// 红线: 退化输入一律返回安全值 (0 或原序列), 不返回 NaN
// ==========================================

use crate::domain::aggregate::Quartiles;
use crate::domain::types::TrendDirection;

/// 算术平均, 空序列为 0
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 总体方差 (除以 n, 不是 n-1), 空序列为 0
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// 总体标准差
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// 变异系数 (%) = 标准差 / 均值 × 100
///
/// 均值为 0 时定义为 0
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 {
        0.0
    } else {
        std_dev(values) / m * 100.0
    }
}

/// 四分位数集 (R-7 / 电子表格线性插值法)
///
/// 位置 = (n-1) × p, 在相邻两个排序值之间线性插值;
/// 空序列返回 None
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(Quartiles {
        min: sorted[0],
        q1: percentile_sorted(&sorted, 0.25),
        median: percentile_sorted(&sorted, 0.5),
        q3: percentile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// 已排序序列上的 R-7 百分位插值
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * p;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Pearson 相关系数
///
/// 长度不一致、长度 < 2、或任一序列零方差时返回 0 (不返回 NaN)
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let mx = mean(xs);
    let my = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        cov += (x - mx) * (y - my);
        var_x += (x - mx) * (x - mx);
        var_y += (y - my) * (y - my);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// OLS 线性趋势拟合: 以 0..n-1 为自变量, 返回拟合直线上的各点
///
/// n < 2 或分母退化时原样返回输入 (无趋势可算)
pub fn linear_trend(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return values.to_vec();
    }

    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let mx = mean(&xs);
    let my = mean(values);

    let mut num = 0.0;
    let mut den = 0.0;
    for (x, y) in xs.iter().zip(values.iter()) {
        num += (x - mx) * (y - my);
        den += (x - mx) * (x - mx);
    }

    // 索引 0..n-1 不可能全相等, 但仍做防护
    if den == 0.0 {
        return values.to_vec();
    }

    let slope = num / den;
    let intercept = my - slope * mx;
    xs.iter().map(|x| intercept + slope * x).collect()
}

/// 简单滑动平均 (尾随窗口)
///
/// 输入短于窗口时原样返回
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return values.to_vec();
    }
    values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// 趋势方向判定
///
/// 比较拟合直线末值-首值与阈值 (threshold_pct × |首值|):
/// 差值绝对值低于阈值 → 平稳; 正向超阈 → 上升; 负向 → 下降。
/// 长度 < 2 恒为平稳
pub fn classify_trend(trend: &[f64], threshold_pct: f64) -> TrendDirection {
    if trend.len() < 2 {
        return TrendDirection::Stable;
    }
    let first = trend[0];
    let last = trend[trend.len() - 1];
    let diff = last - first;
    let threshold = first.abs() * threshold_pct;

    if diff.abs() <= threshold {
        TrendDirection::Stable
    } else if diff > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    }
}
