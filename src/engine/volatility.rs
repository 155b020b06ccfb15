// ==========================================
// 质检分析引擎 - 波动评分器
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.6 波动评分
// ==========================================
// 职责: 逐日不良率序列 → 稳定性指标 + 波动等级
// 输入: 非空逐日不良率序列 (%) + 该实体整体平均不良率
// 输出: SustainabilityMetrics (活跃天数 < 2 时不评分)
// ==========================================

use crate::config::{EngineConfig, VolatilityThresholds};
use crate::domain::aggregate::SustainabilityMetrics;
use crate::domain::types::VolatilityCategory;
use crate::engine::stats;

// ==========================================
// VolatilityScorer - 波动评分器
// ==========================================
pub struct VolatilityScorer {
    thresholds: VolatilityThresholds,
    trend_threshold_pct: f64,
}

impl VolatilityScorer {
    /// 构造函数
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            thresholds: config.volatility.clone(),
            trend_threshold_pct: config.trend_threshold_pct,
        }
    }

    /// 评分
    ///
    /// # 参数
    /// - `daily_rates`: 逐日不良率序列 (%, 按日期升序)
    /// - `overall_rate`: 该实体整体平均不良率 (%)
    ///
    /// # 返回
    /// 活跃天数 >= 2 时返回稳定性指标, 否则 None
    pub fn score(&self, daily_rates: &[f64], overall_rate: f64) -> Option<SustainabilityMetrics> {
        if daily_rates.len() < 2 {
            return None;
        }

        let mean = stats::mean(daily_rates);
        let std_dev = stats::std_dev(daily_rates);
        let cv = stats::coefficient_of_variation(daily_rates);
        // 序列非空, quartiles 必有值
        let quartiles = stats::quartiles(daily_rates)?;

        let weight = self.thresholds.weight_for(overall_rate);
        let score = cv / weight;
        let category = self.categorize(score, std_dev);

        let fitted = stats::linear_trend(daily_rates);
        let trend = stats::classify_trend(&fitted, self.trend_threshold_pct);

        Some(SustainabilityMetrics {
            daily_rates: daily_rates.to_vec(),
            mean,
            std_dev,
            cv,
            quartiles,
            score,
            category,
            trend,
        })
    }

    /// 等级判定
    ///
    /// 评分 > 50 或日标准差 > 3.0 → 高风险;
    /// 评分 > 25 或日标准差 > 1.5 → 关注; 否则稳定
    fn categorize(&self, score: f64, std_dev: f64) -> VolatilityCategory {
        let t = &self.thresholds;
        if score > t.high_risk_score || std_dev > t.high_risk_std_dev {
            VolatilityCategory::HighRisk
        } else if score > t.watch_score || std_dev > t.watch_std_dev {
            VolatilityCategory::Watch
        } else {
            VolatilityCategory::Stable
        }
    }
}
