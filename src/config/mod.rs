// ==========================================
// 质检分析引擎 - 配置层
// ==========================================
// 依据: QC_Dashboard_Engine_Spec_v0.2.md - 4.5/4.6 阈值常量
// ==========================================
// 职责: 集中管理统计与波动评分阈值; 默认值即规格口径
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 波动评分阈值 (Volatility Thresholds)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityThresholds {
    /// 低基线不良率上界 (%): 低于此值用高敏权重
    #[serde(default = "default_low_rate_bound")]
    pub low_rate_bound: f64,

    /// 中基线不良率上界 (%)
    #[serde(default = "default_mid_rate_bound")]
    pub mid_rate_bound: f64,

    /// 低基线权重
    #[serde(default = "default_low_rate_weight")]
    pub low_rate_weight: f64,

    /// 中基线权重
    #[serde(default = "default_mid_rate_weight")]
    pub mid_rate_weight: f64,

    /// 基准权重
    #[serde(default = "default_base_weight")]
    pub base_weight: f64,

    /// 高风险评分阈值
    #[serde(default = "default_high_risk_score")]
    pub high_risk_score: f64,

    /// 高风险日标准差阈值
    #[serde(default = "default_high_risk_std_dev")]
    pub high_risk_std_dev: f64,

    /// 关注评分阈值
    #[serde(default = "default_watch_score")]
    pub watch_score: f64,

    /// 关注日标准差阈值
    #[serde(default = "default_watch_std_dev")]
    pub watch_std_dev: f64,
}

fn default_low_rate_bound() -> f64 {
    3.0
}
fn default_mid_rate_bound() -> f64 {
    7.0
}
fn default_low_rate_weight() -> f64 {
    2.0
}
fn default_mid_rate_weight() -> f64 {
    1.5
}
fn default_base_weight() -> f64 {
    1.0
}
fn default_high_risk_score() -> f64 {
    50.0
}
fn default_high_risk_std_dev() -> f64 {
    3.0
}
fn default_watch_score() -> f64 {
    25.0
}
fn default_watch_std_dev() -> f64 {
    1.5
}

impl Default for VolatilityThresholds {
    fn default() -> Self {
        Self {
            low_rate_bound: default_low_rate_bound(),
            mid_rate_bound: default_mid_rate_bound(),
            low_rate_weight: default_low_rate_weight(),
            mid_rate_weight: default_mid_rate_weight(),
            base_weight: default_base_weight(),
            high_risk_score: default_high_risk_score(),
            high_risk_std_dev: default_high_risk_std_dev(),
            watch_score: default_watch_score(),
            watch_std_dev: default_watch_std_dev(),
        }
    }
}

impl VolatilityThresholds {
    /// 按整体平均不良率选取风险敏感权重
    ///
    /// 基线越低, 同样的波动越值得放大
    pub fn weight_for(&self, overall_rate: f64) -> f64 {
        if overall_rate < self.low_rate_bound {
            self.low_rate_weight
        } else if overall_rate < self.mid_rate_bound {
            self.mid_rate_weight
        } else {
            self.base_weight
        }
    }
}

// ==========================================
// 引擎配置 (Engine Config)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 波动评分阈值
    #[serde(default)]
    pub volatility: VolatilityThresholds,

    /// 趋势判定阈值比例 (默认 5%)
    #[serde(default = "default_trend_threshold_pct")]
    pub trend_threshold_pct: f64,
}

fn default_trend_threshold_pct() -> f64 {
    0.05
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volatility: VolatilityThresholds::default(),
            trend_threshold_pct: default_trend_threshold_pct(),
        }
    }
}

impl EngineConfig {
    /// 配置自检
    ///
    /// # 返回
    /// 不合法时返回首个违规项的描述
    pub fn validate(&self) -> Result<(), String> {
        let v = &self.volatility;
        let positives = [
            ("low_rate_weight", v.low_rate_weight),
            ("mid_rate_weight", v.mid_rate_weight),
            ("base_weight", v.base_weight),
        ];
        for (name, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("波动权重 {} 必须为正有限值: {}", name, value));
            }
        }

        if !(v.low_rate_bound.is_finite() && v.mid_rate_bound.is_finite()) {
            return Err("不良率分界必须为有限值".to_string());
        }
        if v.low_rate_bound >= v.mid_rate_bound {
            return Err(format!(
                "不良率分界顺序错误: low_rate_bound={} >= mid_rate_bound={}",
                v.low_rate_bound, v.mid_rate_bound
            ));
        }
        if v.watch_score >= v.high_risk_score {
            return Err(format!(
                "评分阈值顺序错误: watch_score={} >= high_risk_score={}",
                v.watch_score, v.high_risk_score
            ));
        }
        if v.watch_std_dev >= v.high_risk_std_dev {
            return Err(format!(
                "标准差阈值顺序错误: watch_std_dev={} >= high_risk_std_dev={}",
                v.watch_std_dev, v.high_risk_std_dev
            ));
        }
        if !self.trend_threshold_pct.is_finite() || self.trend_threshold_pct < 0.0 {
            return Err(format!(
                "趋势阈值比例必须为非负有限值: {}",
                self.trend_threshold_pct
            ));
        }
        Ok(())
    }
}
