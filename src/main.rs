// ==========================================
// 质检分析引擎 - 命令行入口
// ==========================================
// 用途: 读取标准化记录 JSON, 全量计算后输出结果 JSON
// 定位: 协作方胶水; 核心契约见 lib (api::AnalyticsApi)
// ==========================================

use anyhow::{bail, Context, Result};
use inspection_analytics::domain::types::PeriodWindow;
use inspection_analytics::{ingest, logging, AnalyticsApi};
use std::path::Path;

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", inspection_analytics::APP_NAME, inspection_analytics::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        bail!("用法: {} <records.json> [all|week|month]", args[0]);
    }

    let path = Path::new(&args[1]);
    let window = args
        .get(2)
        .map(|s| PeriodWindow::from_str(s))
        .unwrap_or(PeriodWindow::All);

    tracing::info!("载入记录: {}", path.display());
    let records = ingest::load_records_from_file(path)
        .with_context(|| format!("读取记录失败: {}", path.display()))?;
    tracing::info!("记录数: {}, 统计周期: {}", records.len(), window);

    let api = AnalyticsApi::with_defaults();
    let result = api.compute(&records, window);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
