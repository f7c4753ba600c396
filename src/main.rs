// ==========================================
// 熟料供应网络 - 命令行入口
// ==========================================
// 用法:
//   route-balance <数据集路径>                              输出数据集元数据
//   route-balance <数据集路径> <起点> <终点> <方式> <周期>   输出单路线计算结果
//   route-balance --model                                    输出数学模型说明
// 选项:
//   --locale <zh-CN|en>   消息语言
//   --json-log            JSON 行格式日志（写入 stderr）
// 数据集路径: CSV 目录 / .csv / .xlsx / .xls
// ==========================================

use anyhow::{anyhow, bail, Context};
use route_balance::config::ConfigManager;
use route_balance::{i18n, logging, Period, PlannerApi};

fn main() -> anyhow::Result<()> {
    let mut positional = Vec::new();
    let mut json_log = false;
    let mut show_model = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json-log" => json_log = true,
            "--model" => show_model = true,
            "--locale" => {
                let locale = args.next().ok_or_else(|| anyhow!("--locale 需要参数"))?;
                i18n::set_locale(&locale);
            }
            _ => positional.push(arg),
        }
    }

    logging::init(json_log);
    tracing::info!("{} v{}", route_balance::APP_NAME, route_balance::VERSION);

    let config = ConfigManager::load()
        .map_err(|e| anyhow!("{}", e))
        .context("配置加载失败")?;
    if let Some(path) = config.source() {
        tracing::info!(path = %path.display(), "使用配置文件");
    }
    let api = PlannerApi::new(config.config().clone());

    if show_model {
        println!("{}", serde_json::to_string_pretty(&api.model_formulation())?);
        return Ok(());
    }

    let Some(dataset_path) = positional.first() else {
        bail!("用法: route-balance <数据集路径> [<起点> <终点> <方式> <周期>]");
    };

    let outcome = api.load_from_path(dataset_path)?;
    if !outcome.success {
        for error in &outcome.errors {
            eprintln!("{}", error);
        }
        bail!("数据集加载失败: {}", dataset_path);
    }

    match &positional[1..] {
        [] => {
            println!("{}", serde_json::to_string_pretty(&outcome.metadata)?);
        }
        [source, destination, mode, period] => {
            let period: Period = period
                .trim()
                .parse()
                .with_context(|| format!("周期必须为整数: {}", period))?;
            match api.compute_route(source, destination, mode, period) {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(err) => {
                    for issue in err.selection_issues() {
                        eprintln!("{}", issue);
                    }
                    return Err(err.into());
                }
            }
        }
        _ => bail!("路线查询需要 4 个参数: <起点> <终点> <方式> <周期>"),
    }

    Ok(())
}
