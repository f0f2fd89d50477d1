//! 规则引擎命令行入口

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use rule_engine::{Facts, RuleEngine, RuleSet};
use rule_shared::config::AppConfig;
use rule_shared::observability;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

const SERVICE_NAME: &str = "rule-engine";
const DIAGNOSTIC_TARGET: &str = "rule_engine";

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(SERVICE_NAME).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig {
            service_name: SERVICE_NAME.to_string(),
            ..AppConfig::default()
        }
    });
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    // 评估诊断以 debug 级别输出，需要放开对应目标的过滤
    if config.engine.debug || matches!(cli.command, Commands::Eval { debug: true, .. }) {
        config.observability.enable_debug_for(DIAGNOSTIC_TARGET);
    }

    let _guard = observability::init(&config.service_name, &config.observability)?;

    match cli.command {
        Commands::Eval {
            rules,
            facts,
            debug,
            trace,
        } => run_eval(&config, rules, facts, debug, trace),
        Commands::Check { rules } => run_check(&config, rules),
    }
}

fn rules_path(config: &AppConfig, rules: Option<PathBuf>) -> Result<PathBuf> {
    match rules.or_else(|| config.engine.rules_path.as_ref().map(PathBuf::from)) {
        Some(path) => Ok(path),
        None => bail!("未指定规则文件：使用 --rules 或配置 engine.rules_path"),
    }
}

fn run_eval(
    config: &AppConfig,
    rules: Option<PathBuf>,
    facts: PathBuf,
    debug: bool,
    trace: bool,
) -> Result<ExitCode> {
    let rules_path = rules_path(config, rules)?;
    let rule_set = RuleSet::from_file(&rules_path)
        .with_context(|| format!("加载规则失败: {}", rules_path.display()))?;

    let facts_json = std::fs::read_to_string(&facts)
        .with_context(|| format!("读取事实数据失败: {}", facts.display()))?;
    let facts = Facts::from_json(&facts_json)?;

    let engine = RuleEngine::new().with_debug(debug || config.engine.debug);

    let action = if trace {
        let report = engine.evaluate_traced(rule_set.rules(), &facts);
        println!("{}", serde_json::to_string_pretty(&report)?);
        report.action
    } else {
        let action = rule_set.evaluate(&engine, &facts).map(str::to_string);
        println!("{}", action.as_deref().unwrap_or("no match"));
        action
    };

    match action {
        Some(action) => {
            info!(action = %action, "规则匹配");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            warn!(rules = rule_set.len(), "没有规则匹配");
            Ok(ExitCode::from(1))
        }
    }
}

fn run_check(config: &AppConfig, rules: Option<PathBuf>) -> Result<ExitCode> {
    let rules_path = rules_path(config, rules)?;
    let rule_set = RuleSet::from_file(&rules_path)
        .with_context(|| format!("规则校验失败: {}", rules_path.display()))?;

    println!("{} 条规则校验通过", rule_set.len());
    for field in rule_set.required_fields() {
        println!("  {}", field);
    }

    Ok(ExitCode::SUCCESS)
}
