//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 规则引擎命令行工具
///
/// 对事实数据评估规则文件，输出第一条匹配规则的动作。
#[derive(Parser, Debug)]
#[command(name = "rule-engine")]
#[command(version, about = "首条命中规则引擎")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 评估规则，输出匹配的动作
    ///
    /// 命中时退出码为 0，无匹配时为 1。
    Eval {
        /// 规则文件（JSON 数组），缺省时使用配置中的 engine.rules_path
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// 事实数据文件（JSON 对象）
        #[arg(short, long)]
        facts: PathBuf,

        /// 输出评估诊断
        #[arg(long)]
        debug: bool,

        /// 以 JSON 输出完整评估报告（含诊断记录）
        #[arg(long)]
        trace: bool,
    },

    /// 校验规则文件，列出引用的字段
    Check {
        /// 规则文件（JSON 数组）
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
}
