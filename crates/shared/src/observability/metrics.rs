//! 指标描述模块
//!
//! 基于 metrics crate 描述规则引擎输出的指标。未安装 recorder 时
//! 指标调用为空操作，由宿主进程决定是否导出。

/// 规则评估总次数，按 `outcome`（matched / no_match）区分
pub const RULE_EVALUATIONS_TOTAL: &str = "rule_evaluations_total";
/// 单次规则扫描耗时
pub const RULE_EVALUATION_DURATION_SECONDS: &str = "rule_evaluation_duration_seconds";

/// 注册指标描述
pub fn describe_metrics() {
    metrics::describe_counter!(RULE_EVALUATIONS_TOTAL, "Total number of rule evaluations");
    metrics::describe_histogram!(
        RULE_EVALUATION_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Rule evaluation duration in seconds"
    );
}
