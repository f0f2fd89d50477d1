//! 规则扫描
//!
//! 按顺序评估规则，返回第一条匹配规则的动作。规则顺序即优先级，
//! 命中后不再评估后续规则；没有规则匹配时返回 `None`。

use crate::executor::{ConditionMatcher, Trace};
use crate::models::{Evaluation, Facts, Rule};
use crate::operators::{OperatorFn, OperatorRegistry};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// 引擎选项
#[derive(Clone, Default)]
pub struct EngineOptions {
    pub debug: bool,
    /// 自定义操作符，覆盖同名内置操作符
    pub custom_operators: HashMap<String, OperatorFn>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_operator<F>(mut self, name: impl Into<String>, compare: F) -> Self
    where
        F: Fn(Option<&Value>, &Value) -> bool + Send + Sync + 'static,
    {
        self.custom_operators.insert(name.into(), Arc::new(compare));
        self
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.custom_operators.keys().collect();
        names.sort();
        f.debug_struct("EngineOptions")
            .field("debug", &self.debug)
            .field("custom_operators", &names)
            .finish()
    }
}

/// 规则引擎
///
/// 持有解析后的操作符注册表，可在多次评估之间复用。引擎本身无状态，
/// 可以在线程间共享。
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    operators: OperatorRegistry,
    debug: bool,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: &EngineOptions) -> Self {
        Self {
            operators: OperatorRegistry::resolve(&options.custom_operators),
            debug: options.debug,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 注册（或覆盖）一个操作符
    pub fn register<F>(&mut self, name: impl Into<String>, compare: F)
    where
        F: Fn(Option<&Value>, &Value) -> bool + Send + Sync + 'static,
    {
        self.operators.register(name, compare);
    }

    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// 返回第一条匹配规则的动作
    pub fn evaluate<'r>(&self, rules: &'r [Rule], facts: &Facts) -> Option<&'r str> {
        self.evaluate_with_debug(rules, facts, self.debug)
    }

    pub(crate) fn evaluate_with_debug<'r>(
        &self,
        rules: &'r [Rule],
        facts: &Facts,
        debug: bool,
    ) -> Option<&'r str> {
        let mut trace = Trace::emitting(debug);
        self.scan(rules, facts, &mut trace)
            .map(|(_, rule)| rule.action.as_str())
    }

    /// 评估并收集完整的诊断记录
    ///
    /// 记录总会收集到 [`Evaluation::trace`]，但只有 debug 开启时才输出到 tracing。
    pub fn evaluate_traced(&self, rules: &[Rule], facts: &Facts) -> Evaluation {
        let start = Instant::now();
        let mut trace = Trace::collecting(self.debug);

        let hit = self.scan(rules, facts, &mut trace);

        Evaluation {
            action: hit.map(|(_, rule)| rule.action.clone()),
            rule_index: hit.map(|(index, _)| index),
            trace: trace.into_lines(),
            evaluation_time_us: start.elapsed().as_micros() as u64,
        }
    }

    fn scan<'r>(
        &self,
        rules: &'r [Rule],
        facts: &Facts,
        trace: &mut Trace,
    ) -> Option<(usize, &'r Rule)> {
        let start = Instant::now();
        let matcher = ConditionMatcher::new(&self.operators);

        let mut hit = None;
        for (index, rule) in rules.iter().enumerate() {
            if trace.enabled() {
                trace.push(format!("rules[{}]: 尝试规则 '{}'", index, rule.action));
            }

            let root = rule.root();
            let path = format!("rules[{}]", index);
            if matcher.matches_traced(&root, facts, trace, &path) {
                if trace.enabled() {
                    trace.push(format!("rules[{}]: 规则匹配，返回动作 '{}'", index, rule.action));
                }
                hit = Some((index, rule));
                break;
            }
        }

        if hit.is_none() && trace.enabled() {
            trace.push(format!("共 {} 条规则，无匹配", rules.len()));
        }

        let outcome = if hit.is_some() { "matched" } else { "no_match" };
        metrics::counter!("rule_evaluations_total", "outcome" => outcome).increment(1);
        metrics::histogram!("rule_evaluation_duration_seconds").record(start.elapsed().as_secs_f64());

        hit
    }
}

/// 使用可选的引擎选项评估规则列表
///
/// ```
/// use rule_engine::{evaluate, Condition, Facts, Rule};
/// use serde_json::json;
///
/// let rules = vec![Rule::all(
///     "allowEntry",
///     vec![
///         Condition::new("user.name", "equals", "alice"),
///         Condition::new("user.age", "greaterThan", 18),
///     ],
/// )];
/// let facts = Facts::new(json!({"user": {"name": "alice", "age": 25}}));
///
/// assert_eq!(evaluate(&rules, &facts, None), Some("allowEntry"));
/// ```
pub fn evaluate<'r>(
    rules: &'r [Rule],
    facts: &Facts,
    options: Option<&EngineOptions>,
) -> Option<&'r str> {
    match options {
        Some(options) => RuleEngine::with_options(options).evaluate(rules, facts),
        None => RuleEngine::new().evaluate(rules, facts),
    }
}
