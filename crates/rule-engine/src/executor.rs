//! 条件匹配器
//!
//! 对条件树做短路求值。未知操作符、未知组合符、缺失字段都不会中断评估，
//! 只会让对应节点不匹配，并在调试模式下留下诊断记录。

use crate::models::{Condition, ConditionGroup, ConditionNode, Combinator, Facts};
use crate::operators::OperatorRegistry;
use serde_json::Value;
use tracing::debug;

/// 评估诊断记录
///
/// `emit` 控制是否以 `debug` 级别输出到 tracing（目标 `rule_engine`），
/// `collect` 控制是否保留在内存中，两者互相独立。
#[derive(Debug, Default)]
pub(crate) struct Trace {
    emit: bool,
    collect: bool,
    lines: Vec<String>,
}

impl Trace {
    /// 只输出到 tracing，不保留记录
    pub(crate) fn emitting(emit: bool) -> Self {
        Self {
            emit,
            collect: false,
            lines: Vec::new(),
        }
    }

    /// 始终保留记录，`emit` 为真时同时输出到 tracing
    pub(crate) fn collecting(emit: bool) -> Self {
        Self {
            emit,
            collect: true,
            lines: Vec::new(),
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.emit || self.collect
    }

    pub(crate) fn push(&mut self, line: String) {
        if self.emit {
            debug!(target: "rule_engine", "{}", line);
        }
        if self.collect {
            self.lines.push(line);
        }
    }

    pub(crate) fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// 条件匹配器
pub struct ConditionMatcher<'a> {
    operators: &'a OperatorRegistry,
    /// 是否输出诊断信息
    debug: bool,
}

impl<'a> ConditionMatcher<'a> {
    pub fn new(operators: &'a OperatorRegistry) -> Self {
        Self {
            operators,
            debug: false,
        }
    }

    /// 启用诊断输出
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 判断条件树是否匹配
    pub fn matches(&self, node: &ConditionNode, facts: &Facts) -> bool {
        let mut trace = Trace::emitting(self.debug);
        self.matches_traced(node, facts, &mut trace, "root")
    }

    pub(crate) fn matches_traced(
        &self,
        node: &ConditionNode,
        facts: &Facts,
        trace: &mut Trace,
        path: &str,
    ) -> bool {
        match node {
            ConditionNode::Condition(cond) => self.matches_condition(cond, facts, trace, path),
            ConditionNode::Group(group) => self.matches_group(group, facts, trace, path),
        }
    }

    fn matches_condition(
        &self,
        cond: &Condition,
        facts: &Facts,
        trace: &mut Trace,
        path: &str,
    ) -> bool {
        let field_value = facts.get_field(&cond.field);

        if field_value.is_none() && trace.enabled() {
            trace.push(format!("{}: 字段 '{}' 未解析到值", path, cond.field));
        }

        let Some(compare) = self.operators.get(&cond.operator) else {
            if trace.enabled() {
                trace.push(format!(
                    "{}: 未知操作符 '{}'，条件视为不匹配",
                    path, cond.operator
                ));
            }
            return false;
        };

        let matched = compare(field_value, &cond.value);

        if trace.enabled() {
            trace.push(format!(
                "{}: {} {} {} (实际值: {}) => {}",
                path,
                cond.field,
                cond.operator,
                cond.value,
                field_value.map_or_else(|| "<absent>".to_string(), Value::to_string),
                if matched { "MATCHED" } else { "NOT_MATCHED" }
            ));
        }

        matched
    }

    fn matches_group(
        &self,
        group: &ConditionGroup,
        facts: &Facts,
        trace: &mut Trace,
        path: &str,
    ) -> bool {
        if trace.enabled() {
            trace.push(format!(
                "{}: 开始评估 {} 组 (共 {} 个子节点)",
                path,
                group.combinator,
                group.children.len()
            ));
        }

        match &group.combinator {
            Combinator::All => {
                // all: 遇到 false 立即返回
                for (i, child) in group.children.iter().enumerate() {
                    let child_path = format!("{}.children[{}]", path, i);
                    if !self.matches_traced(child, facts, trace, &child_path) {
                        if trace.enabled() {
                            trace.push(format!("{}: all 短路 - 子节点 {} 不匹配", path, i));
                        }
                        return false;
                    }
                }

                if trace.enabled() {
                    trace.push(format!("{}: all 组全部匹配", path));
                }
                true
            }
            Combinator::Any => {
                // any: 遇到 true 立即返回
                for (i, child) in group.children.iter().enumerate() {
                    let child_path = format!("{}.children[{}]", path, i);
                    if self.matches_traced(child, facts, trace, &child_path) {
                        if trace.enabled() {
                            trace.push(format!("{}: any 短路 - 子节点 {} 匹配", path, i));
                        }
                        return true;
                    }
                }

                if trace.enabled() {
                    trace.push(format!("{}: any 组无匹配", path));
                }
                false
            }
            Combinator::Unknown(name) => {
                if trace.enabled() {
                    trace.push(format!("{}: 未知组合符 '{}'，条件组视为不匹配", path, name));
                }
                false
            }
        }
    }
}
