//! 规则集加载与校验
//!
//! 结构错误在加载阶段一次性报告，评估阶段不会因为规则形态中途失败。
//! 未知操作符和未知组合符不属于结构错误，评估时按不匹配处理。

use crate::engine::RuleEngine;
use crate::error::{Result, RuleError};
use crate::models::{Condition, ConditionNode, Facts, Rule, RuleConditions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, instrument};

/// 有序规则集
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// 从 JSON 数组解析并校验规则集
    pub fn from_json(json: &str) -> Result<Self> {
        let set: Self = serde_json::from_str(json)?;
        set.validate()?;
        Ok(set)
    }

    /// 从文件加载规则集
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let set = Self::from_json(&json)?;
        info!(rules = set.len(), "规则集已加载");
        Ok(set)
    }

    /// 校验规则结构
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.action.trim().is_empty() {
                return Err(RuleError::validation(index, "action", "动作不能为空"));
            }

            match &rule.conditions {
                RuleConditions::Node(node) => validate_node(node, index, "conditions")?,
                RuleConditions::List(nodes) => {
                    for (i, node) in nodes.iter().enumerate() {
                        validate_node(node, index, &format!("conditions[{}]", i))?;
                    }
                }
            }
        }

        Ok(())
    }

    /// 规则集中引用的所有字段路径
    pub fn required_fields(&self) -> BTreeSet<String> {
        let mut fields = BTreeSet::new();
        for rule in &self.rules {
            match &rule.conditions {
                RuleConditions::Node(node) => collect_fields(node, &mut fields),
                RuleConditions::List(nodes) => {
                    for node in nodes {
                        collect_fields(node, &mut fields);
                    }
                }
            }
        }
        fields
    }

    /// 使用给定引擎评估
    pub fn evaluate(&self, engine: &RuleEngine, facts: &Facts) -> Option<&str> {
        engine.evaluate(&self.rules, facts)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl AsRef<[Rule]> for RuleSet {
    fn as_ref(&self) -> &[Rule] {
        &self.rules
    }
}

fn validate_node(node: &ConditionNode, index: usize, path: &str) -> Result<()> {
    match node {
        ConditionNode::Condition(cond) => validate_condition(cond, index, path),
        ConditionNode::Group(group) => {
            for (i, child) in group.children.iter().enumerate() {
                validate_node(child, index, &format!("{}.children[{}]", path, i))?;
            }
            Ok(())
        }
    }
}

fn validate_condition(cond: &Condition, index: usize, path: &str) -> Result<()> {
    if cond.field.is_empty() {
        return Err(RuleError::validation(index, path, "字段路径不能为空"));
    }

    if cond.field.split('.').any(str::is_empty) {
        return Err(RuleError::validation(
            index,
            path,
            format!("字段路径 '{}' 含有空段", cond.field),
        ));
    }

    if cond.operator.is_empty() {
        return Err(RuleError::validation(index, path, "操作符不能为空"));
    }

    Ok(())
}

fn collect_fields(node: &ConditionNode, fields: &mut BTreeSet<String>) {
    match node {
        ConditionNode::Condition(cond) => {
            fields.insert(cond.field.clone());
        }
        ConditionNode::Group(group) => {
            for child in &group.children {
                collect_fields(child, fields);
            }
        }
    }
}
