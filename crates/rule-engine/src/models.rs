//! 规则引擎领域模型

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// 规则定义
///
/// `conditions` 为条件列表时，由 `combination`（默认 `all`）决定组合方式；
/// 为单个条件或条件组时，以其自身结构为准，`combination` 被忽略。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub conditions: RuleConditions,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination: Option<Combinator>,
}

impl Rule {
    pub fn new(action: impl Into<String>, conditions: impl Into<RuleConditions>) -> Self {
        Self {
            conditions: conditions.into(),
            action: action.into(),
            combination: None,
        }
    }

    /// 条件列表全部满足时触发
    pub fn all(action: impl Into<String>, conditions: Vec<Condition>) -> Self {
        Self::new(action, conditions).with_combination(Combinator::All)
    }

    /// 条件列表任一满足时触发
    pub fn any(action: impl Into<String>, conditions: Vec<Condition>) -> Self {
        Self::new(action, conditions).with_combination(Combinator::Any)
    }

    pub fn with_combination(mut self, combination: Combinator) -> Self {
        self.combination = Some(combination);
        self
    }

    /// 归一化后的根节点
    ///
    /// 条件列表被包装成一个条件组，其余形态原样借用。
    pub fn root(&self) -> Cow<'_, ConditionNode> {
        match &self.conditions {
            RuleConditions::Node(node) => Cow::Borrowed(node),
            RuleConditions::List(children) => Cow::Owned(ConditionNode::Group(ConditionGroup {
                combinator: self.combination.clone().unwrap_or_default(),
                children: children.clone(),
            })),
        }
    }
}

/// 规则的条件部分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleConditions {
    List(Vec<ConditionNode>),
    Node(ConditionNode),
}

impl From<Vec<Condition>> for RuleConditions {
    fn from(conditions: Vec<Condition>) -> Self {
        Self::List(conditions.into_iter().map(ConditionNode::from).collect())
    }
}

impl From<Vec<ConditionNode>> for RuleConditions {
    fn from(nodes: Vec<ConditionNode>) -> Self {
        Self::List(nodes)
    }
}

impl From<ConditionNode> for RuleConditions {
    fn from(node: ConditionNode) -> Self {
        Self::Node(node)
    }
}

impl From<Condition> for RuleConditions {
    fn from(condition: Condition) -> Self {
        Self::Node(ConditionNode::Condition(condition))
    }
}

impl From<ConditionGroup> for RuleConditions {
    fn from(group: ConditionGroup) -> Self {
        Self::Node(ConditionNode::Group(group))
    }
}

/// 规则节点（条件或条件组）
///
/// JSON 中按字段区分：`field/operator/value` 为条件，`combinator/children` 为条件组。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionNode {
    Condition(Condition),
    Group(ConditionGroup),
}

impl From<Condition> for ConditionNode {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl From<ConditionGroup> for ConditionNode {
    fn from(group: ConditionGroup) -> Self {
        Self::Group(group)
    }
}

/// 条件节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// 条件组节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub combinator: Combinator,
    pub children: Vec<ConditionNode>,
}

impl ConditionGroup {
    pub fn new(combinator: Combinator, children: Vec<ConditionNode>) -> Self {
        Self {
            combinator,
            children,
        }
    }

    pub fn all(children: Vec<ConditionNode>) -> Self {
        Self::new(Combinator::All, children)
    }

    pub fn any(children: Vec<ConditionNode>) -> Self {
        Self::new(Combinator::Any, children)
    }
}

/// 组合符
///
/// 无法识别的组合符保留原始名称，评估时该组视为不匹配。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Combinator {
    #[default]
    All,
    Any,
    Unknown(String),
}

impl Combinator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Any => "any",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for Combinator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "all" => Self::All,
            "any" => Self::Any,
            _ => Self::Unknown(name),
        }
    }
}

impl From<&str> for Combinator {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<Combinator> for String {
    fn from(combinator: Combinator) -> Self {
        match combinator {
            Combinator::Unknown(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 事实数据 - 提供给规则引擎的输入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facts {
    data: Value,
}

impl Facts {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// 从 JSON 对象创建
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let data: Value = serde_json::from_str(json)?;
        if !data.is_object() {
            return Err(crate::error::RuleError::Parse(format!(
                "事实数据必须是 JSON 对象，实际为 {}",
                value_kind(&data)
            )));
        }
        Ok(Self { data })
    }

    /// 获取字段值（支持点号分隔的路径，如 "user.name" 或 "order.items.0.sku"）
    ///
    /// 任一步遇到缺失的键或不可索引的值时返回 `None`。
    pub fn get_field(&self, path: &str) -> Option<&Value> {
        let mut current = &self.data;

        for part in path.split('.') {
            match current {
                Value::Object(map) => {
                    current = map.get(part)?;
                }
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    current = arr.get(index)?;
                }
                _ => return None,
            }
        }

        Some(current)
    }

    /// 获取底层数据
    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl From<Value> for Facts {
    fn from(data: Value) -> Self {
        Self::new(data)
    }
}

/// 评估结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct Evaluation {
    /// 命中规则的动作，`None` 表示没有规则匹配
    pub action: Option<String>,
    /// 命中规则在规则列表中的位置
    pub rule_index: Option<usize>,
    pub trace: Vec<String>,
    pub evaluation_time_us: u64,
}

impl Evaluation {
    pub fn matched(&self) -> bool {
        self.action.is_some()
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
