//! 规则操作符定义与注册表
//!
//! 内置操作符表在首次使用时初始化一次，之后只读；调用方提供的自定义操作符
//! 覆盖同名内置项，新名称则扩展操作符集合。

use crate::evaluator::ComparisonEvaluator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// 比较函数：`(字段值, 条件值) -> 是否成立`，字段缺失时第一个参数为 `None`
///
/// 自定义操作符应当是全函数：类型不匹配时返回 `false`，不要 panic。
pub type OperatorFn = Arc<dyn Fn(Option<&Value>, &Value) -> bool + Send + Sync>;

/// 内置操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
    StartsWith,
    EndsWith,
    In,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Self::Equals,
        Self::NotEquals,
        Self::GreaterThan,
        Self::LessThan,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::In,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::In => "in",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    pub fn compare(self, field_value: Option<&Value>, expected: &Value) -> bool {
        ComparisonEvaluator::evaluate(field_value, self, expected)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

static DEFAULT_OPERATORS: LazyLock<HashMap<String, OperatorFn>> = LazyLock::new(|| {
    Operator::ALL
        .into_iter()
        .map(|op| {
            let compare: OperatorFn =
                Arc::new(move |field: Option<&Value>, expected: &Value| op.compare(field, expected));
            (op.as_str().to_string(), compare)
        })
        .collect()
});

/// 操作符注册表
#[derive(Clone)]
pub struct OperatorRegistry {
    operators: HashMap<String, OperatorFn>,
}

impl OperatorRegistry {
    /// 仅包含内置操作符
    pub fn builtin() -> Self {
        Self {
            operators: DEFAULT_OPERATORS.clone(),
        }
    }

    /// 在内置操作符之上叠加自定义操作符
    pub fn resolve(custom: &HashMap<String, OperatorFn>) -> Self {
        let mut registry = Self::builtin();
        for (name, compare) in custom {
            registry.operators.insert(name.clone(), Arc::clone(compare));
        }
        registry
    }

    /// 注册（或覆盖）一个操作符
    pub fn register<F>(&mut self, name: impl Into<String>, compare: F)
    where
        F: Fn(Option<&Value>, &Value) -> bool + Send + Sync + 'static,
    {
        self.operators.insert(name.into(), Arc::new(compare));
    }

    pub fn get(&self, name: &str) -> Option<&OperatorFn> {
        self.operators.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// 已注册的操作符名称（排序后）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("operators", &self.names())
            .finish()
    }
}
