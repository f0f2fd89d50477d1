//! 首条命中规则引擎
//!
//! 按优先级顺序对事实数据评估声明式规则，返回第一条满足条件的规则动作：
//! - 点号路径的嵌套字段解析
//! - 可覆盖、可扩展的操作符注册表
//! - all/any 条件组任意嵌套，短路求值
//! - 调试模式下的评估诊断追踪
//! - 规则集加载校验与记忆化评估

pub mod compiler;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod memo;
pub mod models;
pub mod operators;

pub use compiler::RuleSet;
pub use engine::{EngineOptions, RuleEngine, evaluate};
pub use error::{Result, RuleError};
pub use evaluator::ComparisonEvaluator;
pub use executor::ConditionMatcher;
pub use memo::MemoizedEngine;
pub use models::{
    Combinator, Condition, ConditionGroup, ConditionNode, Evaluation, Facts, Rule, RuleConditions,
};
pub use operators::{Operator, OperatorFn, OperatorRegistry};
