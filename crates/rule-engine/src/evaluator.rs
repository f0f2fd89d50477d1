//! 内置操作符的比较语义
//!
//! 所有比较都是全函数：字段缺失或类型不匹配时返回 `false`，从不返回错误。
//! 不做类型转换，字符串 `"150"` 不会被当作数字。

use crate::operators::Operator;
use serde_json::{Number, Value};

/// 条件值比较器
pub struct ComparisonEvaluator;

impl ComparisonEvaluator {
    /// 评估条件
    ///
    /// # Arguments
    /// * `field_value` - 从事实数据中解析出的字段值，缺失时为 `None`
    /// * `operator` - 内置操作符
    /// * `expected_value` - 条件中定义的值
    pub fn evaluate(field_value: Option<&Value>, operator: Operator, expected_value: &Value) -> bool {
        match operator {
            Operator::Equals => Self::equals(field_value, expected_value),
            Operator::NotEquals => !Self::equals(field_value, expected_value),
            Operator::GreaterThan => Self::compare(field_value, expected_value, |a, b| a > b),
            Operator::LessThan => Self::compare(field_value, expected_value, |a, b| a < b),
            Operator::Contains => Self::contains(field_value, expected_value),
            Operator::StartsWith => {
                Self::text_test(field_value, expected_value, |s, prefix| s.starts_with(prefix))
            }
            Operator::EndsWith => {
                Self::text_test(field_value, expected_value, |s, suffix| s.ends_with(suffix))
            }
            Operator::In => Self::in_list(field_value, expected_value),
        }
    }

    /// 严格相等，缺失字段不等于任何值（包括 null）
    pub fn equals(field: Option<&Value>, expected: &Value) -> bool {
        field.is_some_and(|value| Self::strict_eq(value, expected))
    }

    fn strict_eq(left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Self::number_eq(a, b),
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Self::strict_eq(x, y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| Self::strict_eq(x, y)))
            }
            _ => left == right,
        }
    }

    /// 整数之间精确比较，只有一侧是浮点数时才按 f64 比较（100 == 100.0）
    fn number_eq(a: &Number, b: &Number) -> bool {
        if a == b {
            return true;
        }
        if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
            return x == y;
        }
        if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
            return x == y;
        }
        (a.is_f64() || b.is_f64()) && a.as_f64() == b.as_f64()
    }

    /// 数值比较，两侧都必须是 JSON 数字
    fn compare<F>(field: Option<&Value>, expected: &Value, cmp: F) -> bool
    where
        F: Fn(f64, f64) -> bool,
    {
        let field_num = field.filter(|v| v.is_number()).and_then(Value::as_f64);
        let expected_num = expected.as_f64().filter(|_| expected.is_number());

        match (field_num, expected_num) {
            (Some(a), Some(b)) => cmp(a, b),
            _ => false,
        }
    }

    /// 字符串子串包含，或数组元素包含
    fn contains(field: Option<&Value>, expected: &Value) -> bool {
        match field {
            Some(Value::String(s)) => expected.as_str().is_some_and(|sub| s.contains(sub)),
            Some(Value::Array(items)) => items.iter().any(|item| Self::strict_eq(item, expected)),
            _ => false,
        }
    }

    fn text_test<F>(field: Option<&Value>, expected: &Value, test: F) -> bool
    where
        F: Fn(&str, &str) -> bool,
    {
        match (field.and_then(Value::as_str), expected.as_str()) {
            (Some(s), Some(pattern)) => test(s, pattern),
            _ => false,
        }
    }

    /// 列表包含检查 (in)
    fn in_list(field: Option<&Value>, expected: &Value) -> bool {
        match (field, expected.as_array()) {
            (Some(value), Some(items)) => items.iter().any(|item| Self::strict_eq(value, item)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equals_numbers() {
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!(100)),
            Operator::Equals,
            &json!(100)
        ));
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!(100.0)),
            Operator::Equals,
            &json!(100)
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!("100")),
            Operator::Equals,
            &json!(100)
        ));
    }

    #[test]
    fn test_equals_large_integers_exact() {
        let max = json!(u64::MAX);
        let below = json!(u64::MAX - 1);

        assert!(ComparisonEvaluator::evaluate(Some(&max), Operator::Equals, &max));
        assert!(!ComparisonEvaluator::evaluate(Some(&below), Operator::Equals, &max));
        assert!(ComparisonEvaluator::evaluate(Some(&below), Operator::NotEquals, &max));
        assert!(!ComparisonEvaluator::evaluate(Some(&below), Operator::In, &json!([max])));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!([u64::MAX])),
            Operator::Contains,
            &below
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!(i64::MIN)),
            Operator::Equals,
            &json!(u64::MAX)
        ));
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!(-5)),
            Operator::Equals,
            &json!(-5.0)
        ));
    }

    #[test]
    fn test_equals_strings_and_structures() {
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!("hello")),
            Operator::Equals,
            &json!("hello")
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!("hello")),
            Operator::Equals,
            &json!("world")
        ));
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!({"a": [1, 2.0]})),
            Operator::Equals,
            &json!({"a": [1.0, 2]})
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!(true)),
            Operator::Equals,
            &json!(1)
        ));
    }

    #[test]
    fn test_absent_field() {
        for op in Operator::ALL {
            let result = ComparisonEvaluator::evaluate(None, op, &json!("test"));
            // notEquals 是 equals 的取反，缺失字段"不等于"任何值
            assert_eq!(result, op == Operator::NotEquals, "operator {}", op);
        }
        assert!(!ComparisonEvaluator::evaluate(None, Operator::Equals, &json!(null)));
        assert!(!ComparisonEvaluator::evaluate(None, Operator::In, &json!([null])));
    }

    #[test]
    fn test_not_equals() {
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!("a")),
            Operator::NotEquals,
            &json!("b")
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!(3)),
            Operator::NotEquals,
            &json!(3.0)
        ));
    }

    #[test]
    fn test_numeric_comparisons() {
        assert!(ComparisonEvaluator::evaluate(Some(&json!(100)), Operator::GreaterThan, &json!(50)));
        assert!(!ComparisonEvaluator::evaluate(Some(&json!(50)), Operator::GreaterThan, &json!(50)));
        assert!(ComparisonEvaluator::evaluate(Some(&json!(49.5)), Operator::LessThan, &json!(50)));
        assert!(!ComparisonEvaluator::evaluate(Some(&json!(100)), Operator::LessThan, &json!(50)));
    }

    #[test]
    fn test_numeric_type_mismatch() {
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!("150")),
            Operator::GreaterThan,
            &json!(100)
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!(150)),
            Operator::GreaterThan,
            &json!("100")
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!(null)),
            Operator::LessThan,
            &json!(1)
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!([1])),
            Operator::LessThan,
            &json!(2)
        ));
    }

    #[test]
    fn test_contains_string() {
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!("hello world")),
            Operator::Contains,
            &json!("world")
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!("hello world")),
            Operator::Contains,
            &json!("mars")
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!("abc 1")),
            Operator::Contains,
            &json!(1)
        ));
    }

    #[test]
    fn test_contains_array() {
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!(["a", "b", "c"])),
            Operator::Contains,
            &json!("b")
        ));
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!([1, 2, 3])),
            Operator::Contains,
            &json!(2.0)
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!(["a", "b"])),
            Operator::Contains,
            &json!("z")
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!({"a": 1})),
            Operator::Contains,
            &json!("a")
        ));
    }

    #[test]
    fn test_starts_with() {
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!("hello world")),
            Operator::StartsWith,
            &json!("hello")
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!(12345)),
            Operator::StartsWith,
            &json!("12")
        ));
    }

    #[test]
    fn test_ends_with() {
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!("hello world")),
            Operator::EndsWith,
            &json!("world")
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!("hello world")),
            Operator::EndsWith,
            &json!(["world"])
        ));
    }

    #[test]
    fn test_in_list() {
        assert!(ComparisonEvaluator::evaluate(
            Some(&json!("editor")),
            Operator::In,
            &json!(["admin", "editor"])
        ));
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!("guest")),
            Operator::In,
            &json!(["admin", "editor"])
        ));
        // 条件值不是数组
        assert!(!ComparisonEvaluator::evaluate(
            Some(&json!("admin")),
            Operator::In,
            &json!("admin")
        ));
    }
}
