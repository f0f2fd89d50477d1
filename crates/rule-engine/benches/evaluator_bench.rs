//! 规则引擎性能基准测试
//!
//! 覆盖内置操作符、规则扫描规模和记忆化命中路径。

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rule_engine::{
    ComparisonEvaluator, Condition, ConditionGroup, ConditionNode, Facts, MemoizedEngine,
    Operator, Rule, RuleEngine,
};
use serde_json::{Value, json};
use std::hint::black_box;

fn create_facts() -> Facts {
    Facts::new(json!({
        "user": {
            "name": "alice",
            "age": 25,
            "role": "editor",
            "tags": ["vip", "frequent", "beta"]
        },
        "order": {
            "amount": 1500,
            "items": [{"sku": "TICKET-001"}, {"sku": "FOOD-001"}]
        }
    }))
}

/// 内置操作符基准
fn bench_builtin_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("builtin_operators");

    let cases: Vec<(Operator, Value, Value)> = vec![
        (Operator::Equals, json!(1000), json!(1000.0)),
        (Operator::NotEquals, json!("hello"), json!("world")),
        (Operator::GreaterThan, json!(1000), json!(500)),
        (Operator::LessThan, json!(1000), json!(500)),
        (Operator::Contains, json!("hello world"), json!("world")),
        (Operator::StartsWith, json!("hello world"), json!("hello")),
        (Operator::EndsWith, json!("hello world"), json!("world")),
        (Operator::In, json!("b"), json!(["a", "b", "c"])),
    ];

    for (op, field, expected) in &cases {
        group.bench_function(op.as_str(), |b| {
            b.iter(|| {
                ComparisonEvaluator::evaluate(
                    black_box(Some(field)),
                    black_box(*op),
                    black_box(expected),
                )
            })
        });
    }

    group.bench_function("equals_missing", |b| {
        b.iter(|| {
            ComparisonEvaluator::evaluate(
                black_box(None),
                black_box(Operator::Equals),
                black_box(&json!("test")),
            )
        })
    });

    group.finish();
}

/// in 操作符随列表长度的变化
fn bench_in_operator_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_operator_scaling");

    let field = json!("target");

    for size in [5, 10, 50, 100, 500].iter() {
        let list: Vec<Value> = (0..*size)
            .map(|i| {
                if i == size - 1 {
                    json!("target")
                } else {
                    json!(format!("item_{}", i))
                }
            })
            .collect();
        let list_value = Value::Array(list);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                ComparisonEvaluator::evaluate(
                    black_box(Some(&field)),
                    black_box(Operator::In),
                    black_box(&list_value),
                )
            })
        });
    }

    group.finish();
}

/// 命中规则位于列表末尾时的扫描开销
fn bench_rule_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_scan");

    let facts = create_facts();
    let engine = RuleEngine::new();

    for size in [1, 10, 100, 1000].iter() {
        let mut rules: Vec<Rule> = (0..size - 1)
            .map(|i| {
                Rule::all(
                    format!("miss_{}", i),
                    vec![
                        Condition::new("user.name", "equals", "alice"),
                        Condition::new("user.age", "greaterThan", 100 + i),
                    ],
                )
            })
            .collect();
        rules.push(Rule::new(
            "hit",
            ConditionGroup::all(vec![
                ConditionNode::from(Condition::new("user.role", "in", json!(["admin", "editor"]))),
                ConditionNode::from(ConditionGroup::any(vec![
                    ConditionNode::from(Condition::new("order.amount", "lessThan", 100)),
                    ConditionNode::from(Condition::new("user.tags", "contains", "beta")),
                ])),
            ]),
        ));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| engine.evaluate(black_box(&rules), black_box(&facts)))
        });
    }

    group.finish();
}

/// 记忆化命中路径
fn bench_memoized(c: &mut Criterion) {
    let mut group = c.benchmark_group("memoized");

    let facts = create_facts();
    let rules = vec![Rule::all(
        "allowEntry",
        vec![
            Condition::new("user.name", "equals", "alice"),
            Condition::new("user.age", "greaterThan", 18),
        ],
    )];
    let memo = MemoizedEngine::new(RuleEngine::new());

    group.bench_function("cache_hit", |b| {
        b.iter(|| memo.evaluate(black_box(&rules), black_box(&facts)))
    });

    group.bench_function("uncached", |b| {
        let engine = RuleEngine::new();
        b.iter(|| engine.evaluate(black_box(&rules), black_box(&facts)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_builtin_operators,
    bench_in_operator_scaling,
    bench_rule_scan,
    bench_memoized,
);

criterion_main!(benches);
