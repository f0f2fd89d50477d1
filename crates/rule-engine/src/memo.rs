//! 记忆化评估
//!
//! 包装 [`RuleEngine`]，仅当 `(rules, facts, debug)` 与上一次调用在结构上不同时
//! 才重新评估，否则直接返回缓存结果。只保留一个缓存槽。

use crate::engine::RuleEngine;
use crate::models::{Facts, Rule};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

struct CacheEntry {
    rules: Vec<Rule>,
    facts: Facts,
    debug: bool,
    action: Option<String>,
}

impl CacheEntry {
    fn is_for(&self, rules: &[Rule], facts: &Facts, debug: bool) -> bool {
        self.debug == debug && self.rules.as_slice() == rules && self.facts == *facts
    }
}

/// 带结果缓存的规则引擎
pub struct MemoizedEngine {
    engine: RuleEngine,
    slot: Mutex<Option<CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoizedEngine {
    pub fn new(engine: RuleEngine) -> Self {
        Self {
            engine,
            slot: Mutex::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// 使用引擎自身的 debug 设置评估
    pub fn evaluate(&self, rules: &[Rule], facts: &Facts) -> Option<String> {
        self.evaluate_with_debug(rules, facts, self.engine.is_debug())
    }

    /// 评估期间不持有锁，自定义操作符可以重入同一个实例
    pub fn evaluate_with_debug(&self, rules: &[Rule], facts: &Facts, debug: bool) -> Option<String> {
        if let Some(action) = self.cached(rules, facts, debug) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!("记忆化缓存命中");
            return action;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let action = self
            .engine
            .evaluate_with_debug(rules, facts, debug)
            .map(str::to_string);

        *self.slot.lock() = Some(CacheEntry {
            rules: rules.to_vec(),
            facts: facts.clone(),
            debug,
            action: action.clone(),
        });

        action
    }

    fn cached(&self, rules: &[Rule], facts: &Facts, debug: bool) -> Option<Option<String>> {
        self.slot
            .lock()
            .as_ref()
            .filter(|entry| entry.is_for(rules, facts, debug))
            .map(|entry| entry.action.clone())
    }

    /// 丢弃缓存结果
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl From<RuleEngine> for MemoizedEngine {
    fn from(engine: RuleEngine) -> Self {
        Self::new(engine)
    }
}
