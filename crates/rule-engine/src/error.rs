//! 规则引擎错误类型
//!
//! 只有规则加载和校验阶段会返回错误；规则扫描本身没有错误路径，
//! 字段缺失、类型不匹配、未知操作符都按"条件不成立"处理。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则解析失败: {0}")]
    Parse(String),

    #[error("规则校验失败: rules[{index}] {path}: {message}")]
    Validation {
        index: usize,
        path: String,
        message: String,
    },

    #[error("读取规则文件失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl RuleError {
    pub(crate) fn validation(index: usize, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            index,
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
