// ==========================================
// 熟料供应网络 - 领域类型定义
// ==========================================
// 职责: 周期、取值状态（有值/缺失）、约束类型码
// 红线: 数据集中不存在的值一律为 Unavailable，不得默认为 0
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 时间周期（整数桶，无日历语义）
pub type Period = i64;

// ==========================================
// FieldValue - 数据集取值（有值 / 缺失）
// ==========================================
// 说明: 只有在公式求值时才允许按调用方给定的默认值展开
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldValue<T> {
    Available(T),
    Unavailable,
}

impl<T> FieldValue<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, FieldValue::Available(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            FieldValue::Available(v) => Some(v),
            FieldValue::Unavailable => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            FieldValue::Available(v) => Some(v),
            FieldValue::Unavailable => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FieldValue<U> {
        match self {
            FieldValue::Available(v) => FieldValue::Available(f(v)),
            FieldValue::Unavailable => FieldValue::Unavailable,
        }
    }
}

impl<T: Copy> FieldValue<T> {
    /// 公式求值时展开：缺失则使用调用方给定的默认值
    pub fn value_or(&self, default: T) -> T {
        match self {
            FieldValue::Available(v) => *v,
            FieldValue::Unavailable => default,
        }
    }
}

impl<T> From<Option<T>> for FieldValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldValue::Available(v),
            None => FieldValue::Unavailable,
        }
    }
}

impl FieldValue<f64> {
    /// 两个数值都存在时才可组合
    pub fn combine(self, other: FieldValue<f64>, f: impl FnOnce(f64, f64) -> f64) -> FieldValue<f64> {
        match (self, other) {
            (FieldValue::Available(a), FieldValue::Available(b)) => FieldValue::Available(f(a, b)),
            _ => FieldValue::Unavailable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for FieldValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Available(v) => write!(f, "{}", v),
            FieldValue::Unavailable => write!(f, "N/A"),
        }
    }
}

// ==========================================
// 战略约束 - 界限类型
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundType {
    Equal,        // E
    LessEqual,    // L
    GreaterEqual, // G
    Other(String),
}

impl BoundType {
    pub fn parse(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "E" | "EQ" | "=" => BoundType::Equal,
            "L" | "LE" | "<=" => BoundType::LessEqual,
            "G" | "GE" | ">=" => BoundType::GreaterEqual,
            other => BoundType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundType::Equal => write!(f, "E"),
            BoundType::LessEqual => write!(f, "L"),
            BoundType::GreaterEqual => write!(f, "G"),
            BoundType::Other(code) => write!(f, "{}", code),
        }
    }
}

// ==========================================
// 战略约束 - 取值类型
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Absolute,   // C
    Percentage, // P
    Other(String),
}

impl ValueType {
    pub fn parse(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "C" | "A" | "ABS" => ValueType::Absolute,
            "P" | "%" | "PCT" => ValueType::Percentage,
            other => ValueType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Absolute => write!(f, "C"),
            ValueType::Percentage => write!(f, "P"),
            ValueType::Other(code) => write!(f, "{}", code),
        }
    }
}
