// ==========================================
// 熟料供应网络 - API层错误类型
// ==========================================
// 职责: 选择错误、导入错误的统一出口
// 说明: 结构问题经 LoadOutcome 返回；数据缺口与约束违反不是错误，体现在计算结果中
// ==========================================

use crate::engine::selection::SelectionIssue;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 选择错误（单次查询内）
    // ==========================================
    #[error("选择无效: {}", join_messages(.0.iter().map(SelectionIssue::message)))]
    Selection(Vec<SelectionIssue>),

    // ==========================================
    // 导入错误（存储不可读）
    // ==========================================
    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),
}

impl ApiError {
    /// 选择错误明细（其他错误为空）
    pub fn selection_issues(&self) -> &[SelectionIssue] {
        match self {
            ApiError::Selection(issues) => issues,
            _ => &[],
        }
    }
}

fn join_messages(messages: impl Iterator<Item = String>) -> String {
    messages.collect::<Vec<_>>().join("; ")
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
