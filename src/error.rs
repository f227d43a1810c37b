//! 报告生成错误类型
//!
//! 流水线中任何一步失败都归入 [`ReportError`]，由调用方决定如何展示

use actix_web::http::StatusCode;
use thiserror::Error;

/// 报告生成错误
#[derive(Debug, Error)]
pub enum ReportError {
    /// 股票代码为空
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// 数据源中没有该股票
    #[error("No data found for ticker {0}")]
    NotFound(String),

    /// 网络请求、状态码或响应解析失败
    #[error("Failed to fetch company data: {0}")]
    FetchFailed(String),

    /// 缺少必需字段（一次列出全部）
    #[error("Missing required fields: {}", .0.join(", "))]
    FieldMissing(Vec<String>),

    /// 字段类型不符合预期
    #[error("Malformed fields: {}", .0.join(", "))]
    FieldInvalid(Vec<String>),

    /// 页面渲染失败
    #[error("Failed to render report: {0}")]
    Render(String),
}

impl ReportError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::InvalidTicker(_) => StatusCode::BAD_REQUEST,
            ReportError::NotFound(_) => StatusCode::NOT_FOUND,
            ReportError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            ReportError::FieldMissing(_) | ReportError::FieldInvalid(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ReportError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        ReportError::FetchFailed(err.to_string())
    }
}

impl From<minijinja::Error> for ReportError {
    fn from(err: minijinja::Error) -> Self {
        ReportError::Render(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
