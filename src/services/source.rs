//! 公司数据源抽象

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;

/// 公司基本面数据源
///
/// 返回扁平的 `字段名 -> 值` 映射，字段命名沿用数据源原样（如 `marketCap`）
#[async_trait]
pub trait CompanyDataSource: Send + Sync {
    /// 数据源名称，用于日志
    fn name(&self) -> &str;

    /// 获取单只股票的公司信息（单次请求，不重试）
    async fn fetch_info(&self, ticker: &str) -> Result<Map<String, Value>>;
}
