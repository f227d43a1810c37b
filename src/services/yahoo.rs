//! Yahoo Finance 公司数据源
//!
//! 对接 quoteSummary 接口: https://query2.finance.yahoo.com/v10/finance/quoteSummary/<ticker>
//!
//! 请求前需要先拿到会话 Cookie 和 crumb，crumb 在进程内复用，
//! 数据源返回 401/403 时清空，下次请求重新获取。

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

use super::source::CompanyDataSource;
use crate::config::ProviderConfig;
use crate::error::{ReportError, Result};

/// quoteSummary 请求的模块，靠前的模块字段优先
pub const QUOTE_SUMMARY_MODULES: &[&str] = &[
    "assetProfile",
    "price",
    "quoteType",
    "summaryDetail",
    "financialData",
    "defaultKeyStatistics",
];

/// Yahoo Finance 数据源
pub struct YahooFinanceSource {
    /// HTTP 客户端（带 Cookie 存储）
    client: Client,
    /// quoteSummary 根地址
    base_url: Url,
    crumb_url: String,
    cookie_url: String,
    /// 会话 crumb
    crumb: RwLock<Option<String>>,
}

impl YahooFinanceSource {
    /// 根据配置创建数据源
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .gzip(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| anyhow::anyhow!("无效的数据源地址 {}: {}", config.base_url, e))?;

        Ok(Self {
            client,
            base_url,
            crumb_url: config.crumb_url.clone(),
            cookie_url: config.cookie_url.clone(),
            crumb: RwLock::new(None),
        })
    }

    /// 获取会话 crumb，已有则直接复用
    async fn crumb(&self) -> Result<String> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let mut slot = self.crumb.write().await;
        if let Some(crumb) = slot.as_ref() {
            return Ok(crumb.clone());
        }

        log::debug!("获取 Yahoo 会话 Cookie: {}", self.cookie_url);
        // 该地址通常返回 404，只需要响应里的 Cookie
        if let Err(e) = self.client.get(&self.cookie_url).send().await {
            log::debug!("获取会话 Cookie 失败: {}", e);
        }

        let response = self.client.get(&self.crumb_url).send().await?;
        if !response.status().is_success() {
            return Err(ReportError::FetchFailed(format!(
                "failed to fetch crumb: {}",
                response.status()
            )));
        }

        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(ReportError::FetchFailed("provider returned an invalid crumb".to_string()));
        }

        log::debug!("已获取新的 crumb");
        *slot = Some(crumb.clone());
        Ok(crumb)
    }

    /// 构造 quoteSummary 请求地址
    pub fn quote_summary_url(&self, ticker: &str, crumb: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReportError::FetchFailed(format!("invalid provider URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(&["v10", "finance", "quoteSummary", ticker]);

        url.query_pairs_mut()
            .append_pair("modules", &QUOTE_SUMMARY_MODULES.join(","))
            .append_pair("formatted", "false")
            .append_pair("crumb", crumb);

        Ok(url)
    }
}

#[async_trait]
impl CompanyDataSource for YahooFinanceSource {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn fetch_info(&self, ticker: &str) -> Result<Map<String, Value>> {
        let crumb = self.crumb().await?;
        let url = self.quote_summary_url(ticker, &crumb)?;

        log::debug!("请求 quoteSummary URL: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            log::warn!("数据源拒绝请求 ({})，清空 crumb", status);
            *self.crumb.write().await = None;
        }
        check_status(ticker, status)?;

        let body: Value = response.json().await?;
        parse_quote_summary(ticker, &body)
    }
}

/// 按 HTTP 状态码映射错误，必须在解析响应体之前调用
pub fn check_status(ticker: &str, status: StatusCode) -> Result<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(ReportError::NotFound(ticker.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ReportError::FetchFailed(
            format!("provider rejected request: {}", status),
        )),
        s => Err(ReportError::FetchFailed(format!("provider returned {}", s))),
    }
}

/// 解析 quoteSummary 响应，把各模块字段合并成一个扁平映射
pub fn parse_quote_summary(ticker: &str, body: &Value) -> Result<Map<String, Value>> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| ReportError::FetchFailed("unexpected response body".to_string()))?;

    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        let code = error["code"].as_str().unwrap_or_default();
        if code.eq_ignore_ascii_case("Not Found") {
            return Err(ReportError::NotFound(ticker.to_string()));
        }
        let description = error["description"].as_str().unwrap_or(code);
        return Err(ReportError::FetchFailed(description.to_string()));
    }

    let result = summary["result"]
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or_else(|| ReportError::NotFound(ticker.to_string()))?;

    let mut info = Map::new();
    for module in QUOTE_SUMMARY_MODULES {
        let Some(fields) = result.get(*module).and_then(Value::as_object) else {
            continue;
        };
        for (key, value) in fields {
            if key == "maxAge" {
                continue;
            }
            info.entry(key.clone()).or_insert_with(|| unwrap_raw(value));
        }
    }

    Ok(info)
}

/// 去掉 `{"raw": x, "fmt": "..."}` 包装，空对象视为缺失
fn unwrap_raw(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(raw) = map.get("raw") {
                return unwrap_raw(raw);
            }
            if map.is_empty() {
                return Value::Null;
            }
            Value::Object(map.iter().map(|(k, v)| (k.clone(), unwrap_raw(v))).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(unwrap_raw).collect()),
        other => other.clone(),
    }
}
