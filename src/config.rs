//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 数据源配置（Yahoo Finance）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// quoteSummary 接口根地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 获取 crumb 的地址
    #[serde(default = "default_crumb_url")]
    pub crumb_url: String,
    /// 获取会话 Cookie 的地址
    #[serde(default = "default_cookie_url")]
    pub cookie_url: String,
    /// 请求使用的 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 报告展示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 报告生成时间使用的时区（IANA 名称）
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// 页脚文字
    #[serde(default = "default_powered_by")]
    pub powered_by: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据源配置
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 报告配置
    #[serde(default)]
    pub report: ReportConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 配置来源，日志系统初始化后再输出
#[derive(Debug)]
pub enum ConfigSource {
    File(String),
    Default,
    Invalid { path: String, error: String },
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "从 {} 加载配置成功", path),
            ConfigSource::Default => write!(f, "未找到配置文件，使用默认配置"),
            ConfigSource::Invalid { path, error } => {
                write!(f, "加载配置文件 {} 失败: {}，使用默认配置", path, error)
            }
        }
    }
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_base_url() -> String { "https://query2.finance.yahoo.com".to_string() }
fn default_crumb_url() -> String { "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string() }
fn default_cookie_url() -> String { "https://fc.yahoo.com".to_string() }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string()
}
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_timezone() -> String { "America/New_York".to_string() }
fn default_powered_by() -> String { "Powered by actix-web".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            crumb_url: default_crumb_url(),
            cookie_url: default_cookie_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            powered_by: default_powered_by(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ReportConfig {
    /// 解析时区名称
    pub fn tz(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("无效的时区 {}: {}", self.timezone, e))
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    pub fn load() -> (Self, ConfigSource) {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                return match Self::from_file(path) {
                    Ok(config) => (config, ConfigSource::File(path.to_string())),
                    Err(e) => (
                        Self::default(),
                        ConfigSource::Invalid {
                            path: path.to_string(),
                            error: e.to_string(),
                        },
                    ),
                };
            }
        }

        (Self::default(), ConfigSource::Default)
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
