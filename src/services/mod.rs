//! 业务逻辑服务模块
//!
//! 封装数据获取和报告生成逻辑

pub mod report_service; // 报告生成流水线
pub mod source;         // 数据源抽象
pub mod yahoo;          // Yahoo Finance 数据源

pub use report_service::ReportService;
pub use yahoo::YahooFinanceSource;
