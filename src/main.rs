//! 公司基本面报告服务
//!
//! 输入股票代码，从 Yahoo Finance 获取公司基本面数据，
//! 生成包含文本、表格和图表的报告（HTML 页面 + JSON API）

mod config;   // 配置
mod error;    // 错误类型
mod handlers; // HTTP 请求处理器
mod models;   // 数据模型定义
mod render;   // HTML 渲染
mod services; // 业务逻辑服务

use actix_web::{web, App, HttpServer, middleware::Logger};
use env_logger::Env;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::render::HtmlRenderer;
use crate::services::{ReportService, YahooFinanceSource};

/// 应用程序入口
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));
    log::info!("{}", source);

    let timezone = config.report.tz()?;
    let data_source = Arc::new(YahooFinanceSource::new(&config.provider)?);
    let report_service = web::Data::new(ReportService::new(
        data_source,
        timezone,
        config.report.powered_by.clone(),
    ));
    let renderer = web::Data::new(HtmlRenderer::new()?);

    let bind_addr = config.bind_addr();
    log::info!("启动公司报告服务，监听 {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(report_service.clone())
            .app_data(renderer.clone())
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
