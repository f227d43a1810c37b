//! 报告页面处理器
//!
//! GET /?ticker=<code> - 输入框 + 报告页面。代码为空时只显示输入框，不请求数据源

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{web, HttpResponse, Result};
use crate::models::ReportQuery;
use crate::render::HtmlRenderer;
use crate::services::ReportService;

pub async fn report_page(
    query: web::Query<ReportQuery>,
    service: web::Data<ReportService>,
    renderer: web::Data<HtmlRenderer>,
) -> Result<HttpResponse> {
    let ticker = query.ticker.as_deref().unwrap_or_default().trim();

    let (status, rendered) = if ticker.is_empty() {
        (StatusCode::OK, renderer.render_page("", None, None))
    } else {
        match service.generate(ticker).await {
            Ok(report) => (
                StatusCode::OK,
                renderer.render_page(ticker, Some(&report), None),
            ),
            Err(e) => (e.status_code(), renderer.render_page(ticker, None, Some(&e))),
        }
    };

    match rendered {
        Ok(html) => Ok(HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(html)),
        Err(e) => {
            log::error!("渲染页面失败: {}", e);
            Ok(HttpResponse::InternalServerError().body(e.to_string()))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(report_page));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{renderer, report_service};
    use crate::services::report_service::stub::StubSource;
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_empty_ticker_is_noop() {
        let source = Arc::new(StubSource::apple());
        let app = test::init_service(
            App::new()
                .app_data(report_service(source.clone()))
                .app_data(renderer())
                .configure(config),
        )
        .await;

        for uri in ["/", "/?ticker=", "/?ticker=%20%20"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);

            let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
            assert!(body.contains("<form"));
            assert!(!body.contains("class=\"error\""));
            assert!(!body.contains("<section"));
        }

        assert_eq!(source.calls(), 0);
    }

    #[actix_web::test]
    async fn test_renders_report() {
        let app = test::init_service(
            App::new()
                .app_data(report_service(Arc::new(StubSource::apple())))
                .app_data(renderer())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/?ticker=AAPL").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("Company Report for Apple Inc."));
        assert!(body.contains("Market Cap: $3000.00B"));
        assert!(body.contains("Profit Margins: 25.00%"));
        assert!(body.contains("9. Data Source"));
        assert!(body.contains("Plotly.newPlot(\"chart-2\""));
    }

    #[actix_web::test]
    async fn test_renders_error_slot() {
        let app = test::init_service(
            App::new()
                .app_data(report_service(Arc::new(StubSource::not_found())))
                .app_data(renderer())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/?ticker=ZZZZ").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("An error occurred: No data found for ticker ZZZZ"));
        assert!(!body.contains("<section"));
    }
}
