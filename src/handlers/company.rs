//! 公司报告接口处理器
//!
//! ## API 列表
//! - GET /reports/{ticker} - 获取完整公司报告（章节 + 展示块）
//! - GET /companies/{ticker} - 获取公司记录和派生指标

use actix_web::{web, HttpResponse, Result};
use crate::models::{ApiResponse, CompanyOverview, CompanyReport};
use crate::services::ReportService;

/// 获取公司报告
///
/// GET /api/v1/reports/{ticker}
pub async fn get_report(
    path: web::Path<String>,
    service: web::Data<ReportService>,
) -> Result<HttpResponse> {
    let ticker = path.into_inner();

    match service.generate(&ticker).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => {
            let response = ApiResponse::<CompanyReport>::error(e.to_string());
            Ok(HttpResponse::build(e.status_code()).json(response))
        }
    }
}

/// 获取公司记录和派生指标
///
/// GET /api/v1/companies/{ticker}
pub async fn get_company(
    path: web::Path<String>,
    service: web::Data<ReportService>,
) -> Result<HttpResponse> {
    let ticker = path.into_inner();

    match service.overview(&ticker).await {
        Ok(overview) => Ok(HttpResponse::Ok().json(ApiResponse::success(overview))),
        Err(e) => {
            let response = ApiResponse::<CompanyOverview>::error(e.to_string());
            Ok(HttpResponse::build(e.status_code()).json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports/{ticker}", web::get().to(get_report))
        .route("/companies/{ticker}", web::get().to(get_company));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::report_service;
    use crate::models::company::fixtures::sample_info;
    use crate::services::report_service::stub::StubSource;
    use actix_web::{http::StatusCode, test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_get_report() {
        let app = test::init_service(
            App::new()
                .app_data(report_service(Arc::new(StubSource::apple())))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/reports/aapl").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["ticker"], "AAPL");
        assert_eq!(body["data"]["sections"].as_array().unwrap().len(), 9);
        assert_eq!(body["data"]["sections"][2]["blocks"][0]["text"], "Market Cap: $3000.00B");
        assert_eq!(body["data"]["sections"][3]["blocks"][0]["kind"], "bar_chart");
    }

    #[actix_web::test]
    async fn test_get_report_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(report_service(Arc::new(StubSource::not_found())))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/reports/ZZZZ").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No data found for ticker ZZZZ");
    }

    #[actix_web::test]
    async fn test_get_company_missing_fields() {
        let mut info = sample_info();
        info.remove("website");

        let app = test::init_service(
            App::new()
                .app_data(report_service(Arc::new(StubSource::with_info(info))))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/companies/AAPL").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Missing required fields: website");
    }

    #[actix_web::test]
    async fn test_get_company() {
        let app = test::init_service(
            App::new()
                .app_data(report_service(Arc::new(StubSource::apple())))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/companies/AAPL").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["record"]["short_name"], "Apple Inc.");
        assert_eq!(body["data"]["metrics"]["revenue_billion"], 400.0);
    }
}
