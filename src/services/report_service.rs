//! 公司报告服务
//!
//! 报告生成流水线：校验代码 → 获取数据 → 提取字段 → 计算派生指标 → 组装章节

use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;

use super::source::CompanyDataSource;
use crate::error::{ReportError, Result};
use crate::models::{
    BarChartSpec, CompanyOfficer, CompanyOverview, CompanyRecord, CompanyReport, DerivedMetrics,
    DisplayBlock, PieChartSpec, ReportSection,
};

const CONCLUSION_TEXT: &str =
    "This report provides an overview of the company's business, financials, and risk assessment.";

const OFFICER_COLUMNS: [&str; 8] = [
    "Name",
    "Title",
    "Age",
    "Year Born",
    "Fiscal Year",
    "Total Pay",
    "Exercised Value",
    "Unexercised Value",
];

const RISK_COLUMNS: [&str; 5] = [
    "Audit Risk",
    "Board Risk",
    "Compensation Risk",
    "Shareholder Rights Risk",
    "Overall Risk",
];

/// 报告服务
pub struct ReportService {
    /// 数据源
    source: Arc<dyn CompanyDataSource>,
    /// 生成时间使用的时区
    timezone: Tz,
    /// 页脚文字
    powered_by: String,
}

impl ReportService {
    pub fn new(source: Arc<dyn CompanyDataSource>, timezone: Tz, powered_by: String) -> Self {
        Self {
            source,
            timezone,
            powered_by,
        }
    }

    /// 获取公司记录和派生指标
    pub async fn overview(&self, ticker: &str) -> Result<CompanyOverview> {
        let ticker = normalize_ticker(ticker)?;

        log::info!("从 {} 获取 {} 的公司数据", self.source.name(), ticker);
        let info = self.source.fetch_info(&ticker).await.map_err(|e| {
            log::warn!("获取 {} 数据失败: {}", ticker, e);
            e
        })?;

        let record = CompanyRecord::from_info(&ticker, &info).map_err(|e| {
            log::warn!("{} 数据不完整: {}", ticker, e);
            e
        })?;

        let metrics = DerivedMetrics::from_record(&record);
        if metrics.shareholders.clamped {
            log::warn!(
                "{} 机构持股 {} 或内部人持股 {} 超出范围，已截断，公众持股按 {} 处理",
                ticker,
                record.held_percent_institutions,
                record.held_percent_insiders,
                metrics.shareholders.public
            );
        }

        Ok(CompanyOverview { record, metrics })
    }

    /// 生成完整报告
    ///
    /// 空代码直接返回 [`ReportError::InvalidTicker`]，不会请求数据源
    pub async fn generate(&self, ticker: &str) -> Result<CompanyReport> {
        let CompanyOverview { record, metrics } = self.overview(ticker).await?;

        let sections = build_sections(&record, &metrics, &self.powered_by);

        Ok(CompanyReport {
            ticker: record.ticker.clone(),
            company_name: record.short_name.clone(),
            title: format!("Company Report for {}", record.short_name),
            generated_at: Utc::now().with_timezone(&self.timezone).to_rfc3339(),
            metrics,
            sections,
        })
    }
}

/// 去掉首尾空白并转为大写
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(ReportError::InvalidTicker(ticker.to_string()));
    }
    Ok(ticker.to_uppercase())
}

/// 按固定顺序组装九个章节
fn build_sections(
    record: &CompanyRecord,
    metrics: &DerivedMetrics,
    powered_by: &str,
) -> Vec<ReportSection> {
    let shareholders = &metrics.shareholders;

    let sections = [
        (
            "Company Business Summary",
            vec![DisplayBlock::text(&record.long_business_summary)],
        ),
        (
            "Company Officers",
            vec![DisplayBlock::Table {
                columns: OFFICER_COLUMNS.iter().map(|c| c.to_string()).collect(),
                rows: record.company_officers.iter().map(officer_row).collect(),
            }],
        ),
        (
            "Financial Summary",
            vec![
                DisplayBlock::text(format!("Market Cap: ${:.2}B", metrics.market_cap_billion)),
                DisplayBlock::text(format!("Revenue: ${:.2}B", metrics.revenue_billion)),
                DisplayBlock::text(format!("Profit Margins: {:.2}%", metrics.profit_margin_pct)),
            ],
        ),
        (
            "Price and PE Ratio Comparison",
            vec![DisplayBlock::BarChart {
                chart: BarChartSpec {
                    title: "Price vs. PE Ratio".to_string(),
                    x_title: "Metric".to_string(),
                    y_title: "Value".to_string(),
                    categories: vec!["Price".to_string(), "PE Ratio".to_string()],
                    values: vec![record.current_price, record.trailing_pe],
                },
            }],
        ),
        (
            "Shareholder Distribution",
            vec![DisplayBlock::PieChart {
                chart: PieChartSpec {
                    title: "Shareholder Distribution".to_string(),
                    labels: vec![
                        "Institutions".to_string(),
                        "Insiders".to_string(),
                        "Public".to_string(),
                    ],
                    values: vec![
                        shareholders.institutions,
                        shareholders.insiders,
                        shareholders.public,
                    ],
                },
            }],
        ),
        (
            "Recommendations and Analyst Opinions",
            vec![
                DisplayBlock::text(format!("Recommendation Key: {}", record.recommendation_key)),
                DisplayBlock::text(format!(
                    "Number of Analyst Opinions: {}",
                    record.number_of_analyst_opinions
                )),
            ],
        ),
        (
            "Risk Assessment",
            vec![DisplayBlock::Table {
                columns: RISK_COLUMNS.iter().map(|c| c.to_string()).collect(),
                rows: vec![vec![
                    record.audit_risk.to_string(),
                    record.board_risk.to_string(),
                    record.compensation_risk.to_string(),
                    record.share_holder_rights_risk.to_string(),
                    record.overall_risk.to_string(),
                ]],
            }],
        ),
        ("Conclusion", vec![DisplayBlock::text(CONCLUSION_TEXT)]),
        (
            "Data Source",
            vec![
                DisplayBlock::text(format!("Data source: {}", record.website)),
                DisplayBlock::caption(powered_by),
            ],
        ),
    ];

    sections
        .into_iter()
        .enumerate()
        .map(|(i, (heading, blocks))| ReportSection {
            heading: format!("{}. {}", i + 1, heading),
            blocks,
        })
        .collect()
}

fn officer_row(officer: &CompanyOfficer) -> Vec<String> {
    fn cell<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
    }
    fn amount(value: Option<f64>) -> String {
        value.map(|v| format!("{:.0}", v)).unwrap_or_else(|| "-".to_string())
    }

    vec![
        cell(&officer.name),
        cell(&officer.title),
        cell(&officer.age),
        cell(&officer.year_born),
        cell(&officer.fiscal_year),
        amount(officer.total_pay),
        amount(officer.exercised_value),
        amount(officer.unexercised_value),
    ]
}
