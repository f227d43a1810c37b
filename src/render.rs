//! HTML 页面渲染
//!
//! 页面包含代码输入框、错误提示区和报告内容，图表由浏览器端 plotly.js 绘制

use minijinja::Environment;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ReportError, Result};
use crate::models::{CompanyReport, DisplayBlock};

const PAGE_TEMPLATE: &str = "report.html";

/// 页面模板上下文
#[derive(Serialize)]
struct PageContext<'a> {
    ticker: &'a str,
    error: Option<String>,
    report: Option<Value>,
}

/// HTML 渲染器
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("../templates/report.html"))?;
        Ok(Self { env })
    }

    /// 渲染页面
    ///
    /// `report` 和 `error` 都为空时只显示输入框
    pub fn render_page(
        &self,
        ticker: &str,
        report: Option<&CompanyReport>,
        error: Option<&ReportError>,
    ) -> Result<String> {
        let context = PageContext {
            ticker,
            error: error.map(|e| e.to_string()),
            report: report.map(report_view).transpose()?,
        };

        let html = self.env.get_template(PAGE_TEMPLATE)?.render(&context)?;
        Ok(html)
    }
}

/// 报告转为模板数据，图表块附带 Plotly JSON 和元素 id
fn report_view(report: &CompanyReport) -> Result<Value> {
    let mut view = serde_json::to_value(report).map_err(|e| ReportError::Render(e.to_string()))?;

    let mut chart_index = 0;
    for (section, section_view) in report.sections.iter().zip(sections_mut(&mut view)) {
        for (block, block_view) in section.blocks.iter().zip(blocks_mut(section_view)) {
            let figure = match block {
                DisplayBlock::BarChart { chart } => chart.to_plotly(),
                DisplayBlock::PieChart { chart } => chart.to_plotly(),
                _ => continue,
            };
            chart_index += 1;
            block_view["chart_id"] = Value::from(format!("chart-{}", chart_index));
            block_view["figure"] = Value::from(script_safe_json(&figure));
        }
    }

    Ok(view)
}

fn sections_mut(view: &mut Value) -> impl Iterator<Item = &mut Value> {
    view.get_mut("sections")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
}

fn blocks_mut(section: &mut Value) -> impl Iterator<Item = &mut Value> {
    section
        .get_mut("blocks")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
}

/// 可直接嵌入 `<script>` 的 JSON 文本
fn script_safe_json(value: &Value) -> String {
    // `<` 只会出现在 JSON 字符串里，转义后不会提前闭合 script 标签
    value.to_string().replace('<', "\\u003c")
}
