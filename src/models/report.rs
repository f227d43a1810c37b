//! 报告数据模型
//!
//! 报告由有序的章节组成，每个章节包含若干展示块（文本、表格、图表）。
//! 展示层只负责把这些块渲染出来。

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::company::DerivedMetrics;

/// 柱状图定义
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

impl BarChartSpec {
    /// 转换为 Plotly 图表 JSON，柱顶显示两位小数
    pub fn to_plotly(&self) -> Value {
        json!({
            "data": [{
                "type": "bar",
                "x": self.categories,
                "y": self.values,
                "text": self.values,
                "texttemplate": "%{text:.2f}",
                "textposition": "outside",
            }],
            "layout": {
                "title": { "text": self.title },
                "xaxis": { "title": { "text": self.x_title } },
                "yaxis": { "title": { "text": self.y_title } },
            },
        })
    }
}

/// 饼图定义
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PieChartSpec {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl PieChartSpec {
    pub fn to_plotly(&self) -> Value {
        json!({
            "data": [{
                "type": "pie",
                "labels": self.labels,
                "values": self.values,
            }],
            "layout": {
                "title": { "text": self.title },
            },
        })
    }
}

/// 展示块
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayBlock {
    /// 段落文本
    Text { text: String },
    /// 表格
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// 柱状图
    BarChart { chart: BarChartSpec },
    /// 饼图
    PieChart { chart: PieChartSpec },
    /// 小字说明（页脚等）
    Caption { text: String },
}

impl DisplayBlock {
    pub fn text(text: impl Into<String>) -> Self {
        DisplayBlock::Text { text: text.into() }
    }

    pub fn caption(text: impl Into<String>) -> Self {
        DisplayBlock::Caption { text: text.into() }
    }
}

/// 报告章节
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSection {
    /// 章节标题（含序号）
    pub heading: String,
    pub blocks: Vec<DisplayBlock>,
}

/// 公司报告
///
/// 只有全部章节生成成功后才会返回，不存在半成品报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyReport {
    /// 股票代码
    pub ticker: String,
    /// 公司简称
    pub company_name: String,
    /// 报告标题
    pub title: String,
    /// 生成时间（RFC 3339）
    pub generated_at: String,
    /// 派生指标
    pub metrics: DerivedMetrics,
    /// 章节列表（固定顺序）
    pub sections: Vec<ReportSection>,
}

/// 页面查询参数
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// 股票代码
    pub ticker: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_chart_plotly() {
        let chart = BarChartSpec {
            title: "Price vs. PE Ratio".to_string(),
            x_title: "Metric".to_string(),
            y_title: "Value".to_string(),
            categories: vec!["Price".to_string(), "PE Ratio".to_string()],
            values: vec![190.0, 30.0],
        };

        let figure = chart.to_plotly();
        assert_eq!(figure["data"][0]["type"], "bar");
        assert_eq!(figure["data"][0]["y"][1], 30.0);
        assert_eq!(figure["data"][0]["texttemplate"], "%{text:.2f}");
        assert_eq!(figure["layout"]["title"]["text"], "Price vs. PE Ratio");
    }

    #[test]
    fn test_display_block_tagging() {
        let value = serde_json::to_value(DisplayBlock::text("hello")).unwrap();
        assert_eq!(value["kind"], "text");
        assert_eq!(value["text"], "hello");

        let table = DisplayBlock::Table {
            columns: vec!["A".to_string()],
            rows: vec![vec!["1".to_string()]],
        };
        let value = serde_json::to_value(table).unwrap();
        assert_eq!(value["kind"], "table");
        assert_eq!(value["rows"][0][0], "1");
    }
}
