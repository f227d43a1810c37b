//! 公司基本面数据模型
//!
//! 将数据源返回的松散字段映射转换为强类型结构，并计算派生指标

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ReportError, Result};

/// 公司高管信息
///
/// 数据源中的 `maxAge` 字段与高管无关，不保留
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOfficer {
    pub name: Option<String>,
    pub title: Option<String>,
    pub age: Option<u32>,
    pub year_born: Option<i32>,
    pub fiscal_year: Option<i32>,
    pub total_pay: Option<f64>,
    pub exercised_value: Option<f64>,
    pub unexercised_value: Option<f64>,
}

/// 公司基本面记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyRecord {
    /// 股票代码
    pub ticker: String,
    /// 公司简称
    pub short_name: String,
    /// 业务简介
    pub long_business_summary: String,
    /// 高管列表
    pub company_officers: Vec<CompanyOfficer>,
    /// 市值（美元）
    pub market_cap: f64,
    /// 总营收（美元）
    pub total_revenue: f64,
    /// 利润率（小数）
    pub profit_margins: f64,
    /// 当前价格
    pub current_price: f64,
    /// 市盈率（TTM）
    pub trailing_pe: f64,
    /// 机构持股比例（小数）
    pub held_percent_institutions: f64,
    /// 内部人持股比例（小数）
    pub held_percent_insiders: f64,
    /// 分析师评级
    pub recommendation_key: String,
    /// 分析师人数
    pub number_of_analyst_opinions: u64,
    pub audit_risk: u64,
    pub board_risk: u64,
    pub compensation_risk: u64,
    pub share_holder_rights_risk: u64,
    pub overall_risk: u64,
    /// 公司网站
    pub website: String,
}

/// 按字段名读取，记录全部缺失和类型错误的字段
struct FieldReader<'a> {
    info: &'a Map<String, Value>,
    missing: Vec<String>,
    invalid: Vec<String>,
}

impl<'a> FieldReader<'a> {
    fn new(info: &'a Map<String, Value>) -> Self {
        Self {
            info,
            missing: Vec::new(),
            invalid: Vec::new(),
        }
    }

    fn get(&mut self, key: &str) -> Option<&'a Value> {
        match self.info.get(key) {
            None | Some(Value::Null) => {
                self.missing.push(key.to_string());
                None
            }
            Some(value) => Some(value),
        }
    }

    fn string(&mut self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.invalid.push(format!("{} (expected string)", key));
                String::new()
            }
            None => String::new(),
        }
    }

    fn number(&mut self, key: &str) -> f64 {
        match self.get(key).map(|v| v.as_f64()) {
            Some(Some(n)) => n,
            Some(None) => {
                self.invalid.push(format!("{} (expected number)", key));
                0.0
            }
            None => 0.0,
        }
    }

    fn count(&mut self, key: &str) -> u64 {
        let value = match self.get(key) {
            Some(value) => value,
            None => return 0,
        };

        // 部分接口以浮点数返回整数
        let parsed = value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as u64)
        });

        parsed.unwrap_or_else(|| {
            self.invalid.push(format!("{} (expected non-negative integer)", key));
            0
        })
    }

    fn officers(&mut self, key: &str) -> Vec<CompanyOfficer> {
        match self.get(key) {
            Some(value @ Value::Array(_)) => {
                serde_json::from_value(value.clone()).unwrap_or_else(|_| {
                    self.invalid.push(format!("{} (expected officer list)", key));
                    Vec::new()
                })
            }
            Some(_) => {
                self.invalid.push(format!("{} (expected officer list)", key));
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn finish(self) -> Result<()> {
        if !self.missing.is_empty() {
            return Err(ReportError::FieldMissing(self.missing));
        }
        if !self.invalid.is_empty() {
            return Err(ReportError::FieldInvalid(self.invalid));
        }
        Ok(())
    }
}

impl CompanyRecord {
    /// 从数据源字段映射中提取公司记录
    ///
    /// 一次读取所有字段，缺失字段会全部列在错误中
    pub fn from_info(ticker: &str, info: &Map<String, Value>) -> Result<Self> {
        let mut reader = FieldReader::new(info);

        let record = CompanyRecord {
            ticker: ticker.to_string(),
            short_name: reader.string("shortName"),
            long_business_summary: reader.string("longBusinessSummary"),
            company_officers: reader.officers("companyOfficers"),
            market_cap: reader.number("marketCap"),
            total_revenue: reader.number("totalRevenue"),
            profit_margins: reader.number("profitMargins"),
            current_price: reader.number("currentPrice"),
            trailing_pe: reader.number("trailingPE"),
            held_percent_institutions: reader.number("heldPercentInstitutions"),
            held_percent_insiders: reader.number("heldPercentInsiders"),
            recommendation_key: reader.string("recommendationKey"),
            number_of_analyst_opinions: reader.count("numberOfAnalystOpinions"),
            audit_risk: reader.count("auditRisk"),
            board_risk: reader.count("boardRisk"),
            compensation_risk: reader.count("compensationRisk"),
            share_holder_rights_risk: reader.count("shareHolderRightsRisk"),
            overall_risk: reader.count("overallRisk"),
            website: reader.string("website"),
        };

        reader.finish()?;
        Ok(record)
    }
}

/// 股东结构（均为小数比例）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ShareholderSplit {
    pub institutions: f64,
    pub insiders: f64,
    pub public: f64,
    /// 是否有任一比例被截断到 [0, 1]
    pub clamped: bool,
}

impl ShareholderSplit {
    /// 三个比例都截断到 [0, 1]，公众持股按截断后的机构和内部人比例计算
    pub fn new(raw_institutions: f64, raw_insiders: f64) -> Self {
        let institutions = raw_institutions.clamp(0.0, 1.0);
        let insiders = raw_insiders.clamp(0.0, 1.0);
        let raw_public = 1.0 - institutions - insiders;
        let public = raw_public.clamp(0.0, 1.0);

        Self {
            institutions,
            insiders,
            public,
            clamped: institutions != raw_institutions
                || insiders != raw_insiders
                || public != raw_public,
        }
    }
}

/// 派生指标
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DerivedMetrics {
    /// 市值（十亿美元）
    pub market_cap_billion: f64,
    /// 营收（十亿美元）
    pub revenue_billion: f64,
    /// 利润率（百分比）
    pub profit_margin_pct: f64,
    /// 股东结构
    pub shareholders: ShareholderSplit,
}

impl DerivedMetrics {
    pub fn from_record(record: &CompanyRecord) -> Self {
        Self {
            market_cap_billion: record.market_cap / 1e9,
            revenue_billion: record.total_revenue / 1e9,
            profit_margin_pct: record.profit_margins * 100.0,
            shareholders: ShareholderSplit::new(
                record.held_percent_institutions,
                record.held_percent_insiders,
            ),
        }
    }
}

/// 公司概览：强类型记录加派生指标，不含展示信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub record: CompanyRecord,
    pub metrics: DerivedMetrics,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Map, Value};

    /// 包含全部必需字段的样例数据
    pub(crate) fn sample_info() -> Map<String, Value> {
        let value = json!({
            "shortName": "Apple Inc.",
            "longBusinessSummary": "Apple Inc. designs, manufactures, and markets smartphones.",
            "companyOfficers": [
                {
                    "maxAge": 1,
                    "name": "Mr. Timothy D. Cook",
                    "age": 62,
                    "title": "CEO & Director",
                    "yearBorn": 1961,
                    "fiscalYear": 2023,
                    "totalPay": 16239562,
                    "exercisedValue": 0,
                    "unexercisedValue": 0
                }
            ],
            "marketCap": 3.0e12,
            "totalRevenue": 4.0e11,
            "profitMargins": 0.25,
            "currentPrice": 190.0,
            "trailingPE": 30.0,
            "heldPercentInstitutions": 0.6,
            "heldPercentInsiders": 0.07,
            "recommendationKey": "buy",
            "numberOfAnalystOpinions": 40,
            "auditRisk": 1,
            "boardRisk": 2,
            "compensationRisk": 3,
            "shareHolderRightsRisk": 4,
            "overallRisk": 5,
            "website": "apple.com"
        });

        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }
}
