use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const YEAR_MIN: i32 = 2000;
pub const YEAR_MAX: i32 = 2050;
pub const MONTH_MIN: u32 = 1;
pub const MONTH_MAX: u32 = 12;
pub const DAY_MIN: u32 = 1;
pub const DAY_MAX: u32 = 31;
pub const DEFAULT_PRICE: f64 = 0.10;
pub const PRICE_STEP: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum SubsidyType {
    /// 度电补贴
    #[default]
    #[serde(rename = "度电补贴")]
    PerKwh,
    /// 初装补贴
    #[serde(rename = "初装补贴")]
    Installation,
}

impl SubsidyType {
    pub const ALL: [SubsidyType; 2] = [SubsidyType::PerKwh, SubsidyType::Installation];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubsidyType::PerKwh => "度电补贴",
            SubsidyType::Installation => "初装补贴",
        }
    }
}

impl std::fmt::Display for SubsidyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum UnitOption {
    #[default]
    #[serde(rename = "W")]
    W,
    #[serde(rename = "kW")]
    Kw,
    #[serde(rename = "KWh")]
    Kwh,
    /// 其它，使用自定义单位
    #[serde(rename = "其它")]
    Other,
}

impl UnitOption {
    pub const ALL: [UnitOption; 4] = [
        UnitOption::W,
        UnitOption::Kw,
        UnitOption::Kwh,
        UnitOption::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOption::W => "W",
            UnitOption::Kw => "kW",
            UnitOption::Kwh => "KWh",
            UnitOption::Other => "其它",
        }
    }

    /// Resolve to the unit text stored in a record.
    pub fn resolve(&self, custom_unit: Option<&str>) -> String {
        match self {
            UnitOption::Other => custom_unit.unwrap_or_default().to_string(),
            other => other.as_str().to_string(),
        }
    }
}

/// Year / month / day entered separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateParts {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

pub fn default_date_from() -> DateParts {
    DateParts::new(2023, 1, 1)
}

pub fn default_date_to() -> DateParts {
    DateParts::new(2025, 12, 31)
}

fn default_price() -> f64 {
    DEFAULT_PRICE
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRecordRequest {
    pub province: String,
    pub city: String,
    pub county: String,
    #[serde(default = "default_date_from")]
    pub date_from: DateParts,
    #[serde(default = "default_date_to")]
    pub date_to: DateParts,
    #[serde(default)]
    pub subsidy_type: SubsidyType,
    #[serde(default = "default_price")]
    pub price: f64,
    #[serde(default)]
    pub unit: UnitOption,
    /// 仅当 unit 为 "其它" 时使用
    #[serde(default)]
    pub custom_unit: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
}

/// One entered subsidy policy. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubsidyRecord {
    pub province: String,
    pub city: String,
    pub county: String,
    pub date_from: String,
    pub date_to: String,
    pub subsidy_type: SubsidyType,
    pub price: f64,
    pub unit: String,
    #[serde(rename = "备注")]
    pub remark: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DateBounds {
    pub year_min: i32,
    pub year_max: i32,
    pub month_min: u32,
    pub month_max: u32,
    pub day_min: u32,
    pub day_max: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FormDefaults {
    pub date_from: DateParts,
    pub date_to: DateParts,
    pub subsidy_type: SubsidyType,
    pub price: f64,
    pub unit: UnitOption,
    pub remark: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FormOptions {
    pub subsidy_types: Vec<SubsidyType>,
    pub units: Vec<UnitOption>,
    pub date_bounds: DateBounds,
    pub price_min: f64,
    pub price_step: f64,
    pub defaults: FormDefaults,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            subsidy_types: SubsidyType::ALL.to_vec(),
            units: UnitOption::ALL.to_vec(),
            date_bounds: DateBounds {
                year_min: YEAR_MIN,
                year_max: YEAR_MAX,
                month_min: MONTH_MIN,
                month_max: MONTH_MAX,
                day_min: DAY_MIN,
                day_max: DAY_MAX,
            },
            price_min: 0.0,
            price_step: PRICE_STEP,
            defaults: FormDefaults {
                date_from: default_date_from(),
                date_to: default_date_to(),
                subsidy_type: SubsidyType::default(),
                price: DEFAULT_PRICE,
                unit: UnitOption::default(),
                remark: String::new(),
            },
        }
    }
}
