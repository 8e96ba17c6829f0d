//! 行政区划相关的数据结构

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 全省
pub const WHOLE_PROVINCE: &str = "全省";
/// 全市
pub const WHOLE_CITY: &str = "全市";
/// 全县
pub const WHOLE_COUNTY: &str = "全县";

/// 搜索候选项上限
pub const MAX_SEARCH_LIMIT: usize = 50;

/// One row of the administrative reference table, with absent levels
/// already replaced by their sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminRegion {
    pub province: String,
    pub city: String,
    pub county: String,
    /// "{province} {city} {county}", search only
    pub province_city_county: String,
}

impl AdminRegion {
    pub fn new(province: Option<&str>, city: Option<&str>, county: Option<&str>) -> Self {
        let province = or_sentinel(province, WHOLE_PROVINCE);
        let city = or_sentinel(city, WHOLE_CITY);
        let county = or_sentinel(county, WHOLE_COUNTY);
        let province_city_county = format!("{province} {city} {county}");

        Self {
            province,
            city,
            county,
            province_city_county,
        }
    }

    /// Display string used by the search candidate list.
    pub fn label(&self) -> String {
        format!("{} / {} / {}", self.province, self.city, self.county)
    }

    /// Case-sensitive substring match against the four searchable fields.
    pub fn matches(&self, query: &str) -> bool {
        self.province.contains(query)
            || self.city.contains(query)
            || self.county.contains(query)
            || self.province_city_county.contains(query)
    }
}

fn or_sentinel(value: Option<&str>, sentinel: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => sentinel.to_string(),
    }
}

/// Raw CSV row of the reference file. Extra columns are ignored.
#[derive(Debug, Deserialize)]
pub struct RegionRow {
    pub province: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
}

impl From<RegionRow> for AdminRegion {
    fn from(row: RegionRow) -> Self {
        AdminRegion::new(
            row.province.as_deref(),
            row.city.as_deref(),
            row.county.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionCandidate {
    pub province: String,
    pub city: String,
    pub county: String,
    pub label: String,
}

impl From<&AdminRegion> for RegionCandidate {
    fn from(region: &AdminRegion) -> Self {
        Self {
            province: region.province.clone(),
            city: region.city.clone(),
            county: region.county.clone(),
            label: region.label(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegionSearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegionSearchResponse {
    pub query: String,
    pub candidates: Vec<RegionCandidate>,
    pub limit: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegionSelectQuery {
    pub q: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CitiesQuery {
    pub province: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountiesQuery {
    pub province: String,
    pub city: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CascadeQuery {
    pub province: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
}

/// State of the three cascading selectors: options at every level plus
/// the currently chosen value and its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CascadeSelection {
    pub provinces: Vec<String>,
    pub province_index: usize,
    pub province: String,
    pub cities: Vec<String>,
    pub city_index: usize,
    pub city: String,
    pub counties: Vec<String>,
    pub county_index: usize,
    pub county: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegionSelectResponse {
    /// 搜索命中的行政区；未命中时为 null
    pub selected: Option<RegionCandidate>,
    /// 以搜索结果为默认值的级联状态
    pub cascade: CascadeSelection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_levels_become_sentinels() {
        let region = AdminRegion::new(Some("广东省"), Some("深圳市"), None);
        assert_eq!(region.county, WHOLE_COUNTY);
        assert_eq!(region.province_city_county, "广东省 深圳市 全县");

        let region = AdminRegion::new(None, Some("  "), Some(""));
        assert_eq!(region.province, WHOLE_PROVINCE);
        assert_eq!(region.city, WHOLE_CITY);
        assert_eq!(region.county, WHOLE_COUNTY);
    }

    #[test]
    fn test_label() {
        let region = AdminRegion::new(Some("广东省"), Some("深圳市"), Some("南山区"));
        assert_eq!(region.label(), "广东省 / 深圳市 / 南山区");
    }

    #[test]
    fn test_matches_any_field() {
        let region = AdminRegion::new(Some("广东省"), Some("深圳市"), Some("南山区"));
        assert!(region.matches("广东"));
        assert!(region.matches("深圳"));
        assert!(region.matches("南山"));
        assert!(region.matches("深圳市 南山"));
        assert!(!region.matches("北京"));
    }

    #[test]
    fn test_matches_is_case_sensitive() {
        let region = AdminRegion::new(Some("Guangdong"), Some("Shenzhen"), None);
        assert!(region.matches("Shen"));
        assert!(!region.matches("shen"));
    }
}
