use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::*;

const REQUIRED_COLUMNS: [&str; 3] = ["province", "city", "county"];

/// Read-only index over the administrative reference table.
///
/// Loaded once at startup and shared between all sessions.
#[derive(Debug, Clone)]
pub struct RegionIndex {
    regions: Vec<AdminRegion>,
    search_limit: usize,
}

impl RegionIndex {
    pub fn new(regions: Vec<AdminRegion>, search_limit: usize) -> AppResult<Self> {
        if regions.is_empty() {
            return Err(AppError::DataLoadError(
                "reference table contains no rows".to_string(),
            ));
        }
        Ok(Self {
            regions,
            search_limit: search_limit.min(MAX_SEARCH_LIMIT),
        })
    }

    pub fn load_from_csv(path: impl AsRef<Path>, search_limit: usize) -> AppResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            AppError::DataLoadError(format!("无法打开行政区划文件 {}: {e}", path.display()))
        })?;
        let index = Self::from_reader(file, search_limit)?;
        log::info!(
            "Loaded {} administrative regions from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    pub fn from_reader<R: Read>(reader: R, search_limit: usize) -> AppResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| AppError::DataLoadError(format!("无法读取表头: {e}")))?
            .clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(AppError::DataLoadError(format!("缺少必需列: {column}")));
            }
        }

        let mut regions = Vec::new();
        for (row_idx, result) in csv_reader.deserialize::<RegionRow>().enumerate() {
            // CSV 行号（1-based，跳过 header）
            let row: RegionRow = result.map_err(|e| {
                AppError::DataLoadError(format!("第 {} 行解析失败: {e}", row_idx + 2))
            })?;
            regions.push(AdminRegion::from(row));
        }

        Self::new(regions, search_limit)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }

    /// Rows matching `query` in table order, truncated to the search limit.
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&AdminRegion> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.regions
            .iter()
            .filter(|region| region.matches(query))
            .take(self.search_limit)
            .collect()
    }

    /// Pick the first candidate of `search(query)` whose label equals `label`.
    pub fn select(&self, query: &str, label: &str) -> Option<&AdminRegion> {
        self.search(query)
            .into_iter()
            .find(|region| region.label() == label)
    }

    pub fn cascade_provinces(&self) -> Vec<String> {
        self.regions
            .iter()
            .map(|r| r.province.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Cities of `province` plus "全省".
    pub fn cascade_cities(&self, province: &str) -> Vec<String> {
        let mut cities: BTreeSet<String> = self
            .regions
            .iter()
            .filter(|r| r.province == province)
            .map(|r| r.city.clone())
            .collect();
        cities.insert(WHOLE_PROVINCE.to_string());
        cities.into_iter().collect()
    }

    /// Counties of `(province, city)` plus "全市".
    pub fn cascade_counties(&self, province: &str, city: &str) -> Vec<String> {
        let mut counties: BTreeSet<String> = self
            .regions
            .iter()
            .filter(|r| r.province == province && r.city == city)
            .map(|r| r.county.clone())
            .collect();
        counties.insert(WHOLE_CITY.to_string());
        counties.into_iter().collect()
    }

    /// Cascade state seeded with preferred values. A preferred value that is
    /// not among a level's options falls back to that level's first option.
    pub fn cascade(
        &self,
        province: Option<&str>,
        city: Option<&str>,
        county: Option<&str>,
    ) -> CascadeSelection {
        let provinces = self.cascade_provinces();
        let (province_index, province) = pick(&provinces, province);

        let cities = self.cascade_cities(&province);
        let (city_index, city) = pick(&cities, city);

        let counties = self.cascade_counties(&province, &city);
        let (county_index, county) = pick(&counties, county);

        CascadeSelection {
            provinces,
            province_index,
            province,
            cities,
            city_index,
            city,
            counties,
            county_index,
            county,
        }
    }

    /// Whether the triple is reachable through the cascading selectors.
    pub fn is_cascade_selection(&self, province: &str, city: &str, county: &str) -> bool {
        self.cascade_provinces().iter().any(|p| p == province)
            && self.cascade_cities(province).iter().any(|c| c == city)
            && self
                .cascade_counties(province, city)
                .iter()
                .any(|k| k == county)
    }
}

fn pick(options: &[String], preferred: Option<&str>) -> (usize, String) {
    let index = preferred
        .and_then(|p| options.iter().position(|o| o == p))
        .unwrap_or(0);
    (index, options.get(index).cloned().unwrap_or_default())
}

#[derive(Clone)]
pub struct RegionService {
    index: std::sync::Arc<RegionIndex>,
}

impl RegionService {
    pub fn new(index: std::sync::Arc<RegionIndex>) -> Self {
        Self { index }
    }

    pub fn search(&self, query: Option<&str>) -> RegionSearchResponse {
        let query = query.unwrap_or_default();
        let candidates: Vec<RegionCandidate> = self
            .index
            .search(query)
            .into_iter()
            .map(RegionCandidate::from)
            .collect();
        log::debug!("Region search {query:?}: {} candidates", candidates.len());

        RegionSearchResponse {
            query: query.to_string(),
            candidates,
            limit: self.index.search_limit(),
        }
    }

    /// 搜索选择：命中结果仅作为级联下拉框的默认值，不锁定级联状态
    pub fn select(&self, query: Option<&str>, label: Option<&str>) -> RegionSelectResponse {
        let selected = match (query, label) {
            (Some(q), Some(l)) => self.index.select(q, l),
            _ => None,
        };

        let cascade = match selected {
            Some(region) => self.index.cascade(
                Some(&region.province),
                Some(&region.city),
                Some(&region.county),
            ),
            // 未命中时以空字符串为默认值，各级回退到第一个选项
            None => self.index.cascade(Some(""), Some(""), Some("")),
        };

        RegionSelectResponse {
            selected: selected.map(RegionCandidate::from),
            cascade,
        }
    }

    pub fn cascade(&self, query: &CascadeQuery) -> CascadeSelection {
        self.index.cascade(
            query.province.as_deref(),
            query.city.as_deref(),
            query.county.as_deref(),
        )
    }

    pub fn provinces(&self) -> Vec<String> {
        self.index.cascade_provinces()
    }

    pub fn cities(&self, province: &str) -> Vec<String> {
        self.index.cascade_cities(province)
    }

    pub fn counties(&self, province: &str, city: &str) -> Vec<String> {
        self.index.cascade_counties(province, city)
    }
}
