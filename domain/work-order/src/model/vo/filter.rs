use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::{date, loose_key, AreaCode, JobStatus, WorkOrderStatus};
use crate::exception::{WorkOrderException, WorkOrderResult};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

wire_enum! {
    /// Query parameters accepted by the list and export endpoints.
    pub enum FilterField {
        Page => "page",
        Limit => "limit",
        Status => "status",
        JobStatus => "jobStatus",
        WorkOrderType => "workOrderType",
        Supervisor => "supervisor",
        Technician => "technician",
        Area => "area",
        AreaCode => "areaCode",
        StartDate => "startDate",
        EndDate => "endDate",
        Search => "search",
        SortBy => "sortBy",
        SortOrder => "sortOrder",
        Distribution => "distribution",
    }
}

wire_enum! {
    pub enum SortField {
        VisitInstDate => "visitInstDate",
        CreatedAt => "createdAt",
        UpdatedAt => "updatedAt",
        WorkOrderNumber => "workOrderNumber",
        Hours => "hours",
        WorkOrderStatus => "workOrderStatus",
    }
}

wire_enum! {
    pub enum SortOrder {
        Asc => "asc",
        Desc => "desc",
    }
}

impl FilterField {
    /// Resolve a filter name; model field names are accepted as aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match loose_key(name).as_str() {
            "workorderstatus" => Some(Self::Status),
            "type" => Some(Self::WorkOrderType),
            _ => name.parse().ok(),
        }
    }

    #[inline]
    pub fn is_pagination(&self) -> bool {
        matches!(self, Self::Page | Self::Limit)
    }
}

/// Filters of the work-order list.
///
/// Only non-empty values are kept and they are stored keyed by field, so two
/// filters built from the same pairs in any order are equal and yield the same
/// query and cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListFilter {
    values: BTreeMap<FilterField, String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> WorkOrderResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::new();
        for (name, value) in pairs {
            let name = name.as_ref();
            let field =
                FilterField::from_name(name).ok_or_else(|| WorkOrderException::InvalidFilter {
                    field: name.to_owned(),
                    value: value.as_ref().to_owned(),
                    reason: "unknown filter".to_owned(),
                })?;
            filter.set(field, value)?;
        }
        Ok(filter)
    }

    /// Set a filter; a blank value removes it. Returns whether anything changed.
    pub fn set(&mut self, field: FilterField, value: impl AsRef<str>) -> WorkOrderResult<bool> {
        let raw = value.as_ref().trim();
        if raw.is_empty() {
            return Ok(self.values.remove(&field).is_some());
        }
        let value = normalise(field, raw).map_err(|reason| WorkOrderException::InvalidFilter {
            field: field.as_str().to_owned(),
            value: raw.to_owned(),
            reason,
        })?;
        Ok(self.values.insert(field, value.clone()).as_ref() != Some(&value))
    }

    pub fn with(mut self, field: FilterField, value: impl AsRef<str>) -> WorkOrderResult<Self> {
        self.set(field, value)?;
        Ok(self)
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn remove(&mut self, field: FilterField) -> bool {
        self.values.remove(&field).is_some()
    }

    pub fn page(&self) -> u32 {
        self.get(FilterField::Page)
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        self.get(FilterField::Limit)
            .and_then(|l| l.parse().ok())
            .unwrap_or(DEFAULT_LIMIT)
    }

    pub fn set_page(&mut self, page: u32) {
        self.values.insert(FilterField::Page, page.max(1).to_string());
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.values
            .insert(FilterField::Limit, limit.clamp(1, MAX_LIMIT).to_string());
    }

    /// Non-pagination filters.
    pub fn criteria(&self) -> impl Iterator<Item = (FilterField, &str)> {
        self.values
            .iter()
            .filter(|(field, _)| !field.is_pagination())
            .map(|(field, value)| (*field, value.as_str()))
    }

    /// Canonical query with defaults applied: page 1, limit 10, newest visit first.
    pub fn to_query(&self) -> BTreeMap<String, String> {
        let mut query: BTreeMap<String, String> = self
            .values
            .iter()
            .map(|(field, value)| (field.as_str().to_owned(), value.clone()))
            .collect();
        query
            .entry(FilterField::Page.as_str().to_owned())
            .or_insert_with(|| DEFAULT_PAGE.to_string());
        query
            .entry(FilterField::Limit.as_str().to_owned())
            .or_insert_with(|| DEFAULT_LIMIT.to_string());
        query
            .entry(FilterField::SortBy.as_str().to_owned())
            .or_insert_with(|| SortField::VisitInstDate.as_str().to_owned());
        query
            .entry(FilterField::SortOrder.as_str().to_owned())
            .or_insert_with(|| SortOrder::Desc.as_str().to_owned());
        query
    }

    /// `k=v&k=v` in key order; the argument part of the list cache key.
    pub fn cache_args(&self) -> String {
        encode_query(&self.to_query())
    }
}

pub(crate) fn encode_query(query: &BTreeMap<String, String>) -> String {
    query
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, NON_ALPHANUMERIC),
                utf8_percent_encode(v, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn normalise(field: FilterField, raw: &str) -> Result<String, String> {
    fn known<T: std::str::FromStr<Err = super::UnknownVariant> + ToString>(
        raw: &str,
    ) -> Result<String, String> {
        raw.parse::<T>().map(|v| v.to_string()).map_err(|e| e.to_string())
    }

    match field {
        FilterField::Page | FilterField::Limit => match raw.parse::<u32>() {
            Ok(0) | Err(_) => Err("must be a positive integer".to_owned()),
            Ok(n) if field == FilterField::Limit && n > MAX_LIMIT => {
                Err(format!("must not exceed {MAX_LIMIT}"))
            }
            Ok(n) => Ok(n.to_string()),
        },
        FilterField::Status => known::<WorkOrderStatus>(raw),
        FilterField::JobStatus => known::<JobStatus>(raw),
        FilterField::AreaCode => known::<AreaCode>(raw),
        FilterField::SortBy => known::<SortField>(raw),
        FilterField::SortOrder => known::<SortOrder>(raw),
        FilterField::StartDate | FilterField::EndDate => date::parse_date(raw)
            .map(date::format_date)
            .ok_or_else(|| "expected a YYYY-MM-DD date".to_owned()),
        FilterField::WorkOrderType
        | FilterField::Supervisor
        | FilterField::Technician
        | FilterField::Area
        | FilterField::Search
        | FilterField::Distribution => Ok(raw.to_owned()),
    }
}
