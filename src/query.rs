//! Query options for record fetches and their wire body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size used by the operation set when the caller gives none.
pub const DEFAULT_QUERY_LIMIT: u32 = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl QueryFilter {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<Value>) -> Self {
        QueryFilter {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuerySort {
    pub field: String,
    pub direction: SortDirection,
}

impl QuerySort {
    pub fn asc(field: impl Into<String>) -> Self {
        QuerySort {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        QuerySort {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// How many matching records the backend should return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Amount {
    #[default]
    All,
    First,
    One,
}

/// Caller-facing fetch options. Unset values take the operation defaults (limit 100, amount all).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOptions {
    pub filters: Vec<QueryFilter>,
    pub sort: Vec<QuerySort>,
    pub limit: Option<u32>,
    pub page_token: Option<String>,
    pub fields: Option<Vec<String>>,
    pub amount: Option<Amount>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: QuerySort) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// Body of `POST /table/{id}/record/query`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordQuery {
    pub filters: Vec<QueryFilter>,
    pub sort: Vec<QuerySort>,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    pub amount: Amount,
}

impl From<&QueryOptions> for RecordQuery {
    fn from(options: &QueryOptions) -> Self {
        RecordQuery {
            filters: options.filters.clone(),
            sort: options.sort.clone(),
            limit: options.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_QUERY_LIMIT),
            page_token: options.page_token.clone(),
            fields: options.fields.clone(),
            amount: options.amount.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_in_wire_body() {
        let body = serde_json::to_value(RecordQuery::from(&QueryOptions::new())).unwrap();
        assert_eq!(
            body,
            json!({"filters": [], "sort": [], "limit": 100, "amount": "all"})
        );
    }

    #[test]
    fn test_full_wire_body() {
        let options = QueryOptions::new()
            .with_limit(20)
            .with_page_token("tok-2")
            .with_filter(QueryFilter::new("age", "gt", 30))
            .with_sort(QuerySort::desc("created_at"))
            .with_fields(["name", "age"])
            .with_amount(Amount::First);
        let body = serde_json::to_value(RecordQuery::from(&options)).unwrap();
        assert_eq!(
            body,
            json!({
                "filters": [{"field": "age", "operator": "gt", "value": 30}],
                "sort": [{"field": "created_at", "direction": "desc"}],
                "limit": 20,
                "page_token": "tok-2",
                "fields": ["name", "age"],
                "amount": "first"
            })
        );
    }

    #[test]
    fn test_zero_limit_uses_default() {
        let query = RecordQuery::from(&QueryOptions::new().with_limit(0));
        assert_eq!(query.limit, DEFAULT_QUERY_LIMIT);
    }
}
