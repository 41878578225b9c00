// handlers/protected/generic/search.rs - POST /search handler

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiResult, Envelope, SearchResult};
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::filter::{FilterClause, SearchQuery, SortSpec};
use crate::handlers::extract::JsonBody;
use crate::services::{CrudService, Resource};

/// Search body as sent by clients; page and size stay loose until validated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub page: Option<Value>,
    pub size: Option<Value>,
    pub filters: Option<Vec<FilterClause>>,
    pub sort: Option<SortSpec>,
}

impl SearchRequest {
    pub fn into_query(self) -> Result<SearchQuery, ApiError> {
        let page = positive_number("Page", self.page.as_ref())?;
        let size = positive_number("Size", self.size.as_ref())?;

        Ok(SearchQuery {
            page,
            size,
            filters: self.filters.unwrap_or_default(),
            sort: self.sort.unwrap_or_default(),
        })
    }
}

/**
 * POST /api/{admin,client}/generic/search
 *
 * Expected Input:
 * {
 *   "page": 1,
 *   "size": 10,
 *   "filters": [{ "fieldName": "title", "fieldValue": "rust", "filterCondition": "~" }],
 *   "sort": { "sortField": "created", "sortType": "DESC" }
 * }
 *
 * Output data: `{ page, size, totalElements, totalPages, elements, hasPrevious, hasMore }`
 */
pub async fn search<R: Resource>(
    State(service): State<Arc<CrudService<R>>>,
    user: CurrentUser,
    JsonBody(request): JsonBody<SearchRequest>,
) -> ApiResult<SearchResult<R::Item>> {
    let query = request.into_query()?;
    let result = service.search(&user, &query).await?;
    Ok(Envelope::ok(result))
}

/// Missing, null, zero or blank is `required`; anything else not a positive integer is a type error.
fn positive_number(field: &str, value: Option<&Value>) -> Result<u32, ApiError> {
    let invalid = || ApiError::type_error(field, "number");

    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(ApiError::required(field)),
        Some(Value::Number(n)) => {
            if n.as_f64() == Some(0.0) {
                return Err(ApiError::required(field));
            }
            n.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .or_else(|| n.as_f64().and_then(whole_number))
                .ok_or_else(invalid)
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() || s == "0" {
                return Err(ApiError::required(field));
            }
            s.parse::<u32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
                .filter(|n| *n > 0)
                .ok_or_else(invalid)
        }
        Some(_) => Err(invalid()),
    }
}

/// `2.0` counts as 2; fractions, negatives and out-of-range values do not.
fn whole_number(f: f64) -> Option<u32> {
    if f.is_finite() && f.fract() == 0.0 && f > 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> SearchRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn numeric_strings_and_numbers_are_accepted() {
        let query = request(json!({ "page": "2", "size": 25 })).into_query().unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.size, 25);
        assert!(query.filters.is_empty());
        assert_eq!(query.sort, SortSpec::default());
    }

    #[test]
    fn whole_number_floats_are_accepted() {
        let query = request(json!({ "page": 1.0, "size": "20.0" })).into_query().unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.size, 20);

        assert_eq!(
            request(json!({ "page": 1, "size": 1.5 })).into_query(),
            Err(ApiError::type_error("Size", "number"))
        );
        assert_eq!(
            request(json!({ "page": -2.0, "size": 10 })).into_query(),
            Err(ApiError::type_error("Page", "number"))
        );
        assert_eq!(
            request(json!({ "page": "NaN", "size": 10 })).into_query(),
            Err(ApiError::type_error("Page", "number"))
        );
    }

    #[test]
    fn missing_or_zero_page_is_required() {
        assert_eq!(request(json!({ "size": 10 })).into_query(), Err(ApiError::required("Page")));
        assert_eq!(request(json!({ "page": 0, "size": 10 })).into_query(), Err(ApiError::required("Page")));
        assert_eq!(request(json!({ "page": "", "size": 10 })).into_query(), Err(ApiError::required("Page")));
    }

    #[test]
    fn missing_size_is_required() {
        assert_eq!(request(json!({ "page": 1 })).into_query(), Err(ApiError::required("Size")));
    }

    #[test]
    fn non_numeric_page_is_type_error() {
        assert_eq!(
            request(json!({ "page": "abc", "size": 10 })).into_query(),
            Err(ApiError::type_error("Page", "number"))
        );
        assert_eq!(
            request(json!({ "page": -1, "size": 10 })).into_query(),
            Err(ApiError::type_error("Page", "number"))
        );
        assert_eq!(
            request(json!({ "page": 1, "size": 2.5 })).into_query(),
            Err(ApiError::type_error("Size", "number"))
        );
        assert_eq!(
            request(json!({ "page": [1], "size": 10 })).into_query(),
            Err(ApiError::type_error("Page", "number"))
        );
    }
}
