use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::SearchQuery;

/// Filter and sort expressions in the record store's query language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub filter: String,
    pub sort: String,
}

impl Filter {
    pub fn translate(query: &SearchQuery) -> Result<Self, FilterError> {
        let filter = FilterWhere::generate(&query.filters)?;
        let sort = FilterOrder::generate(&query.sort)?;

        tracing::debug!(filter = %filter, sort = %sort, "translated search query");

        Ok(Self { filter, sort })
    }
}
