use super::error::FilterError;
use super::filter_where::is_field_name;
use super::types::{SortDirection, SortSpec};

pub struct FilterOrder;

impl FilterOrder {
    /// `-field` for descending, `field` for ascending. One field only.
    pub fn generate(sort: &SortSpec) -> Result<String, FilterError> {
        if !is_field_name(&sort.sort_field) {
            return Err(FilterError::InvalidSortField(sort.sort_field.clone()));
        }

        Ok(match sort.sort_type {
            SortDirection::Desc => format!("-{}", sort.sort_field),
            SortDirection::Asc => sort.sort_field.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_gets_minus_prefix() {
        assert_eq!(FilterOrder::generate(&SortSpec::desc("created")).unwrap(), "-created");
    }

    #[test]
    fn ascending_has_no_prefix() {
        assert_eq!(FilterOrder::generate(&SortSpec::asc("name")).unwrap(), "name");
    }

    #[test]
    fn default_sort_is_newest_first() {
        assert_eq!(FilterOrder::generate(&SortSpec::default()).unwrap(), "-created");
    }

    #[test]
    fn rejects_expression_in_sort_field() {
        let err = FilterOrder::generate(&SortSpec::asc("name,-id")).unwrap_err();
        assert_eq!(err, FilterError::InvalidSortField("name,-id".to_string()));
    }
}
