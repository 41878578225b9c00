use super::error::FilterError;
use super::types::FilterClause;

pub struct FilterWhere;

impl FilterWhere {
    /// Join clauses as `(a='x' && b>'y')`. No clauses yields an empty string.
    pub fn generate(clauses: &[FilterClause]) -> Result<String, FilterError> {
        if clauses.is_empty() {
            return Ok(String::new());
        }

        let mut parts = Vec::with_capacity(clauses.len());
        for clause in clauses {
            Self::validate_field(&clause.field_name)?;
            Self::validate_value(&clause.field_value)?;
            parts.push(format!(
                "{}{}'{}'",
                clause.field_name,
                clause.filter_condition.as_str(),
                Self::quote(&clause.field_value)
            ));
        }

        Ok(format!("({})", parts.join(" && ")))
    }

    pub fn validate_field(field: &str) -> Result<(), FilterError> {
        if is_field_name(field) {
            Ok(())
        } else {
            Err(FilterError::InvalidField(field.to_string()))
        }
    }

    /// The store's parser treats any `\'` as an escaped quote, so a value
    /// ending in `\` would swallow its own closing quote.
    pub fn validate_value(value: &str) -> Result<(), FilterError> {
        if value.ends_with('\\') {
            Err(FilterError::InvalidValue(value.to_string()))
        } else {
            Ok(())
        }
    }

    // Same escaping the PocketBase SDK applies to filter placeholders
    fn quote(value: &str) -> String {
        value.replace('\'', "\\'")
    }
}

/// Letters, digits, `_` and `.` (relation paths like `author.name`)
pub(crate) fn is_field_name(field: &str) -> bool {
    !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
