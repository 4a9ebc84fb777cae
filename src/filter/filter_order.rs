use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse `"name desc, email"` into order infos, rejecting columns outside `allowed`.
    pub fn validate_and_parse(order: &str, allowed: &[&str]) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in order.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            let Some(col) = it.next() else { continue };
            if !allowed.contains(&col) {
                return Err(FilterError::InvalidColumn(col.to_string()));
            }
            let sort = match it.next() {
                None => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                Some(dir) => return Err(FilterError::InvalidDirection(dir.to_string())),
            };
            out.push(FilterOrderInfo { column: col.to_string(), sort });
        }
        Ok(out)
    }

    /// Columns are only ever whitelisted names, so quoting is enough here.
    pub fn generate(infos: &[FilterOrderInfo], tiebreak: &str) -> String {
        let mut parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        parts.push(format!("\"{}\" ASC", tiebreak));
        format!("ORDER BY {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[&str] = &["id", "name", "email"];

    #[test]
    fn parses_multiple_columns_with_directions() {
        let infos = FilterOrder::validate_and_parse("name desc, email", COLUMNS).unwrap();
        assert_eq!(
            infos,
            vec![
                FilterOrderInfo { column: "name".into(), sort: SortDirection::Desc },
                FilterOrderInfo { column: "email".into(), sort: SortDirection::Asc },
            ]
        );
    }

    #[test]
    fn rejects_unknown_column() {
        let err = FilterOrder::validate_and_parse("password_hash", COLUMNS).unwrap_err();
        assert_eq!(err, FilterError::InvalidColumn("password_hash".into()));
    }

    #[test]
    fn rejects_bad_direction() {
        let err = FilterOrder::validate_and_parse("name sideways", COLUMNS).unwrap_err();
        assert_eq!(err, FilterError::InvalidDirection("sideways".into()));
    }

    #[test]
    fn generate_appends_tiebreak() {
        let infos = vec![FilterOrderInfo { column: "name".into(), sort: SortDirection::Desc }];
        assert_eq!(
            FilterOrder::generate(&infos, "id"),
            "ORDER BY \"name\" DESC, \"id\" ASC"
        );
        assert_eq!(FilterOrder::generate(&[], "id"), "ORDER BY \"id\" ASC");
    }
}
