//! Row classification by the row-type code in field 0

use super::types::{RowLevel, field_at};

/// Classify a row by the prefix of its trimmed row-type field.
///
/// Returns `None` for rows whose type matches no hierarchy level (headers,
/// comments, blank type cells). Matching is `starts_with`, so `03点検対象`
/// and `03` both classify as equipment.
pub fn classify_row(row: &[String]) -> Option<RowLevel> {
    let row_type = field_at(row, 0);
    RowLevel::all_variants()
        .iter()
        .copied()
        .find(|level| row_type.starts_with(level.code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_by_prefix() {
        assert_eq!(classify_row(&row(&["01建物"])), Some(RowLevel::Building));
        assert_eq!(classify_row(&row(&["02部屋", "x"])), Some(RowLevel::Room));
        assert_eq!(classify_row(&row(&["03点検対象"])), Some(RowLevel::Equipment));
        assert_eq!(classify_row(&row(&["04点検項目"])), Some(RowLevel::Item));
        assert_eq!(classify_row(&row(&["04"])), Some(RowLevel::Item));
    }

    #[test]
    fn test_type_field_is_trimmed() {
        assert_eq!(classify_row(&row(&["  03 "])), Some(RowLevel::Equipment));
    }

    #[test]
    fn test_unknown_rows() {
        assert_eq!(classify_row(&row(&["種別", "名称"])), None);
        assert_eq!(classify_row(&row(&["05"])), None);
        assert_eq!(classify_row(&row(&["1"])), None);
        assert_eq!(classify_row(&row(&["x01"])), None);
        assert_eq!(classify_row(&row(&[""])), None);
        assert_eq!(classify_row(&[]), None);
    }
}
