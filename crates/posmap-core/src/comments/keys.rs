//! Entry key extraction from comments.

use regex::Regex;
use tracing::debug;

use super::CommentField;
use crate::models::records::{KeyedComment, ProductMapRow};

/// Attach an entry number and the batch's assigned integer to every row.
///
/// The entry number is capture group 1 of the first match of `pattern` in
/// the row's comment. Rows without a match, or whose group 1 is empty, keep
/// a `None` key and are still returned.
pub fn extract_keys(
    rows: &[ProductMapRow],
    pattern: &Regex,
    assigned_integer: i64,
) -> Vec<KeyedComment> {
    let keyed: Vec<KeyedComment> = rows
        .iter()
        .map(|row| {
            let comments = row.comment().unwrap_or_default().to_string();
            let entry_number = pattern
                .captures(&comments)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .filter(|key| !key.is_empty());

            KeyedComment {
                belegnummer: row.belegnummer,
                artikelnummer: row.artikelnummer.clone(),
                comments,
                entry_number,
                assigned_integer,
            }
        })
        .collect();

    debug!(
        "Extracted {} keys from {} comments",
        keyed.iter().filter(|k| k.entry_number.is_some()).count(),
        keyed.len()
    );
    keyed
}

/// Keep rows whose comment contains `pattern`, in input order.
pub fn filter_commented(rows: &[ProductMapRow], pattern: &Regex) -> Vec<ProductMapRow> {
    rows.iter()
        .filter(|row| row.comment().is_some_and(|c| pattern.is_match(c)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{ENTRY_NUMBER, POSITION_KEY};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_keys_with_position_pattern() {
        let pattern = Regex::new(r"Pos\.\s([\d.]+)").unwrap();
        let rows = vec![
            ProductMapRow::new(42, "A100", Some("Pos. 3.4. foo")),
            ProductMapRow::new(42, "A200", Some("no reference here")),
        ];

        let keyed = extract_keys(&rows, &pattern, 7);

        assert_eq!(keyed.len(), 2);
        assert_eq!(keyed[0].entry_number.as_deref(), Some("3.4."));
        assert_eq!(keyed[1].entry_number, None);
        assert_eq!(keyed[1].artikelnummer, "A200");
        assert!(keyed.iter().all(|k| k.assigned_integer == 7));
    }

    #[test]
    fn test_extract_keys_with_entry_number_pattern() {
        let rows = vec![ProductMapRow::new(42, "A100", Some("Pos. 3.4. foo"))];

        let keyed = extract_keys(&rows, &ENTRY_NUMBER, 7);

        assert_eq!(
            keyed,
            vec![KeyedComment {
                belegnummer: 42,
                artikelnummer: "A100".to_string(),
                comments: "Pos. 3.4. foo".to_string(),
                entry_number: Some("3.4".to_string()),
                assigned_integer: 7,
            }]
        );
    }

    #[test]
    fn test_extract_keys_ignores_dates_before_position() {
        let comment = "Lieferung 12.05. laut Pos. 3.4. Rohr";
        let rows = vec![ProductMapRow::new(42, "A100", Some(comment))];

        let keyed = extract_keys(&rows, &POSITION_KEY, 7);
        assert_eq!(keyed[0].entry_number.as_deref(), Some("3.4"));

        let keyed = extract_keys(&rows, &ENTRY_NUMBER, 7);
        assert_eq!(keyed[0].entry_number.as_deref(), Some("12.05"));
    }

    #[test]
    fn test_extract_keys_blank_comment() {
        let rows = vec![ProductMapRow::new(1, "X", None)];
        let keyed = extract_keys(&rows, &ENTRY_NUMBER, 3);

        assert_eq!(keyed[0].comments, "");
        assert_eq!(keyed[0].entry_number, None);
    }

    #[test]
    fn test_extract_keys_empty_group_is_none() {
        let pattern = Regex::new(r"Pos\.\s?([\d.]*)").unwrap();
        let rows = vec![ProductMapRow::new(1, "X", Some("Pos. ohne Nummer"))];

        let keyed = extract_keys(&rows, &pattern, 3);
        assert_eq!(keyed[0].entry_number, None);
    }

    #[test]
    fn test_filter_commented() {
        let rows = vec![
            ProductMapRow::new(1, "A", Some("Pos. 1.1. Rohr")),
            ProductMapRow::new(1, "B", Some("Zubehör")),
            ProductMapRow::new(1, "C", None),
            ProductMapRow::new(1, "D", Some("laut Pos. 1.2.")),
            ProductMapRow::new(1, "E", Some("Pos. 1.3 ohne Punkt")),
        ];

        let kept: Vec<String> = filter_commented(&rows, &POSITION_KEY)
            .into_iter()
            .map(|r| r.artikelnummer)
            .collect();

        assert_eq!(kept, vec!["A", "D"]);
    }
}
