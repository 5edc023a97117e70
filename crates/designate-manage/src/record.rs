//! Delimited record parsing for import files.
//!
//! Each input line is one record. Fields are separated by a single
//! delimiter character and may be wrapped in double quotes, in which case
//! they can contain the delimiter, and `""` stands for a literal quote.
//! Quoted fields do not span lines.

/// Splits one line into fields.
///
/// # Example
///
/// ```
/// use designate_manage::record::split_record;
///
/// assert_eq!(split_record("com,Commercial", ','), vec!["com", "Commercial"]);
/// assert_eq!(split_record(r#"org,"Non-profit, mostly""#, ','), vec!["org", "Non-profit, mostly"]);
/// ```
#[must_use]
pub fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
            at_field_start = true;
            continue;
        } else if c == '"' && at_field_start {
            in_quotes = true;
        } else {
            field.push(c);
        }
        at_field_start = false;
    }

    fields.push(field);
    fields
}

/// Renders a list of strings the way the import report prints extra fields:
/// `['a', 'b']`.
#[must_use]
pub fn render_list(items: &[String]) -> String {
    let rendered: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", rendered.join(", "))
}

fn quote(item: &str) -> String {
    if item.contains('\'') && !item.contains('"') {
        return format!("\"{item}\"");
    }
    let escaped = item.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields() {
        assert_eq!(split_record("com", ','), vec!["com"]);
        assert_eq!(split_record("com,", ','), vec!["com", ""]);
        assert_eq!(split_record("a,b,c", ','), vec!["a", "b", "c"]);
        assert_eq!(split_record("", ','), vec![""]);
    }

    #[test]
    fn test_custom_delimiter() {
        assert_eq!(split_record("net|Network, infra", '|'), vec!["net", "Network, infra"]);
        assert_eq!(split_record("a\tb", '\t'), vec!["a", "b"]);
    }

    #[test]
    fn test_quoted_fields() {
        assert_eq!(
            split_record(r#""co.uk","The ""UK"" one""#, ','),
            vec!["co.uk", r#"The "UK" one"#]
        );
        // Quotes inside an unquoted field are literal.
        assert_eq!(split_record(r#"a"b,c"#, ','), vec![r#"a"b"#, "c"]);
    }

    #[test]
    fn test_render_list() {
        assert_eq!(render_list(&["c".to_string()]), "['c']");
        assert_eq!(render_list(&["c".to_string(), "d".to_string()]), "['c', 'd']");
        assert_eq!(render_list(&["it's".to_string()]), "[\"it's\"]");
        assert_eq!(render_list(&[]), "[]");
    }
}
