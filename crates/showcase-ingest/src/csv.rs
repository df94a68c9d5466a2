//! Lenient delimited-text parser.
//!
//! Community spreadsheet exports arrive with every quoting and line-ending
//! quirk imaginable, so this parser favors acceptance over strictness: quoted
//! fields may contain delimiters and newlines, `""` escapes a quote inside a
//! quoted field, `\r\n`/`\n`/`\r` all terminate rows, fully blank lines are
//! dropped, and an unterminated quote at end of input is taken as-is.
//!
//! Single left-to-right scan with one character of lookahead, O(n). No
//! row-width normalization happens here; callers treat the first row as the
//! header and deal with ragged rows themselves.

/// Parse delimited text into rows of fields.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote inside a quoted field.
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\n' | '\r' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    // CRLF pair is one terminator.
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                flush_row(&mut rows, &mut row);
            }
            _ => field.push(c),
        }
    }

    // Trailing field/row with no terminating newline.
    row.push(field);
    flush_row(&mut rows, &mut row);

    rows
}

/// Append the pending row unless every field is blank after trimming.
/// Suppresses blank lines wherever they appear, including at end of input.
fn flush_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
    if row.iter().any(|f| !f.trim().is_empty()) {
        rows.push(std::mem::take(row));
    } else {
        row.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::parse;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_fields() {
        assert_eq!(parse("a,b,c"), vec![row(&["a", "b", "c"])]);
    }

    #[test]
    fn quoted_delimiters_and_escaped_quotes() {
        assert_eq!(
            parse("a,\"b,c\",\"d\"\"e\""),
            vec![row(&["a", "b,c", "d\"e"])]
        );
    }

    #[test]
    fn newline_inside_quoted_field() {
        assert_eq!(
            parse("\"line one\nline two\",x"),
            vec![row(&["line one\nline two", "x"])]
        );
    }

    #[test]
    fn mixed_line_endings() {
        assert_eq!(
            parse("a,b\r\nc,d\re,f\ng,h"),
            vec![
                row(&["a", "b"]),
                row(&["c", "d"]),
                row(&["e", "f"]),
                row(&["g", "h"]),
            ]
        );
    }

    #[test]
    fn blank_lines_are_dropped() {
        assert_eq!(
            parse("a,b\n\n   \nc,d\n\n"),
            vec![row(&["a", "b"]), row(&["c", "d"])]
        );
        assert_eq!(parse(""), Vec::<Vec<String>>::new());
        assert_eq!(parse("\n\r\n\n"), Vec::<Vec<String>>::new());
    }

    #[test]
    fn whitespace_only_fields_do_not_save_a_row() {
        assert_eq!(parse(" , ,\t\n"), Vec::<Vec<String>>::new());
    }

    #[test]
    fn trailing_row_without_newline_is_flushed() {
        assert_eq!(parse("a,b\nc,d"), vec![row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn unterminated_quote_is_accepted() {
        assert_eq!(parse("a,\"unterminated"), vec![row(&["a", "unterminated"])]);
    }

    #[test]
    fn empty_fields_survive_when_row_has_content() {
        assert_eq!(parse("a,,c"), vec![row(&["a", "", "c"])]);
        assert_eq!(parse(",x,"), vec![row(&["", "x", ""])]);
    }

    #[test]
    fn ragged_rows_are_not_normalized() {
        let rows = parse("a,b,c\nd,e");
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 2);
    }
}
