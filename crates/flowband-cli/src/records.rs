//! Flow records as CSV: `left,right[,leftWeight[,rightWeight]]`.
//!
//! Quoted fields may contain commas; a doubled quote inside a quoted field
//! is an escaped quote. An empty unquoted field is a missing value (the
//! layout rejects those); a quoted empty field `""` is the empty label.

#[derive(Debug, Default)]
pub struct RecordTable {
    pub left: Vec<Option<String>>,
    pub right: Vec<Option<String>>,
    pub left_weight: Option<Vec<f64>>,
    pub right_weight: Option<Vec<f64>>,
}

pub fn parse_records(input: &str) -> Result<RecordTable, String> {
    let mut table = RecordTable::default();
    let mut left_weights = Vec::new();
    let mut right_weights = Vec::new();
    let mut field_count: Option<usize> = None;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields = parse_line(line).map_err(|e| format!("line {line_no}: {e}"))?;
        if !(2..=4).contains(&fields.len()) {
            return Err(format!(
                "line {line_no}: expected 2 to 4 fields, found {}",
                fields.len()
            ));
        }
        match field_count {
            None => field_count = Some(fields.len()),
            Some(n) if n != fields.len() => {
                return Err(format!(
                    "line {line_no}: expected {n} fields like the first record, found {}",
                    fields.len()
                ));
            }
            Some(_) => {}
        }

        let mut fields = fields.into_iter();
        table.left.push(fields.next().unwrap_or_default());
        table.right.push(fields.next().unwrap_or_default());
        if let Some(raw) = fields.next() {
            left_weights.push(parse_weight(raw, line_no)?);
        }
        if let Some(raw) = fields.next() {
            right_weights.push(parse_weight(raw, line_no)?);
        }
    }

    if table.left.is_empty() {
        return Err("expected at least one record".to_string());
    }
    if !left_weights.is_empty() {
        table.left_weight = Some(left_weights);
    }
    if !right_weights.is_empty() {
        table.right_weight = Some(right_weights);
    }
    Ok(table)
}

fn parse_weight(raw: Option<String>, line_no: usize) -> Result<f64, String> {
    let Some(text) = raw else {
        return Err(format!("line {line_no}: empty weight field"));
    };
    text.trim()
        .parse::<f64>()
        .map_err(|_| format!("line {line_no}: invalid weight '{}'", text.trim()))
}

fn parse_line(line: &str) -> Result<Vec<Option<String>>, String> {
    let mut p = LineParser::new(line);
    let mut fields = vec![p.parse_field()?];
    while p.try_consume_comma() {
        fields.push(p.parse_field()?);
    }
    if !p.eof() {
        return Err("expected end of record".to_string());
    }
    Ok(fields)
}

struct LineParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LineParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn try_consume_comma(&mut self) -> bool {
        if self.rest().starts_with(',') {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_field(&mut self) -> Result<Option<String>, String> {
        match self.peek_char() {
            Some('"') => self.parse_quoted_field().map(Some),
            None => Ok(None),
            _ => Ok(self.parse_unquoted_field()),
        }
    }

    fn parse_unquoted_field(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(ch) = self.peek_char() {
            if ch == ',' {
                break;
            }
            out.push(ch);
            self.pos += ch.len_utf8();
        }
        let trimmed = out.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn parse_quoted_field(&mut self) -> Result<String, String> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
            if ch == '"' {
                if self.peek_char() == Some('"') {
                    // Escaped quote
                    self.pos += 1;
                    out.push('"');
                    continue;
                }
                return Ok(out);
            }
            out.push(ch);
        }
        Err("unterminated quoted field".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_pairs() {
        let table = parse_records("a,x\nb,y\n").unwrap();
        assert_eq!(table.left.len(), 2);
        assert_eq!(table.left[0].as_deref(), Some("a"));
        assert_eq!(table.right[1].as_deref(), Some("y"));
        assert!(table.left_weight.is_none());
        assert!(table.right_weight.is_none());
    }

    #[test]
    fn parses_weights_and_skips_blank_lines() {
        let table = parse_records("a,x,1.5,2\n\nb,y,0.5,1\n").unwrap();
        assert_eq!(table.left_weight, Some(vec![1.5, 0.5]));
        assert_eq!(table.right_weight, Some(vec![2.0, 1.0]));
    }

    #[test]
    fn quoted_fields_keep_commas_and_escaped_quotes() {
        let table = parse_records("\"Heating, commercial\",\"say \"\"hi\"\"\",3\n").unwrap();
        assert_eq!(table.left[0].as_deref(), Some("Heating, commercial"));
        assert_eq!(table.right[0].as_deref(), Some("say \"hi\""));
        assert_eq!(table.left_weight, Some(vec![3.0]));
    }

    #[test]
    fn empty_unquoted_field_is_missing() {
        let table = parse_records("a,\nb,y\n").unwrap();
        assert_eq!(table.right[0], None);

        let table = parse_records("a,\"\"\n").unwrap();
        assert_eq!(table.right[0].as_deref(), Some(""));
    }

    #[test]
    fn rejects_ragged_and_malformed_records() {
        assert!(parse_records("a,x,1\nb,y\n").unwrap_err().contains("line 2"));
        assert!(parse_records("a\n").unwrap_err().contains("2 to 4"));
        assert!(parse_records("a,x,zero\n").unwrap_err().contains("invalid weight"));
        assert!(parse_records("\"a,x\n").unwrap_err().contains("unterminated"));
        assert!(parse_records("").unwrap_err().contains("at least one"));
    }
}
