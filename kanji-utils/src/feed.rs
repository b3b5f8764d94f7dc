//! Item feed parsing.
//!
//! The feed is delimited text: one record per line, a header line
//! naming the columns, comma separators with double-quote escaping.
//! Column mapping is header-driven so feeds can reorder or omit
//! columns; absent fields come through as empty strings.

use crate::{Item, Level, QuestionType};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed is empty")]
    Empty,
    #[error("feed header has no columns")]
    MissingHeader,
}

/// Split one feed line on commas, honoring double-quoted fields.
pub fn parse_delimited_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == ',' && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    fields.push(current);
    fields
}

/// Parse a whole feed into items for the given level.
pub fn parse_items(text: &str, level: Level) -> Result<Vec<Item>, FeedError> {
    let mut lines = text.split(['\r', '\n']).filter(|line| !line.is_empty());
    let header_line = lines.next().ok_or(FeedError::Empty)?;
    let header: Vec<String> = parse_delimited_line(header_line)
        .iter()
        .map(|column| column.trim().to_lowercase())
        .collect();
    if header.iter().all(|column| column.is_empty()) {
        return Err(FeedError::MissingHeader);
    }

    let records: Vec<Record> = lines
        .map(|line| Record::new(&header, parse_delimited_line(line)))
        .collect();

    let items = if level.is_extra() {
        records.iter().map(extra_item).collect()
    } else {
        records
            .iter()
            .map(|record| standard_item(record, &header, level))
            .collect()
    };
    Ok(items)
}

struct Record<'a> {
    header: &'a [String],
    fields: Vec<String>,
}

impl<'a> Record<'a> {
    fn new(header: &'a [String], fields: Vec<String>) -> Self {
        if fields.len() > header.len() {
            log::warn!(
                "feed record has {} fields but the header names {} columns; extras ignored",
                fields.len(),
                header.len()
            );
        }
        Record { header, fields }
    }

    /// Field value by column name, trimmed; empty string when absent.
    fn get(&self, column: &str) -> String {
        self.header
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.fields.get(index))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

fn extra_item(record: &Record) -> Item {
    let answer = record.get("answer");
    let answer2 = record.get("answer2");
    let question_type = if answer2.is_empty() {
        QuestionType::Reading
    } else {
        QuestionType::Correction
    };
    Item {
        filename: answer.clone(),
        reading: answer.clone(),
        sentence: record.get("sentence"),
        katakana: record.get("katakana"),
        answer,
        answer2,
        question_type: Some(question_type),
        ..Item::default()
    }
}

fn standard_item(record: &Record, header: &[String], level: Level) -> Item {
    let key_column = if header.iter().any(|h| h == "path") {
        "path"
    } else if header.iter().any(|h| h == "filename") {
        "filename"
    } else {
        header.first().map(String::as_str).unwrap_or("")
    };

    let filename = record.get(key_column);
    let kanji = record.get("kanji");
    let image_url = if filename.starts_with('/') {
        filename.clone()
    } else {
        format!("/kanji/level-{level}/{filename}")
    };

    Item {
        filename: if filename.is_empty() {
            kanji.clone()
        } else {
            filename
        },
        reading: record.get("reading"),
        meaning: record.get("meaning"),
        image_url,
        additional_info: record.get("additional_info"),
        components: record.get("components"),
        kanji: if kanji.is_empty() { None } else { Some(kanji) },
        ..Item::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimited_line_plain() {
        assert_eq!(parse_delimited_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_delimited_line_quoted_comma() {
        assert_eq!(
            parse_delimited_line(r#"a,"b,c",d"#),
            vec!["a", "b,c", "d"]
        );
    }

    #[test]
    fn test_parse_delimited_line_trailing_empty_field() {
        assert_eq!(parse_delimited_line("a,"), vec!["a", ""]);
    }

    #[test]
    fn test_parse_items_standard_level() {
        let text = "filename,reading,meaning,kanji\n\
                    big.png,おおき'い',large,大\n\
                    dog.png,いぬ,dog,犬\n";
        let items = parse_items(text, Level::Seven).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].filename, "big.png");
        assert_eq!(items[0].reading, "おおき'い'");
        assert_eq!(items[0].image_url, "/kanji/level-7/big.png");
        assert_eq!(items[0].kanji.as_deref(), Some("大"));
        assert_eq!(items[1].meaning, "dog");
    }

    #[test]
    fn test_parse_items_path_column_takes_priority() {
        let text = "path,reading\n/images/a.png,あ\n";
        let items = parse_items(text, Level::Eight).unwrap();
        assert_eq!(items[0].filename, "/images/a.png");
        // absolute paths are used verbatim
        assert_eq!(items[0].image_url, "/images/a.png");
    }

    #[test]
    fn test_parse_items_missing_columns_default_to_empty() {
        let text = "filename,reading\na.png,あ\n";
        let items = parse_items(text, Level::Seven).unwrap();
        assert_eq!(items[0].meaning, "");
        assert_eq!(items[0].components, "");
        assert_eq!(items[0].kanji, None);
    }

    #[test]
    fn test_parse_items_extra_level() {
        let text = "sentence,katakana,answer,answer2\n\
                    彼は学校に行く,イク,いく,\n\
                    誤った漢字,ゴ,誤,正\n";
        let items = parse_items(text, Level::Extra).unwrap();
        assert_eq!(items[0].answer, "いく");
        assert_eq!(items[0].question_type, Some(QuestionType::Reading));
        assert_eq!(items[1].answer2, "正");
        assert_eq!(items[1].question_type, Some(QuestionType::Correction));
    }

    #[test]
    fn test_parse_items_empty_feed() {
        assert!(matches!(parse_items("", Level::Seven), Err(FeedError::Empty)));
    }

    #[test]
    fn test_parse_items_crlf() {
        let text = "filename,reading\r\na.png,あ\r\n";
        let items = parse_items(text, Level::Seven).unwrap();
        assert_eq!(items.len(), 1);
    }
}
