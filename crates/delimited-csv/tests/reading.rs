//! Reader behavior on whole inputs

use std::io::Write;

use delimited_core::{
    ConversionPreferences, CsvFormat, DataType, Field, TypeInferencer, Value,
};
use delimited_csv::{CsvError, CsvReadOptions, CsvReader, ParseWarning};
use pretty_assertions::assert_eq;

fn reader_for(format: CsvFormat, input: &str) -> CsvReader {
    let mut reader = CsvReader::new(format);
    reader.open_from_string(input);
    reader
}

fn rows(format: CsvFormat, input: &str) -> Vec<Vec<String>> {
    reader_for(format, input)
        .records()
        .map(|r| r.unwrap().to_string_list())
        .collect()
}

fn verbatim() -> CsvFormat {
    CsvFormat::default()
        .with_trim_spaces(false)
        .with_compact_spaces(false)
}

#[test]
fn test_header_then_record() {
    let mut reader = reader_for(CsvFormat::default(), "name,age\n\"Smith, John\",42\n");

    assert!(reader.read_header(true).unwrap());
    assert_eq!(reader.header().to_string_list(), vec!["name", "age"]);

    assert!(reader.read_next_record(false).unwrap());
    let line = &reader.lines()[0];
    assert_eq!(line[0], Field::with_type("Smith, John", true, DataType::String));
    assert_eq!(line[1], Field::with_type("42", false, DataType::Int64));

    assert!(!reader.read_next_record(false).unwrap());
    assert_eq!(reader.records_read(), 2);
}

#[test]
fn test_escape_sequences() {
    assert_eq!(
        rows(verbatim(), "a\\tb,c"),
        vec![vec!["a\tb".to_string(), "c".to_string()]]
    );
    assert_eq!(
        rows(CsvFormat::default(), "\\u0041\\0x42\\0103\\68,\\q"),
        vec![vec!["ABCD", "q"]]
    );
}

#[test]
fn test_escape_inside_quotes() {
    assert_eq!(
        rows(verbatim(), "\"a\\\"b\\\\c\",d"),
        vec![vec!["a\"b\\c", "d"]]
    );
}

#[test]
fn test_comment_lines() {
    let input = "# comment\nx,y\n";
    assert_eq!(rows(CsvFormat::default(), input), vec![vec!["x", "y"]]);

    let no_comments = CsvFormat::default().with_comments(false);
    assert_eq!(
        rows(no_comments, input),
        vec![vec!["# comment"], vec!["x", "y"]]
    );
}

#[test]
fn test_comment_lines_before_header() {
    let input = "# c\nh1,h2\n1,2\n";

    let mut reader = reader_for(CsvFormat::default(), input);
    assert_eq!(reader.read_n_lines(10, true).unwrap(), 1);
    assert_eq!(reader.header().to_string_list(), vec!["h1", "h2"]);
    assert_eq!(reader.lines()[0].to_string_list(), vec!["1", "2"]);

    let mut reader = reader_for(CsvFormat::default().with_comments(false), input);
    assert!(reader.read_header(true).unwrap());
    assert_eq!(reader.header().to_string_list(), vec!["# c"]);
    assert_eq!(reader.read_n_lines(10, false).unwrap(), 2);
    assert_eq!(reader.lines()[0].to_string_list(), vec!["h1", "h2"]);
}

#[test]
fn test_comment_char_mid_line_is_data() {
    assert_eq!(rows(CsvFormat::default(), "a,#b\n"), vec![vec!["a", "#b"]]);
}

#[test]
fn test_adjacent_delimiters_yield_empty_fields() {
    let rows = rows(CsvFormat::default(), "a,,b\n,\n");
    assert_eq!(rows, vec![vec!["a", "", "b"], vec!["", ""]]);
}

#[test]
fn test_leading_record_delimiter() {
    assert_eq!(rows(CsvFormat::default(), "\nx\n"), vec![vec!["x"]]);

    let keep = CsvFormat::default().with_skip_empty_lines(false);
    assert_eq!(rows(keep, "\nx\n"), vec![vec![""], vec!["x"]]);
}

#[test]
fn test_flush_at_end_of_stream() {
    assert_eq!(rows(CsvFormat::default(), "a,b"), vec![vec!["a", "b"]]);
    assert_eq!(rows(CsvFormat::default(), "a,"), vec![vec!["a", ""]]);
    assert_eq!(rows(CsvFormat::default(), "a\\"), vec![vec!["a\\"]]);
}

#[test]
fn test_doubled_qualifier() {
    assert_eq!(
        rows(CsvFormat::default(), "\"say \"\"hi\"\"\",x\n"),
        vec![vec!["say \"hi\"", "x"]]
    );
    assert_eq!(rows(CsvFormat::default(), "\"\"\"\"\n"), vec![vec!["\""]]);
}

#[test]
fn test_quoted_record_delimiters() {
    assert_eq!(
        rows(verbatim(), "\"a\nb\",\"c\r\nd\"\nnext\n"),
        vec![vec!["a\nb", "c\r\nd"], vec!["next"]]
    );
}

#[test]
fn test_whitespace_policy() {
    let input = "  a   b  ,\"  c  \"\n";
    assert_eq!(rows(CsvFormat::default(), input), vec![vec!["a b", "c"]]);
    assert_eq!(rows(verbatim(), input), vec![vec!["  a   b  ", "  c  "]]);
}

#[test]
fn test_custom_record_delimiter() {
    let format = CsvFormat::default().with_record_delimiter(';');
    assert_eq!(
        rows(format, "a,b;c,d;"),
        vec![vec!["a", "b"], vec!["c", "d"]]
    );

    // With a custom record delimiter a newline is ordinary text
    let format = verbatim().with_record_delimiter(';');
    assert_eq!(rows(format, "a\nb;c"), vec![vec!["a\nb"], vec!["c"]]);
}

#[test]
fn test_several_column_delimiters() {
    let format = CsvFormat::default()
        .with_additional_column_delimiter(';')
        .with_additional_column_delimiter('\t');
    assert_eq!(
        rows(format, "a,b;c\td\n"),
        vec![vec!["a", "b", "c", "d"]]
    );
}

#[test]
fn test_tab_delimiter_is_not_whitespace() {
    let format = CsvFormat::default().with_column_delimiter('\t');
    assert_eq!(rows(format, "\t# x\n"), vec![vec!["", "# x"]]);
}

#[test]
fn test_type_tags() {
    let mut reader = reader_for(
        CsvFormat::default(),
        "42,\"42\",-3,2.5,2024-01-15,true,,hello\n",
    );
    let record = reader.read_record().unwrap().unwrap();
    let types: Vec<_> = record.iter().map(Field::data_type).collect();
    assert_eq!(
        types,
        vec![
            DataType::Int64,
            DataType::String,
            DataType::Int64,
            DataType::Double,
            DataType::Date,
            DataType::Bool,
            DataType::Unknown,
            DataType::String,
        ]
    );
    assert!(record.iter().skip(2).all(|f| !f.is_qualified()));
}

#[test]
fn test_unsigned_preference() {
    let options = CsvReadOptions::default().with_preferences(ConversionPreferences::UNSIGNED);
    let mut reader = CsvReader::with_options(CsvFormat::default(), options);
    reader.open_from_string("42,-1\n");
    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record[0].data_type(), DataType::UInt64);
    assert_eq!(record[1].data_type(), DataType::Int64);
}

#[test]
fn test_guess_column_types() {
    let mut reader = reader_for(CsvFormat::default(), "id,score,name\n1,2.5,a\n2,3,\"b\"\n3,,c\n");
    assert_eq!(reader.read_n_lines(10, true).unwrap(), 3);

    assert_eq!(
        reader.guess_column_types().to_vec(),
        vec![DataType::Int64, DataType::Double, DataType::String]
    );
    assert_eq!(reader.column_type(1), DataType::Double);
    assert_eq!(reader.column_type(7), DataType::Unknown);
    assert_eq!(reader.null_value(0), Value::Null(DataType::Int64));

    reader.set_column_type(4, DataType::Date);
    assert_eq!(reader.column_types().map(<[DataType]>::len), Some(5));
    assert_eq!(reader.column_type(3), DataType::Unknown);
    assert_eq!(reader.column_type(4), DataType::Date);
    assert_eq!(reader.null_value(3), Value::Null(DataType::Unknown));
}

#[test]
fn test_guess_column_type_is_lazy() {
    let mut reader = reader_for(CsvFormat::default(), "h\n1\n2.5\n");
    reader.read_n_lines(5, false).unwrap();
    assert!(reader.column_types().is_none());
    assert_eq!(reader.guess_column_type(0), DataType::Double);
    assert!(reader.column_types().is_some());
}

#[test]
fn test_read_n_lines() {
    let mut reader = reader_for(CsvFormat::default(), "h1,h2\n1,2\n3,4\n5,6\n");
    assert_eq!(reader.read_n_lines(2, false).unwrap(), 2);
    assert_eq!(reader.record_set().count_lines(), 2);

    // The header is already present; clearing replaces the stored lines
    assert_eq!(reader.read_n_lines(2, true).unwrap(), 1);
    assert_eq!(reader.lines()[0].to_string_list(), vec!["5", "6"]);
    assert_eq!(reader.header().to_string_list(), vec!["h1", "h2"]);

    assert_eq!(reader.read_n_lines(2, false).unwrap(), 0);
}

#[test]
fn test_read_n_lines_on_empty_input() {
    let mut reader = reader_for(CsvFormat::default(), "");
    assert_eq!(reader.read_n_lines(3, true).unwrap(), 0);
    assert_eq!(reader.record_set().count_header_columns(), 0);
}

#[test]
fn test_header_lookup() {
    let mut reader = reader_for(CsvFormat::default(), "Id,Name,Email\n");
    reader.read_header(true).unwrap();
    assert_eq!(reader.header_index_by_name("name"), Some(1));
    assert_eq!(
        reader.header_indices_by_name(&["EMAIL", "phone"]),
        vec![Some(2), None]
    );
}

#[test]
fn test_parse_line_keeps_original() {
    let mut reader = reader_for(CsvFormat::default(), "a,b\n");
    let record = reader.parse_line("x, \"y\" ,z").unwrap();
    assert_eq!(record.to_string_list(), vec!["x", "y", "z"]);
    assert_eq!(record.original_line(), Some("x, \"y\" ,z"));

    // The open source is untouched
    assert_eq!(reader.records_read(), 0);
    let next = reader.read_record().unwrap().unwrap();
    assert_eq!(next.to_string_list(), vec!["a", "b"]);
    assert!(!next.contains_original_line());
}

#[test]
fn test_describe() {
    let mut reader = reader_for(CsvFormat::default(), "n,v\n\"a\",1\n");
    reader.read_n_lines(1, true).unwrap();
    assert_eq!(reader.describe(true), "n, v\n\"a\", 1");
    assert_eq!(
        reader.describe(false),
        "(\"n\", String), (\"v\", String)\n(\"a\", String), (\"1\", Int64)"
    );
}

#[test]
fn test_discarded_before_quote_warning() {
    let mut reader = reader_for(CsvFormat::default(), "ab\"cd\",e\n");
    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record.to_string_list(), vec!["cd", "e"]);
    assert!(record[0].is_qualified());
    assert_eq!(
        reader.take_warnings(),
        vec![ParseWarning::DiscardedBeforeQuote {
            record: 0,
            column: 0,
            discarded: "ab".into(),
        }]
    );
    assert!(reader.warnings().is_empty());
}

#[test]
fn test_whitespace_before_quote_is_silent() {
    let mut reader = reader_for(CsvFormat::default(), "a, \"b\"\n");
    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record.to_string_list(), vec!["a", "b"]);
    assert!(reader.warnings().is_empty());
}

#[test]
fn test_trailing_after_quote_warning() {
    let mut reader = reader_for(CsvFormat::default(), "x\n\"ab\"cd,e\n");
    reader.read_record().unwrap();
    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record.to_string_list(), vec!["ab", "e"]);
    assert_eq!(
        reader.warnings(),
        &[ParseWarning::TrailingAfterQuote {
            record: 1,
            column: 0,
            trailing: "cd".into(),
        }]
    );
}

#[test]
fn test_unterminated_quote_is_flushed() {
    let mut reader = reader_for(CsvFormat::default(), "a,\"open");
    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record.to_string_list(), vec!["a", "open"]);
    assert_eq!(
        reader.warnings(),
        &[ParseWarning::UnterminatedQuote { record: 0, column: 1 }]
    );
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_invalid_escape_warning() {
    let mut reader = reader_for(CsvFormat::default(), "a\\ud800b\n");
    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record[0].value(), "a\u{FFFD}b");
    assert!(matches!(
        reader.warnings(),
        [ParseWarning::InvalidEscape { code: 0xd800, .. }]
    ));
}

#[test]
fn test_invalid_utf8_warning() {
    let mut reader = CsvReader::default();
    reader.open_from_reader(std::io::Cursor::new(b"a,\xff\n".to_vec()));
    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record.to_string_list(), vec!["a", "\u{FFFD}"]);
    assert_eq!(
        reader.warnings(),
        &[ParseWarning::InvalidUtf8 { record: 0, count: 1 }]
    );
}

#[test]
fn test_strict_mode_reports_mid_field_quote() {
    let options = CsvReadOptions::default().strict(true);
    let mut reader = CsvReader::with_options(CsvFormat::default(), options);
    reader.open_from_string("x,ab\"cd\"\nok\n");

    let err = reader.read_record().unwrap_err();
    assert!(matches!(err, CsvError::Parse { record: 0, column: 1, .. }));

    // The offending line is skipped
    let next = reader.read_record().unwrap().unwrap();
    assert_eq!(next.to_string_list(), vec!["ok"]);
}

#[test]
fn test_custom_inferencer() {
    struct Textual;

    impl TypeInferencer for Textual {
        fn guess_type(&self, _raw: &str, _preferences: ConversionPreferences) -> DataType {
            DataType::String
        }

        fn most_general_type(&self, _a: DataType, _b: DataType) -> DataType {
            DataType::String
        }
    }

    let mut reader = CsvReader::default().with_inferencer(Textual);
    reader.open_from_string("1,2.5\n");
    let record = reader.read_record().unwrap().unwrap();
    assert!(record.iter().all(|f| f.data_type() == DataType::String));
}

#[test]
fn test_open_from_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("people.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"name,age\r\nAda,36\r\nAlan,41\r\n").unwrap();
    drop(file);

    let mut reader = CsvReader::default();
    reader.open_from_path(&path).unwrap();
    assert_eq!(reader.read_n_lines(usize::MAX, true).unwrap(), 2);
    assert_eq!(reader.lines()[1].to_string_list(), vec!["Alan", "41"]);
}

#[test]
fn test_open_missing_path_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let mut reader = reader_for(CsvFormat::default(), "stale\n");

    let result = reader.open_from_path(tmp.path().join("missing.csv"));
    assert!(matches!(result, Err(CsvError::Io(_))));
    // The previous source is gone
    assert!(!reader.can_read_from_stream());
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_format_change_between_records() {
    let mut reader = reader_for(CsvFormat::default(), "a;b\na;b\n");
    assert_eq!(reader.read_record().unwrap().unwrap().len(), 1);
    reader.format_mut().add_column_delimiter(';');
    assert_eq!(reader.read_record().unwrap().unwrap().len(), 2);
}
