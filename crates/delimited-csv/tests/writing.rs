//! Writer output and sink handling

use delimited_core::{CsvFormat, DataType, Field, Record, Value};
use delimited_csv::{CsvError, CsvWriter};
use pretty_assertions::assert_eq;

fn record(values: &[&str]) -> Record {
    values.iter().copied().map(Field::unqualified).collect()
}

#[test]
fn test_separators_between_fields_only() {
    let mut writer = CsvWriter::default();
    writer.open_to_string();
    writer.write_record(&record(&["a", "b", "c"]), true).unwrap();
    writer.write_record(&record(&["d"]), false).unwrap();
    assert_eq!(writer.take_string().unwrap(), "a,b,c\nd");
}

#[test]
fn test_empty_fields_keep_their_columns() {
    let mut writer = CsvWriter::default();
    writer.open_to_string();
    writer.write_record(&record(&["", "x", ""]), true).unwrap();
    assert_eq!(writer.take_string().unwrap(), ",x,\n");
}

#[test]
fn test_display_delimiter_is_used() {
    let format = CsvFormat::default()
        .with_column_delimiter(';')
        .with_additional_column_delimiter('|');
    let mut writer = CsvWriter::new(format);
    writer.open_to_string();
    writer.write_record(&record(&["a", "b;c", "d|e"]), true).unwrap();
    assert_eq!(writer.take_string().unwrap(), "a;\"b;c\";\"d|e\"\n");
}

#[test]
fn test_whitespace_reduced_before_writing() {
    let mut writer = CsvWriter::default();
    writer.open_to_string();
    let r: Record = vec![Field::new("  a   b "), Field::unqualified(" 1 ")].into();
    writer.write_record(&r, true).unwrap();
    assert_eq!(writer.take_string().unwrap(), "\"a b\",1\n");
}

#[test]
fn test_escape_char_is_doubled() {
    let mut writer = CsvWriter::default();
    writer.open_to_string();
    writer.write_record(&record(&[r"C:\temp"]), true).unwrap();
    assert_eq!(writer.take_string().unwrap(), "\"C:\\\\temp\"\n");
}

#[test]
fn test_write_to_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("out.csv");

    let mut writer = CsvWriter::default();
    writer.open_to_path(&path).unwrap();
    writer.record_set_mut().set_header_names(&["id", "label"]);
    writer
        .record_set_mut()
        .push_line(record(&["1", "one, two"]));
    writer.write_header().unwrap();
    writer.write_lines(0, None).unwrap();
    writer.close().unwrap();
    assert!(!writer.can_write_to_stream());

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "\"id\",\"label\"\n1,\"one, two\"\n");
}

#[test]
fn test_reopen_flushes_previous_file() {
    let tmp = tempfile::tempdir().unwrap();
    let first = tmp.path().join("first.csv");

    let mut writer = CsvWriter::default();
    writer.open_to_path(&first).unwrap();
    writer.write_record(&record(&["x"]), true).unwrap();
    writer.open_to_string();

    assert_eq!(std::fs::read_to_string(&first).unwrap(), "x\n");
}

#[test]
fn test_open_to_bad_path_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = CsvWriter::default();
    writer.open_to_string();
    let result = writer.open_to_path(tmp.path().join("no/such/dir/out.csv"));
    assert!(matches!(result, Err(CsvError::Io(_))));
    assert!(!writer.can_write_to_stream());
}

#[test]
fn test_write_to_device() {
    let shared = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

    struct Shared(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

    impl std::io::Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let mut writer = CsvWriter::default();
    writer.open_to_writer(Shared(shared.clone()));
    writer
        .write_values(
            &[Value::from("name"), Value::from(3u64), Value::Null(DataType::Date)],
            true,
        )
        .unwrap();
    assert_eq!(writer.take_string(), None);
    writer.close().unwrap();

    assert_eq!(shared.borrow().as_slice(), b"\"name\",3,\n");
}
