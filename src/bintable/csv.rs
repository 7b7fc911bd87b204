//! CSV projection over a finished table
//!
//! Headers and rows are derived from the settled per-column statistics:
//! list columns expand to `name[0] .. name[n-1]` using the widest observed
//! length, dict columns expand to `name[key]` per observed key, int-keyed
//! dicts project as 1-indexed sparse lists. The projection is a stateless,
//! repeatable read.

use std::io::Write;

use csv::Writer;

use crate::bintable::table::{BinaryTable, Column};
use crate::bintable::value::{DictKey, Value};
use crate::error::{Error, Result};

/// CSV header cells for every column, in schema order
pub fn csv_headers(table: &BinaryTable) -> Vec<String> {
    let mut headers = Vec::new();
    for column in table.columns() {
        if column.list_length > 0 {
            for i in 0..column.list_length {
                headers.push(format!("{}[{}]", column.name, i));
            }
        } else if column.kind.is_dict() {
            for key in &column.dict_keys {
                headers.push(format!("{}[{}]", column.name, key));
            }
        } else {
            headers.push(column.name.clone());
        }
    }
    headers
}

/// Write one header row and `row_count` data rows
pub fn write_csv<W: Write>(table: &BinaryTable, writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(csv_headers(table))?;
    for row in table.rows() {
        writer.write_record(csv_row(table.columns(), row)?)?;
    }
    writer.flush()?;
    Ok(())
}

/// Data cells for one row, aligned with `csv_headers`
fn csv_row(columns: &[Column], row: &[Value]) -> Result<Vec<String>> {
    let mut cells = Vec::new();
    for (column, value) in columns.iter().zip(row) {
        match value {
            // Slot i of an int-keyed dict holds the value at key i+1
            Value::Dict(_) if column.kind.is_int_keyed_dict() => {
                for i in 0..column.list_length {
                    cells.push(match value.get(&DictKey::Int(i as i32 + 1)) {
                        Some(v) => scalar_cell(v)?,
                        None => String::new(),
                    });
                }
            }
            Value::List(items) if column.list_length > 0 => {
                for i in 0..column.list_length {
                    cells.push(match items.get(i) {
                        Some(v) => scalar_cell(v)?,
                        None => String::new(),
                    });
                }
            }
            Value::Dict(_) => {
                for key in &column.dict_keys {
                    cells.push(match value.get(key) {
                        Some(v) => scalar_cell(v)?,
                        None => String::new(),
                    });
                }
            }
            value => cells.push(scalar_cell(value)?),
        }
    }
    Ok(cells)
}

fn scalar_cell(value: &Value) -> Result<String> {
    match value {
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(x) => Ok(x.to_string()),
        Value::Fix(d) => Ok(d.to_string()),
        Value::Str(s) => Ok(s.clone()),
        // Only reachable for a list column whose every row was empty
        Value::List(_) => Ok(String::new()),
        Value::Dict(_) => Err(Error::CannotSerializeDict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bintable::reader::Dialect;
    use crate::bintable::value::ColumnType;

    fn tag_table() -> BinaryTable {
        let mut data = vec![0x0F, 0x00, 0x00, 0x00];
        data.extend_from_slice(&[0x02, 0x0E]);
        data.extend_from_slice(b"Id\x00");
        data.push(0x04);
        data.extend_from_slice(b"Tags\x00");
        data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
        data.push(0x01);
        data.extend_from_slice(b"\x02a\x00b\x00");
        data.push(0x02);
        data.extend_from_slice(b"\x01c\x00");
        BinaryTable::parse(&data, Dialect::New).unwrap()
    }

    #[test]
    fn test_headers_expand_lists() {
        let table = tag_table();
        assert_eq!(table.csv_headers(), vec!["Id", "Tags[0]", "Tags[1]"]);
    }

    #[test]
    fn test_end_to_end_csv() {
        let table = tag_table();
        let text = table.to_csv_string().unwrap();
        assert_eq!(text, "Id,Tags[0],Tags[1]\n1,a,b\n2,c,\n");
    }

    #[test]
    fn test_header_count_identity() {
        let table = tag_table();
        let expected: usize = table
            .columns()
            .iter()
            .map(|c| {
                if c.kind.is_dict() && c.list_length == 0 {
                    c.dict_keys.len()
                } else {
                    c.list_length.max(1)
                }
            })
            .sum();
        assert_eq!(table.csv_headers().len(), expected);
    }

    #[test]
    fn test_string_dict_projection() {
        // dict<string,int> over two rows: {"b":1,"a":2} then {"a":3,"c":4}
        let mut data = vec![0x0A, 0x00, 0x00, 0x00];
        data.extend_from_slice(&[0x01, 0x0C]);
        data.extend_from_slice(b"Map\x00");
        data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
        data.extend_from_slice(b"\x02b\x00\x01a\x00\x02");
        data.extend_from_slice(b"\x02a\x00\x03c\x00\x04");
        let table = BinaryTable::parse(&data, Dialect::New).unwrap();

        assert_eq!(table.csv_headers(), vec!["Map[b]", "Map[a]", "Map[c]"]);
        let text = table.to_csv_string().unwrap();
        assert_eq!(text, "Map[b],Map[a],Map[c]\n1,2,\n,3,4\n");
    }

    #[test]
    fn test_int_keyed_dict_projects_as_sparse_list() {
        // dict<int,int> rows {1:5, 2:6} then {2:7}
        let mut data = vec![0x09, 0x00, 0x00, 0x00];
        data.extend_from_slice(&[0x01, 0x0A]);
        data.extend_from_slice(b"Ix\x00");
        data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
        data.extend_from_slice(&[0x02, 0x01, 0x05, 0x02, 0x06]);
        data.extend_from_slice(&[0x01, 0x02, 0x07]);
        let table = BinaryTable::parse(&data, Dialect::New).unwrap();

        assert_eq!(table.csv_headers(), vec!["Ix[0]", "Ix[1]"]);
        let text = table.to_csv_string().unwrap();
        assert_eq!(text, "Ix[0],Ix[1]\n5,6\n,7\n");
    }

    #[test]
    fn test_empty_dict_column_contributes_no_cells() {
        // [Id:int, Map:dict<string,string>] where every Map is empty
        let mut data = vec![0x0E, 0x00, 0x00, 0x00];
        data.extend_from_slice(&[0x02, 0x0E]);
        data.extend_from_slice(b"Id\x00");
        data.push(0x09);
        data.extend_from_slice(b"Map\x00");
        data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
        data.extend_from_slice(&[0x01, 0x00]); // Id=1, Map={}
        data.extend_from_slice(&[0x02, 0x00]); // Id=2, Map={}
        let table = BinaryTable::parse(&data, Dialect::New).unwrap();

        assert_eq!(table.csv_headers(), vec!["Id"]);
        assert_eq!(table.to_csv_string().unwrap(), "Id\n1\n2\n");
    }

    #[test]
    fn test_all_empty_list_column_keeps_one_cell() {
        // A list column whose every row is empty still occupies one header
        // cell and one empty data cell
        let mut data = vec![0x0E, 0x00, 0x00, 0x00];
        data.extend_from_slice(&[0x02, 0x0E]);
        data.extend_from_slice(b"Id\x00");
        data.push(0x06);
        data.extend_from_slice(b"Ids\x00");
        data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
        data.extend_from_slice(&[0x03, 0x00]); // Id=3, Ids=[]
        let table = BinaryTable::parse(&data, Dialect::New).unwrap();

        assert_eq!(table.csv_headers(), vec!["Id", "Ids"]);
        assert_eq!(table.to_csv_string().unwrap(), "Id,Ids\n3,\n");
    }

    #[test]
    fn test_quoting() {
        // A string cell containing a comma and a quote gets escaped
        let mut data = vec![0x0B, 0x00, 0x00, 0x00];
        data.extend_from_slice(&[0x01, 0x02]);
        data.extend_from_slice(b"Desc\x00");
        data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
        data.extend_from_slice(b"a,\"b\"\x00");
        let table = BinaryTable::parse(&data, Dialect::New).unwrap();

        assert_eq!(table.to_csv_string().unwrap(), "Desc\n\"a,\"\"b\"\"\"\n");
    }

    #[test]
    fn test_scalar_cell_rejects_dict() {
        assert!(matches!(
            scalar_cell(&Value::Dict(vec![])),
            Err(Error::CannotSerializeDict)
        ));
        assert_eq!(scalar_cell(&Value::Bool(true)).unwrap(), "true");
        assert_eq!(scalar_cell(&Value::Float(60.1189)).unwrap(), "60.1189");
    }

    #[test]
    fn test_headers_and_rows_align() {
        let tables: Vec<BinaryTable> = vec![tag_table()];
        for table in tables {
            let width = table.csv_headers().len();
            for row in table.rows() {
                assert_eq!(csv_row(table.columns(), row).unwrap().len(), width);
            }
        }
    }

    #[test]
    fn test_column_type_display() {
        assert_eq!(ColumnType::IntFloatDict.to_string(), "dict<int,float>");
        assert_eq!(ColumnType::StringList.to_string(), "list<string>");
    }
}
