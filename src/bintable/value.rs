//! Column types and decoded cell values for the binary table format

use std::fmt;

use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Column type enumeration, matching the wire type codes 1-15
///
/// Codes 4-8 are list columns, 9-13 are dict columns. Any other code on the
/// wire is rejected as `UnknownColumnType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Bool,
    String,
    Fix,
    StringList,
    BoolList,
    IntList,
    FloatList,
    FixList,
    StringStringDict,
    IntIntDict,
    IntStringDict,
    StringIntDict,
    IntFloatDict,
    Int,
    Float,
}

impl ColumnType {
    /// Convert a wire type code into a column type
    pub fn from_code(code: i32) -> Result<ColumnType> {
        match code {
            1 => Ok(ColumnType::Bool),
            2 => Ok(ColumnType::String),
            3 => Ok(ColumnType::Fix),
            4 => Ok(ColumnType::StringList),
            5 => Ok(ColumnType::BoolList),
            6 => Ok(ColumnType::IntList),
            7 => Ok(ColumnType::FloatList),
            8 => Ok(ColumnType::FixList),
            9 => Ok(ColumnType::StringStringDict),
            10 => Ok(ColumnType::IntIntDict),
            11 => Ok(ColumnType::IntStringDict),
            12 => Ok(ColumnType::StringIntDict),
            13 => Ok(ColumnType::IntFloatDict),
            14 => Ok(ColumnType::Int),
            15 => Ok(ColumnType::Float),
            _ => Err(Error::UnknownColumnType(code)),
        }
    }

    /// The wire type code for this column type
    pub fn code(&self) -> i32 {
        match self {
            ColumnType::Bool => 1,
            ColumnType::String => 2,
            ColumnType::Fix => 3,
            ColumnType::StringList => 4,
            ColumnType::BoolList => 5,
            ColumnType::IntList => 6,
            ColumnType::FloatList => 7,
            ColumnType::FixList => 8,
            ColumnType::StringStringDict => 9,
            ColumnType::IntIntDict => 10,
            ColumnType::IntStringDict => 11,
            ColumnType::StringIntDict => 12,
            ColumnType::IntFloatDict => 13,
            ColumnType::Int => 14,
            ColumnType::Float => 15,
        }
    }

    /// True for the five list column types (codes 4-8)
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ColumnType::StringList
                | ColumnType::BoolList
                | ColumnType::IntList
                | ColumnType::FloatList
                | ColumnType::FixList
        )
    }

    /// True for the five dict column types (codes 9-13)
    pub fn is_dict(&self) -> bool {
        matches!(
            self,
            ColumnType::StringStringDict
                | ColumnType::IntIntDict
                | ColumnType::IntStringDict
                | ColumnType::StringIntDict
                | ColumnType::IntFloatDict
        )
    }

    /// True for dict columns with integer keys (codes 10, 11, 13)
    ///
    /// These project to CSV as 1-indexed sparse lists.
    pub fn is_int_keyed_dict(&self) -> bool {
        matches!(
            self,
            ColumnType::IntIntDict | ColumnType::IntStringDict | ColumnType::IntFloatDict
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Bool => "bool",
            ColumnType::String => "string",
            ColumnType::Fix => "fix",
            ColumnType::StringList => "list<string>",
            ColumnType::BoolList => "list<bool>",
            ColumnType::IntList => "list<int>",
            ColumnType::FloatList => "list<float>",
            ColumnType::FixList => "list<fix>",
            ColumnType::StringStringDict => "dict<string,string>",
            ColumnType::IntIntDict => "dict<int,int>",
            ColumnType::IntStringDict => "dict<int,string>",
            ColumnType::StringIntDict => "dict<string,int>",
            ColumnType::IntFloatDict => "dict<int,float>",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
        };
        f.write_str(name)
    }
}

/// A dict key, either an integer or a string depending on the column type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DictKey {
    Int(i32),
    Str(String),
}

impl fmt::Display for DictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictKey::Int(n) => write!(f, "{}", n),
            DictKey::Str(s) => f.write_str(s),
        }
    }
}

/// A decoded cell value
///
/// Dict entries keep first-insertion order; a duplicate wire key overwrites
/// the value in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f64),
    Fix(Decimal),
    Str(String),
    List(Vec<Value>),
    Dict(Vec<(DictKey, Value)>),
}

impl Value {
    /// Look up a dict entry by key; `None` for missing keys or non-dicts
    pub fn get(&self, key: &DictKey) -> Option<&Value> {
        match self {
            Value::Dict(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_roundtrip() {
        for code in 1..=15 {
            let ty = ColumnType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
        }
    }

    #[test]
    fn test_from_code_unknown() {
        assert!(matches!(
            ColumnType::from_code(0),
            Err(Error::UnknownColumnType(0))
        ));
        assert!(matches!(
            ColumnType::from_code(16),
            Err(Error::UnknownColumnType(16))
        ));
        assert!(matches!(
            ColumnType::from_code(-3),
            Err(Error::UnknownColumnType(-3))
        ));
    }

    #[test]
    fn test_predicates() {
        assert!(ColumnType::IntList.is_list());
        assert!(!ColumnType::IntIntDict.is_list());
        for code in 9..=13 {
            assert!(ColumnType::from_code(code).unwrap().is_dict());
        }
        assert!(ColumnType::IntIntDict.is_int_keyed_dict());
        assert!(ColumnType::IntStringDict.is_int_keyed_dict());
        assert!(ColumnType::IntFloatDict.is_int_keyed_dict());
        assert!(!ColumnType::StringStringDict.is_int_keyed_dict());
        assert!(!ColumnType::StringIntDict.is_int_keyed_dict());
        assert!(!ColumnType::Int.is_dict());
    }

    #[test]
    fn test_dict_get() {
        let dict = Value::Dict(vec![
            (DictKey::Int(1), Value::Int(10)),
            (DictKey::Int(3), Value::Int(30)),
        ]);
        assert_eq!(dict.get(&DictKey::Int(1)), Some(&Value::Int(10)));
        assert_eq!(dict.get(&DictKey::Int(2)), None);
        assert_eq!(Value::Int(5).get(&DictKey::Int(1)), None);
    }
}
