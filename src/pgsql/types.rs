use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::cypher::expression::{Expression, Literal};
use crate::pgsql::errors::TranslateError;

/// Graph identifier as stored in the node/edge tables.
pub type GraphId = u32;

/// The SQL data type assigned to every variable, parameter, and property
/// lookup before emission. `Display` renders the PostgreSQL type name used
/// in casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Unknown,
    Null,
    Node,
    Edge,
    Path,
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Text,
    JsonB,
    Date,
    TimeWithTimeZone,
    TimeWithoutTimeZone,
    TimestampWithTimeZone,
    TimestampWithoutTimeZone,
    Interval,
    Int2Array,
    Int4Array,
    Int8Array,
    Float4Array,
    Float8Array,
    TextArray,
}

impl DataType {
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            DataType::Int2Array
                | DataType::Int4Array
                | DataType::Int8Array
                | DataType::Float4Array
                | DataType::Float8Array
                | DataType::TextArray
        )
    }

    pub fn array_base_type(&self) -> Result<DataType, TranslateError> {
        match self {
            DataType::Int2Array => Ok(DataType::Int2),
            DataType::Int4Array => Ok(DataType::Int4),
            DataType::Int8Array => Ok(DataType::Int8),
            DataType::Float4Array => Ok(DataType::Float4),
            DataType::Float8Array => Ok(DataType::Float8),
            DataType::TextArray => Ok(DataType::Text),
            other => Err(TranslateError::NotAnArrayType(*other)),
        }
    }

    /// The array type whose elements have this type, where one exists.
    pub fn array_of(&self) -> Option<DataType> {
        match self {
            DataType::Int2 => Some(DataType::Int2Array),
            DataType::Int4 => Some(DataType::Int4Array),
            DataType::Int8 => Some(DataType::Int8Array),
            DataType::Float4 => Some(DataType::Float4Array),
            DataType::Float8 => Some(DataType::Float8Array),
            DataType::Text => Some(DataType::TextArray),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Unknown => "UNKNOWN",
            DataType::Null => "NULL",
            DataType::Node => "nodeComposite",
            DataType::Edge => "edgeComposite",
            DataType::Path => "pathComposite",
            DataType::Bool => "bool",
            DataType::Int2 => "int2",
            DataType::Int4 => "int4",
            DataType::Int8 => "int8",
            DataType::Float4 => "float4",
            DataType::Float8 => "float8",
            DataType::Text => "text",
            DataType::JsonB => "jsonb",
            DataType::Date => "date",
            DataType::TimeWithTimeZone => "time with time zone",
            DataType::TimeWithoutTimeZone => "time without time zone",
            DataType::TimestampWithTimeZone => "timestamp with time zone",
            DataType::TimestampWithoutTimeZone => "timestamp without time zone",
            DataType::Interval => "interval",
            DataType::Int2Array => "int2[]",
            DataType::Int4Array => "int4[]",
            DataType::Int8Array => "int8[]",
            DataType::Float4Array => "float4[]",
            DataType::Float8Array => "float8[]",
            DataType::TextArray => "text[]",
        };
        f.write_str(name)
    }
}

/// Native values carried by literals, parameters, and mutation payloads.
/// Serializes untagged so a parameter table renders as plain JSON values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CypherValue {
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Id(GraphId),
    Date(NaiveDate),
    LocalTime(NaiveTime),
    LocalDateTime(NaiveDateTime),
    DateTime(DateTime<Utc>),
    Json(JsonValue),
    Int16Array(Vec<i16>),
    Int32Array(Vec<i32>),
    Int64Array(Vec<i64>),
    Float32Array(Vec<f32>),
    Float64Array(Vec<f64>),
    TextArray(Vec<String>),
    IdArray(Vec<GraphId>),
}

impl CypherValue {
    pub fn sql_type(&self) -> DataType {
        match self {
            CypherValue::Null => DataType::Null,
            CypherValue::Bool(_) => DataType::Bool,
            CypherValue::Int8(_) | CypherValue::UInt8(_) => DataType::Int2,
            CypherValue::Int16(_) | CypherValue::UInt16(_) => DataType::Int2,
            CypherValue::Int32(_) | CypherValue::UInt32(_) | CypherValue::Id(_) => DataType::Int4,
            CypherValue::Int64(_) | CypherValue::UInt64(_) => DataType::Int8,
            CypherValue::Float32(_) => DataType::Float4,
            CypherValue::Float64(_) => DataType::Float8,
            CypherValue::Text(_) => DataType::Text,
            CypherValue::Date(_) => DataType::Date,
            CypherValue::LocalTime(_) => DataType::TimeWithoutTimeZone,
            CypherValue::LocalDateTime(_) => DataType::TimestampWithoutTimeZone,
            CypherValue::DateTime(_) => DataType::TimestampWithTimeZone,
            CypherValue::Json(_) => DataType::JsonB,
            CypherValue::Int16Array(_) => DataType::Int2Array,
            CypherValue::Int32Array(_) | CypherValue::IdArray(_) => DataType::Int4Array,
            CypherValue::Int64Array(_) => DataType::Int8Array,
            CypherValue::Float32Array(_) => DataType::Float4Array,
            CypherValue::Float64Array(_) => DataType::Float8Array,
            CypherValue::TextArray(_) => DataType::TextArray,
        }
    }

    /// Exact SQL text rendering for scalar values. String values pass through
    /// as-is: the parser delivers them already wrapped in single quotes.
    pub fn write_sql(&self, output: &mut String) -> Result<(), TranslateError> {
        match self {
            CypherValue::Null => output.push_str("null"),
            CypherValue::Bool(value) => output.push_str(if *value { "true" } else { "false" }),
            CypherValue::Int8(value) => output.push_str(&value.to_string()),
            CypherValue::Int16(value) => output.push_str(&value.to_string()),
            CypherValue::Int32(value) => output.push_str(&value.to_string()),
            CypherValue::Int64(value) => output.push_str(&value.to_string()),
            CypherValue::UInt8(value) => output.push_str(&value.to_string()),
            CypherValue::UInt16(value) => output.push_str(&value.to_string()),
            CypherValue::UInt32(value) => output.push_str(&value.to_string()),
            CypherValue::UInt64(value) => output.push_str(&value.to_string()),
            CypherValue::Float32(value) => output.push_str(&value.to_string()),
            CypherValue::Float64(value) => output.push_str(&value.to_string()),
            CypherValue::Text(value) => output.push_str(value),
            CypherValue::Id(value) => output.push_str(&value.to_string()),
            _ => return Err(TranslateError::UnsupportedLiteral),
        }

        Ok(())
    }

    /// JSON form for JSONB mutation payloads.
    pub fn to_json(&self) -> Result<JsonValue, TranslateError> {
        let value = match self {
            CypherValue::Null => JsonValue::Null,
            CypherValue::Bool(value) => JsonValue::from(*value),
            CypherValue::Int8(value) => JsonValue::from(*value),
            CypherValue::Int16(value) => JsonValue::from(*value),
            CypherValue::Int32(value) => JsonValue::from(*value),
            CypherValue::Int64(value) => JsonValue::from(*value),
            CypherValue::UInt8(value) => JsonValue::from(*value),
            CypherValue::UInt16(value) => JsonValue::from(*value),
            CypherValue::UInt32(value) => JsonValue::from(*value),
            CypherValue::UInt64(value) => JsonValue::from(*value),
            CypherValue::Float32(value) => serde_json::Number::from_f64(f64::from(*value))
                .map(JsonValue::Number)
                .ok_or(TranslateError::UnsupportedLiteral)?,
            CypherValue::Float64(value) => serde_json::Number::from_f64(*value)
                .map(JsonValue::Number)
                .ok_or(TranslateError::UnsupportedLiteral)?,
            CypherValue::Text(value) => JsonValue::from(value.clone()),
            CypherValue::Id(value) => JsonValue::from(*value),
            CypherValue::Date(value) => JsonValue::from(value.to_string()),
            CypherValue::LocalTime(value) => JsonValue::from(value.to_string()),
            CypherValue::LocalDateTime(value) => JsonValue::from(value.to_string()),
            CypherValue::DateTime(value) => JsonValue::from(value.to_rfc3339()),
            CypherValue::Json(value) => value.clone(),
            CypherValue::Int16Array(values) => JsonValue::from(values.clone()),
            CypherValue::Int32Array(values) => JsonValue::from(values.clone()),
            CypherValue::Int64Array(values) => JsonValue::from(values.clone()),
            CypherValue::Float32Array(values) => JsonValue::from(values.clone()),
            CypherValue::Float64Array(values) => JsonValue::from(values.clone()),
            CypherValue::TextArray(values) => JsonValue::from(values.clone()),
            CypherValue::IdArray(values) => JsonValue::from(values.clone()),
        };

        Ok(value)
    }
}

/// Infer the SQL type of a literal. List literals must hold elements of a
/// single scalar type with an array form; a list with no typed elements
/// stays `Unknown`.
pub fn literal_sql_type(literal: &Literal) -> Result<DataType, TranslateError> {
    match literal {
        Literal::Scalar(value) => Ok(value.sql_type()),
        Literal::List(items) => {
            let mut element_type: Option<DataType> = None;

            for item in items {
                let item_type = match item {
                    Expression::Literal(Literal::Scalar(value)) => value.sql_type(),
                    Expression::AnnotatedLiteral(annotated) => annotated.sql_type,
                    _ => continue,
                };

                match element_type {
                    None => element_type = Some(item_type),
                    Some(existing) if existing == item_type => {}
                    Some(_) => return Err(TranslateError::MixedListTypes),
                }
            }

            match element_type {
                Some(base) => base
                    .array_of()
                    .ok_or(TranslateError::NoArrayForm(base)),
                None => Ok(DataType::Unknown),
            }
        }
        Literal::Map(_) => Err(TranslateError::UnsupportedLiteral),
    }
}

/// Infer the SQL type of a literal or parameter expression, annotated or not.
pub fn expression_sql_type(expression: &Expression) -> Result<DataType, TranslateError> {
    match expression {
        Expression::Parameter(parameter) => Ok(parameter.value.sql_type()),
        Expression::Literal(literal) => literal_sql_type(literal),
        Expression::AnnotatedParameter(parameter) => Ok(parameter.sql_type),
        Expression::AnnotatedLiteral(literal) => Ok(literal.sql_type),
        other => Err(TranslateError::UnexpectedExpression {
            context: "SQL type annotation".to_string(),
            found: other.kind_name().to_string(),
        }),
    }
}
