//! Cypher built-in function names and their SQL renderings.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::pgsql::types::DataType;

pub const CYPHER_IDENTITY_FUNCTION: &str = "id";
pub const CYPHER_DATE_FUNCTION: &str = "date";
pub const CYPHER_TIME_FUNCTION: &str = "time";
pub const CYPHER_LOCAL_TIME_FUNCTION: &str = "localtime";
pub const CYPHER_DATETIME_FUNCTION: &str = "datetime";
pub const CYPHER_LOCAL_DATETIME_FUNCTION: &str = "localdatetime";
pub const CYPHER_DURATION_FUNCTION: &str = "duration";
pub const CYPHER_TO_LOWER_FUNCTION: &str = "toLower";
pub const CYPHER_NODE_LABELS_FUNCTION: &str = "labels";
pub const CYPHER_EDGE_TYPE_FUNCTION: &str = "type";
pub const CYPHER_COUNT_FUNCTION: &str = "count";

pub const PGSQL_ANY_FUNCTION: &str = "any";
pub const PGSQL_TO_JSONB_FUNCTION: &str = "to_jsonb";
pub const PGSQL_TO_LOWER_FUNCTION: &str = "lower";

/// SQL rendering of a temporal constructor: the cast applied to an argument,
/// and the current-time expression used when called without one.
pub struct TemporalRendering {
    pub cast: &'static str,
    pub no_argument: &'static str,
}

lazy_static! {
    /// Result types of the temporal constructors, consulted while unifying
    /// comparison operand types.
    pub static ref TEMPORAL_FUNCTION_TYPES: HashMap<&'static str, DataType> = {
        let mut types = HashMap::new();
        types.insert(CYPHER_DATE_FUNCTION, DataType::Date);
        types.insert(CYPHER_TIME_FUNCTION, DataType::TimeWithTimeZone);
        types.insert(CYPHER_LOCAL_TIME_FUNCTION, DataType::TimeWithoutTimeZone);
        types.insert(CYPHER_DATETIME_FUNCTION, DataType::TimestampWithTimeZone);
        types.insert(
            CYPHER_LOCAL_DATETIME_FUNCTION,
            DataType::TimestampWithoutTimeZone,
        );
        types.insert(CYPHER_DURATION_FUNCTION, DataType::Interval);
        types
    };

    pub static ref TEMPORAL_FUNCTION_RENDERING: HashMap<&'static str, TemporalRendering> = {
        let mut renderings = HashMap::new();
        renderings.insert(
            CYPHER_DATE_FUNCTION,
            TemporalRendering {
                cast: "::date",
                no_argument: "current_date",
            },
        );
        renderings.insert(
            CYPHER_TIME_FUNCTION,
            TemporalRendering {
                cast: "::time with time zone",
                no_argument: "current_time",
            },
        );
        renderings.insert(
            CYPHER_LOCAL_TIME_FUNCTION,
            TemporalRendering {
                cast: "::time without time zone",
                no_argument: "localtime",
            },
        );
        renderings.insert(
            CYPHER_DATETIME_FUNCTION,
            TemporalRendering {
                cast: "::timestamp with time zone",
                no_argument: "now()",
            },
        );
        renderings.insert(
            CYPHER_LOCAL_DATETIME_FUNCTION,
            TemporalRendering {
                cast: "::timestamp without time zone",
                no_argument: "localtimestamp",
            },
        );
        renderings
    };
}
