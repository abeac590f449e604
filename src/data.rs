//! Kameleoon data items and the context keys used to describe them.
use std::fmt;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// Context key selecting which variable of the variation is returned.
pub const VARIABLE_KEY: &str = "variableKey";

/// Data item submitted to the Kameleoon engine for a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Data {
    /// Custom data value(s).
    CustomData(CustomData),
    /// Goal conversion.
    Conversion(Conversion),
}

/// Custom data registered for a visitor, indexed by the custom data id configured in Kameleoon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomData {
    /// Index of the custom data in the Kameleoon back-office.
    pub id: i32,
    /// Values to record. May be empty.
    pub values: Vec<String>,
}

/// Goal conversion registered for a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// Goal id in the Kameleoon back-office.
    pub goal_id: i32,
    /// Revenue attached to the conversion, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
}

/// Context keys holding Kameleoon data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `"conversion"`, see [`ConversionType`].
    Conversion,
    /// `"customData"`, see [`CustomDataType`].
    CustomData,
}

impl DataType {
    /// Every data type, in lookup order.
    pub const ALL: [DataType; 2] = [DataType::Conversion, DataType::CustomData];

    /// Key of this entry in the evaluation context.
    pub const fn as_str(self) -> &'static str {
        match self {
            DataType::Conversion => "conversion",
            DataType::CustomData => "customData",
        }
    }

    /// Look up the data type registered under the context `key`.
    pub fn from_key(key: &str) -> Option<DataType> {
        DataType::ALL.into_iter().find(|t| t.as_str() == key)
    }
}

/// Fields of a `"customData"` structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomDataType {
    /// `"index"`: integer id of the custom data.
    Index,
    /// `"values"`: string or list of strings.
    Values,
}

impl CustomDataType {
    /// Key of this entry in the evaluation context.
    pub const fn as_str(self) -> &'static str {
        match self {
            CustomDataType::Index => "index",
            CustomDataType::Values => "values",
        }
    }
}

/// Fields of a `"conversion"` structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionType {
    /// `"goalId"`: integer id of the goal.
    GoalId,
    /// `"revenue"`: optional number.
    Revenue,
}

impl ConversionType {
    /// Key of this entry in the evaluation context.
    pub const fn as_str(self) -> &'static str {
        match self {
            ConversionType::GoalId => "goalId",
            ConversionType::Revenue => "revenue",
        }
    }
}

macro_rules! impl_display_as_str {
    ($($t:ty),*) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_display_as_str!(DataType, CustomDataType, ConversionType);
