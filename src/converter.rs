//! Conversion of OpenFeature data to Kameleoon data and back.
use crate::{
    data::{ConversionType, CustomDataType, DataType},
    Conversion, CustomData, Data, EvaluationContext, Structure, Value,
};

/// Convert the evaluation context into Kameleoon data items.
///
/// Only fields under the `"conversion"` and `"customData"` keys are converted. A field holding a
/// list produces one item per structure in it, in list order. Missing or malformed sub-fields fall
/// back to defaults; the conversion never fails.
pub fn to_kameleoon(context: Option<&EvaluationContext>) -> Vec<Data> {
    let Some(context) = context.filter(|context| !context.is_empty()) else {
        return Vec::new();
    };

    let mut data = Vec::with_capacity(context.fields.len());
    for (key, value) in context.iter() {
        let Some(data_type) = DataType::from_key(key) else {
            continue;
        };

        let structures: Vec<&Structure> = match value {
            Value::Structure(structure) => vec![structure],
            Value::List(list) => list.iter().filter_map(Value::as_structure).collect(),
            _ => Vec::new(),
        };
        if structures.is_empty() {
            log::debug!(target: "kameleoon",
                        key:display = data_type;
                        "context field holds no structures, skipping");
        }

        data.extend(
            structures
                .into_iter()
                .map(|structure| make_data(data_type, structure)),
        );
    }
    data
}

/// Convert a value returned by Kameleoon into an OpenFeature [`Value`].
///
/// [`Value`]s pass through unchanged, primitives and [`VariableValue`](crate::VariableValue)s map
/// to the matching kind, JSON is rebuilt recursively and `None` becomes [`Value::Null`].
///
/// # Panics
///
/// Panics if a JSON number has neither an integer nor a floating-point representation. The engine
/// never produces such numbers, so hitting this means the engine and the provider disagree on the
/// wire format.
pub fn to_open_feature(value: impl Into<Value>) -> Value {
    value.into()
}

fn make_data(data_type: DataType, structure: &Structure) -> Data {
    match data_type {
        DataType::CustomData => make_custom_data(structure).into(),
        DataType::Conversion => make_conversion(structure).into(),
    }
}

fn make_custom_data(structure: &Structure) -> CustomData {
    let values = match structure.get(CustomDataType::Values.as_str()) {
        Value::List(list) => list
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    };

    CustomData {
        id: get_i32(structure, CustomDataType::Index.as_str()),
        values,
    }
}

fn make_conversion(structure: &Structure) -> Conversion {
    Conversion {
        goal_id: get_i32(structure, ConversionType::GoalId.as_str()),
        revenue: structure.get(ConversionType::Revenue.as_str()).as_f64(),
    }
}

/// Read an integer field, defaulting to 0 if it is missing, not an integer or out of `i32` range.
fn get_i32(structure: &Structure, key: &str) -> i32 {
    structure
        .get(key)
        .as_i64()
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(0)
}
