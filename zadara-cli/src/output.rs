//! Human readable rendering of API responses.

use std::collections::BTreeSet;

use anyhow::Result;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::{Panel, Style};
use zadara_client::ApiResponse;

pub const EMPTY_RESULT: &str = "An empty result set was returned";
pub const SUCCESS: &str = "Command returned success";

/// Display arguments shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct DisplayOptions {
    pub json: bool,
    pub vertical: bool,
    pub fields: Option<Vec<String>>,
}

/// Renders a successful response the way the command asked for.
pub fn render(response: &ApiResponse, return_key: Option<&str>, display: &DisplayOptions) -> Result<String> {
    // `ReturnType::Json` responses come back exactly as the server sent them.
    if display.json {
        return Ok(response.to_json_string()?);
    }

    let Some(key) = return_key else {
        return Ok(SUCCESS.to_string());
    };

    let Some(data) = response.lookup(key) else {
        return Ok(EMPTY_RESULT.to_string());
    };

    let data = match &display.fields {
        Some(fields) => select_fields(data, fields),
        None => data.clone(),
    };

    Ok(match data {
        Value::Object(_) | Value::Array(_) => format_return(&data, display.vertical),
        other => cell(&other),
    })
}

/// Formats an object or a list of objects as ASCII tables.
///
/// Horizontal output is one table with sorted column names and a
/// `Count: N` title. Vertical output is one key/value table per record,
/// titled by its `display_name` or `name`.
pub fn format_return(data: &Value, vertical: bool) -> String {
    let records: Vec<_> = records(data)
        .into_iter()
        .filter(|record| !record.is_empty())
        .collect();
    if records.is_empty() {
        return EMPTY_RESULT.to_string();
    }

    if vertical {
        records
            .iter()
            .map(vertical_table)
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        horizontal_table(&records)
    }
}

fn horizontal_table(records: &[Map<String, Value>]) -> String {
    // Records may disagree on keys once fields are filtered out.
    let columns: BTreeSet<&String> = records.iter().flat_map(|record| record.keys()).collect();

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|column| column.to_string()));
    for record in records {
        builder.push_record(
            columns
                .iter()
                .map(|column| record.get(column.as_str()).map(cell).unwrap_or_default()),
        );
    }

    let mut table = builder.build();
    table
        .with(Style::ascii())
        .with(Panel::header(format!("Count: {}", records.len())));
    table.to_string()
}

fn vertical_table(record: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = record.keys().collect();
    keys.sort();

    let mut builder = Builder::default();
    for key in keys {
        builder.push_record([key.clone(), cell(&record[key.as_str()])]);
    }

    let mut table = builder.build();
    table.with(Style::ascii());

    let title = record
        .get("display_name")
        .or_else(|| record.get("name"))
        .map(cell);
    if let Some(title) = title {
        table.with(Panel::header(title));
    }
    table.to_string()
}

fn records(data: &Value) -> Vec<Map<String, Value>> {
    match data {
        Value::Array(items) => items.iter().map(as_record).collect(),
        other => vec![as_record(other)],
    }
}

fn as_record(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other.clone());
            map
        }
    }
}

fn select_fields(data: &Value, fields: &[String]) -> Value {
    let keep = |map: &Map<String, Value>| -> Value {
        Value::Object(
            map.iter()
                .filter(|(key, _)| fields.iter().any(|field| field == *key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    };

    match data {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => keep(map),
                    other => other.clone(),
                })
                .collect(),
        ),
        Value::Object(map) => keep(map),
        other => other.clone(),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(value: Value) -> ApiResponse {
        match value {
            Value::Object(map) => ApiResponse::Parsed(map),
            _ => panic!("test responses are objects"),
        }
    }

    #[test]
    fn test_horizontal_table_has_count_and_sorted_columns() {
        let data = json!([
            {"name": "volume-00000001", "capacity": 10},
            {"name": "volume-00000002", "capacity": 20}
        ]);

        let table = format_return(&data, false);
        assert!(table.contains("Count: 2"));
        let capacity = table.find("capacity").unwrap();
        let name = table.find("name").unwrap();
        assert!(capacity < name);
        assert!(table.contains("volume-00000002"));
    }

    #[test]
    fn test_vertical_tables_are_titled() {
        let data = json!([
            {"name": "pool-00000001", "display_name": "fast"},
            {"name": "pool-00000002"}
        ]);

        let tables = format_return(&data, true);
        assert!(tables.contains("fast"));
        assert!(tables.contains("pool-00000002"));
        assert!(!tables.contains("Count:"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_return(&json!([]), false), EMPTY_RESULT);
        assert_eq!(format_return(&json!([]), true), EMPTY_RESULT);
    }

    #[test]
    fn test_render_missing_key_is_empty_result() {
        let response = parsed(json!({"response": {"status": 0}}));
        let output = render(&response, Some("disks"), &DisplayOptions::default()).unwrap();
        assert_eq!(output, EMPTY_RESULT);
    }

    #[test]
    fn test_render_without_return_key_is_success() {
        let response = parsed(json!({"response": {"status": 0}}));
        let output = render(&response, None, &DisplayOptions::default()).unwrap();
        assert_eq!(output, SUCCESS);
    }

    #[test]
    fn test_render_json_is_printed_verbatim() {
        let body = r#"{"response":{"status":0,"disks":[]}}"#;
        let response = ApiResponse::Json(body.to_string());
        let display = DisplayOptions {
            json: true,
            ..Default::default()
        };
        let output = render(&response, Some("disks"), &display).unwrap();
        assert_eq!(output, body);
    }

    #[test]
    fn test_render_filters_fields() {
        let response = parsed(json!({
            "response": {
                "status": 0,
                "disks": [{"name": "volume-00000001", "status": "Available", "capacity": 100}]
            }
        }));
        let display = DisplayOptions {
            fields: Some(vec!["name".to_string(), "status".to_string()]),
            ..Default::default()
        };
        let output = render(&response, Some("disks"), &display).unwrap();
        assert!(output.contains("Available"));
        assert!(!output.contains("capacity"));
    }

    #[test]
    fn test_render_unknown_field_is_empty_result() {
        let response = parsed(json!({
            "response": {"status": 0, "disks": [{"name": "a"}, {"name": "b"}]}
        }));
        for vertical in [false, true] {
            let display = DisplayOptions {
                vertical,
                fields: Some(vec!["bogus".to_string()]),
                ..Default::default()
            };
            let output = render(&response, Some("disks"), &display).unwrap();
            assert_eq!(output, EMPTY_RESULT);
        }
    }

    #[test]
    fn test_render_empty_object_is_empty_result() {
        let response = parsed(json!({"response": {"status": 0, "pool": {}}}));
        let output = render(&response, Some("pool"), &DisplayOptions::default()).unwrap();
        assert_eq!(output, EMPTY_RESULT);
    }

    #[test]
    fn test_columns_come_from_every_record() {
        let data = json!([{}, {"name": "disk-1"}, {"capacity": 5}]);
        let table = format_return(&data, false);
        assert!(table.contains("Count: 2"));
        assert!(table.contains("capacity"));
        assert!(table.contains("disk-1"));
    }

    #[test]
    fn test_render_scalar_value() {
        let response = parsed(json!({"response": {"status": 0, "pool_name": "pool-00000003"}}));
        let output = render(&response, Some("pool_name"), &DisplayOptions::default()).unwrap();
        assert_eq!(output, "pool-00000003");
    }
}
