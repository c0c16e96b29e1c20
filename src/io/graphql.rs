//! GraphQL-over-HTTP envelope
//!
//! The places directory speaks the standard request/response envelope:
//! `{query, variables, operationName}` in, `{data, errors}` out. Only the
//! root field of the operation is resolved. Its inline argument list is
//! parsed here, with `$name` references looked up in `variables`; a root
//! field without an argument list takes `variables` as its arguments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Paths the envelope is accepted on
pub const GRAPHQL_PATHS: [&str; 2] = ["/graphql", "/"];

/// Query sent by the orchestrator for a zone's places
pub const PLACES_BY_ZONE: &str = "query PlacesByZone($zone: Zone) { places(zone: $zone) { id name type zone } }";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    pub fn new(query: &str, variables: Value) -> Self {
        Self { query: query.to_string(), variables: Some(variables), operation_name: None }
    }

    /// Root field the operation selects, or the operation name when the
    /// query text has no selection set
    pub fn root_field(&self) -> Option<&str> {
        root_field(&self.query).or(self.operation_name.as_deref())
    }

    /// Variables object, `{}` when absent
    pub fn variables(&self) -> Value {
        match &self.variables {
            Some(Value::Null) | None => Value::Object(Default::default()),
            Some(value) => value.clone(),
        }
    }

    /// Arguments of the root field as a JSON object
    pub fn arguments(&self) -> Result<Value, String> {
        let variables = self.variables();
        let empty = Map::new();
        let lookup = variables.as_object().unwrap_or(&empty);

        match root_arguments(&self.query, lookup)? {
            Some(arguments) => Ok(Value::Object(arguments)),
            None => Ok(variables),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    pub fn data(data: Value) -> Self {
        Self { data: Some(data), errors: Vec::new() }
    }

    /// Failed resolution; `data` carries the field set to null when known
    pub fn error(data: Option<Value>, message: impl Into<String>) -> Self {
        Self { data, errors: vec![GraphQlError { message: message.into() }] }
    }

    /// Messages of every error, joined
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(self.errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; "))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn split_name(text: &str) -> (&str, &str) {
    let end = text.find(|c: char| !is_name_char(c)).unwrap_or(text.len());
    text.split_at(end)
}

/// Root field name and the text right after it
fn root_selection(query: &str) -> Option<(&str, &str)> {
    let selection = query[query.find('{')? + 1..].trim_start();
    let (name, rest) = split_name(selection);
    if name.is_empty() {
        return None;
    }

    match rest.trim_start().strip_prefix(':') {
        Some(aliased) => {
            let (field, rest) = split_name(aliased.trim_start());
            Some((field, rest)).filter(|(field, _)| !field.is_empty())
        }
        None => Some((name, rest)),
    }
}

/// First field of the outermost selection set.
///
/// `query Q($z: Zone) { places(zone: $z) { id } }` -> `places`, and an
/// aliased field `{ nearby: places { id } }` resolves to `places`.
pub fn root_field(query: &str) -> Option<&str> {
    root_selection(query).map(|(field, _)| field)
}

/// Inline arguments of the root field, `None` when it has no argument list.
///
/// Literals map onto JSON: enum values become strings, so `places(zone: Lac)`
/// gives `{"zone": "Lac"}`. A `$name` reference must be defined in `variables`.
pub fn root_arguments(query: &str, variables: &Map<String, Value>) -> Result<Option<Map<String, Value>>, String> {
    let Some((_, rest)) = root_selection(query) else {
        return Ok(None);
    };
    let rest = rest.trim_start();
    if !rest.starts_with('(') {
        return Ok(None);
    }

    let mut parser = ArgumentParser { text: rest, pos: 1, variables };
    parser.arguments().map(Some)
}

struct ArgumentParser<'a> {
    text: &'a str,
    pos: usize,
    variables: &'a Map<String, Value>,
}

impl<'a> ArgumentParser<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Whitespace and commas are insignificant between tokens
    fn skip_ignored(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        self.pos += rest.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ignored();
        self.rest().chars().next()
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(format!("Syntax Error: Expected \"{expected}\", found \"{c}\".")),
            None => Err(format!("Syntax Error: Expected \"{expected}\", found <EOF>.")),
        }
    }

    fn name(&mut self) -> Result<&'a str, String> {
        self.skip_ignored();
        let (name, _) = split_name(self.rest());
        if name.is_empty() {
            return Err("Syntax Error: Expected Name.".to_string());
        }
        self.pos += name.len();
        Ok(name)
    }

    /// `name: value` pairs up to the closing parenthesis
    fn arguments(&mut self) -> Result<Map<String, Value>, String> {
        let mut arguments = Map::new();
        while self.peek() != Some(')') {
            let name = self.name()?.to_string();
            self.expect(':')?;
            let value = self.value()?;
            arguments.insert(name, value);
        }
        self.expect(')')?;
        Ok(arguments)
    }

    fn value(&mut self) -> Result<Value, String> {
        match self.peek() {
            Some('$') => {
                self.pos += 1;
                let name = self.name()?;
                self.variables
                    .get(name)
                    .cloned()
                    .ok_or_else(|| format!("Variable \"${name}\" is not defined."))
            }
            Some('"') => self.string().map(Value::String),
            Some('[') => {
                self.pos += 1;
                let mut items = Vec::new();
                while self.peek() != Some(']') {
                    if self.peek().is_none() {
                        return Err("Syntax Error: Expected \"]\", found <EOF>.".to_string());
                    }
                    items.push(self.value()?);
                }
                self.expect(']')?;
                Ok(Value::Array(items))
            }
            Some('{') => {
                self.pos += 1;
                let mut fields = Map::new();
                while self.peek() != Some('}') {
                    let name = self.name()?.to_string();
                    self.expect(':')?;
                    let value = self.value()?;
                    fields.insert(name, value);
                }
                self.expect('}')?;
                Ok(Value::Object(fields))
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(_) => match self.name()? {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                other => Ok(Value::String(other.to_string())),
            },
            None => Err("Syntax Error: Unexpected <EOF>.".to_string()),
        }
    }

    fn number(&mut self) -> Result<Value, String> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')))
            .unwrap_or(rest.len());
        let literal = &rest[..len];
        self.pos += len;

        if let Ok(int) = literal.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("Syntax Error: Invalid number \"{literal}\"."))
    }

    fn string(&mut self) -> Result<String, String> {
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, 'u')) => {
                        let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
                        let decoded = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32);
                        out.push(decoded.ok_or_else(|| format!("Syntax Error: Invalid Unicode escape \"\\u{hex}\"."))?);
                    }
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                other => out.push(other),
            }
        }
        Err("Syntax Error: Unterminated string.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_field_of_named_operation() {
        assert_eq!(root_field(PLACES_BY_ZONE), Some("places"));
        assert_eq!(root_field("mutation { deletePlace(id: $id) }"), Some("deletePlace"));
        assert_eq!(root_field("{place(id: \"1\") { name }}"), Some("place"));
    }

    #[test]
    fn test_root_field_follows_alias() {
        assert_eq!(root_field("{ nearby : places { id } }"), Some("places"));
    }

    #[test]
    fn test_root_field_missing() {
        assert_eq!(root_field(""), None);
        assert_eq!(root_field("query"), None);
        assert_eq!(root_field("{ }"), None);
    }

    fn vars(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_inline_enum_argument() {
        let args = root_arguments("query { places(zone: Lac) { id name } }", &Map::new()).unwrap();
        assert_eq!(args, Some(vars(json!({"zone": "Lac"}))));
    }

    #[test]
    fn test_inline_literals_and_variables() {
        let query = r#"mutation {
            createPlace(data: {name: "Caf\u00e9 \"Noir\"", type: cafe, zone: $zone}, tags: [1, -2.5, true, null]) { id }
        }"#;
        let args = root_arguments(query, &vars(json!({"zone": "Nord"}))).unwrap().unwrap();
        assert_eq!(args["data"], json!({"name": "Café \"Noir\"", "type": "cafe", "zone": "Nord"}));
        assert_eq!(args["tags"], json!([1, -2.5, true, null]));
    }

    #[test]
    fn test_aliased_field_arguments() {
        let args = root_arguments("{ lake: places(zone: Lac, limit: 2) { id } }", &Map::new()).unwrap();
        assert_eq!(args, Some(vars(json!({"zone": "Lac", "limit": 2}))));
    }

    #[test]
    fn test_no_argument_list() {
        assert_eq!(root_arguments("{ places { id } }", &Map::new()).unwrap(), None);
        assert_eq!(root_arguments("", &Map::new()).unwrap(), None);
    }

    #[test]
    fn test_argument_errors() {
        let err = root_arguments("{ place(id: $id) { id } }", &Map::new()).unwrap_err();
        assert_eq!(err, "Variable \"$id\" is not defined.");
        assert!(root_arguments("{ places(zone: ) { id } }", &Map::new()).is_err());
        assert!(root_arguments("{ places(zone: Lac", &Map::new()).is_err());
        assert!(root_arguments("{ place(id: \"1) { id } }", &Map::new()).is_err());
    }

    #[test]
    fn test_request_arguments_fall_back_to_variables() {
        let request = GraphQlRequest::new("{ places { id } }", json!({"zone": "Sud"}));
        assert_eq!(request.arguments().unwrap(), json!({"zone": "Sud"}));

        let request = GraphQlRequest::new(PLACES_BY_ZONE, json!({"zone": "Sud", "unused": 1}));
        assert_eq!(request.arguments().unwrap(), json!({"zone": "Sud"}));
    }

    #[test]
    fn test_request_falls_back_to_operation_name() {
        let request: GraphQlRequest =
            serde_json::from_value(json!({"query": "", "operationName": "places"})).unwrap();
        assert_eq!(request.root_field(), Some("places"));
        assert_eq!(request.variables(), json!({}));
    }

    #[test]
    fn test_response_omits_empty_errors() {
        let ok = serde_json::to_value(GraphQlResponse::data(json!({"places": []}))).unwrap();
        assert_eq!(ok, json!({"data": {"places": []}}));

        let failed = GraphQlResponse::error(Some(json!({"places": null})), "Invalid sort field");
        assert_eq!(failed.error_message().as_deref(), Some("Invalid sort field"));
        let body = serde_json::to_value(&failed).unwrap();
        assert_eq!(body["errors"][0]["message"], "Invalid sort field");
    }
}
