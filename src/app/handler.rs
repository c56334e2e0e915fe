use crate::core::analyzer::SkillAnalyzer;
use crate::domain::model::CourseQuery;
use crate::domain::ports::RegistrySource;
use crate::utils::error::{Result, SkillError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API-gateway style response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: Value,
}

impl HandlerResponse {
    fn ok(body: Value) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    fn failure(status_code: u16, message: String) -> Self {
        Self {
            status_code,
            body: Value::String(message),
        }
    }
}

fn invalid(message: impl Into<String>) -> SkillError {
    SkillError::InvalidRequest {
        message: message.into(),
    }
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// Extracts the course queries from an invocation event.
///
/// `body` may arrive as a JSON-encoded string or as an already parsed object.
pub fn parse_request(event: &Value) -> Result<Vec<CourseQuery>> {
    let raw = event.get("body").unwrap_or(&Value::Null);
    if is_empty_body(raw) {
        return Err(invalid("body cannot be empty."));
    }

    let body = match raw {
        Value::String(text) => serde_json::from_str::<Value>(text)
            .map_err(|e| invalid(format!("body is not valid JSON: {}", e)))?,
        other => other.clone(),
    };
    if is_empty_body(&body) {
        return Err(invalid("body cannot be empty."));
    }

    let courses = body
        .get("coursesList")
        .ok_or_else(|| invalid("coursesList and source are required."))?;
    parse_queries(courses)
}

/// Accepts `{"coursesList": [...]}` or a bare list of courses.
pub fn parse_courses_list(document: &Value) -> Result<Vec<CourseQuery>> {
    match document.get("coursesList") {
        Some(courses) => parse_queries(courses),
        None => parse_queries(document),
    }
}

fn parse_queries(courses: &Value) -> Result<Vec<CourseQuery>> {
    Vec::<CourseQuery>::deserialize(courses).map_err(|e| {
        invalid(format!(
            "coursesList must be a list of [title, code] pairs: {}",
            e
        ))
    })
}

/// Runs one invocation and wraps the outcome in a status envelope.
pub async fn handle<R: RegistrySource>(
    analyzer: &SkillAnalyzer<R>,
    event: &Value,
) -> HandlerResponse {
    let queries = match parse_request(event) {
        Ok(queries) => queries,
        Err(e) => {
            tracing::warn!("Rejected request: {}", e);
            return HandlerResponse::failure(400, e.to_string());
        }
    };
    tracing::info!("Received {} course queries", queries.len());

    match analyzer.run(&queries).await {
        Ok(profile) => match serde_json::to_value(&profile) {
            Ok(body) => HandlerResponse::ok(body),
            Err(e) => {
                tracing::error!("Failed to serialize skill profile: {}", e);
                HandlerResponse::failure(500, SkillError::from(e).user_friendly_message())
            }
        },
        Err(e) => {
            tracing::error!(
                "❌ Skill analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            HandlerResponse::failure(500, e.user_friendly_message())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_as_string_or_object() {
        let as_string = json!({"body": r#"{"coursesList": [["Intro", "CS101"]]}"#});
        let as_object = json!({"body": {"coursesList": [{"title": "Intro", "code": "CS101"}]}});

        let expected = vec![CourseQuery::new("Intro", "CS101")];
        assert_eq!(parse_request(&as_string).unwrap(), expected);
        assert_eq!(parse_request(&as_object).unwrap(), expected);
    }

    #[test]
    fn test_empty_body_rejected() {
        for event in [
            json!({}),
            json!({"body": null}),
            json!({"body": ""}),
            json!({"body": {}}),
            json!({"body": "{}"}),
        ] {
            let err = parse_request(&event).unwrap_err();
            assert_eq!(err.to_string(), "Invalid input: body cannot be empty.");
        }
    }

    #[test]
    fn test_missing_courses_list_rejected() {
        let err = parse_request(&json!({"body": {"source": "transcript"}})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: coursesList and source are required."
        );
    }

    #[test]
    fn test_malformed_entries_rejected() {
        let err = parse_request(&json!({"body": {"coursesList": [["only-title"]]}})).unwrap_err();
        assert!(matches!(err, SkillError::InvalidRequest { .. }));

        let err = parse_request(&json!({"body": "{not json"})).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_empty_courses_list_is_accepted() {
        let queries = parse_request(&json!({"body": {"coursesList": []}})).unwrap();
        assert!(queries.is_empty());
    }

    #[test]
    fn test_parse_courses_list_accepts_bare_list() {
        let queries = parse_courses_list(&json!([["Intro", "CS101"], ["Calc", "MATH1"]])).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].code, "MATH1");
    }
}
