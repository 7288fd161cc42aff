//! Functions the multimodal relay executes locally when the upstream model
//! asks for them.
//!
//! Expressions are evaluated with `jexl_eval` after a character whitelist
//! restricts them to arithmetic; no context variables are exposed.

use serde_json::{Value, json};

pub const GET_WEATHER: &str = "get_weather";
pub const CALCULATE: &str = "calculate";

/// Declarations attached to upstream requests when function calling is on.
pub fn declarations() -> Value {
    json!([
        {
            "name": GET_WEATHER,
            "description": "Get the current weather for a location",
            "parameters": {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City name, e.g. San Francisco"
                    },
                    "unit": {
                        "type": "string",
                        "enum": ["celsius", "fahrenheit"]
                    }
                },
                "required": ["location"]
            }
        },
        {
            "name": CALCULATE,
            "description": "Evaluate an arithmetic expression",
            "parameters": {
                "type": "object",
                "properties": {
                    "expression": {
                        "type": "string",
                        "description": "Arithmetic expression, e.g. (2 + 3) * 4"
                    }
                },
                "required": ["expression"]
            }
        }
    ])
}

/// Run a named function. Unknown names and bad arguments produce an
/// `{"error": ...}` object rather than failing the request.
pub fn execute(name: &str, args: &Value) -> Value {
    match name {
        GET_WEATHER => weather(args),
        CALCULATE => calculate(args),
        other => {
            tracing::warn!(function = other, "Upstream requested an unknown function");
            json!({ "error": "Unknown function" })
        }
    }
}

/// Canned weather report.
fn weather(args: &Value) -> Value {
    let location = args.get("location").cloned().unwrap_or(Value::Null);
    let unit = args
        .get("unit")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .unwrap_or("fahrenheit");
    json!({
        "location": location,
        "temperature": 72,
        "unit": unit,
        "conditions": "Partly cloudy",
        "humidity": 65,
    })
}

fn calculate(args: &Value) -> Value {
    let Some(expression) = args.get("expression").and_then(Value::as_str) else {
        return json!({ "error": "Invalid expression" });
    };
    match evaluate_arithmetic(expression) {
        Some(result) => json!({ "expression": expression, "result": result }),
        None => json!({ "error": "Invalid expression" }),
    }
}

fn is_arithmetic(expression: &str) -> bool {
    !expression.trim().is_empty()
        && expression
            .chars()
            .all(|c| c.is_ascii_digit() || " \t.+-*/%()".contains(c))
}

fn evaluate_arithmetic(expression: &str) -> Option<f64> {
    if !is_arithmetic(expression) {
        return None;
    }
    let value = jexl_eval::Evaluator::new()
        .eval_in_context(expression, &json!({}))
        .map_err(|e| tracing::debug!(%expression, error = %e, "Expression evaluation failed"))
        .ok()?;
    value.as_f64().filter(|n| n.is_finite())
}
