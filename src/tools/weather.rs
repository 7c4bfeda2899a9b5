//! Weather lookup tool.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;

/// Get weather for a given city. Always sunny.
pub struct GetWeather;

#[async_trait]
impl Tool for GetWeather {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get weather for a given city."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "Name of the city"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let city = args["city"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'city' argument"))?;

        tracing::info!("Getting weather for city: {}", city);

        Ok(format!("It's always sunny in {}!", city))
    }
}
