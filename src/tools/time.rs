//! Time adapter: local time, or zoned time for an IANA timezone name

use async_trait::async_trait;
use chrono::{Local, Utc};
use chrono_tz::Tz;

use super::{FailureKind, Tool, ToolDescriptor, ToolReply};

/// Time adapter exposed to the session as `get_time_smart`
#[derive(Default)]
pub struct TimeTool;

impl TimeTool {
    /// Create the adapter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn current(location: Option<&str>) -> ToolReply {
        match location {
            None => {
                let now = Local::now();
                let formatted = now.format("%Y-%m-%d %H:%M:%S %:z");
                ToolReply::Success(format!("Current local time: {formatted}"))
            }
            Some(zone_name) => match zone_name.parse::<Tz>() {
                Ok(zone) => {
                    let now = Utc::now().with_timezone(&zone);
                    let formatted = now.format("%Y-%m-%d %H:%M:%S %Z");
                    ToolReply::Success(format!("Current time in {zone_name}: {formatted}"))
                }
                Err(e) => {
                    tracing::error!(zone = zone_name, error = %e, "invalid timezone requested");
                    ToolReply::failure(
                        FailureKind::InvalidInput,
                        format!(
                            "Invalid timezone: {zone_name}. Please use IANA format like 'America/New_York' or 'Europe/London'."
                        ),
                    )
                }
            },
        }
    }
}

#[async_trait]
impl Tool for TimeTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_time_smart",
            description: "Get current local time, or the time in a specific IANA timezone",
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "Optional IANA timezone, e.g. 'America/New_York' or 'Europe/London'"
                    }
                }
            }),
        }
    }

    async fn invoke(&self, args: serde_json::Value) -> ToolReply {
        let location = args.get("location").and_then(|v| v.as_str());
        Self::current(location)
    }
}
