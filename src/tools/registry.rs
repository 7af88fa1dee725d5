//! Static tool catalog advertised by `tools/list`.

use serde::Serialize;
use serde_json::{json, Value};

/// Every tool this server knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    CurrentTime,
    ConvertTime,
    RelativeTime,
    DaysInMonth,
    GetTimestamp,
    GetWeekYear,
    Search,
    Fetch,
}

impl ToolName {
    /// Catalog order; clients may rely on it.
    pub const ALL: [ToolName; 8] = [
        ToolName::CurrentTime,
        ToolName::ConvertTime,
        ToolName::RelativeTime,
        ToolName::DaysInMonth,
        ToolName::GetTimestamp,
        ToolName::GetWeekYear,
        ToolName::Search,
        ToolName::Fetch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::CurrentTime => "current_time",
            ToolName::ConvertTime => "convert_time",
            ToolName::RelativeTime => "relative_time",
            ToolName::DaysInMonth => "days_in_month",
            ToolName::GetTimestamp => "get_timestamp",
            ToolName::GetWeekYear => "get_week_year",
            ToolName::Search => "search",
            ToolName::Fetch => "fetch",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

/// A tool as advertised to clients. The schema is documentation only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

const SEARCH_DESCRIPTION: &str = "Search comprehensive time-related knowledge including historical events, calendar systems, timekeeping technologies, and scientific developments.

Usage Guidelines:
• Use specific keywords related to time concepts (e.g., \"atomic clock\", \"calendar reform\", \"time zone history\")
• Search by historical periods (e.g., \"ancient timekeeping\", \"medieval calendar\")
• Look for scientific developments (e.g., \"UTC development\", \"leap second\")
• Find cultural time practices (e.g., \"Mayan calendar\", \"lunar calendar\")

Examples:
• \"atomic clock invention\" - Find the history of atomic timekeeping
• \"gregorian calendar reform\" - Learn about calendar system changes
• \"sundial ancient civilizations\" - Discover early timekeeping methods
• \"time zone standardization\" - Research time zone development
• \"leap year calculation\" - Understand leap year history and methods

The search covers topics from ancient civilizations to modern scientific timekeeping.";

fn describe(tool: ToolName) -> ToolDescriptor {
    let (title, description, input_schema) = match tool {
        ToolName::CurrentTime => (
            "Current Time",
            "Get the current time now. Perfect for questions like \"What time is it?\" or \"What time is it in Tokyo?\" Supports any timezone and custom formatting.",
            json!({
                "type": "object",
                "properties": {
                    "format": {
                        "type": "string",
                        "description": "How to format the time (default: YYYY-MM-DD HH:mm:ss). Examples: 'h:mm A' for 12-hour, 'HH:mm' for 24-hour",
                        "default": "YYYY-MM-DD HH:mm:ss"
                    },
                    "timezone": {
                        "type": "string",
                        "description": "IANA timezone name like 'America/New_York', 'Europe/London', 'Asia/Tokyo'. If not specified, uses the server's default timezone."
                    }
                }
            }),
        ),
        ToolName::ConvertTime => (
            "Convert Time Between Timezones",
            "Convert any time from one timezone to another. Great for scheduling across timezones or travel planning.",
            json!({
                "type": "object",
                "properties": {
                    "sourceTimezone": {
                        "type": "string",
                        "description": "Source timezone (e.g., 'America/Los_Angeles', 'UTC', 'Europe/Paris')"
                    },
                    "targetTimezone": {
                        "type": "string",
                        "description": "Target timezone (e.g., 'Asia/Tokyo', 'America/New_York')"
                    },
                    "time": {
                        "type": "string",
                        "description": "Time to convert in format YYYY-MM-DD HH:mm:ss (e.g., '2025-06-22 15:30:00')"
                    }
                },
                "required": ["sourceTimezone", "targetTimezone", "time"]
            }),
        ),
        ToolName::RelativeTime => (
            "Time Ago/Until",
            "Calculate how long ago something happened or how long until a future event. Examples: \"How long ago was 2020-01-01?\" or \"How long until Christmas?\"",
            json!({
                "type": "object",
                "properties": {
                    "time": {
                        "type": "string",
                        "description": "Date/time to compare (format: YYYY-MM-DD HH:mm:ss or YYYY-MM-DD)"
                    }
                },
                "required": ["time"]
            }),
        ),
        ToolName::DaysInMonth => (
            "Days in Month",
            "Find out how many days are in any month and year. Accounts for leap years automatically.",
            json!({
                "type": "object",
                "properties": {
                    "date": {
                        "type": "string",
                        "description": "Date in format YYYY-MM-DD (e.g., '2024-02-01'). If not provided, uses current month."
                    }
                }
            }),
        ),
        ToolName::GetTimestamp => (
            "Unix Timestamp",
            "Convert a date/time to Unix timestamp (milliseconds since 1970). Useful for programming and API work.",
            json!({
                "type": "object",
                "properties": {
                    "time": {
                        "type": "string",
                        "description": "Date/time to convert (format: YYYY-MM-DD HH:mm:ss). If not provided, uses current time."
                    }
                }
            }),
        ),
        ToolName::GetWeekYear => (
            "Week Number",
            "Get the week number of the year for any date. Returns both standard and ISO week numbers.",
            json!({
                "type": "object",
                "properties": {
                    "date": {
                        "type": "string",
                        "description": "Date to check (format: YYYY-MM-DD). If not provided, uses today."
                    }
                }
            }),
        ),
        ToolName::Search => (
            "Search Time Knowledge",
            SEARCH_DESCRIPTION,
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query for time-related knowledge. Use specific keywords about time concepts, historical periods, technologies, or cultural practices."
                    }
                },
                "required": ["query"]
            }),
        ),
        ToolName::Fetch => (
            "Get Detailed Time Knowledge",
            "Retrieve complete details about a specific time-related topic by its ID. Use this after searching to get full information with sources and references.",
            json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "ID of the knowledge item (obtained from search results)"
                    }
                },
                "required": ["id"]
            }),
        ),
    };

    ToolDescriptor {
        name: tool.as_str(),
        title,
        description,
        input_schema,
    }
}

/// Immutable, ordered tool catalog.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: ToolName::ALL.into_iter().map(describe).collect(),
        }
    }

    /// Full catalog in stable order.
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
