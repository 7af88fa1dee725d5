//! Tool execution for `tools/call`.
//!
//! Every call resolves to a `ToolResult`. Failures inside a tool (bad
//! arguments, unknown ids, invalid zones) are reported with `isError: true`
//! instead of escalating to a JSON-RPC error.

use crate::error::ToolError;
use crate::knowledge::{self, FetchedRecord, KnowledgeStore, SearchHit};
use crate::tools::registry::ToolName;
use crate::tools::time;
use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// A single content block of a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Uniform outcome envelope for every tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Successful result carrying `payload` as pretty-printed JSON.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, ToolError> {
        Ok(Self::text(serde_json::to_string_pretty(payload)?))
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|ToolContent::Text { text }| text.as_str())
    }
}

impl From<ToolError> for ToolResult {
    fn from(err: ToolError) -> Self {
        Self::error(err.client_message())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrentTime {
    utc_time: String,
    local_time: String,
    timezone: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertedTime {
    converted_time: String,
    hour_difference: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelativeTime {
    relative_time: String,
}

#[derive(Serialize)]
struct DaysInMonth {
    days: u32,
}

#[derive(Serialize)]
struct Timestamp {
    timestamp: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeekYear {
    week: u32,
    iso_week: u32,
}

#[derive(Serialize)]
struct SearchResults {
    results: Vec<SearchHit>,
}

/// Optional string argument; missing, `null` and `""` all count as absent.
fn optional_str<'a>(args: &'a Value, key: &'static str) -> Result<Option<&'a str>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ToolError::InvalidArgument(key)),
    }
}

fn required_str<'a>(args: &'a Value, key: &'static str) -> Result<&'a str, ToolError> {
    optional_str(args, key)?.ok_or(ToolError::MissingArgument(key))
}

/// Like `required_str`, but `""` is a value rather than an absence.
fn present_str<'a>(args: &'a Value, key: &'static str) -> Result<&'a str, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Err(ToolError::MissingArgument(key)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ToolError::InvalidArgument(key)),
    }
}

/// Runs tools against the knowledge store and the date/timezone library.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    knowledge: Arc<KnowledgeStore>,
    default_timezone: Tz,
}

impl ToolExecutor {
    pub fn new(knowledge: Arc<KnowledgeStore>, default_timezone: Tz) -> Self {
        Self {
            knowledge,
            default_timezone,
        }
    }

    /// Execute `name` with `arguments`. Never fails: errors become `isError` results.
    pub fn execute(&self, name: &str, arguments: &Value) -> ToolResult {
        self.execute_at(name, arguments, Utc::now())
    }

    /// Same as [`execute`](Self::execute) with an explicit "now".
    pub fn execute_at(&self, name: &str, arguments: &Value, now: DateTime<Utc>) -> ToolResult {
        let Some(tool) = ToolName::parse(name) else {
            tracing::warn!(tool = %name, "Unknown tool requested");
            metrics::counter!("tool_calls_total", "tool" => "unknown", "outcome" => "error")
                .increment(1);
            return ToolError::UnknownTool(name.to_string()).into();
        };

        let start = Instant::now();
        let outcome = self.run(tool, arguments, now);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(result) => {
                tracing::debug!(tool = tool.as_str(), elapsed_ms, "Tool call succeeded");
                metrics::counter!("tool_calls_total", "tool" => tool.as_str(), "outcome" => "ok")
                    .increment(1);
                result
            }
            Err(e) => {
                tracing::info!(tool = tool.as_str(), error = %e, "Tool call failed");
                metrics::counter!("tool_calls_total", "tool" => tool.as_str(), "outcome" => "error")
                    .increment(1);
                e.into()
            }
        }
    }

    fn run(&self, tool: ToolName, args: &Value, now: DateTime<Utc>) -> Result<ToolResult, ToolError> {
        match tool {
            ToolName::CurrentTime => self.current_time(args, now),
            ToolName::ConvertTime => self.convert_time(args),
            ToolName::RelativeTime => self.relative_time(args, now),
            ToolName::DaysInMonth => self.days_in_month(args, now),
            ToolName::GetTimestamp => self.get_timestamp(args, now),
            ToolName::GetWeekYear => self.get_week_year(args, now),
            ToolName::Search => self.search(args),
            ToolName::Fetch => self.fetch(args),
        }
    }

    /// Resolve an optional date/time argument, defaulting to `now`.
    fn instant_or_now(
        &self,
        args: &Value,
        key: &'static str,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Tz>, ToolError> {
        match optional_str(args, key)? {
            Some(input) => time::parse_datetime(input, self.default_timezone),
            None => Ok(now.with_timezone(&self.default_timezone)),
        }
    }

    fn current_time(&self, args: &Value, now: DateTime<Utc>) -> Result<ToolResult, ToolError> {
        let timezone = match optional_str(args, "timezone")? {
            Some(name) => time::parse_timezone(name)?,
            None => self.default_timezone,
        };
        let format = optional_str(args, "format")?.unwrap_or(time::DEFAULT_FORMAT);

        ToolResult::json(&CurrentTime {
            utc_time: time::format_datetime(&now, format)?,
            local_time: time::format_datetime(&now.with_timezone(&timezone), format)?,
            timezone: timezone.name(),
        })
    }

    fn convert_time(&self, args: &Value) -> Result<ToolResult, ToolError> {
        let source = time::parse_timezone(required_str(args, "sourceTimezone")?)?;
        let target = time::parse_timezone(required_str(args, "targetTimezone")?)?;
        let input = required_str(args, "time")?;

        let source_time = time::parse_datetime(input, source)?;
        let target_time = source_time.with_timezone(&target);

        let source_offset = source_time.offset().fix().local_minus_utc();
        let target_offset = target_time.offset().fix().local_minus_utc();
        // Half-hour offsets round toward positive infinity.
        let hour_difference = (f64::from(target_offset - source_offset) / 3600.0 + 0.5).floor() as i64;

        ToolResult::json(&ConvertedTime {
            converted_time: time::format_datetime(&target_time, time::DEFAULT_FORMAT)?,
            hour_difference,
        })
    }

    fn relative_time(&self, args: &Value, now: DateTime<Utc>) -> Result<ToolResult, ToolError> {
        let input = required_str(args, "time")?;
        let then = time::parse_datetime(input, self.default_timezone)?;

        ToolResult::json(&RelativeTime {
            relative_time: time::relative_phrase(then.with_timezone(&Utc), now),
        })
    }

    fn days_in_month(&self, args: &Value, now: DateTime<Utc>) -> Result<ToolResult, ToolError> {
        let date = self.instant_or_now(args, "date", now)?.date_naive();
        ToolResult::json(&DaysInMonth {
            days: time::days_in_month(date),
        })
    }

    fn get_timestamp(&self, args: &Value, now: DateTime<Utc>) -> Result<ToolResult, ToolError> {
        let instant = self.instant_or_now(args, "time", now)?;
        ToolResult::json(&Timestamp {
            timestamp: instant.timestamp_millis(),
        })
    }

    fn get_week_year(&self, args: &Value, now: DateTime<Utc>) -> Result<ToolResult, ToolError> {
        let date = self.instant_or_now(args, "date", now)?.date_naive();
        ToolResult::json(&WeekYear {
            week: time::locale_week(date)?,
            iso_week: time::iso_week(date),
        })
    }

    fn search(&self, args: &Value) -> Result<ToolResult, ToolError> {
        let query = args.get("query").and_then(Value::as_str).unwrap_or("");
        let results = knowledge::search(&self.knowledge, query);

        metrics::histogram!("search_results").record(results.len() as f64);

        ToolResult::json(&SearchResults { results })
    }

    fn fetch(&self, args: &Value) -> Result<ToolResult, ToolError> {
        let id = present_str(args, "id")?;
        let record = self
            .knowledge
            .get(id)
            .ok_or_else(|| ToolError::RecordNotFound(id.to_string()))?;

        ToolResult::json(&FetchedRecord::from(record))
    }
}
