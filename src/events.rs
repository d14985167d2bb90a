use chrono::{DateTime, FixedOffset, NaiveDateTime, ParseError, SecondsFormat, TimeDelta};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(serialize_with = "serialize_time")]
    pub time: DateTime<FixedOffset>,
    pub user: String,
    pub action: String,
    pub uri: String,
}

/// RFC 3339 in the caller's offset, `Z` when that offset is zero.
fn serialize_time<S: Serializer>(time: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&time.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Shape of the generated audit stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSettings {
    pub count: usize,
    pub interval: TimeDelta,
    pub user: String,
    pub action: String,
    pub uri: String,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            count: 10,
            interval: TimeDelta::seconds(19),
            user: "elliot".to_string(),
            action: "read".to_string(),
            uri: "file:///etc/passwd".to_string(),
        }
    }
}

/// Accepts RFC 3339 with an offset, or a naive timestamp which is taken as UTC.
pub fn parse_start(s: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    s.parse::<DateTime<FixedOffset>>().or_else(|err| {
        s.parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc().fixed_offset())
            .map_err(|_| err)
    })
}

/// Events spaced `interval` apart, the first one a full interval after `start`.
///
/// The stream ends early instead of running past the representable time range.
pub fn query_events(
    start: DateTime<FixedOffset>,
    settings: EventSettings,
) -> impl Iterator<Item = Event> {
    (1..=settings.count).scan(start, move |time, _| {
        *time = time.checked_add_signed(settings.interval)?;
        Some(Event {
            time: *time,
            user: settings.user.clone(),
            action: settings.action.clone(),
            uri: settings.uri.clone(),
        })
    })
}

pub fn to_ndjson_line(event: &Event) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    Ok(line)
}
