use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Cadence of a time-window partitions definition
///
/// Written as a bare name (`weekly`) or, for custom schedules, as a
/// one-entry map (`{cron: "0 0 * * *"}`). Both forms survive the buffering
/// done by the internally tagged [`PartitionsSpec`] in YAML and JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CadenceRepr", try_from = "CadenceRepr")]
pub enum Cadence {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    /// Custom schedule expressed as a cron string
    Cron(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CadenceRepr {
    Named(String),
    Cron { cron: String },
}

impl From<Cadence> for CadenceRepr {
    fn from(cadence: Cadence) -> Self {
        match cadence {
            Cadence::Cron(cron) => CadenceRepr::Cron { cron },
            named => CadenceRepr::Named(named.to_string()),
        }
    }
}

impl TryFrom<CadenceRepr> for Cadence {
    type Error = String;

    fn try_from(repr: CadenceRepr) -> Result<Self, Self::Error> {
        match repr {
            CadenceRepr::Cron { cron } => Ok(Cadence::Cron(cron)),
            CadenceRepr::Named(name) => match name.as_str() {
                "hourly" => Ok(Cadence::Hourly),
                "daily" => Ok(Cadence::Daily),
                "weekly" => Ok(Cadence::Weekly),
                "monthly" => Ok(Cadence::Monthly),
                other => Err(format!(
                    "unknown cadence '{}' (expected hourly, daily, weekly, monthly or {{cron: ...}})",
                    other
                )),
            },
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Hourly => f.write_str("hourly"),
            Cadence::Daily => f.write_str("daily"),
            Cadence::Weekly => f.write_str("weekly"),
            Cadence::Monthly => f.write_str("monthly"),
            Cadence::Cron(expr) => write!(f, "cron({})", expr),
        }
    }
}

/// How an asset's materializations are partitioned
///
/// Two specs are equal iff every field matches. `Static` partition keys are
/// order-sensitive; `Multi` dimensions are keyed by dimension name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartitionsSpec {
    TimeWindow {
        cadence: Cadence,
        /// Start boundary, ISO-8601 date or datetime
        start: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timezone: Option<String>,
        /// strftime-style format of partition keys
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fmt: Option<String>,
    },
    Static {
        partition_keys: Vec<String>,
    },
    Dynamic {
        name: String,
    },
    Multi {
        dimensions: BTreeMap<String, PartitionsSpec>,
    },
}

impl PartitionsSpec {
    /// Time-window spec with only cadence and start set
    pub fn time_window(cadence: Cadence, start: impl Into<String>) -> Self {
        PartitionsSpec::TimeWindow {
            cadence,
            start: start.into(),
            end: None,
            timezone: None,
            fmt: None,
        }
    }

    pub fn weekly(start: impl Into<String>) -> Self {
        Self::time_window(Cadence::Weekly, start)
    }

    pub fn daily(start: impl Into<String>) -> Self {
        Self::time_window(Cadence::Daily, start)
    }

    pub fn static_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PartitionsSpec::Static {
            partition_keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for PartitionsSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionsSpec::TimeWindow {
                cadence,
                start,
                end,
                timezone,
                ..
            } => {
                write!(f, "{} from {}", cadence, start)?;
                if let Some(end) = end {
                    write!(f, " to {}", end)?;
                }
                if let Some(tz) = timezone {
                    write!(f, " ({})", tz)?;
                }
                Ok(())
            }
            PartitionsSpec::Static { partition_keys } => {
                write!(f, "static [{}]", partition_keys.join(", "))
            }
            PartitionsSpec::Dynamic { name } => write!(f, "dynamic '{}'", name),
            PartitionsSpec::Multi { dimensions } => {
                f.write_str("multi {")?;
                let mut first = true;
                for (name, spec) in dimensions {
                    if !first {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}: {}", name, spec)?;
                    first = false;
                }
                f.write_str("}")
            }
        }
    }
}
