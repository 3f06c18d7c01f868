//! Lead capture storage
//!
//! A lead is whatever JSON object the contact form submitted, plus a
//! server-assigned id and creation time. Fields are stored as-is; nothing is
//! validated.

use anyhow::{bail, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::params;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::info;

use super::database::SharedDatabase;

/// Keys the server assigns; client-supplied values for them are discarded
const RESERVED_KEYS: [&str; 2] = ["_id", "createdAt"];

/// A stored lead
///
/// Serializes as the submitted fields followed by `_id` and `createdAt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

impl Lead {
    /// A field rendered as text; strings unquoted, other scalars via JSON
    pub fn field(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The columns shown by the lead listing
    pub fn summary(&self) -> LeadSummary {
        LeadSummary {
            created_at: self.created_at,
            name: self.field("name"),
            email: self.field("email"),
            phone: self.field("phone"),
            kind: self.field("type"),
            budget: self.field("budget"),
            location: self.field("location"),
        }
    }
}

impl Serialize for Lead {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("_id", &self.id)?;
        map.serialize_entry("createdAt", &format_timestamp(self.created_at))?;
        map.end()
    }
}

/// Contact columns of a lead
#[derive(Debug, Clone, PartialEq)]
pub struct LeadSummary {
    pub created_at: DateTime<Utc>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Project type (`type` in the submitted form)
    pub kind: Option<String>,
    pub budget: Option<String>,
    pub location: Option<String>,
}

/// Append-only lead store
#[derive(Clone)]
pub struct LeadStore {
    db: SharedDatabase,
}

impl LeadStore {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Persist a submitted form
    ///
    /// Only JSON objects are accepted.
    pub fn create(&self, submission: Value) -> Result<Lead> {
        let Value::Object(mut fields) = submission else {
            bail!("lead must be a JSON object");
        };
        for key in RESERVED_KEYS {
            fields.remove(key);
        }

        let lead = Lead {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            fields,
        };
        let payload = serde_json::to_string(&lead.fields)?;

        self.db.lock().conn().execute(
            "INSERT INTO leads (id, payload, created_at) VALUES (?1, ?2, ?3)",
            params![lead.id, payload, format_timestamp(lead.created_at)],
        )?;

        info!("Saved lead {}", lead.id);
        Ok(lead)
    }

    /// All leads, newest first
    pub fn list(&self) -> Result<Vec<Lead>> {
        let db = self.db.lock();
        let mut stmt = db.conn().prepare(
            "SELECT id, payload, created_at FROM leads
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, payload, created_at)| -> Result<Lead> {
                let fields: Map<String, Value> = serde_json::from_str(&payload)?;
                let created_at = DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc);
                Ok(Lead {
                    id,
                    created_at,
                    fields,
                })
            })
            .collect()
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .db
            .lock()
            .conn()
            .query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Fixed-width RFC 3339 so stored timestamps sort lexically
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
