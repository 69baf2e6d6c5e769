use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Upper bound on accepted wait times, in minutes (8 hours).
pub const MAX_WAIT_TIME: i32 = 480;

/// Provider row - a service professional shown on the status board
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Provider {
    pub id: i64,
    pub name: String,
    pub wait_time: i32,
    pub visible: bool,
    pub show_wait_time: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a provider.
///
/// The client PUTs its full record including the id; the path id is
/// authoritative, so an id field in the body is simply ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderPayload {
    pub name: String,
    pub wait_time: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub show_wait_time: bool,
}

impl ProviderPayload {
    /// Rudimentary validation: non-blank name, wait time within bounds.
    /// Returns a human-readable message on failure.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("name is required".to_string());
        }
        if self.wait_time < 0 {
            return Some("wait_time must not be negative".to_string());
        }
        if self.wait_time > MAX_WAIT_TIME {
            return Some(format!("wait_time must be at most {MAX_WAIT_TIME} minutes"));
        }
        None
    }

    /// Name with surrounding whitespace removed, as stored.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}

impl Provider {
    /// All providers, insertion order.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let providers = sqlx::query_as::<_, Self>("SELECT * FROM providers ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(providers)
    }

    /// Create a new provider
    pub async fn create(payload: &ProviderPayload, pool: &PgPool) -> Result<Self> {
        let provider = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO providers (name, wait_time, visible, show_wait_time)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(payload.trimmed_name())
        .bind(payload.wait_time)
        .bind(payload.visible)
        .bind(payload.show_wait_time)
        .fetch_one(pool)
        .await?;
        Ok(provider)
    }

    /// Replace a provider's fields, returning None if the id is unknown
    pub async fn update(id: i64, payload: &ProviderPayload, pool: &PgPool) -> Result<Option<Self>> {
        let provider = sqlx::query_as::<_, Self>(
            r#"
            UPDATE providers
            SET name = $1, wait_time = $2, visible = $3, show_wait_time = $4,
                updated_at = now()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(payload.trimmed_name())
        .bind(payload.wait_time)
        .bind(payload.visible)
        .bind(payload.show_wait_time)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(provider)
    }

    /// Delete a provider, returning whether a row was removed
    pub async fn delete(id: i64, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, wait_time: i32) -> ProviderPayload {
        ProviderPayload {
            name: name.to_string(),
            wait_time,
            visible: true,
            show_wait_time: true,
        }
    }

    #[test]
    fn accepts_valid_payloads() {
        assert!(payload("Dr. Johnson", 0).validate().is_none());
        assert!(payload("Dr. Johnson", 480).validate().is_none());
    }

    #[test]
    fn rejects_blank_names() {
        assert!(payload("", 5).validate().is_some());
        assert!(payload("   ", 5).validate().is_some());
    }

    #[test]
    fn rejects_out_of_range_wait_times() {
        assert!(payload("Dr. Johnson", -1).validate().is_some());
        assert!(payload("Dr. Johnson", 481).validate().is_some());
    }

    #[test]
    fn payload_defaults_flags_to_true() {
        let payload: ProviderPayload =
            serde_json::from_str(r#"{"name": "Dr. Chen", "wait_time": 10}"#).unwrap();
        assert!(payload.visible);
        assert!(payload.show_wait_time);
    }

    #[test]
    fn payload_ignores_body_id() {
        let payload: ProviderPayload = serde_json::from_str(
            r#"{"id": 42, "name": "Dr. Chen", "wait_time": 10, "visible": false, "show_wait_time": true}"#,
        )
        .unwrap();
        assert_eq!(payload.trimmed_name(), "Dr. Chen");
        assert!(!payload.visible);
    }
}
