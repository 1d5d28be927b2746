use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Campus resource: an event, service, tool or article.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String, // workshop | counseling | career | study | wellness
    #[serde(rename = "type")]
    pub resource_type: String, // event | service | tool | article
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub contact_info: Option<String>,
    pub website: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub registration_deadline: Option<OffsetDateTime>,
    pub is_recurring: bool,
    pub recurring_pattern: Option<String>,
    pub max_participants: i32,
    pub current_participants: i32,
    pub is_free: bool,
    pub price: f64,
    pub tags: Vec<String>,
    pub difficulty: Option<String>,
    pub target_audience: Option<String>,
    pub is_active: bool,
    pub average_rating: f64,
    pub total_reviews: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Resource {
    pub fn has_capacity(&self) -> bool {
        self.current_participants < self.max_participants
    }

    pub fn deadline_passed(&self, now: OffsetDateTime) -> bool {
        self.registration_deadline.is_some_and(|d| now > d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Cancelled,
    Attended,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRegistration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resource_id: Uuid,
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ResourceRegistration {
    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Registered
    }
}

/// Outcome of the conditional seat claim.
#[derive(Debug, Clone)]
pub enum SeatClaim {
    Claimed(ResourceRegistration),
    /// The resource is full, inactive or past its deadline; nothing was written.
    Unavailable,
    /// An active registration already exists; nothing was written.
    AlreadyRegistered,
}
