use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String, // trimmed, lowercased
    pub mobile_number: String,
    pub password_hash: String, // argon2 PHC string, never serialized
    pub verified: bool,
    pub verification_token: Option<String>, // present only while unverified
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub password_hash: String,
    pub verification_token: String,
}

/// Column changes for a profile update; `None` leaves the column alone.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub password_hash: Option<String>,
}
