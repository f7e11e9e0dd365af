//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::user::{User, UserRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_role that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    Student,
    Alumnus,
    Mentor,
    Staff,
    Admin,
}

impl From<UserRoleDb> for UserRole {
    fn from(db_role: UserRoleDb) -> Self {
        match db_role {
            UserRoleDb::Student => UserRole::Student,
            UserRoleDb::Alumnus => UserRole::Alumnus,
            UserRoleDb::Mentor => UserRole::Mentor,
            UserRoleDb::Staff => UserRole::Staff,
            UserRoleDb::Admin => UserRole::Admin,
        }
    }
}

impl From<UserRole> for UserRoleDb {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Student => UserRoleDb::Student,
            UserRole::Alumnus => UserRoleDb::Alumnus,
            UserRole::Mentor => UserRoleDb::Mentor,
            UserRole::Staff => UserRoleDb::Staff,
            UserRole::Admin => UserRoleDb::Admin,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub phone_num: String,
    pub role: UserRoleDb,
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            phone_num: entity.phone_num,
            role: entity.role.into(),
            firstname: entity.firstname,
            lastname: entity.lastname,
            middlename: entity.middlename,
            street: entity.street,
            city: entity.city,
            state: entity.state,
            country: entity.country,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
