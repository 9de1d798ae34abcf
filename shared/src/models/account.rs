//! Account Models (customers, suppliers, couriers, admins)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Supplier,
    Courier,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Supplier => "supplier",
            Role::Courier => "courier",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "gender", rename_all = "lowercase"))]
pub enum Gender {
    Male,
    Female,
}

/// Customer account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub phone_no: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Customer self-registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRegister {
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub address: String,
    pub phone_no: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Supplier account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub phone_no: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Supplier self-registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierRegister {
    pub name: String,
    pub phone_no: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Courier account, created by an admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Courier {
    pub id: Uuid,
    pub name: String,
    pub phone_no: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create courier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierCreate {
    pub name: String,
    pub phone_no: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Administrator account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Customer / supplier / courier login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLogin {
    pub email: String,
    pub password: String,
}

/// Admin login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLogin {
    pub username: String,
    pub password: String,
}

/// Change the caller's own password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Login / registration result: the account plus its session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse<T> {
    pub user: T,
    pub session: String,
}
