//! Authorization policy table
//!
//! Every protected handler names its [`Operation`]; the table below says
//! which roles may perform it and which of those roles are limited to rows
//! they own. Handlers then apply the returned [`Access`] to their queries.

use shared::error::{AppError, ErrorCode};
use shared::models::Role;
use uuid::Uuid;

use super::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Logout,
    UpdatePassword,
    ViewWarehouses,
    ManageWarehouses,
    ViewCategories,
    ManageCategories,
    ViewProducts,
    CreateProduct,
    ManageProduct,
    ViewStock,
    ManageStock,
    PlaceOrder,
    ViewOrders,
    DeleteOrder,
    ViewLineItems,
    ViewPayments,
    ConfirmPayment,
    ViewConfiguration,
    ManageConfiguration,
    ViewCouriers,
    ManageCouriers,
    CreateShipment,
    ViewShipments,
    UpdateShipmentStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct Policy {
    pub roles: &'static [Role],
    /// Roles that only see or change their own rows
    pub owner_scoped: &'static [Role],
}

const ANY: &[Role] = &[Role::Customer, Role::Supplier, Role::Courier, Role::Admin];
const ADMIN: &[Role] = &[Role::Admin];
const CUSTOMER: &[Role] = &[Role::Customer];
const SUPPLIER: &[Role] = &[Role::Supplier];
const CUSTOMER_ADMIN: &[Role] = &[Role::Customer, Role::Admin];
const SUPPLIER_ADMIN: &[Role] = &[Role::Supplier, Role::Admin];
const COURIER: &[Role] = &[Role::Courier];
const COURIER_ADMIN: &[Role] = &[Role::Courier, Role::Admin];
const CUSTOMER_COURIER: &[Role] = &[Role::Customer, Role::Courier];
const CUSTOMER_COURIER_ADMIN: &[Role] = &[Role::Customer, Role::Courier, Role::Admin];
const NONE: &[Role] = &[];

impl Operation {
    pub const fn policy(self) -> Policy {
        use Operation::*;
        let (roles, owner_scoped) = match self {
            Logout => (ANY, NONE),
            UpdatePassword => (ANY, NONE),
            ViewWarehouses => (ANY, NONE),
            ManageWarehouses => (ADMIN, NONE),
            ViewCategories => (ANY, NONE),
            ManageCategories => (ADMIN, NONE),
            ViewProducts => (ANY, NONE),
            CreateProduct => (SUPPLIER, NONE),
            ManageProduct => (SUPPLIER_ADMIN, SUPPLIER),
            ViewStock => (ANY, NONE),
            ManageStock => (ADMIN, NONE),
            PlaceOrder => (CUSTOMER, NONE),
            ViewOrders => (CUSTOMER_ADMIN, CUSTOMER),
            DeleteOrder => (ADMIN, NONE),
            ViewLineItems => (CUSTOMER_ADMIN, CUSTOMER),
            ViewPayments => (CUSTOMER_ADMIN, CUSTOMER),
            ConfirmPayment => (CUSTOMER_ADMIN, CUSTOMER),
            ViewConfiguration => (ANY, NONE),
            ManageConfiguration => (ADMIN, NONE),
            ViewCouriers => (ADMIN, NONE),
            ManageCouriers => (ADMIN, NONE),
            CreateShipment => (ADMIN, NONE),
            ViewShipments => (CUSTOMER_COURIER_ADMIN, CUSTOMER_COURIER),
            UpdateShipmentStatus => (COURIER_ADMIN, COURIER),
        };
        Policy {
            roles,
            owner_scoped,
        }
    }
}

/// What an authorized caller may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    All,
    /// Only rows owned by this user
    Own(Uuid),
}

impl Access {
    /// Owner filter for list queries
    pub fn owner(&self) -> Option<Uuid> {
        match self {
            Access::All => None,
            Access::Own(id) => Some(*id),
        }
    }

    /// Fail with `code` when the row belongs to someone else
    pub fn ensure_owns(&self, owner: Uuid, code: ErrorCode) -> Result<(), AppError> {
        match self {
            Access::Own(id) if *id != owner => Err(AppError::new(code)),
            _ => Ok(()),
        }
    }
}

/// Evaluate the policy table for one session
pub fn authorize(session: &Session, op: Operation) -> Result<Access, AppError> {
    let policy = op.policy();
    if !policy.roles.contains(&session.role) {
        tracing::warn!(
            user_id = %session.user_id,
            role = %session.role,
            operation = ?op,
            "Role not permitted"
        );
        let allowed: Vec<&str> = policy.roles.iter().map(Role::as_str).collect();
        return Err(AppError::new(ErrorCode::RoleRequired).with_detail("roles", allowed));
    }
    if policy.owner_scoped.contains(&session.role) {
        Ok(Access::Own(session.user_id))
    } else {
        Ok(Access::All)
    }
}
