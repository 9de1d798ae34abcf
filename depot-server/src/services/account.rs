//! Registration, login, logout and password changes
//!
//! Customers, suppliers and couriers sign in by email, admins by username.
//! Couriers do not self-register; an admin creates them. A successful login
//! or registration opens a session: a random UUID token stored with the
//! configured TTL.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    Admin, AdminLogin, AuthResponse, Courier, CourierCreate, Customer, CustomerRegister,
    EmailLogin, PasswordUpdate, Role, Supplier, SupplierRegister,
};
use uuid::Uuid;

use super::with_deadline;
use crate::auth::Session;
use crate::db::{AccountRepo, ListQuery, RepoError};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_password,
    validate_required_text,
};

fn hash(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::internal("Password hashing failed")
    })
}

fn check_confirmation(password: &str, confirm: &str) -> Result<(), AppError> {
    validate_password(password)?;
    if password != confirm {
        return Err(AppError::new(ErrorCode::PasswordMismatch));
    }
    Ok(())
}

async fn open_session(state: &AppState, user_id: Uuid, role: Role) -> String {
    let token = Uuid::new_v4().to_string();
    state
        .sessions
        .put(&token, Session { user_id, role }, state.session_ttl)
        .await;
    tracing::info!(user_id = %user_id, role = %role, "Session opened");
    token
}

fn email_taken(email: &str) -> AppError {
    AppError::new(ErrorCode::EmailExists).with_detail("email", email)
}

// ════════════════════════════════════════════════════════════════
// Registration
// ════════════════════════════════════════════════════════════════

pub async fn register_customer(
    state: &AppState,
    payload: CustomerRegister,
) -> ServiceResult<AuthResponse<Customer>> {
    with_deadline(state, async {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&payload.phone_no, "phone_no", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
        let email = payload.email.trim().to_lowercase();
        validate_email(&email)?;
        check_confirmation(&payload.password, &payload.confirm_password)?;

        let mut tx = state.store.begin().await?;
        if tx.find_customer_by_email(&email).await?.is_some() {
            return Err(email_taken(&email).into());
        }

        let customer = Customer {
            id: state.ids.next_id(),
            name: payload.name.trim().to_string(),
            gender: payload.gender,
            date_of_birth: payload.date_of_birth,
            address: payload.address.trim().to_string(),
            phone_no: payload.phone_no.trim().to_string(),
            email,
            password_hash: hash(&payload.password)?,
            is_active: true,
            created_at: state.clock.now(),
            updated_at: None,
        };
        match tx.insert_customer(&customer).await {
            Ok(()) => {}
            Err(RepoError::Duplicate(_)) => return Err(email_taken(&customer.email).into()),
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;

        tracing::info!(customer_id = %customer.id, "Customer registered");
        let session = open_session(state, customer.id, Role::Customer).await;
        Ok(AuthResponse {
            user: customer,
            session,
        })
    })
    .await
}

pub async fn register_supplier(
    state: &AppState,
    payload: SupplierRegister,
) -> ServiceResult<AuthResponse<Supplier>> {
    with_deadline(state, async {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&payload.phone_no, "phone_no", MAX_SHORT_TEXT_LEN)?;
        let email = payload.email.trim().to_lowercase();
        validate_email(&email)?;
        check_confirmation(&payload.password, &payload.confirm_password)?;

        let mut tx = state.store.begin().await?;
        if tx.find_supplier_by_email(&email).await?.is_some() {
            return Err(email_taken(&email).into());
        }

        let supplier = Supplier {
            id: state.ids.next_id(),
            name: payload.name.trim().to_string(),
            phone_no: payload.phone_no.trim().to_string(),
            email,
            password_hash: hash(&payload.password)?,
            is_active: true,
            created_at: state.clock.now(),
            updated_at: None,
        };
        match tx.insert_supplier(&supplier).await {
            Ok(()) => {}
            Err(RepoError::Duplicate(_)) => return Err(email_taken(&supplier.email).into()),
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;

        tracing::info!(supplier_id = %supplier.id, "Supplier registered");
        let session = open_session(state, supplier.id, Role::Supplier).await;
        Ok(AuthResponse {
            user: supplier,
            session,
        })
    })
    .await
}

// ════════════════════════════════════════════════════════════════
// Login / logout
// ════════════════════════════════════════════════════════════════

pub async fn login_customer(
    state: &AppState,
    payload: EmailLogin,
) -> ServiceResult<AuthResponse<Customer>> {
    with_deadline(state, async {
        let email = payload.email.trim().to_lowercase();
        let mut tx = state.store.begin().await?;
        let customer = tx.find_customer_by_email(&email).await?;
        drop(tx);

        let Some(customer) = customer.filter(|c| verify_password(&payload.password, &c.password_hash))
        else {
            tracing::warn!(email = %email, "Customer login failed");
            return Err(AppError::invalid_credentials().into());
        };
        if !customer.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled).into());
        }

        let session = open_session(state, customer.id, Role::Customer).await;
        Ok(AuthResponse {
            user: customer,
            session,
        })
    })
    .await
}

pub async fn login_supplier(
    state: &AppState,
    payload: EmailLogin,
) -> ServiceResult<AuthResponse<Supplier>> {
    with_deadline(state, async {
        let email = payload.email.trim().to_lowercase();
        let mut tx = state.store.begin().await?;
        let supplier = tx.find_supplier_by_email(&email).await?;
        drop(tx);

        let Some(supplier) = supplier.filter(|s| verify_password(&payload.password, &s.password_hash))
        else {
            tracing::warn!(email = %email, "Supplier login failed");
            return Err(AppError::invalid_credentials().into());
        };
        if !supplier.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled).into());
        }

        let session = open_session(state, supplier.id, Role::Supplier).await;
        Ok(AuthResponse {
            user: supplier,
            session,
        })
    })
    .await
}

pub async fn login_admin(
    state: &AppState,
    payload: AdminLogin,
) -> ServiceResult<AuthResponse<Admin>> {
    with_deadline(state, async {
        let username = payload.username.trim();
        let mut tx = state.store.begin().await?;
        let admin = tx.find_admin_by_username(username).await?;
        drop(tx);

        let Some(admin) = admin.filter(|a| verify_password(&payload.password, &a.password_hash)) else {
            tracing::warn!(username = %username, "Admin login failed");
            return Err(AppError::invalid_credentials().into());
        };

        let session = open_session(state, admin.id, Role::Admin).await;
        Ok(AuthResponse {
            user: admin,
            session,
        })
    })
    .await
}

pub async fn login_courier(
    state: &AppState,
    payload: EmailLogin,
) -> ServiceResult<AuthResponse<Courier>> {
    with_deadline(state, async {
        let email = payload.email.trim().to_lowercase();
        let mut tx = state.store.begin().await?;
        let courier = tx.find_courier_by_email(&email).await?;
        drop(tx);

        let Some(courier) = courier.filter(|c| verify_password(&payload.password, &c.password_hash))
        else {
            tracing::warn!(email = %email, "Courier login failed");
            return Err(AppError::invalid_credentials().into());
        };
        if !courier.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled).into());
        }

        let session = open_session(state, courier.id, Role::Courier).await;
        Ok(AuthResponse {
            user: courier,
            session,
        })
    })
    .await
}

pub async fn logout(state: &AppState, token: &str) -> bool {
    state.sessions.delete(token).await
}

/// Change the caller's own password
///
/// The current password must verify, the new one must differ from it and
/// match its confirmation. Open sessions stay valid.
pub async fn update_password(
    state: &AppState,
    session: Session,
    payload: PasswordUpdate,
) -> ServiceResult<()> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let current_hash = match session.role {
            Role::Customer => tx.get_customer(session.user_id).await?.map(|c| c.password_hash),
            Role::Supplier => tx.get_supplier(session.user_id).await?.map(|s| s.password_hash),
            Role::Courier => tx.get_courier(session.user_id).await?.map(|c| c.password_hash),
            Role::Admin => tx.get_admin(session.user_id).await?.map(|a| a.password_hash),
        };
        let Some(current_hash) = current_hash else {
            return Err(AppError::not_authenticated().into());
        };

        if !verify_password(&payload.current_password, &current_hash) {
            tracing::warn!(user_id = %session.user_id, role = %session.role, "Password change rejected");
            return Err(AppError::invalid_credentials().into());
        }
        if payload.new_password == payload.current_password {
            return Err(AppError::new(ErrorCode::PasswordUnchanged).into());
        }
        check_confirmation(&payload.new_password, &payload.confirm_new_password)?;

        let new_hash = hash(&payload.new_password)?;
        if !tx
            .set_password_hash(session.role, session.user_id, &new_hash, state.clock.now())
            .await?
        {
            return Err(AppError::not_authenticated().into());
        }
        tx.commit().await?;

        tracing::info!(user_id = %session.user_id, role = %session.role, "Password changed");
        Ok(())
    })
    .await
}

// ════════════════════════════════════════════════════════════════
// Couriers
// ════════════════════════════════════════════════════════════════

pub async fn create_courier(
    state: &AppState,
    payload: CourierCreate,
    actor_id: Uuid,
) -> ServiceResult<Courier> {
    with_deadline(state, async {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&payload.phone_no, "phone_no", MAX_SHORT_TEXT_LEN)?;
        let email = payload.email.trim().to_lowercase();
        validate_email(&email)?;
        check_confirmation(&payload.password, &payload.confirm_password)?;

        let mut tx = state.store.begin().await?;
        if tx.find_courier_by_email(&email).await?.is_some() {
            return Err(email_taken(&email).into());
        }

        let courier = Courier {
            id: state.ids.next_id(),
            name: payload.name.trim().to_string(),
            phone_no: payload.phone_no.trim().to_string(),
            email,
            password_hash: hash(&payload.password)?,
            is_active: true,
            created_by: actor_id,
            created_at: state.clock.now(),
            updated_at: None,
        };
        match tx.insert_courier(&courier).await {
            Ok(()) => {}
            Err(RepoError::Duplicate(_)) => return Err(email_taken(&courier.email).into()),
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;

        tracing::info!(courier_id = %courier.id, actor_id = %actor_id, "Courier created");
        Ok(courier)
    })
    .await
}

pub async fn list_couriers(state: &AppState, q: &ListQuery) -> ServiceResult<Vec<Courier>> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        Ok(tx.list_couriers(q).await?)
    })
    .await
}

pub async fn get_courier(state: &AppState, id: Uuid) -> ServiceResult<Courier> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        Ok(tx
            .get_courier(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CourierNotFound))?)
    })
    .await
}

/// Create the configured admin account unless it already exists
pub async fn bootstrap_admin(state: &AppState, username: &str, password: &str) -> ServiceResult<()> {
    validate_required_text(username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_password(password)?;

    let mut tx = state.store.begin().await?;
    if tx.find_admin_by_username(username).await?.is_some() {
        tracing::debug!(username = %username, "Admin account already present");
        return Ok(());
    }

    let admin = Admin {
        id: state.ids.next_id(),
        username: username.to_string(),
        password_hash: hash(password)?,
        created_at: state.clock.now(),
    };
    match tx.insert_admin(&admin).await {
        Ok(()) | Err(RepoError::Duplicate(_)) => {}
        Err(e) => return Err(e.into()),
    }
    tx.commit().await?;

    tracing::info!(username = %username, "Admin account created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::MemoryStore;
    use crate::error::ServiceError;
    use crate::utils::{FixedClock, RandomIds};
    use chrono::NaiveDate;
    use shared::models::Gender;
    use std::sync::Arc;

    fn state() -> AppState {
        let (state, _rx) = AppState::from_parts(
            &Config::for_tests(),
            Arc::new(MemoryStore::new()),
            Arc::new(FixedClock::new(chrono::Utc::now())),
            Arc::new(RandomIds),
        );
        state
    }

    fn customer(email: &str, confirm: &str) -> CustomerRegister {
        CustomerRegister {
            name: "Aisyah".into(),
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1995, 4, 2).unwrap(),
            address: "12 Jalan Tun Razak".into(),
            phone_no: "0123456789".into(),
            email: email.into(),
            password: "correct horse".into(),
            confirm_password: confirm.into(),
        }
    }

    fn code(err: ServiceError) -> ErrorCode {
        AppError::from(err).code
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = state();
        let registered = register_customer(&state, customer("A@Example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "a@example.com");
        assert!(state.sessions.get(&registered.session).await.is_some());

        let login = login_customer(
            &state,
            EmailLogin {
                email: "a@example.com".into(),
                password: "correct horse".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(login.user.id, registered.user.id);
        assert_ne!(login.session, registered.session);
    }

    #[tokio::test]
    async fn test_register_rejections() {
        let state = state();
        let err = register_customer(&state, customer("b@example.com", "different!"))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::PasswordMismatch);

        register_customer(&state, customer("b@example.com", "correct horse"))
            .await
            .unwrap();
        let err = register_customer(&state, customer("B@example.com", "correct horse"))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::EmailExists);
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let state = state();
        register_customer(&state, customer("c@example.com", "correct horse"))
            .await
            .unwrap();
        let err = login_customer(
            &state,
            EmailLogin {
                email: "c@example.com".into(),
                password: "battery staple".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::InvalidCredentials);
    }

    fn password_update(current: &str, new: &str, confirm: &str) -> PasswordUpdate {
        PasswordUpdate {
            current_password: current.into(),
            new_password: new.into(),
            confirm_new_password: confirm.into(),
        }
    }

    #[tokio::test]
    async fn test_customer_password_update() {
        let state = state();
        let registered = register_customer(&state, customer("d@example.com", "correct horse"))
            .await
            .unwrap();
        let session = Session {
            user_id: registered.user.id,
            role: Role::Customer,
        };

        let err = update_password(
            &state,
            session,
            password_update("wrong horse", "new secret!", "new secret!"),
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::InvalidCredentials);

        let err = update_password(
            &state,
            session,
            password_update("correct horse", "correct horse", "correct horse"),
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::PasswordUnchanged);

        let err = update_password(
            &state,
            session,
            password_update("correct horse", "new secret!", "new secret?"),
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::PasswordMismatch);

        update_password(
            &state,
            session,
            password_update("correct horse", "new secret!", "new secret!"),
        )
        .await
        .unwrap();

        let login = |password: &str| EmailLogin {
            email: "d@example.com".into(),
            password: password.into(),
        };
        assert!(login_customer(&state, login("correct horse")).await.is_err());
        assert!(login_customer(&state, login("new secret!")).await.is_ok());
    }

    #[tokio::test]
    async fn test_courier_created_by_admin_can_log_in() {
        let state = state();
        let admin_id = Uuid::new_v4();
        let courier = create_courier(
            &state,
            CourierCreate {
                name: "Ahmad Rider".into(),
                phone_no: "0111111111".into(),
                email: "Rider@Example.com".into(),
                password: "on the road".into(),
                confirm_password: "on the road".into(),
            },
            admin_id,
        )
        .await
        .unwrap();
        assert_eq!(courier.email, "rider@example.com");
        assert_eq!(courier.created_by, admin_id);

        let login = login_courier(
            &state,
            EmailLogin {
                email: "rider@example.com".into(),
                password: "on the road".into(),
            },
        )
        .await
        .unwrap();
        let session = state.sessions.get(&login.session).await.unwrap();
        assert_eq!(session.role, Role::Courier);

        update_password(
            &state,
            session,
            password_update("on the road", "still riding", "still riding"),
        )
        .await
        .unwrap();
        assert!(
            login_courier(
                &state,
                EmailLogin {
                    email: "rider@example.com".into(),
                    password: "still riding".into(),
                },
            )
            .await
            .is_ok()
        );
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let state = state();
        bootstrap_admin(&state, "root", "s3cret-pass").await.unwrap();
        bootstrap_admin(&state, "root", "other-pass!").await.unwrap();

        let login = login_admin(
            &state,
            AdminLogin {
                username: "root".into(),
                password: "s3cret-pass".into(),
            },
        )
        .await
        .unwrap();
        let session = state.sessions.get(&login.session).await.unwrap();
        assert_eq!(session.role, Role::Admin);

        assert!(logout(&state, &login.session).await);
        assert!(state.sessions.get(&login.session).await.is_none());
    }
}
