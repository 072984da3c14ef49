//! User administration handlers
//!
//! Superadmin-only HTTP handlers for managing users across tenants.
//! Creating a user provisions a fresh tenant id; usernames are immutable
//! after creation and passwords are only changed when provided.

use crate::dto::user::{UserCreateRequest, UserUpdateRequest};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use frete_auth::{PasswordService, SuperadminUser};
use frete_core::models::{User, UserInfo, UserRole};
use frete_core::traits::UserRepository;
use frete_core::AppError;
use frete_db::PgUserRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// List users with pagination
///
/// GET /api/v1/users
#[instrument(skip(pool, _superadmin))]
pub async fn list_users(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
    _superadmin: SuperadminUser,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(page = query.page, per_page = query.per_page, "Listing users");

    let repo = PgUserRepository::new(pool.get_ref().clone());
    let (users, total) = repo.list(query.limit(), query.offset()).await?;

    let response: Vec<UserInfo> = users.iter().map(UserInfo::from).collect();
    Ok(HttpResponse::Ok().json(query.paginate(response, total)))
}

/// Create a new user with a fresh tenant
///
/// POST /api/v1/users
#[instrument(skip(pool, password_service, superadmin, req))]
pub async fn create_user(
    pool: web::Data<PgPool>,
    password_service: web::Data<Arc<PasswordService>>,
    superadmin: SuperadminUser,
    req: web::Json<UserCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("User creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        username = %req.username,
        superadmin = %superadmin.username,
        "Creating user"
    );

    let role = UserRole::from_str(&req.role)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown role: {}", req.role)))?;

    let password_hash = password_service.hash_password(&req.password)?;

    // Every new user gets an isolated tenant.
    let new_user = User {
        id: 0, // Will be set by database
        username: req.username.clone(),
        password_hash,
        nome: req.nome.clone(),
        empresa: req.empresa.clone(),
        role,
        tenant_id: Uuid::new_v4(),
        ativo: true,
        ultimo_login: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let repo = PgUserRepository::new(pool.get_ref().clone());
    let created = repo.create(&new_user).await?;

    info!(
        username = %created.username,
        id = created.id,
        tenant = %created.tenant_id,
        superadmin = %superadmin.username,
        "User created"
    );

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        UserInfo::from(created),
        "User created successfully",
    )))
}

/// Update a user (username immutable, password optional)
///
/// PUT /api/v1/users/{id}
#[instrument(skip(pool, password_service, superadmin, req))]
pub async fn update_user(
    pool: web::Data<PgPool>,
    password_service: web::Data<Arc<PasswordService>>,
    path: web::Path<i32>,
    superadmin: SuperadminUser,
    req: web::Json<UserUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    req.validate().map_err(|e| {
        warn!("User update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgUserRepository::new(pool.get_ref().clone());
    let mut user = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))?;

    debug!(id = user_id, username = %user.username, "Updating user");

    if let Some(password) = &req.password {
        user.password_hash = password_service.hash_password(password)?;
    }
    if let Some(nome) = &req.nome {
        user.nome = Some(nome.clone());
    }
    if let Some(empresa) = &req.empresa {
        user.empresa = Some(empresa.clone());
    }
    if let Some(role) = &req.role {
        user.role = UserRole::from_str(role)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown role: {}", role)))?;
    }
    if let Some(ativo) = req.ativo {
        user.ativo = ativo;
    }
    user.updated_at = Utc::now();

    let updated = repo.update(&user).await?;

    info!(
        id = updated.id,
        superadmin = %superadmin.username,
        "User updated"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(updated))))
}

/// Toggle a user's active flag
///
/// POST /api/v1/users/{id}/toggle
#[instrument(skip(pool, superadmin))]
pub async fn toggle_user(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    superadmin: SuperadminUser,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    let repo = PgUserRepository::new(pool.get_ref().clone());
    let user = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))?;

    debug!(id = user_id, active = !user.ativo, "Toggling user");

    let toggled = repo.set_active(user_id, !user.ativo).await?;

    info!(
        id = user_id,
        active = toggled.ativo,
        superadmin = %superadmin.username,
        "User toggled"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(toggled))))
}

/// Delete a user (hard delete)
///
/// DELETE /api/v1/users/{id}
#[instrument(skip(pool, superadmin))]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    superadmin: SuperadminUser,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    debug!(id = user_id, superadmin = %superadmin.username, "Deleting user");

    let repo = PgUserRepository::new(pool.get_ref().clone());
    let deleted = repo.delete(user_id).await?;

    if !deleted {
        return Err(AppError::UserNotFound(user_id.to_string()));
    }

    info!(id = user_id, superadmin = %superadmin.username, "User deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure user administration routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}/toggle", web::post().to(toggle_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}
