//! User repository.

use sqlx::PgPool;

use motoshop_core::types::DbId;

use crate::models::user::{CreateUser, UpdateProfile, User, UserRow};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, \
     first_name, last_name, phone, address, created_at, updated_at";

const SAFE_COLUMNS: &str = "id, username, email, role, first_name, \
     last_name, phone, address, created_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, user: &CreateUser) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role, \
                 first_name, last_name, phone, address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {SAFE_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.role)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone)
            .bind(&user.address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {SAFE_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as(&query).bind(id).fetch_optional(pool).await
    }

    /// Fetches the full row including the password hash, for login.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Checks whether a username or email is already taken.
    pub async fn exists(pool: &PgPool, username: &str, email: &str) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = $1 OR email = $2 LIMIT 1")
                .bind(username)
                .bind(email)
                .fetch_optional(pool)
                .await?;
        Ok(row.is_some())
    }

    /// Lists users with optional role and free-text filters, newest first.
    pub async fn list(
        pool: &PgPool,
        role: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<UserRow>, sqlx::Error> {
        let mut query = format!("SELECT {SAFE_COLUMNS} FROM users WHERE 1=1");
        let mut bind_idx = 0;

        if role.is_some() {
            bind_idx += 1;
            query.push_str(&format!(" AND role = ${bind_idx}"));
        }
        if search.is_some() {
            bind_idx += 1;
            query.push_str(&format!(
                " AND (username ILIKE ${bind_idx} OR email ILIKE ${bind_idx} \
                   OR first_name ILIKE ${bind_idx} OR last_name ILIKE ${bind_idx})"
            ));
        }
        query.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as(&query);
        if let Some(role) = role {
            q = q.bind(role.to_string());
        }
        if let Some(search) = search {
            q = q.bind(format!("%{search}%"));
        }
        q.fetch_all(pool).await
    }

    /// Partial profile update: `None` fields keep their stored values.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        update: &UpdateProfile,
    ) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                 first_name = COALESCE($2, first_name), \
                 last_name = COALESCE($3, last_name), \
                 phone = COALESCE($4, phone), \
                 address = COALESCE($5, address), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SAFE_COLUMNS}"
        );
        sqlx::query_as(&query)
            .bind(id)
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.phone)
            .bind(&update.address)
            .fetch_one(pool)
            .await
    }

    pub async fn update_role(pool: &PgPool, id: DbId, role: &str) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "UPDATE users SET role = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {SAFE_COLUMNS}"
        );
        sqlx::query_as(&query).bind(id).bind(role).fetch_one(pool).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
