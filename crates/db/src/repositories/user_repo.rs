//! Repository for the `users` table and its `user_locations` links.

use classifieds_core::roles::UserRole;
use classifieds_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user::{CreateUser, UpdateUser, UserWithLocations};

/// User columns plus location ids and names, both ordered by location name.
const SELECT_WITH_LOCATIONS: &str = "SELECT u.id, u.first_name, u.last_name, u.user_name,
            u.password_hash, u.role, u.age, u.created_at, u.updated_at,
            COALESCE(
                ARRAY_AGG(l.id ORDER BY l.name, l.id) FILTER (WHERE l.id IS NOT NULL),
                '{}'
            ) AS location_ids,
            COALESCE(
                ARRAY_AGG(l.name ORDER BY l.name, l.id) FILTER (WHERE l.id IS NOT NULL),
                '{}'
            ) AS location_names
     FROM users u
     LEFT JOIN user_locations ul ON ul.user_id = u.id
     LEFT JOIN locations l ON l.id = ul.location_id";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user and link their locations in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUser,
    ) -> Result<UserWithLocations, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO users (first_name, last_name, user_name, password_hash, role, age)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.user_name)
        .bind(&input.password_hash)
        .bind(input.role.as_str())
        .bind(input.age)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_locations(&mut tx, id, &input.location_ids).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a user by ID, including their locations.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserWithLocations>, sqlx::Error> {
        let query = format!("{SELECT_WITH_LOCATIONS} WHERE u.id = $1 GROUP BY u.id");
        sqlx::query_as::<_, UserWithLocations>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by `user_name`.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserWithLocations>, sqlx::Error> {
        let query = format!("{SELECT_WITH_LOCATIONS} GROUP BY u.id ORDER BY u.user_name, u.id");
        sqlx::query_as::<_, UserWithLocations>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied; a new
    /// location list replaces the old one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<UserWithLocations>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                user_name = COALESCE($4, user_name),
                password_hash = COALESCE($5, password_hash),
                role = COALESCE($6, role),
                age = COALESCE($7, age),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.user_name)
        .bind(&input.password_hash)
        .bind(input.role.map(UserRole::as_str))
        .bind(input.age)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(location_ids) = &input.location_ids {
            Self::replace_locations(&mut tx, id, location_ids).await?;
        }
        tx.commit().await?;

        Self::find_by_id(pool, id).await
    }

    /// Delete a user and, by cascade, their ads. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_locations(
        conn: &mut PgConnection,
        user_id: DbId,
        location_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM user_locations WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        if location_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO user_locations (user_id, location_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(location_ids)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
