//! Repository for the `ads` table.

use classifieds_core::types::DbId;
use sqlx::PgPool;

use crate::models::ad::{AdListing, CreateAd, UpdateAd};

/// Ad columns plus the author's first name and location names.
const LISTING_SELECT: &str = "SELECT a.id, a.name, a.author_id, a.price, a.description,
            a.is_published, a.category_id, a.image, a.created_at, a.updated_at,
            u.first_name AS author_first_name,
            COALESCE(
                ARRAY_AGG(l.name ORDER BY l.name) FILTER (WHERE l.id IS NOT NULL),
                '{}'
            ) AS author_locations
     FROM ads a
     JOIN users u ON u.id = a.author_id
     LEFT JOIN user_locations ul ON ul.user_id = u.id
     LEFT JOIN locations l ON l.id = ul.location_id";

const LISTING_GROUP_BY: &str = "GROUP BY a.id, u.first_name";

/// Provides CRUD operations for ads.
pub struct AdRepo;

impl AdRepo {
    /// Insert a new ad, returning it joined with its author data.
    pub async fn create(pool: &PgPool, input: &CreateAd) -> Result<AdListing, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO ads (name, author_id, price, description, is_published, category_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.author_id)
        .bind(input.price)
        .bind(&input.description)
        .bind(input.is_published)
        .bind(input.category_id)
        .fetch_one(pool)
        .await?;

        Self::find_listing(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find an ad with its author data.
    pub async fn find_listing(pool: &PgPool, id: DbId) -> Result<Option<AdListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} WHERE a.id = $1 {LISTING_GROUP_BY}");
        sqlx::query_as::<_, AdListing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every ad with its author data, ordered by id.
    pub async fn list_listings(pool: &PgPool) -> Result<Vec<AdListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} {LISTING_GROUP_BY} ORDER BY a.id");
        sqlx::query_as::<_, AdListing>(&query).fetch_all(pool).await
    }

    /// Replace an ad's editable fields.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAd,
    ) -> Result<Option<AdListing>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE ads SET
                name = $2,
                author_id = $3,
                price = $4,
                description = $5,
                category_id = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.author_id)
        .bind(input.price)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_listing(pool, id).await,
            None => Ok(None),
        }
    }

    /// Set or clear the image storage key.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_image(
        pool: &PgPool,
        id: DbId,
        image: Option<&str>,
    ) -> Result<Option<AdListing>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE ads SET image = $2, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(image)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_listing(pool, id).await,
            None => Ok(None),
        }
    }

    /// Delete an ad by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
