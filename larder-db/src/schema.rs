//! Table setup for the Postgres backend
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS`; there is no versioning.
//! Hosted (REST) projects manage their schema on the service side.

use sqlx::PgPool;

/// Create the `influencers` and `recipes` tables if they are missing.
pub async fn init(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Creating larder tables if missing...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS influencers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL,
            avatar_url TEXT NOT NULL DEFAULT '',
            cover_image_url TEXT NOT NULL DEFAULT '',
            bio TEXT NOT NULL DEFAULT '',
            social_media JSONB,
            specialties TEXT[],
            followers BIGINT NOT NULL DEFAULT 0 CHECK (followers >= 0),
            recipes_count BIGINT NOT NULL DEFAULT 0 CHECK (recipes_count >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recipes (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            image_url TEXT NOT NULL DEFAULT '',
            prep_time INTEGER NOT NULL DEFAULT 0 CHECK (prep_time >= 0),
            cook_time INTEGER NOT NULL DEFAULT 0 CHECK (cook_time >= 0),
            servings INTEGER NOT NULL DEFAULT 0 CHECK (servings >= 0),
            calories INTEGER NOT NULL DEFAULT 0 CHECK (calories >= 0),
            tags TEXT[],
            ingredients JSONB,
            instructions TEXT[],
            influencer_id UUID NOT NULL REFERENCES influencers(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_influencer ON recipes(influencer_id)")
        .execute(pool)
        .await?;

    tracing::info!("Tables ready");
    Ok(())
}
