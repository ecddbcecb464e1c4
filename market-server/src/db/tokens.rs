//! Refresh token persistence
//!
//! Refresh tokens are opaque uuid strings stored server-side. A user has
//! at most one live token: issuing a new one ends the previous session,
//! and rotation claims the presented token before handing out the next.

use shared::util::now_millis;
use sqlx::PgPool;
use uuid::Uuid;

const REFRESH_TTL_DAYS: i64 = 30;

fn expiry_from(now: i64) -> i64 {
    now + REFRESH_TTL_DAYS * 24 * 60 * 60 * 1000
}

/// Store a fresh token for the user, ending any previous session.
pub async fn issue(pool: &PgPool, user_id: i64) -> Result<String, sqlx::Error> {
    let token = Uuid::new_v4().to_string();
    let now = now_millis();

    sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND NOT revoked")
        .bind(user_id)
        .execute(pool)
        .await?;

    sqlx::query(
        "INSERT INTO refresh_tokens (id, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(now)
    .bind(expiry_from(now))
    .execute(pool)
    .await?;

    Ok(token)
}

/// Exchange a live token for a new one. Returns the owning user and the
/// replacement token, or None when the token is unknown, revoked or
/// expired.
///
/// The UPDATE both validates and revokes: it matches only a live,
/// unexpired token, and two rotations of the same token cannot both
/// match.
pub async fn rotate(
    pool: &PgPool,
    refresh_token: &str,
) -> Result<Option<(i64, String)>, sqlx::Error> {
    let claimed: Option<(i64,)> = sqlx::query_as(
        "UPDATE refresh_tokens SET revoked = TRUE \
         WHERE id = $1 AND NOT revoked AND expires_at > $2 \
         RETURNING user_id",
    )
    .bind(refresh_token)
    .bind(now_millis())
    .fetch_optional(pool)
    .await?;

    let Some((user_id,)) = claimed else {
        return Ok(None);
    };

    let next = issue(pool, user_id).await?;
    Ok(Some((user_id, next)))
}

/// Logout: revoke every live token the user still has.
pub async fn revoke_all(pool: &PgPool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND NOT revoked")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
