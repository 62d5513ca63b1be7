use sqlx::{query_builder::Separated, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{entities::option_fields::OptionField, errors::AppError};

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProfileRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxFeaturedRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxCommentRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxUpvoteRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxAdminRepo {
    pub pool: PgPool,
}

/// Share-locks the account row so it cannot be soft-deleted before the
/// surrounding transaction commits. A deleted account is treated like a
/// missing token.
pub async fn ensure_active_account(conn: &mut PgConnection, user_id: &Uuid) -> Result<(), AppError> {
    let active: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM users WHERE id = $1 AND deleted_at IS NULL FOR SHARE",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    match active {
        Some(_) => Ok(()),
        None => {
            tracing::warn!(user_id = %user_id, "Write attempted by a deleted account");
            Err(AppError::UnauthorizedAccess)
        }
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally in ILIKE.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Appends `column = $n` or `column = NULL` to a `SET` list; unchanged fields are skipped.
pub fn push_patch<'a>(
    set: &mut Separated<'_, 'a, Postgres, &'static str>,
    column: &str,
    value: &'a OptionField<String>,
) {
    match value {
        OptionField::Unchanged => {}
        OptionField::SetToNull => {
            set.push(format!("{column} = NULL"));
        }
        OptionField::SetToValue(v) => {
            set.push(format!("{column} = ")).push_bind_unseparated(v);
        }
    }
}
