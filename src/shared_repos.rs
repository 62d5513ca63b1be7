use crate::repositories::sqlx_repo::{
    SqlxAdminRepo, SqlxCommentRepo, SqlxFeaturedRepo, SqlxProfileRepo, SqlxProjectRepo,
    SqlxUpvoteRepo, SqlxUserRepo,
};

/// One Postgres-backed repository per aggregate, all sharing the same pool.
#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: SqlxUserRepo,
    pub profile_repo: SqlxProfileRepo,
    pub project_repo: SqlxProjectRepo,
    pub featured_repo: SqlxFeaturedRepo,
    pub comment_repo: SqlxCommentRepo,
    pub upvote_repo: SqlxUpvoteRepo,
    pub admin_repo: SqlxAdminRepo,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            user_repo: SqlxUserRepo::new(pool.clone()),
            profile_repo: SqlxProfileRepo::new(pool.clone()),
            project_repo: SqlxProjectRepo::new(pool.clone()),
            featured_repo: SqlxFeaturedRepo::new(pool.clone()),
            comment_repo: SqlxCommentRepo::new(pool.clone()),
            upvote_repo: SqlxUpvoteRepo::new(pool.clone()),
            admin_repo: SqlxAdminRepo::new(pool),
        }
    }
}
