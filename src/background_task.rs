use tokio::time::{interval, Duration};

use crate::repositories::{featured::FeaturedProjectRepository, user::UserRepository};

const USER_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24);
const FEATURED_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Removes accounts that have been soft-deleted for longer than the retention window.
pub async fn start_purge_task<R: UserRepository>(repo: R) {
    let mut interval = interval(USER_PURGE_INTERVAL);

    loop {
        interval.tick().await;

        match repo.purge_soft_deleted_users().await {
            Ok(count) => tracing::info!("Purged {} soft-deleted users", count),
            Err(e) => tracing::error!("Purge failed: {}", e)
        }
    }
}

pub async fn start_featured_expiry_task<F: FeaturedProjectRepository>(repo: F) {
    let mut interval = interval(FEATURED_PURGE_INTERVAL);

    loop {
        interval.tick().await;

        match repo.purge_expired_featured().await {
            Ok(0) => {}
            Ok(count) => tracing::info!("Removed {} expired featured projects", count),
            Err(e) => tracing::error!("Featured purge failed: {}", e)
        }
    }
}
