use tracing::instrument;

use fauxrest_core::AppError;
use fauxrest_store::{User, UserLookup};

pub struct UserService;

impl UserService {
    #[instrument(skip(users))]
    pub async fn current_user<L>(users: &L, slug: &str) -> Result<User, AppError>
    where
        L: UserLookup,
    {
        Ok(users.find_by_slug(slug).await?)
    }
}
