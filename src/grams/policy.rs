use tracing::warn;

use super::repo_types::Gram;
use crate::{
    auth::User,
    error::{AppError, AppResult},
};

/// Only the owner may edit, update or destroy a gram.
pub fn can_mutate(user: &User, gram: &Gram) -> bool {
    gram.user_id == user.id
}

pub fn authorize_mutation(user: &User, gram: &Gram) -> AppResult<()> {
    if can_mutate(user, gram) {
        Ok(())
    } else {
        warn!(user_id = %user.id, gram_id = %gram.id, owner_id = %gram.user_id, "gram mutation forbidden");
        Err(AppError::Forbidden("gram"))
    }
}
