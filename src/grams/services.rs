//! Gram use-cases.
//!
//! Every mutating action checks, in this order and stopping at the first
//! failure: caller signed in, gram exists, caller owns it, input valid.
//! Reads need no caller.

use anyhow::Context;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{GramDetails, GramForm, GramView, Pagination},
    policy::authorize_mutation,
    repo_types::{Gram, NewGram},
    validation::{validate_message_update, validate_new_gram, GramInput, PicturePolicy},
};
use crate::{
    auth::{require_user, User},
    comments::dto::CommentView,
    error::{AppError, AppResult},
    lookup::resolve_gram,
    state::AppState,
    storage::picture_key,
};

pub async fn list_grams(state: &AppState, page: &Pagination) -> AppResult<Vec<GramView>> {
    let (limit, offset) = page.bounds();
    let grams = state.grams.list(limit, offset).await?;
    let mut out = Vec::with_capacity(grams.len());
    for g in grams {
        out.push(to_view(state, g).await);
    }
    Ok(out)
}

pub async fn show_gram(state: &AppState, raw_id: &str) -> AppResult<GramDetails> {
    let gram = resolve_gram(state, raw_id).await?;
    let comments = state.comments.list_by_gram(gram.id).await?;
    Ok(GramDetails {
        gram: to_view(state, gram).await,
        comments: comments.into_iter().map(CommentView::from).collect(),
    })
}

pub fn new_gram_form(state: &AppState, caller: Option<&User>) -> AppResult<GramForm> {
    require_user(caller)?;
    Ok(GramForm {
        gram_id: None,
        message: String::new(),
        picture_required: picture_policy(state) == PicturePolicy::Required,
    })
}

pub async fn create_gram(
    state: &AppState,
    caller: Option<&User>,
    input: GramInput,
) -> AppResult<Gram> {
    let user = require_user(caller)?;
    validate_new_gram(&input, picture_policy(state))?;

    let id = Uuid::new_v4();
    let message = input.message.clone();
    let key = match input.into_picture() {
        Some(picture) => {
            let ext = picture.extension().unwrap_or("bin");
            let key = picture_key(user.id, id, ext);
            state
                .storage
                .put_object(&key, picture.body, &picture.content_type)
                .await
                .with_context(|| format!("upload picture for gram {}", id))?;
            Some(key)
        }
        None => None,
    };

    let row = NewGram {
        id,
        user_id: user.id,
        message,
        picture_key: key.clone(),
    };
    match state.grams.insert(row).await {
        Ok(gram) => {
            info!(gram_id = %gram.id, user_id = %user.id, has_picture = gram.picture_key.is_some(), "gram created");
            Ok(gram)
        }
        Err(e) => {
            if let Some(key) = key {
                discard_picture(state, &key).await;
            }
            Err(e.into())
        }
    }
}

pub async fn edit_gram_form(
    state: &AppState,
    caller: Option<&User>,
    raw_id: &str,
) -> AppResult<GramForm> {
    let gram = load_owned(state, caller, raw_id).await?;
    Ok(GramForm {
        gram_id: Some(gram.id),
        message: gram.message,
        picture_required: picture_policy(state) == PicturePolicy::Required,
    })
}

pub async fn update_gram(
    state: &AppState,
    caller: Option<&User>,
    raw_id: &str,
    message: &str,
) -> AppResult<Gram> {
    let gram = load_owned(state, caller, raw_id).await?;
    validate_message_update(message)?;

    let updated = state
        .grams
        .update_message(gram.id, message)
        .await?
        .ok_or(AppError::NotFound("gram"))?;
    info!(gram_id = %updated.id, "gram updated");
    Ok(updated)
}

pub async fn destroy_gram(state: &AppState, caller: Option<&User>, raw_id: &str) -> AppResult<Uuid> {
    let gram = load_owned(state, caller, raw_id).await?;

    // A concurrent destroy may have won since the lookup.
    if !state.grams.delete(gram.id).await? {
        return Err(AppError::NotFound("gram"));
    }
    if let Some(key) = &gram.picture_key {
        discard_picture(state, key).await;
    }
    info!(gram_id = %gram.id, "gram destroyed");
    Ok(gram.id)
}

/// Auth, then lookup, then ownership.
async fn load_owned(state: &AppState, caller: Option<&User>, raw_id: &str) -> AppResult<Gram> {
    let user = require_user(caller)?;
    let gram = resolve_gram(state, raw_id).await?;
    authorize_mutation(user, &gram)?;
    Ok(gram)
}

fn picture_policy(state: &AppState) -> PicturePolicy {
    PicturePolicy::from_config(&state.config.grams)
}

async fn discard_picture(state: &AppState, key: &str) {
    if let Err(e) = state.storage.delete_object(key).await {
        warn!(error = %e, key, "failed to delete picture object");
    }
}

/// Public view of a gram. A picture that cannot be presigned is left out
/// rather than failing a read of data that is already committed.
pub async fn to_view(state: &AppState, g: Gram) -> GramView {
    let picture_url = match &g.picture_key {
        Some(key) => match state
            .storage
            .presign_get(key, state.config.grams.picture_url_ttl_secs)
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, gram_id = %g.id, key = %key, "failed to presign picture url");
                None
            }
        },
        None => None,
    };
    GramView {
        id: g.id,
        user_id: g.user_id,
        message: g.message,
        picture_url,
        created_at: g.created_at,
        updated_at: g.updated_at,
    }
}
