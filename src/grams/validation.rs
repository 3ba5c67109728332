use bytes::Bytes;

use crate::{
    config::GramConfig,
    validation::{require_present, ValidationErrors, BLANK},
};

const NOT_AN_IMAGE: &str = "must be a jpeg, png, gif, webp or heic image";

/// Whether a gram may be created without a picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PicturePolicy {
    Optional,
    Required,
}

impl PicturePolicy {
    pub fn from_config(cfg: &GramConfig) -> Self {
        if cfg.require_picture {
            Self::Required
        } else {
            Self::Optional
        }
    }
}

#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub body: Bytes,
    pub content_type: String,
}

impl PictureUpload {
    pub fn extension(&self) -> Option<&'static str> {
        ext_from_mime(&self.content_type)
    }
}

/// Submitted values of the new-gram form.
#[derive(Debug, Clone, Default)]
pub struct GramInput {
    pub message: String,
    pub picture: Option<PictureUpload>,
}

impl GramInput {
    /// An empty file part counts as no picture.
    pub fn picture(&self) -> Option<&PictureUpload> {
        self.picture.as_ref().filter(|p| !p.body.is_empty())
    }

    pub fn into_picture(self) -> Option<PictureUpload> {
        self.picture.filter(|p| !p.body.is_empty())
    }
}

pub fn validate_new_gram(input: &GramInput, policy: PicturePolicy) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_present(&mut errors, "message", &input.message);
    match input.picture() {
        Some(p) if p.extension().is_none() => errors.add("picture", NOT_AN_IMAGE),
        Some(_) => {}
        None if policy == PicturePolicy::Required => errors.add("picture", BLANK),
        None => {}
    }
    errors.into_result()
}

pub fn validate_message_update(message: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_present(&mut errors, "message", message);
    errors.into_result()
}

pub(crate) fn ext_from_mime(ct: &str) -> Option<&'static str> {
    let essence = ct.split(';').next().unwrap_or_default().trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
