use std::borrow::Cow;

use actix_multipart::form::{bytes::Bytes as MpBytes, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::{image::ImageUpload, option_fields::OptionField};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 200;
const MAX_DESCRIPTION_LENGTH: u64 = 5_000;
const MAX_LINK_LENGTH: u64 = 2_048;
const MAX_SHORT_TEXT_LENGTH: u64 = 100;
const MAX_TECHNOLOGIES_LENGTH: u64 = 1_000;

// ───── Database Models ───────────────────────────────────────────────

/// One portfolio entry. `image_url` is either empty or a remote media-store URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub live_link: Option<String>,
    pub github: Option<String>,
    pub category: Option<String>,
    pub technologies: Vec<String>,
    pub year: Option<String>,
    pub image_url: String,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProjectInsert {
    pub title: String,
    pub description: Option<String>,
    pub live_link: Option<String>,
    pub github: Option<String>,
    pub category: Option<String>,
    pub technologies: Vec<String>,
    pub year: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field-by-field changes applied by the repository. `Unchanged` columns keep
/// their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: OptionField<String>,
    pub description: OptionField<String>,
    pub live_link: OptionField<String>,
    pub github: OptionField<String>,
    pub category: OptionField<String>,
    pub technologies: OptionField<Vec<String>>,
    pub year: OptionField<String>,
    pub image_url: OptionField<String>,
    pub expected_revision: Option<i32>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Default, Validate)]
pub struct NewProjectRequest {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(length(max = MAX_LINK_LENGTH))]
    pub live_link: Option<String>,

    #[validate(length(max = MAX_LINK_LENGTH))]
    pub github: Option<String>,

    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub category: Option<String>,

    /// Comma-separated, as typed into the form.
    #[validate(length(max = MAX_TECHNOLOGIES_LENGTH))]
    pub technologies: Option<String>,

    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateProjectRequest {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "Title cannot be empty"),
        custom(function = "validate_optional_title")
    )]
    pub title: OptionField<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: OptionField<String>,

    #[validate(length(max = MAX_LINK_LENGTH))]
    pub live_link: OptionField<String>,

    #[validate(length(max = MAX_LINK_LENGTH))]
    pub github: OptionField<String>,

    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub category: OptionField<String>,

    #[validate(length(max = MAX_TECHNOLOGIES_LENGTH))]
    pub technologies: OptionField<String>,

    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub year: OptionField<String>,

    pub expected_revision: Option<i32>,
}

/// Multipart body of `POST /projects` and `PUT /projects/{id}`.
///
/// Every text part is optional so that an omitted part can be told apart from
/// one sent empty.
#[derive(Debug, MultipartForm)]
pub struct ProjectUpload {
    pub title: Option<Text<String>>,
    pub description: Option<Text<String>>,
    #[multipart(rename = "liveLink")]
    pub live_link: Option<Text<String>>,
    pub github: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub technologies: Option<Text<String>>,
    pub year: Option<Text<String>>,
    #[multipart(rename = "expectedRevision")]
    pub expected_revision: Option<Text<i32>>,
    pub image: Option<MpBytes>,
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(new_validation_error("blank", "Title is required"));
    }
    Ok(())
}

pub fn validate_optional_title(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(title) = value {
        if title.trim().is_empty() {
            return Err(new_validation_error("blank", "Title cannot be empty"));
        }
    }
    Ok(())
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

// ───── Technologies ─────────────────────────────────────────────────

/// Splits comma-delimited input into trimmed tags, preserving order.
/// Empty input, and empty elements between commas, yield nothing.
pub fn parse_technologies(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical comma-separated form, re-parseable by [`parse_technologies`].
pub fn join_technologies(technologies: &[String]) -> String {
    technologies.join(", ")
}

// ───── Conversions ──────────────────────────────────────────────────

impl NewProjectRequest {
    pub fn prepare_for_insert(self, image_url: String) -> ProjectInsert {
        let now = Utc::now();

        ProjectInsert {
            title: self.title.trim().to_string(),
            description: self.description,
            live_link: self.live_link,
            github: self.github,
            category: self.category,
            technologies: self.technologies
                .as_deref()
                .map(parse_technologies)
                .unwrap_or_default(),
            year: self.year,
            image_url,
            created_at: now,
            updated_at: now,
        }
    }
}

impl UpdateProjectRequest {
    pub fn prepare_for_update(self, image_url: OptionField<String>) -> ProjectChanges {
        ProjectChanges {
            title: self.title.map_value(|t| t.trim().to_string()),
            description: self.description,
            live_link: self.live_link,
            github: self.github,
            category: self.category,
            technologies: self.technologies.map_value(|raw| parse_technologies(&raw)),
            year: self.year,
            image_url,
            expected_revision: self.expected_revision,
        }
    }
}

impl ProjectUpload {
    fn take_image(image: Option<MpBytes>) -> Option<ImageUpload> {
        // Only a file part counts: a plain `image` text field (e.g. "null"
        // from an unset file input) or a zero-length file is no image
        image
            .filter(|part| part.file_name.is_some() && !part.data.is_empty())
            .map(|part| ImageUpload::new(
                part.data.to_vec(),
                part.content_type.map(|mime| mime.to_string()),
                part.file_name,
            ))
    }

    pub fn into_new_project(self) -> (NewProjectRequest, Option<ImageUpload>) {
        let request = NewProjectRequest {
            title: self.title.map(Text::into_inner).unwrap_or_default(),
            description: self.description.map(Text::into_inner),
            live_link: self.live_link.map(Text::into_inner),
            github: self.github.map(Text::into_inner),
            category: self.category.map(Text::into_inner),
            technologies: self.technologies.map(Text::into_inner),
            year: self.year.map(Text::into_inner),
        };

        (request, Self::take_image(self.image))
    }

    pub fn into_project_update(self) -> (UpdateProjectRequest, Option<ImageUpload>) {
        let request = UpdateProjectRequest {
            title: OptionField::from_option(self.title.map(Text::into_inner)),
            description: OptionField::from_option(self.description.map(Text::into_inner)),
            live_link: OptionField::from_option(self.live_link.map(Text::into_inner)),
            github: OptionField::from_option(self.github.map(Text::into_inner)),
            category: OptionField::from_option(self.category.map(Text::into_inner)),
            technologies: OptionField::from_option(self.technologies.map(Text::into_inner)),
            year: OptionField::from_option(self.year.map(Text::into_inner)),
            expected_revision: self.expected_revision.map(Text::into_inner),
        };

        (request, Self::take_image(self.image))
    }
}

impl Project {
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}
