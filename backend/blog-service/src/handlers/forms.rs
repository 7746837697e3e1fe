/// Request bodies: urlencoded forms and buffered multipart uploads
use crate::error::{AppError, Result};
use crate::storage::{ImageUpload, MAX_IMAGE_BYTES};
use actix_multipart::Multipart;
use futures_util::StreamExt;
use serde::Deserialize;
use std::collections::HashMap;

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub content: String,
}

/// Multipart body split into text fields and image files.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text field or empty string
    pub fn text_or_empty(&self, name: &str) -> &str {
        self.text(name).unwrap_or("")
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }
}

/// Buffer a multipart body. Parts named in `file_fields` are read as images
/// (an empty file part counts as no file); everything else as UTF-8 text.
pub async fn read_multipart(mut payload: Multipart, file_fields: &[&str]) -> Result<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(field) = payload.next().await {
        let mut field = field?;

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let is_file = file_fields.contains(&name.as_str());
        let limit = if is_file {
            MAX_IMAGE_BYTES
        } else {
            MAX_TEXT_FIELD_BYTES
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if bytes.len() + data.len() > limit {
                return Err(if is_file {
                    AppError::invalid_field(&name, "image must be 5 MB or smaller")
                } else {
                    AppError::invalid_field(&name, "field is too long")
                });
            }
            bytes.extend_from_slice(&data);
        }

        if is_file {
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default()
                .to_string();
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }

            form.files.insert(
                name.clone(),
                ImageUpload {
                    field: name,
                    file_name,
                    content_type: field.content_type().cloned(),
                    bytes,
                },
            );
        } else {
            let value = String::from_utf8(bytes)
                .map_err(|_| AppError::invalid_field(&name, "must be valid UTF-8 text"))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
