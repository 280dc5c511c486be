//! Multipart form parsing and shared query types

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use crate::services::upload::ImageUpload;

const DEFAULT_PAGE_LIMIT: i64 = 100;

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// `?skip=&limit=`
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Text fields and file parts of a multipart body
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
        })? {
            let Some(name) = field.name().map(|s| s.to_string()) else {
                continue;
            };
            let file_name = field.file_name().map(|s| s.to_string());
            let data = field.bytes().await.map_err(|e| {
                AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
            })?;

            match file_name {
                // Browsers send an empty part for an untouched file input
                Some(file_name) if !file_name.is_empty() || !data.is_empty() => {
                    form.files.insert(
                        name,
                        ImageUpload {
                            file_name,
                            data: data.to_vec(),
                        },
                    );
                }
                Some(_) => {}
                None => {
                    let text = String::from_utf8(data.to_vec()).map_err(|_| {
                        AppError::validation(format!("Field '{name}' is not valid UTF-8"))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Non-empty text field
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, AppError> {
        self.text(name)
            .map(|v| {
                v.parse().map_err(|_| {
                    AppError::validation(format!("Field '{name}' has an invalid value"))
                        .with_detail("field", name)
                })
            })
            .transpose()
    }

    pub fn require<T: FromStr>(&self, name: &str) -> Result<T, AppError> {
        self.parse(name)?.ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, format!("{name} is required"))
                .with_detail("field", name)
        })
    }

    /// Comma separated ids, e.g. `addon_ids=1,2,3`
    pub fn ids(&self, name: &str) -> Result<Option<Vec<i64>>, AppError> {
        let Some(raw) = self.fields.get(name) else {
            return Ok(None);
        };
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse().map_err(|_| {
                    AppError::validation(format!("Field '{name}' must be a list of ids"))
                        .with_detail("field", name)
                })
            })
            .collect::<Result<Vec<i64>, _>>()
            .map(Some)
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }
}
