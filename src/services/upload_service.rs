// ==================== MULTIPART UPLOADS ====================
// Streams multipart bodies to disk. Files get random names; text parts are
// collected into a map. Anything written is removed again if parsing fails.

use actix_multipart::{Field, Multipart};
use futures::stream::TryStreamExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::utils::AppError;

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Limits applied to one multipart body.
#[derive(Debug, Clone)]
pub struct UploadRules {
    /// Name of the part carrying files; file parts under any other name are rejected.
    pub file_field: &'static str,
    pub max_files: usize,
    pub max_file_bytes: usize,
    pub images_only: bool,
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Generated name inside the upload directory
    pub file_name: String,
    pub path: PathBuf,
    pub original_name: Option<String>,
    pub size: usize,
}

#[derive(Debug, Default)]
pub struct ParsedForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<StoredFile>,
}

impl ParsedForm {
    /// Trimmed value of a text part, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Removes every stored file from disk.
    pub async fn discard(&self) {
        for file in &self.files {
            if let Err(e) = tokio::fs::remove_file(&file.path).await {
                log::warn!("⚠️  Failed to remove {}: {}", file.path.display(), e);
            }
        }
    }
}

pub async fn parse_multipart(
    mut payload: Multipart,
    upload_dir: &Path,
    rules: &UploadRules,
) -> Result<ParsedForm, AppError> {
    let mut form = ParsedForm::default();

    if let Err(e) = read_parts(&mut payload, upload_dir, rules, &mut form).await {
        form.discard().await;
        return Err(e);
    }

    Ok(form)
}

async fn read_parts(
    payload: &mut Multipart,
    upload_dir: &Path,
    rules: &UploadRules,
    form: &mut ParsedForm,
) -> Result<(), AppError> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|f| f.to_string());

        match filename {
            // Browsers send an empty filename for an untouched file input
            Some(f) if f.is_empty() => drain(&mut field).await?,
            Some(original) => {
                if name != rules.file_field {
                    return Err(AppError::InvalidRequest(format!("Unexpected file field '{}'", name)));
                }
                if form.files.len() >= rules.max_files {
                    return Err(AppError::InvalidRequest(format!(
                        "Too many files: at most {} allowed",
                        rules.max_files
                    )));
                }
                if rules.images_only && !is_image(&field) {
                    return Err(AppError::InvalidRequest("Only image files are allowed".to_string()));
                }
                store_file(&mut field, upload_dir, original, rules, form).await?;
            }
            None => {
                let value = read_text(&mut field).await?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(())
}

async fn store_file(
    field: &mut Field,
    upload_dir: &Path,
    original: String,
    rules: &UploadRules,
    form: &mut ParsedForm,
) -> Result<(), AppError> {
    let file_name = format!("{}{}", Uuid::new_v4(), extension_of(&original));
    let path = upload_dir.join(&file_name);

    let mut file = tokio::fs::File::create(&path).await?;
    form.files.push(StoredFile {
        file_name,
        path,
        original_name: Some(original),
        size: 0,
    });
    let index = form.files.len() - 1;

    let mut size = 0usize;
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        size += chunk.len();
        if size > rules.max_file_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} byte limit",
                rules.max_file_bytes
            )));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    form.files[index].size = size;
    Ok(())
}

async fn read_text(field: &mut Field) -> Result<String, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::PayloadTooLarge("Form field too large".to_string()));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| AppError::InvalidRequest("Form field is not valid UTF-8".to_string()))
}

async fn drain(field: &mut Field) -> Result<(), AppError> {
    while field.try_next().await.map_err(malformed)?.is_some() {}
    Ok(())
}

fn is_image(field: &Field) -> bool {
    field
        .content_type()
        .map(|m| m.type_().as_str() == "image")
        .unwrap_or(false)
}

/// `.ext` of the client's filename, kept only when short and alphanumeric.
fn extension_of(original: &str) -> String {
    Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn malformed(e: actix_multipart::MultipartError) -> AppError {
    AppError::InvalidRequest(format!("Malformed multipart body: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("shirt.JPG"), ".jpg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("evil.p/hp"), "");
        assert_eq!(extension_of("weird.abcdefghijk"), "");
    }

    #[test]
    fn test_text_ignores_blank_values() {
        let mut form = ParsedForm::default();
        form.fields.insert("category".into(), "  Wash  ".into());
        form.fields.insert("date".into(), "   ".into());

        assert_eq!(form.text("category"), Some("Wash"));
        assert_eq!(form.text("date"), None);
        assert_eq!(form.text("time"), None);
    }

    #[tokio::test]
    async fn test_discard_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.png");
        tokio::fs::write(&path, b"png").await.unwrap();

        let form = ParsedForm {
            fields: HashMap::new(),
            files: vec![StoredFile {
                file_name: "x.png".into(),
                path: path.clone(),
                original_name: None,
                size: 3,
            }],
        };
        form.discard().await;
        assert!(!path.exists());
    }
}
