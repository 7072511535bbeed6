//! 上传文件存储
//!
//! 图片：解码校验 -> 统一转 JPEG -> 以内容哈希命名，相同内容
//! 只落盘一次。附件：保留扩展名，uuid 命名。返回值都是相对
//! uploads 目录的路径，直接可拼到 /uploads/ 下访问。

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::utils::{AppError, AppResult};

/// 图片大小上限 5 MB
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const JPEG_QUALITY: u8 = 85;

#[derive(Clone)]
pub struct UploadStore {
    uploads_dir: PathBuf,
}

impl UploadStore {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    /// 保存商品/厨师图片，返回 "images/<hash>.jpg"
    pub fn save_image(&self, bytes: &[u8]) -> AppResult<String> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::validation(format!(
                "Image exceeds {} bytes",
                MAX_IMAGE_BYTES
            )));
        }
        let img = image::load_from_memory(bytes)
            .map_err(|e| AppError::validation(format!("Unsupported image: {e}")))?;

        let hash = hex::encode(Sha256::digest(bytes));
        let relative = format!("images/{hash}.jpg");
        let target = self.uploads_dir.join(&relative);
        if target.exists() {
            return Ok(relative);
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::internal(format!("Failed to create uploads dir: {e}")))?;
        }
        let file = std::fs::File::create(&target)
            .map_err(|e| AppError::internal(format!("Failed to write image: {e}")))?;
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(std::io::BufWriter::new(file), JPEG_QUALITY);
        encoder
            .encode_image(&img)
            .map_err(|e| AppError::internal(format!("Failed to encode image: {e}")))?;

        tracing::debug!(path = %relative, "Stored image");
        Ok(relative)
    }

    /// 保存支出附件，返回 "expenses/<uuid>.<ext>"
    ///
    /// 扩展名优先取文件名，缺失时按 content type 推断。
    pub fn save_attachment(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::validation("Empty attachment"));
        }
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(char::is_alphanumeric))
            .map(str::to_lowercase)
            .or_else(|| {
                content_type
                    .and_then(mime_guess::get_mime_extensions_str)
                    .and_then(|exts| exts.first())
                    .map(|e| e.to_string())
            })
            .unwrap_or_else(|| "bin".to_string());
        let relative = format!("expenses/{}.{extension}", uuid::Uuid::new_v4());
        let target = self.uploads_dir.join(&relative);

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::internal(format!("Failed to create uploads dir: {e}")))?;
        }
        std::fs::write(&target, bytes)
            .map_err(|e| AppError::internal(format!("Failed to write attachment: {e}")))?;

        tracing::debug!(path = %relative, "Stored attachment");
        Ok(relative)
    }

    /// 删除已存储文件；文件不存在视为成功
    pub fn delete(&self, relative: &str) -> AppResult<()> {
        if relative.contains("..") || relative.starts_with('/') {
            return Err(AppError::validation(format!("Invalid path: {relative}")));
        }
        let target = self.uploads_dir.join(relative);
        match std::fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!("Failed to delete file: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(4, 4);
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn identical_content_stored_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let bytes = png_bytes();
        let first = store.save_image(&bytes).unwrap();
        let second = store.save_image(&bytes).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("images/"));
        assert!(first.ends_with(".jpg"));
        assert!(dir.path().join(&first).exists());
    }

    #[test]
    fn garbage_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        assert!(store.save_image(b"not an image").is_err());
    }

    #[test]
    fn attachment_keeps_extension_and_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let path = store
            .save_attachment("receipt.PDF", None, b"%PDF-1.4")
            .unwrap();
        assert!(path.starts_with("expenses/"));
        assert!(path.ends_with(".pdf"));

        let guessed = store
            .save_attachment("receipt", Some("application/pdf"), b"%PDF-1.4")
            .unwrap();
        assert!(guessed.ends_with(".pdf"));
        assert!(dir.path().join(&path).exists());

        store.delete(&path).unwrap();
        assert!(!dir.path().join(&path).exists());
        store.delete(&path).unwrap();
    }

    #[test]
    fn traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        assert!(store.delete("../etc/passwd").is_err());
    }
}
