//! File Object Storage - 文件系统对象存储实现
//!
//! 实现 ObjectStoragePort trait，对象通过 `/files/{key}` 静态路由公开

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ObjectStorageError, ObjectStoragePort, StoredObject};

/// 文件系统对象存储
pub struct FileObjectStorage {
    /// 存储根目录
    base_dir: PathBuf,
    /// 公开访问前缀，如 `http://localhost:5060/files`
    public_base_url: String,
}

impl FileObjectStorage {
    /// 创建新的文件存储
    pub async fn new(
        base_dir: impl AsRef<Path>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, ObjectStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ObjectStorageError::IoError(e.to_string()))?;

        Ok(Self {
            base_dir,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// key 只允许 `[A-Za-z0-9._-]` 组成的相对路径段
    fn object_path(&self, key: &str) -> Result<PathBuf, ObjectStorageError> {
        let valid = !key.is_empty()
            && key.split('/').all(|segment| {
                !segment.is_empty()
                    && segment != "."
                    && segment != ".."
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            });

        if !valid {
            return Err(ObjectStorageError::InvalidKey(key.to_string()));
        }

        Ok(self.base_dir.join(key))
    }
}

#[async_trait]
impl ObjectStoragePort for FileObjectStorage {
    async fn put(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<StoredObject, ObjectStorageError> {
        let path = self.object_path(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ObjectStorageError::IoError(e.to_string()))?;
        }

        fs::write(&path, data)
            .await
            .map_err(|e| ObjectStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            key = %key,
            content_type = %content_type,
            size = data.len(),
            "Object stored"
        );

        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_writes_under_key() {
        let temp_dir = tempdir().unwrap();
        let storage = FileObjectStorage::new(temp_dir.path(), "http://localhost:5060/files/")
            .await
            .unwrap();

        let stored = storage
            .put("covers/1700000000000-bia.png", b"png bytes", "image/png")
            .await
            .unwrap();
        assert_eq!(stored.size, 9);
        assert_eq!(
            stored.url,
            "http://localhost:5060/files/covers/1700000000000-bia.png"
        );

        let data = fs::read(temp_dir.path().join("covers/1700000000000-bia.png"))
            .await
            .unwrap();
        assert_eq!(data, b"png bytes");

        // 同 key 覆盖
        storage
            .put("covers/1700000000000-bia.png", b"v2", "image/png")
            .await
            .unwrap();
        let data = fs::read(temp_dir.path().join("covers/1700000000000-bia.png"))
            .await
            .unwrap();
        assert_eq!(data, b"v2");
    }

    #[tokio::test]
    async fn test_rejects_unsafe_keys() {
        let temp_dir = tempdir().unwrap();
        let storage = FileObjectStorage::new(temp_dir.path(), "http://x/files")
            .await
            .unwrap();

        for key in ["", "../etc/passwd", "/abs", "a//b", "chapters/tên.txt", "a\\b"] {
            assert!(
                matches!(
                    storage.put(key, b"x", "text/plain").await,
                    Err(ObjectStorageError::InvalidKey(_))
                ),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
