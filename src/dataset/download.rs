use crate::dataset::error::DatasetError;
use crate::types::export_format::{DatasetVariant, ExportFormat};
use log::info;
use std::path::{Path, PathBuf};

/// An encoded table ready to be handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub variant: DatasetVariant,
    pub format: ExportFormat,
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes the bytes to `dir/file_name`, creating `dir` if needed.
    ///
    /// An existing file with the same name is overwritten.
    ///
    /// # Returns
    ///
    /// The path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::ExportDirCreation`] or [`DatasetError::ExportWrite`]
    /// on I/O failure.
    pub async fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf, DatasetError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DatasetError::ExportDirCreation(dir.to_path_buf(), e))?;

        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| DatasetError::ExportWrite(path.clone(), e))?;

        info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// The user's download directory, falling back to the working directory.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn download() -> Download {
        Download {
            variant: DatasetVariant::Complete,
            format: ExportFormat::Csv,
            file_name: "count_prod_76_2024-01-01_2024-01-02_complete.csv".to_string(),
            mime: ExportFormat::Csv.mime_type(),
            bytes: b"AccountId\n76\n".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_save_in_creates_directory() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let dir = temp.path().join("exports").join("76");
        let path = download().save_in(&dir).await?;

        assert_eq!(path, dir.join("count_prod_76_2024-01-01_2024-01-02_complete.csv"));
        assert_eq!(tokio::fs::read(&path).await?, b"AccountId\n76\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_save_in_overwrites() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let mut first = download();
        first.bytes = b"old".to_vec();
        first.save_in(temp.path()).await?;
        let path = download().save_in(temp.path()).await?;
        assert_eq!(tokio::fs::read(&path).await?, b"AccountId\n76\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_save_in_reports_unwritable_directory() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let blocker = temp.path().join("not_a_dir");
        tokio::fs::write(&blocker, b"x").await?;

        let result = download().save_in(blocker.join("sub")).await;
        assert!(matches!(result, Err(DatasetError::ExportDirCreation(_, _))));
        Ok(())
    }
}
