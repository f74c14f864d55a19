use crate::errors::AppError;
use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::error;

/// Reads the snapshot. A missing file is an empty store; an unreadable or
/// corrupt one is logged and also treated as empty.
pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(|err| {
        error!("failed to write data file: {err}");
        AppError::internal(err)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Child;
    use chrono::Utc;
    use uuid::Uuid;

    fn temp_path(tag: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("weekly_tracker_{tag}_{}.json", Uuid::new_v4()));
        path
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let data = load_data(&temp_path("missing")).await;
        assert!(data.children.is_empty());
        assert!(data.objectives.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{ not json").await.unwrap();
        let data = load_data(&path).await;
        assert!(data.daily_logs.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_tables_use_remote_names() {
        let path = temp_path("persist");
        let mut data = AppData::default();
        data.children.push(Child {
            id: Uuid::new_v4(),
            name: "Tom".to_string(),
            created_at: Utc::now(),
        });
        persist_data(&path, &data).await.unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).await.unwrap()).unwrap();
        assert!(raw.get("objective_exclusions").is_some());
        assert!(raw.get("point_transactions").is_some());

        let loaded = load_data(&path).await;
        assert_eq!(loaded.children.len(), 1);
        assert_eq!(loaded.children[0].name, "Tom");
        let _ = fs::remove_file(&path).await;
    }
}
