//! Connection profile persistence.
//!
//! Profiles live in one JSON array file, rewritten whole on every mutation
//! (read-modify-write). A missing file reads as an empty list. Writes are
//! atomic (temp file + rename) so a crash mid-write never leaves a
//! half-written list. Single-process, single-writer assumption: concurrent
//! mutations are last-writer-wins on the whole file.

use crate::error::AppError;
use crate::models::ConnectionProfile;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Check a profile has everything needed to reach a store.
pub fn validate(profile: &ConnectionProfile) -> Result<(), AppError> {
    if profile.name.trim().is_empty() {
        return Err(AppError::Validation("profile name is required".to_string()));
    }
    if profile.host.trim().is_empty() {
        return Err(AppError::Validation("host is required".to_string()));
    }
    if profile.port == 0 {
        return Err(AppError::Validation("port is required".to_string()));
    }
    Ok(())
}

/// Load all saved profiles. A missing file is an empty list, not an error.
pub async fn load(path: &Path) -> Result<Vec<ConnectionProfile>, AppError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(AppError::Internal(format!(
            "Failed to read profiles file: {}",
            e
        ))),
    }
}

/// Rewrite the whole profiles file.
async fn save(path: &Path, profiles: &[ConnectionProfile]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_vec_pretty(profiles)?;

    // Write to temp file first, then rename (atomic on most filesystems)
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(&json).await?;
    file.sync_all().await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Save a profile, keyed by name: replaces an existing profile in place,
/// appends otherwise. Returns the updated list.
pub async fn upsert(
    path: &Path,
    profile: ConnectionProfile,
) -> Result<Vec<ConnectionProfile>, AppError> {
    validate(&profile)?;

    let mut profiles = load(path).await?;
    match profiles.iter_mut().find(|p| p.name == profile.name) {
        Some(existing) => *existing = profile,
        None => profiles.push(profile),
    }

    save(path, &profiles).await?;
    Ok(profiles)
}

/// Delete a profile by name. Deleting a name that isn't saved is a no-op.
/// Returns the updated list.
pub async fn delete(path: &Path, name: &str) -> Result<Vec<ConnectionProfile>, AppError> {
    let mut profiles = load(path).await?;
    profiles.retain(|p| p.name != name);
    save(path, &profiles).await?;
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn profile(name: &str, host: &str, port: u16) -> ConnectionProfile {
        ConnectionProfile {
            name: name.to_string(),
            host: host.to_string(),
            port,
            username: None,
            password: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("connections.json");

        let profiles = load(&path).await.unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_appends_then_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("connections.json");

        let profiles = upsert(&path, profile("local", "localhost", 6379))
            .await
            .unwrap();
        assert_eq!(profiles.len(), 1);

        let profiles = upsert(&path, profile("staging", "10.0.0.2", 6380))
            .await
            .unwrap();
        assert_eq!(profiles.len(), 2);

        // Same name replaces in place: length unchanged, old values gone,
        // position preserved.
        let profiles = upsert(&path, profile("local", "127.0.0.1", 6400))
            .await
            .unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "local");
        assert_eq!(profiles[0].host, "127.0.0.1");
        assert_eq!(profiles[0].port, 6400);
    }

    #[tokio::test]
    async fn test_upsert_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("connections.json");

        let mut saved = profile("local", "localhost", 6379);
        saved.password = Some("secret".to_string());
        upsert(&path, saved.clone()).await.unwrap();

        let profiles = load(&path).await.unwrap();
        assert_eq!(profiles, vec![saved]);
    }

    #[tokio::test]
    async fn test_delete_then_list_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("connections.json");

        upsert(&path, profile("local", "localhost", 6379))
            .await
            .unwrap();
        let profiles = delete(&path, "local").await.unwrap();
        assert!(profiles.is_empty());

        let profiles = load(&path).await.unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_name_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("connections.json");

        upsert(&path, profile("local", "localhost", 6379))
            .await
            .unwrap();
        let profiles = delete(&path, "nope").await.unwrap();
        assert_eq!(profiles.len(), 1);
    }

    #[tokio::test]
    async fn test_validation_rejects_incomplete_profiles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("connections.json");

        let err = upsert(&path, profile("", "localhost", 6379)).await;
        assert!(matches!(err, Err(AppError::Validation(_))));

        let err = upsert(&path, profile("local", "", 6379)).await;
        assert!(matches!(err, Err(AppError::Validation(_))));

        let err = upsert(&path, profile("local", "localhost", 0)).await;
        assert!(matches!(err, Err(AppError::Validation(_))));

        // Nothing was written.
        let profiles = load(&path).await.unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("connections.json");

        upsert(&path, profile("local", "localhost", 6379))
            .await
            .unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("connections.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let err = load(&path).await;
        assert!(matches!(err, Err(AppError::Internal(_))));
    }
}
