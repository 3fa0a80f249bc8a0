use crate::models::user::UserIdentity;
use anyhow::{Context, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

const TOKEN_FILE: &str = "access_token";
const USER_FILE: &str = "user.json";

/// Durable slots for the bearer token and the last-known user record
pub trait TokenStore: Send + Sync {
    fn load_token(&self) -> Result<Option<String>>;

    fn store_token(&self, token: &str) -> Result<()>;

    /// Cached user record, for display only; never trusted as proof of identity
    fn load_cached_user(&self) -> Result<Option<UserIdentity>>;

    fn store_cached_user(&self, user: &UserIdentity) -> Result<()>;

    /// Remove both slots
    fn clear(&self) -> Result<()>;

    /// Remove both slots only while `token` is still the persisted one.
    /// Returns whether anything was cleared.
    fn clear_if(&self, token: &str) -> Result<bool>;
}

/// Token store backed by two files in a directory
pub struct FileTokenStore {
    dir: PathBuf,
    // serializes writers inside this process
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .context(format!("Failed to create session directory: {}", dir.display()))?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_locked(&self) -> Result<()> {
        remove_optional(&self.token_path())?;
        remove_optional(&self.user_path())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).context(format!("Failed to read {}", path.display())),
    }
}

fn remove_optional(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context(format!("Failed to remove {}", path.display())),
    }
}

/// Write through a temp file so a crash never leaves a half-written slot
fn write_private(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(&tmp)
        .context(format!("Failed to create {}", tmp.display()))?;

    // the mode above only applies to newly created files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .context(format!("Failed to restrict permissions on {}", tmp.display()))?;
    }

    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .context(format!("Failed to write {}", tmp.display()))?;
    drop(file);

    fs::rename(&tmp, path).context(format!("Failed to replace {}", path.display()))?;
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn load_token(&self) -> Result<Option<String>> {
        Ok(read_optional(&self.token_path())?
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty()))
    }

    fn store_token(&self, token: &str) -> Result<()> {
        let _guard = self.lock();
        write_private(&self.token_path(), token)
    }

    fn load_cached_user(&self) -> Result<Option<UserIdentity>> {
        let Some(content) = read_optional(&self.user_path())? else {
            return Ok(None);
        };

        match serde_json::from_str(&content) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cached user record");
                Ok(None)
            }
        }
    }

    fn store_cached_user(&self, user: &UserIdentity) -> Result<()> {
        let content = serde_json::to_string(user).context("Failed to encode cached user")?;
        let _guard = self.lock();
        write_private(&self.user_path(), &content)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock();
        self.clear_locked()
    }

    fn clear_if(&self, token: &str) -> Result<bool> {
        let _guard = self.lock();
        if self.load_token()?.as_deref() != Some(token) {
            return Ok(false);
        }
        self.clear_locked()?;
        Ok(true)
    }
}

#[derive(Default)]
struct Slots {
    token: Option<String>,
    user: Option<UserIdentity>,
}

/// Non-durable token store, used when no storage directory is configured
#[derive(Default)]
pub struct MemoryTokenStore {
    slots: Mutex<Slots>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.slots_mut().token = Some(token.to_string());
        store
    }

    fn slots_mut(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_token(&self) -> Result<Option<String>> {
        Ok(self.slots_mut().token.clone())
    }

    fn store_token(&self, token: &str) -> Result<()> {
        self.slots_mut().token = Some(token.to_string());
        Ok(())
    }

    fn load_cached_user(&self) -> Result<Option<UserIdentity>> {
        Ok(self.slots_mut().user.clone())
    }

    fn store_cached_user(&self, user: &UserIdentity) -> Result<()> {
        self.slots_mut().user = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slots = self.slots_mut();
        slots.token = None;
        slots.user = None;
        Ok(())
    }

    fn clear_if(&self, token: &str) -> Result<bool> {
        let mut slots = self.slots_mut();
        if slots.token.as_deref() != Some(token) {
            return Ok(false);
        }
        slots.token = None;
        slots.user = None;
        Ok(true)
    }
}
