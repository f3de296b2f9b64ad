use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// One line of the account file: `username password rootFolder`.
pub struct Account {
    username: String,
    password: String,
    root_folder: PathBuf,
    /// Number of sessions currently logged in with this account.
    online_sessions: AtomicUsize,
}

impl Account {
    pub fn new(username: &str, password: &str, root_folder: impl Into<PathBuf>) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            root_folder: root_folder.into(),
            online_sessions: AtomicUsize::new(0),
        }
    }

    pub fn from_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            return None;
        }
        Some(Account::new(parts[0], parts[1], parts[2]))
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_password(&self) -> &str {
        &self.password
    }

    pub fn get_root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn is_online(&self) -> bool {
        self.online_sessions.load(Ordering::SeqCst) > 0
    }

    pub fn online_sessions(&self) -> usize {
        self.online_sessions.load(Ordering::SeqCst)
    }

    pub fn mark_online(&self) {
        self.online_sessions.fetch_add(1, Ordering::SeqCst);
    }

    pub fn mark_offline(&self) {
        // Saturating: a stray logout must not wrap the counter.
        let _ = self
            .online_sessions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("root_folder", &self.root_folder)
            .field("online_sessions", &self.online_sessions())
            .finish()
    }
}
