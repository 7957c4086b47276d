use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("typerush");
            Some(state_dir.join("words.db"))
        } else {
            ProjectDirs::from("", "", "typerush")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("words.db"))
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "typerush").map(|pd| pd.config_dir().join("config.json"))
    }
}
