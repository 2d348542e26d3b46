use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn store_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "lettertap") {
            pd.config_dir().join("store.json")
        } else {
            PathBuf::from("lettertap_store.json")
        }
    }
}
