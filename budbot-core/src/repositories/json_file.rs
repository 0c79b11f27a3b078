// budbot-core/src/repositories/json_file.rs

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use budbot_common::models::RuleMap;
use budbot_common::traits::repository_traits::PreferenceRepository;
use crate::Error;

/// Stores every subscriber's rules as one JSON object:
/// `{"<subscriber id>": {"<keyword>": <threshold>, ...}, ...}`
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceRepository {
    path: PathBuf,
}

impl JsonFilePreferenceRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Directory holding the file. A bare file name lives in the working directory.
    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[async_trait]
impl PreferenceRepository for JsonFilePreferenceRepository {
    async fn load(&self) -> Result<RuleMap, Error> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No preferences file at {:?}; starting with no alerts", self.path);
                return Ok(RuleMap::new());
            }
            Err(e) => {
                return Err(Error::Persistence(format!("reading {:?}: {e}", self.path)));
            }
        };

        if raw.trim().is_empty() {
            return Ok(RuleMap::new());
        }

        let rules: RuleMap = serde_json::from_str(&raw)
            .map_err(|e| Error::Persistence(format!("parsing {:?}: {e}", self.path)))?;
        debug!("Loaded alerts for {} subscribers from {:?}", rules.len(), self.path);
        Ok(rules)
    }

    async fn save(&self, rules: &RuleMap) -> Result<(), Error> {
        let body = serde_json::to_vec(rules)?;
        let tmp = self.temp_path();

        // Write the full mapping next to the target, sync, then swap it in.
        let write = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(&body).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp, &self.path).await?;
            sync_dir(&self.parent_dir()).await
        };
        write
            .await
            .map_err(|e| Error::Persistence(format!("writing {:?}: {e}", self.path)))?;

        debug!("Saved alerts for {} subscribers to {:?}", rules.len(), self.path);
        Ok(())
    }
}

/// Flushes the directory entry so the rename itself survives a crash.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
