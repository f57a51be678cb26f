use crate::model::Ward;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistance du service : personnel, absences, registre, dernier planning.
pub trait Storage {
    /// Charge le service depuis un support.
    fn load(&self) -> anyhow::Result<Ward>;
    /// Sauvegarde de manière atomique.
    fn save(&self, ward: &Ward) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Service vide si le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<Ward> {
        if self.path.exists() {
            self.load()
        } else {
            Ok(Ward::default())
        }
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Ward> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let ward: Ward = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(ward)
    }

    fn save(&self, ward: &Ward) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(ward)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
