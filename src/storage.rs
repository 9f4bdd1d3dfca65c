use crate::model::DutyAssignment;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Historique des affectations tenu par l'appelant du scheduler.
pub trait HistoryStore {
    /// Charge l'historique ; vide si le support n'existe pas encore.
    fn load(&self) -> anyhow::Result<Vec<DutyAssignment>>;
    /// Sauvegarde de manière atomique.
    fn save(&self, history: &[DutyAssignment]) -> anyhow::Result<()>;

    /// Ajoute des affectations en ignorant celles déjà connues (même id).
    fn append(&self, new: &[DutyAssignment]) -> anyhow::Result<usize> {
        let mut history = self.load()?;
        let before = history.len();
        for a in new {
            if !history.iter().any(|h| h.id == a.id) {
                history.push(a.clone());
            }
        }
        let added = history.len() - before;
        history.sort_by(|a, b| a.period().cmp(&b.period()));
        self.save(&history)?;
        Ok(added)
    }
}

pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> anyhow::Result<Vec<DutyAssignment>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let history: Vec<DutyAssignment> =
            serde_json::from_slice(&data).with_context(|| "parsing duty history")?;
        debug!(entries = history.len(), path = %self.path.display(), "history loaded");
        Ok(history)
    }

    fn save(&self, history: &[DutyAssignment]) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(history)?;
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
