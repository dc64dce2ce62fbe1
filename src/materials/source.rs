//! Record providers. The browser fetches a module's records once per view and
//! treats the result as an immutable snapshot.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::materials::record::{MaterialRow, Record};

/// A course module as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModuleInfo {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl ModuleInfo {
    /// Whether `key` names this module by id or slug.
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || (!self.slug.is_empty() && self.slug == key)
    }
}

/// Supplies modules and their material records.
pub trait RecordSource {
    fn modules(&self) -> impl Future<Output = Result<Vec<ModuleInfo>>> + Send;

    /// Records of the module named by `module` (id or slug).
    fn fetch_records(&self, module: &str) -> impl Future<Output = Result<Vec<Record>>> + Send;
}

/// On-disk catalog layout: an export of the `modules` and `materials` tables.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub modules: Vec<ModuleInfo>,
    #[serde(default)]
    pub materials: Vec<MaterialRow>,
}

impl Catalog {
    pub fn find_module(&self, key: &str) -> Result<&ModuleInfo> {
        self.modules
            .iter()
            .find(|m| m.matches(key))
            .ok_or_else(|| AppError::UnknownModule(key.to_string()))
    }

    /// Records of one module, ordered by `display_order`; ties keep file order.
    pub fn records_for(&self, module: &ModuleInfo) -> Vec<Record> {
        let mut rows: Vec<&MaterialRow> = self
            .materials
            .iter()
            .filter(|row| row.module_id == module.id)
            .collect();
        rows.sort_by_key(|row| row.display_order);
        rows.into_iter().cloned().map(Record::from).collect()
    }
}

/// A JSON catalog file read with `tokio::fs` on every fetch.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Catalog> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let catalog: Catalog = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %self.path.display(),
            modules = catalog.modules.len(),
            materials = catalog.materials.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

impl RecordSource for CatalogFile {
    async fn modules(&self) -> Result<Vec<ModuleInfo>> {
        Ok(self.load().await?.modules)
    }

    async fn fetch_records(&self, module: &str) -> Result<Vec<Record>> {
        let catalog = self.load().await?;
        let info = catalog.find_module(module)?;
        let records = catalog.records_for(info);
        tracing::info!(module = %info.title, records = records.len(), "fetched materials");
        Ok(records)
    }
}

/// Pick the module to open: the requested one, or the first in the catalog.
pub async fn resolve_module<S: RecordSource>(
    source: &S,
    requested: Option<&str>,
) -> Result<ModuleInfo> {
    let modules = source.modules().await?;
    match requested {
        Some(key) => modules
            .into_iter()
            .find(|m| m.matches(key))
            .ok_or_else(|| AppError::UnknownModule(key.to_string())),
        None => modules
            .into_iter()
            .next()
            .ok_or_else(|| AppError::UnknownModule("<catalog has no modules>".into())),
    }
}
