//! Walks a repository for framework APIs and builds their endpoint excerpts.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::config::WalkConfig;
use crate::endpoints::closure::ClosureBuilder;
use crate::endpoints::finder::{find_endpoints, is_root_file, Framework};
use crate::endpoints::module::ModuleIndex;
use crate::endpoints::naming::guess_api_name;
use crate::error::{Error, Result};
use crate::grammar::GrammarRegistry;
use crate::source::ParsedSource;

/// Extensions searched when looking for an API's root file.
const ROOT_FILE_EXTENSIONS: &[&str] = &["js", "ts", "tsx"];

/// One discovered API and its endpoint excerpts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSummary {
    pub name: String,
    /// Directory holding the manifest.
    pub root_dir: PathBuf,
    /// File that creates the app.
    pub root_file: PathBuf,
    /// One self-contained code excerpt per route registration.
    pub endpoints: Vec<String>,
}

/// Finds APIs under a directory tree.
pub struct ApiFinder<'a> {
    registry: &'a GrammarRegistry,
    framework: &'a Framework,
    manifest_names: Vec<String>,
    excluded: GlobSet,
}

impl<'a> ApiFinder<'a> {
    pub fn new(
        registry: &'a GrammarRegistry,
        framework: &'a Framework,
        walk: &WalkConfig,
    ) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &walk.exclude {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            registry,
            framework,
            manifest_names: walk.manifest_names.clone(),
            excluded: builder.build()?,
        })
    }

    /// Find every API under `root`.
    ///
    /// Failures are contained to the manifest or directory they occur in and
    /// logged; the rest of the walk continues.
    pub fn find_apis(&self, root: &Path) -> Vec<ApiSummary> {
        let apis = self.walk_dir(root);
        info!("found {} API(s) under {}", apis.len(), root.display());
        apis
    }

    fn walk_dir(&self, dir: &Path) -> Vec<ApiSummary> {
        let (files, dirs) = self.list_dir(dir);
        let manifests: Vec<PathBuf> = files
            .into_iter()
            .filter(|f| self.is_manifest(f))
            .collect();

        let mut apis: Vec<ApiSummary> = manifests
            .par_iter()
            .filter_map(|manifest| match self.process_manifest(manifest) {
                Ok(api) => api,
                Err(e) => {
                    warn!("skipping {}: {e}", manifest.display());
                    None
                }
            })
            .collect();

        let nested: Vec<Vec<ApiSummary>> = dirs.par_iter().map(|d| self.walk_dir(d)).collect();
        apis.extend(nested.into_iter().flatten());
        apis
    }

    fn process_manifest(&self, manifest: &Path) -> Result<Option<ApiSummary>> {
        let text = fs::read_to_string(manifest).map_err(|e| Error::io(manifest, e))?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|source| Error::Manifest {
                path: manifest.to_path_buf(),
                source,
            })?;
        if !declares_dependency(&value, &self.framework.package) {
            return Ok(None);
        }

        let root_dir = manifest.parent().unwrap_or(Path::new("")).to_path_buf();
        let Some(root_file) = self.find_root_file(&root_dir) else {
            debug!("no {} app found under {}", self.framework.package, root_dir.display());
            return Ok(None);
        };

        let api = self.build_api(&root_dir, &root_file)?;
        Ok(Some(api).filter(|api| !api.endpoints.is_empty()))
    }

    /// First file, breadth-first, that creates an app.
    pub fn find_root_file(&self, dir: &Path) -> Option<PathBuf> {
        let mut queue = VecDeque::from([dir.to_path_buf()]);
        while let Some(current) = queue.pop_front() {
            let (files, dirs) = self.list_dir(&current);
            for file in files {
                if self.creates_app(&file) {
                    return Some(file);
                }
            }
            queue.extend(dirs);
        }
        None
    }

    /// Build the summary for the API created in `root_file`.
    pub fn build_api(&self, root_dir: &Path, root_file: &Path) -> Result<ApiSummary> {
        let parsed = self.parse_clean(root_file)?;
        let grammar = self.registry.for_path(root_file)?;
        let index = Rc::new(ModuleIndex::build(grammar, &parsed)?);

        let builder = ClosureBuilder::new(self.registry, self.framework);
        builder.insert(index.clone());

        let endpoints = find_endpoints(&parsed, self.framework)
            .iter()
            .map(|endpoint| builder.build(&index, endpoint))
            .collect::<Vec<_>>();
        debug!(
            "{}: {} endpoint(s)",
            root_file.display(),
            endpoints.len()
        );

        Ok(ApiSummary {
            name: guess_api_name(root_dir),
            root_dir: root_dir.to_path_buf(),
            root_file: root_file.to_path_buf(),
            endpoints,
        })
    }

    fn creates_app(&self, file: &Path) -> bool {
        let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ROOT_FILE_EXTENSIONS.contains(&ext) {
            return false;
        }
        match self.parse_clean(file) {
            Ok(parsed) => is_root_file(&parsed, self.framework),
            Err(e) => {
                debug!("not a root file candidate: {e}");
                false
            }
        }
    }

    fn parse_clean(&self, path: &Path) -> Result<ParsedSource> {
        let grammar = self.registry.for_path(path)?;
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let parsed = ParsedSource::parse(grammar, path, text)?;
        if parsed.has_syntax_errors() {
            return Err(Error::Syntax {
                path: path.display().to_string(),
            });
        }
        Ok(parsed)
    }

    fn is_manifest(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.manifest_names.iter().any(|m| m == name))
    }

    /// Files and non-excluded subdirectories of `dir`, sorted by name.
    fn list_dir(&self, dir: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("cannot read entry in {}: {e}", dir.display());
                    continue;
                }
            };
            let path = entry.into_path();
            if path.is_dir() {
                if self.excluded.is_match(&path) {
                    debug!("skipping excluded directory {}", path.display());
                } else {
                    dirs.push(path);
                }
            } else if path.is_file() {
                files.push(path);
            }
        }
        (files, dirs)
    }
}

/// Whether a package manifest lists `package` under `dependencies`.
fn declares_dependency(manifest: &serde_json::Value, package: &str) -> bool {
    manifest
        .get("dependencies")
        .and_then(|deps| deps.as_object())
        .is_some_and(|deps| deps.contains_key(package))
}

/// Find every express API under `root` with default settings.
pub fn find_apis(root: &Path) -> Result<Vec<ApiSummary>> {
    let registry = GrammarRegistry::new();
    let framework = Framework::default();
    let finder = ApiFinder::new(&registry, &framework, &WalkConfig::default())?;
    Ok(finder.find_apis(root))
}
