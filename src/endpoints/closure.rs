//! Builds a self-contained code excerpt for one route registration.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, warn};

use crate::endpoints::finder::{Framework, RouteEndpoint};
use crate::endpoints::module::{DeclarationSite, ExportRef, ModuleBinding, ModuleIndex};
use crate::grammar::GrammarRegistry;

/// Inlines the local declarations a route handler depends on.
///
/// Module indexes are cached for the lifetime of the builder, which is one
/// API root. The builder is single-threaded.
pub struct ClosureBuilder<'a> {
    registry: &'a GrammarRegistry,
    framework: &'a Framework,
    modules: RefCell<HashMap<PathBuf, Option<Rc<ModuleIndex>>>>,
}

/// Per-excerpt state: declarations already inlined and the inlined blocks.
#[derive(Default)]
struct Excerpt {
    visited: HashSet<(PathBuf, usize)>,
    blocks: Vec<String>,
}

impl<'a> ClosureBuilder<'a> {
    pub fn new(registry: &'a GrammarRegistry, framework: &'a Framework) -> Self {
        Self {
            registry,
            framework,
            modules: RefCell::new(HashMap::new()),
        }
    }

    /// Seed the cache with an already-built index (normally the root file).
    pub fn insert(&self, index: Rc<ModuleIndex>) {
        self.modules
            .borrow_mut()
            .insert(index.path.clone(), Some(index));
    }

    /// Build the excerpt for `endpoint`, resolving names against `root`.
    ///
    /// Layout: the synthesized app preamble and middleware, the registration
    /// call, then every inlined declaration. Each declaration appears at most
    /// once; names that cannot be resolved locally are left out.
    pub fn build(&self, root: &ModuleIndex, endpoint: &RouteEndpoint) -> String {
        let mut code = self.preamble(endpoint);
        code.push('\n');
        code.push_str(&endpoint.text);
        code.push('\n');

        let mut excerpt = Excerpt::default();
        for name in &endpoint.references {
            if !self.inline(root, name, name, &mut excerpt) {
                debug!("no local declaration for {name} in {}", root.path.display());
            }
        }

        for block in excerpt.blocks {
            code.push('\n');
            code.push_str(&block);
            code.push('\n');
        }
        code
    }

    fn preamble(&self, endpoint: &RouteEndpoint) -> String {
        let framework = self.framework;
        let binding = framework
            .factory
            .split('.')
            .next()
            .unwrap_or(&framework.factory);
        let mut out = format!(
            "import {binding} from '{}';\nconst {} = {}();\n",
            framework.package, endpoint.app, framework.factory
        );
        if let (Some(router), Some(factory)) =
            (&endpoint.router, framework.router_factories.first())
        {
            out.push_str(&format!("const {router} = {factory}();\n"));
        }
        for call in &endpoint.middleware {
            out.push_str(call);
            out.push('\n');
        }
        out
    }

    /// Resolve `name` in `index` and inline it under `alias`.
    ///
    /// Order: same-file declaration, then imports, then requires.
    fn inline(&self, index: &ModuleIndex, name: &str, alias: &str, excerpt: &mut Excerpt) -> bool {
        if let Some(site) = index.declaration(name) {
            self.emit(index, site, name, alias, excerpt);
            return true;
        }
        if let Some(binding) = index.imports.get(name) {
            return self.follow(binding, alias, excerpt);
        }
        if let Some(binding) = index.requires.get(name) {
            return self.follow(binding, alias, excerpt);
        }
        false
    }

    fn follow(&self, binding: &ModuleBinding, alias: &str, excerpt: &mut Excerpt) -> bool {
        let Some(target) = self.module(&binding.path) else {
            return false;
        };
        let requested = match &binding.export {
            ExportRef::Named(export) => export.as_str(),
            ExportRef::Default => alias,
        };
        if self.inline(&target, requested, alias, excerpt) {
            return true;
        }
        // Fall back to whatever the module exports by default.
        match &target.default_export {
            Some(default) if default != requested => self.inline(&target, default, alias, excerpt),
            _ => false,
        }
    }

    fn emit(
        &self,
        index: &ModuleIndex,
        site: &DeclarationSite,
        name: &str,
        alias: &str,
        excerpt: &mut Excerpt,
    ) {
        if !excerpt
            .visited
            .insert((index.path.clone(), site.span.start_byte))
        {
            return;
        }
        let text = if name == alias {
            site.text.clone()
        } else {
            site.renamed(name, alias)
        };
        excerpt.blocks.push(text);

        for reference in site.references() {
            self.inline(index, reference, reference, excerpt);
        }
    }

    fn module(&self, path: &Path) -> Option<Rc<ModuleIndex>> {
        if let Some(cached) = self.modules.borrow().get(path) {
            return cached.clone();
        }
        let loaded = match ModuleIndex::load(self.registry, path) {
            Ok(index) => Some(Rc::new(index)),
            Err(e) => {
                warn!("skipping module {}: {e}", path.display());
                None
            }
        };
        self.modules
            .borrow_mut()
            .insert(path.to_path_buf(), loaded.clone());
        loaded
    }
}
