//! Dependency-graph resolution for enqueued script modules.
//!
//! Produces a combined import map plus per-module load plans, deduplicating
//! handles so no module is loaded twice: once a handle appears as a
//! dependency target, the module's own script tag loses its `src` and the
//! import map covers it instead.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::descriptors::{ImportType, ScriptModuleDescriptor};

/// Origin -> proxy-prefix rewrite applied to every resolved module URL.
#[derive(Debug, Clone)]
pub struct UrlRewrite {
    /// Absolute origin to strip, e.g. `https://cms.example.com`.
    pub origin: String,
    /// Prefix substituted for the origin, e.g. `/proxy`.
    pub prefix: String,
}

impl UrlRewrite {
    fn apply(&self, url: &str) -> String {
        let origin = self.origin.strip_suffix('/').unwrap_or(&self.origin);
        url.strip_prefix(origin)
            .map_or_else(|| url.to_owned(), |rest| format!("{}{rest}", self.prefix))
    }
}

/// Browser import map: module specifier -> URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportMap {
    /// Sorted map so the emitted JSON is deterministic.
    pub imports: BTreeMap<String, String>,
}

impl ImportMap {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

/// Loading instructions for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLoadPlan {
    pub handle: String,
    /// `None` when the module loads transitively as someone else's dependency
    /// (or never had a source); only its registration is emitted then.
    pub src: Option<String>,
    pub extra_data: Option<String>,
    /// Static dependency URLs, emitted as non-executing preload hints.
    pub static_preloads: Vec<String>,
    /// Dynamic dependency URLs, emitted as lazily loaded module scripts.
    pub dynamic_imports: Vec<String>,
}

/// Combined output of module resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleAssets {
    pub import_map: ImportMap,
    pub modules: Vec<ModuleLoadPlan>,
}

/// Resolve the module list into an import map and per-module load plans.
///
/// Per module, dependency edges missing a handle or src are dropped and
/// duplicate handles collapse to the first occurrence. Across modules, every
/// dependency handle lands in the import map exactly once (last write wins on
/// agreeing duplicates), and a module whose own handle has already appeared
/// as a dependency target emits no `src` of its own. Modules with neither a
/// source nor surviving dependencies are dropped entirely.
#[must_use]
pub fn resolve_script_modules(
    modules: &[ScriptModuleDescriptor],
    rewrite: Option<&UrlRewrite>,
) -> ModuleAssets {
    let mut import_map = ImportMap::default();
    let mut plans = Vec::new();
    // Every handle that has appeared as a dependency target so far.
    let mut dependency_handles: HashSet<String> = HashSet::new();

    for module in modules {
        let edges = filter_edges(module);

        if module.src.is_none() && edges.is_empty() {
            // Nothing to load.
            continue;
        }

        let mut static_preloads = Vec::new();
        let mut dynamic_imports = Vec::new();

        for (import_type, handle, src) in edges {
            let url = rewrite.map_or_else(|| src.to_owned(), |r| r.apply(src));
            import_map.imports.insert(handle.to_owned(), url.clone());
            dependency_handles.insert(handle.to_owned());
            match import_type {
                ImportType::Static => static_preloads.push(url),
                ImportType::Dynamic => dynamic_imports.push(url),
            }
        }

        // Already covered by the import map: emitting the src too would load
        // the module twice.
        let src = if dependency_handles.contains(&module.handle) {
            None
        } else {
            module
                .src
                .as_deref()
                .map(|src| rewrite.map_or_else(|| src.to_owned(), |r| r.apply(src)))
        };

        plans.push(ModuleLoadPlan {
            handle: module.handle.clone(),
            src,
            extra_data: module.extra_data.clone(),
            static_preloads,
            dynamic_imports,
        });
    }

    ModuleAssets {
        import_map,
        modules: plans,
    }
}

/// Drop invalid edges and collapse duplicate handles within one module.
fn filter_edges(module: &ScriptModuleDescriptor) -> Vec<(ImportType, &str, &str)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept = Vec::new();
    for edge in &module.dependencies {
        let (Some(handle), Some(src)) = (edge.handle.as_deref(), edge.src.as_deref()) else {
            tracing::warn!(
                module = %module.handle,
                "dropping dependency edge with missing handle or src"
            );
            continue;
        };
        if !seen.insert(handle) {
            // First occurrence wins.
            continue;
        }
        kept.push((edge.import_type, handle, src));
    }
    kept
}
