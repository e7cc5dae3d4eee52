//! Render-ready descriptors for enqueued page assets.

/// Where a classic script tag is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLocation {
    Header,
    Footer,
}

/// Browser loading strategy for a classic script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    Async,
    Defer,
}

/// A classic enqueued script with an absolute source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDescriptor {
    pub handle: String,
    pub src: String,
    pub location: ScriptLocation,
    pub strategy: Option<LoadStrategy>,
}

/// An enqueued stylesheet. `src` may be absent for inline-only styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylesheetDescriptor {
    pub handle: String,
    pub src: Option<String>,
    /// Inline CSS emitted immediately before the link tag.
    pub before: Vec<String>,
    /// Inline CSS emitted immediately after the link tag.
    pub after: Vec<String>,
}

/// How a script-module dependency is imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportType {
    Static,
    #[default]
    Dynamic,
}

/// A dependency edge from one script module to another.
///
/// Edges arrive unvalidated from the CMS: either endpoint field may be
/// missing, and the resolver drops such edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyEdge {
    pub import_type: ImportType,
    pub handle: Option<String>,
    pub src: Option<String>,
}

/// An enqueued ES script module with its dependency list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptModuleDescriptor {
    pub handle: String,
    pub src: Option<String>,
    /// Opaque JSON blob re-emitted verbatim for the module to read at runtime.
    pub extra_data: Option<String>,
    pub dependencies: Vec<DependencyEdge>,
}
