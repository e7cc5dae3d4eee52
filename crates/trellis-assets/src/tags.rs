//! HTML tag emission for the view layer.
//!
//! Produces the head/footer fragments a page template injects: stylesheet
//! link/style pairs, grouped script tags, the import-map JSON object,
//! preload hints for static module dependencies and lazily loaded module
//! scripts.

use std::fmt::Write;

use crate::descriptors::{LoadStrategy, ScriptDescriptor, ScriptLocation, StylesheetDescriptor};
use crate::modules::{ImportMap, ModuleLoadPlan};

/// Escape a string for use in HTML text or attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// `<script type="importmap">` tag, or nothing when the map is empty.
#[must_use]
pub fn render_import_map(map: &ImportMap) -> String {
    if map.is_empty() {
        return String::new();
    }
    let json = serde_json::to_string(map).unwrap_or_default();
    format!("<script type=\"importmap\">{json}</script>\n")
}

/// Tags for the resolved module load plans.
///
/// Per module: the `extraData` registration blob (verbatim JSON), one
/// `rel="preload"` link per static dependency, one lazily loaded module
/// script per dynamic dependency, and the module's own executable tag when
/// its `src` was not suppressed.
#[must_use]
pub fn render_module_tags(modules: &[ModuleLoadPlan]) -> String {
    let mut out = String::new();
    for module in modules {
        if let Some(data) = &module.extra_data {
            writeln!(
                out,
                r#"<script type="application/json" id="script-module-data-{}">{data}</script>"#,
                escape_html(&module.handle)
            )
            .unwrap();
        }
        for url in &module.static_preloads {
            // rel=preload rather than modulepreload: modulepreload would
            // execute the module before its interactive state has loaded.
            writeln!(
                out,
                r#"<link rel="preload" href="{}" as="script" />"#,
                escape_html(url)
            )
            .unwrap();
        }
        for url in &module.dynamic_imports {
            writeln!(
                out,
                r#"<script type="module" src="{}" defer></script>"#,
                escape_html(url)
            )
            .unwrap();
        }
        if let Some(src) = &module.src {
            writeln!(
                out,
                r#"<script type="module" id="module-{}" src="{}"></script>"#,
                escape_html(&module.handle),
                escape_html(src)
            )
            .unwrap();
        }
    }
    out
}

/// Script tags for one location group, with async/defer attributes.
#[must_use]
pub fn render_scripts(scripts: &[ScriptDescriptor], location: ScriptLocation) -> String {
    let mut out = String::new();
    for script in scripts.iter().filter(|s| s.location == location) {
        let strategy = match script.strategy {
            Some(LoadStrategy::Async) => " async",
            Some(LoadStrategy::Defer) => " defer",
            None => "",
        };
        writeln!(
            out,
            r#"<script id="{}" src="{}"{strategy}></script>"#,
            escape_html(&script.handle),
            escape_html(&script.src)
        )
        .unwrap();
    }
    out
}

/// Stylesheet tags: inline `before` styles, the link tag, inline `after`
/// styles, in that order per sheet. Inline CSS is emitted verbatim.
#[must_use]
pub fn render_stylesheets(sheets: &[StylesheetDescriptor]) -> String {
    let mut out = String::new();
    for sheet in sheets {
        for css in &sheet.before {
            writeln!(out, "<style>{css}</style>").unwrap();
        }
        if let Some(src) = &sheet.src {
            writeln!(
                out,
                r#"<link rel="stylesheet" id="{}-css" href="{}" />"#,
                escape_html(&sheet.handle),
                escape_html(src)
            )
            .unwrap();
        }
        for css in &sheet.after {
            writeln!(out, "<style>{css}</style>").unwrap();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::descriptors::{ImportType, ScriptModuleDescriptor};
    use crate::modules::resolve_script_modules;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;"
        );
    }

    #[test]
    fn test_empty_import_map_renders_nothing() {
        assert_eq!(render_import_map(&ImportMap::default()), "");
    }

    #[test]
    fn test_import_map_json_shape() {
        let mut map = ImportMap::default();
        map.imports
            .insert("b".to_owned(), "https://cms.example.com/b.js".to_owned());
        assert_eq!(
            render_import_map(&map),
            "<script type=\"importmap\">{\"imports\":{\"b\":\"https://cms.example.com/b.js\"}}</script>\n"
        );
    }

    #[test]
    fn test_static_edge_renders_preload_not_executable() {
        let modules = vec![ScriptModuleDescriptor {
            handle: "a".to_owned(),
            src: Some("https://cms.example.com/a.js".to_owned()),
            extra_data: None,
            dependencies: vec![crate::descriptors::DependencyEdge {
                import_type: ImportType::Static,
                handle: Some("b".to_owned()),
                src: Some("https://cms.example.com/b.js".to_owned()),
            }],
        }];
        let assets = resolve_script_modules(&modules, None);
        let html = render_module_tags(&assets.modules);

        assert!(html.contains(r#"<link rel="preload" href="https://cms.example.com/b.js" as="script" />"#));
        assert!(!html.contains(r#"type="module" src="https://cms.example.com/b.js""#));
        assert!(html.contains(r#"src="https://cms.example.com/a.js""#));
    }

    #[test]
    fn test_extra_data_emitted_verbatim() {
        let plan = ModuleLoadPlan {
            handle: "interactivity".to_owned(),
            src: None,
            extra_data: Some(r#"{"state":{"count":1}}"#.to_owned()),
            static_preloads: Vec::new(),
            dynamic_imports: Vec::new(),
        };
        assert_eq!(
            render_module_tags(&[plan]),
            "<script type=\"application/json\" id=\"script-module-data-interactivity\">{\"state\":{\"count\":1}}</script>\n"
        );
    }

    #[test]
    fn test_scripts_filtered_by_location() {
        let scripts = vec![
            ScriptDescriptor {
                handle: "head-lib".to_owned(),
                src: "https://cms.example.com/head.js".to_owned(),
                location: ScriptLocation::Header,
                strategy: Some(LoadStrategy::Defer),
            },
            ScriptDescriptor {
                handle: "foot-lib".to_owned(),
                src: "https://cms.example.com/foot.js".to_owned(),
                location: ScriptLocation::Footer,
                strategy: Some(LoadStrategy::Async),
            },
        ];

        let head = render_scripts(&scripts, ScriptLocation::Header);
        assert_eq!(
            head,
            "<script id=\"head-lib\" src=\"https://cms.example.com/head.js\" defer></script>\n"
        );
        let foot = render_scripts(&scripts, ScriptLocation::Footer);
        assert!(foot.contains("foot-lib"));
        assert!(foot.contains(" async"));
    }

    #[test]
    fn test_stylesheet_before_link_after_order() {
        let sheet = StylesheetDescriptor {
            handle: "theme".to_owned(),
            src: Some("https://cms.example.com/theme.css".to_owned()),
            before: vec![":root{--x:1}".to_owned()],
            after: vec![".y{color:red}".to_owned()],
        };
        assert_eq!(
            render_stylesheets(&[sheet]),
            "<style>:root{--x:1}</style>\n\
             <link rel=\"stylesheet\" id=\"theme-css\" href=\"https://cms.example.com/theme.css\" />\n\
             <style>.y{color:red}</style>\n"
        );
    }

    #[test]
    fn test_inline_only_stylesheet_has_no_link() {
        let sheet = StylesheetDescriptor {
            handle: "inline".to_owned(),
            before: vec!["body{margin:0}".to_owned()],
            ..StylesheetDescriptor::default()
        };
        let html = render_stylesheets(&[sheet]);
        assert!(!html.contains("<link"));
        assert!(html.contains("body{margin:0}"));
    }
}
