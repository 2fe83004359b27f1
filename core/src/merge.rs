#![deny(missing_docs)]

//! # Merge Writer
//!
//! Merges synthesized handlers into one `handlers.rs` file per group.
//!
//! Existing declarations are never edited: only functions whose names are absent
//! are appended, and the import header is written only when this run created the file.
//! Only the newly synthesized block goes through the formatter; existing content is
//! kept byte for byte and joined to the new block with a single newline.

use crate::error::AppResult;
use crate::format::format_or_keep;
use crate::handler_generator::{load_handler_template, render_handler, HandlerDescriptor};
use crate::imports::{render_header, required_imports, ImportSet};
use crate::model::{Group, Route, ServiceDescription};
use crate::naming::{NamingStyle, DEFAULT_STYLE};
use crate::parser::{declared_functions, DeclaredFunctions};
use crate::project::ProjectContext;
use crate::resolver::{handler_folder, handler_name};
use crate::store::FileStore;
use std::io;
use std::path::PathBuf;

/// Logical name of the per-group destination file, before styling.
pub const DESTINATION_NAME: &str = "handlers";

/// Extension of generated source files.
pub const SOURCE_EXT: &str = "rs";

/// Run-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Project working directory.
    pub dir: PathBuf,
    /// File naming style identifier (see [`crate::naming`]).
    pub style: String,
    /// Optional template override directory.
    pub template_home: Option<PathBuf>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            dir: PathBuf::from("."),
            style: DEFAULT_STYLE.to_string(),
            template_home: None,
        }
    }
}

/// What a group merge did to its destination file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Destination file.
    pub path: PathBuf,
    /// Whether the file was created by this merge.
    pub created: bool,
    /// Handlers appended, in route order.
    pub merged: Vec<String>,
    /// Handlers already declared and therefore left alone.
    pub skipped: Vec<String>,
}

/// Result of a best-effort removal pass. Failures are recorded, never raised.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Files that were removed.
    pub removed: Vec<PathBuf>,
    /// Files that could not be removed, with the reason.
    pub failures: Vec<(PathBuf, io::Error)>,
}

impl CleanupReport {
    /// Attempts to remove `path`, recording the result.
    pub fn remove(&mut self, store: &dyn FileStore, path: PathBuf) {
        match store.remove(&path) {
            Ok(()) => {
                log::info!("removed legacy handler file {}", path.display());
                self.removed.push(path);
            }
            Err(e) => {
                log::debug!("legacy handler file {} not removed: {}", path.display(), e);
                self.failures.push((path, e));
            }
        }
    }
}

/// Result of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One outcome per processed group, in input order.
    pub outcomes: Vec<MergeOutcome>,
    /// One cleanup report per processed group, in input order.
    pub cleanups: Vec<CleanupReport>,
}

impl RunReport {
    /// All merged handler names across groups, in processing order.
    pub fn merged_handlers(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .flat_map(|o| o.merged.iter().map(String::as_str))
    }
}

/// Read-then-write lifecycle of one destination file.
///
/// New functions and imports are staged in memory and reach the store in a single
/// write on [`MergeSession::flush`].
pub struct MergeSession<'a> {
    store: &'a dyn FileStore,
    path: PathBuf,
    has_existing: bool,
    declared: Option<DeclaredFunctions>,
    functions: Vec<String>,
    imports: ImportSet,
    outcome: MergeOutcome,
}

impl<'a> MergeSession<'a> {
    /// Opens `path`, creating it empty when it does not exist yet.
    pub fn open(store: &'a dyn FileStore, path: PathBuf) -> AppResult<Self> {
        let has_existing = store.exists(&path);
        if !has_existing {
            store.create_empty(&path)?;
            log::debug!("created {}", path.display());
        }

        Ok(MergeSession {
            store,
            outcome: MergeOutcome {
                path: path.clone(),
                created: !has_existing,
                ..Default::default()
            },
            path,
            has_existing,
            declared: None,
            functions: Vec::new(),
            imports: ImportSet::new(),
        })
    }

    /// Whether the destination already declares the top-level function `name`.
    ///
    /// Always false for a file created by this session. The file is parsed on first use.
    pub fn contains_fn(&mut self, name: &str) -> AppResult<bool> {
        if !self.has_existing {
            return Ok(false);
        }

        if self.declared.is_none() {
            let declared = declared_functions(self.store, &self.path)?;
            log::debug!(
                "{} declares {} function(s)",
                self.path.display(),
                declared.len()
            );
            self.declared = Some(declared);
        }

        Ok(self
            .declared
            .as_ref()
            .is_some_and(|declared| declared.contains(name)))
    }

    /// Records that `name` is already present.
    pub fn skip(&mut self, name: &str) {
        log::debug!("handler {} already present", name);
        self.outcome.skipped.push(name.to_string());
    }

    /// Stages a synthesized function and the imports it needs.
    pub fn stage(&mut self, name: &str, function: String, imports: Vec<String>) {
        log::info!("merge handler {}", name);
        self.functions.push(function);
        self.imports.extend(imports);
        self.outcome.merged.push(name.to_string());
    }

    /// The formatted block this session appends: the header (new files only) plus staged functions.
    pub fn staged_block(&self) -> AppResult<String> {
        let mut code = String::new();
        if !self.has_existing {
            code.push_str(&render_header(&self.imports)?);
            code.push('\n');
        }
        code.push_str(&self.functions.join("\n\n"));

        if code.trim().is_empty() {
            return Ok(String::new());
        }
        Ok(format_or_keep(&code))
    }

    /// Writes existing content plus the staged block back to the file in one write.
    pub fn flush(self) -> AppResult<MergeOutcome> {
        let block = self.staged_block()?;
        let content = self.store.read(&self.path)?;

        let mut output = content;
        if !block.is_empty() {
            if !output.is_empty() {
                output.push(b'\n');
            }
            output.extend_from_slice(block.as_bytes());
        }

        self.store.write(&self.path, &output)?;
        Ok(self.outcome)
    }
}

/// Drives legacy cleanup and group merges for one run.
pub struct MergeEngine<'a> {
    store: &'a dyn FileStore,
    dir: PathBuf,
    style: NamingStyle,
    template: String,
    parent_pkg: String,
    on_merge: Option<Box<dyn Fn(&str) + 'a>>,
}

impl<'a> MergeEngine<'a> {
    /// Prepares an engine for `config`: resolves the parent package once,
    /// parses the naming style and loads the handler template.
    pub fn new(store: &'a dyn FileStore, config: &MergeConfig) -> AppResult<Self> {
        let project = ProjectContext::prepare(&config.dir)?;
        let parent_pkg = project.parent_package();
        let style = config.style.parse()?;
        let template = load_handler_template(config.template_home.as_deref())?;
        log::debug!(
            "merging into crate {} at {}, parent package {}",
            project.name,
            project.dir.display(),
            parent_pkg
        );

        Ok(Self::from_parts(store, config.dir.clone(), style, template, parent_pkg))
    }

    /// Builds an engine from already resolved parts.
    pub fn from_parts(
        store: &'a dyn FileStore,
        dir: PathBuf,
        style: NamingStyle,
        template: String,
        parent_pkg: String,
    ) -> Self {
        MergeEngine {
            store,
            dir,
            style,
            template,
            parent_pkg,
            on_merge: None,
        }
    }

    /// Calls `notice` with each handler name as soon as it is staged for merging,
    /// before its file is written.
    pub fn on_merge(mut self, notice: impl Fn(&str) + 'a) -> Self {
        self.on_merge = Some(Box::new(notice));
        self
    }

    /// Destination file of the handlers merged into `folder`.
    pub fn destination(&self, folder: &str) -> PathBuf {
        let filename = format!("{}.{}", self.style.apply(DESTINATION_NAME), SOURCE_EXT);
        self.dir.join(folder).join(filename)
    }

    /// Path of the one-file-per-handler file `route` would have had in the older layout.
    fn legacy_path(&self, group: &Group, route: &Route) -> AppResult<PathBuf> {
        let filename = format!("{}.{}", self.style.apply(&handler_name(route)?), SOURCE_EXT);
        Ok(self.dir.join(handler_folder(group, route)).join(filename))
    }

    /// Removes the per-route handler files of `group`.
    ///
    /// Naming failures are fatal; removal failures are only recorded.
    pub fn cleanup_legacy(&self, group: &Group) -> AppResult<CleanupReport> {
        let mut report = CleanupReport::default();
        for route in &group.routes {
            let path = self.legacy_path(group, route)?;
            report.remove(self.store, path);
        }
        Ok(report)
    }

    /// Merges every missing handler of `group` into `<dir>/<folder>/handlers.rs`.
    pub fn merge_group(&self, folder: &str, group: &Group) -> AppResult<MergeOutcome> {
        let descriptors = group
            .routes
            .iter()
            .map(|route| HandlerDescriptor::from_route(route, folder).map(|d| (route, d)))
            .collect::<AppResult<Vec<_>>>()?;

        let mut session = MergeSession::open(self.store, self.destination(folder))?;
        for (route, desc) in descriptors {
            if session.contains_fn(&desc.handler_name)? {
                session.skip(&desc.handler_name);
                continue;
            }

            let function = render_handler(&self.template, &desc)?;
            let imports = required_imports(group, route, &self.parent_pkg);
            session.stage(&desc.handler_name, function, imports);
            if let Some(notice) = &self.on_merge {
                notice(&desc.handler_name);
            }
        }

        session.flush()
    }

    /// Processes every group with at least one route, in order. The first error aborts the run.
    pub fn run(&self, description: &ServiceDescription) -> AppResult<RunReport> {
        let mut report = RunReport::default();
        for group in &description.service.groups {
            let Some(first) = group.routes.first() else {
                continue;
            };

            let folder = handler_folder(group, first);
            report.cleanups.push(self.cleanup_legacy(group)?);
            report.outcomes.push(self.merge_group(&folder, group)?);
        }
        Ok(report)
    }
}

/// Prepares an engine for `config` and runs it over `description`.
pub fn merge_service(
    store: &dyn FileStore,
    description: &ServiceDescription,
    config: &MergeConfig,
) -> AppResult<RunReport> {
    MergeEngine::new(store, config)?.run(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::handler_generator::HANDLER_TEMPLATE;
    use crate::model::{AnnotationKey, Annotations};
    use crate::resolver::HANDLER_DIR;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn engine(store: &MemoryStore) -> MergeEngine<'_> {
        MergeEngine::from_parts(
            store,
            PathBuf::from("proj"),
            NamingStyle::Snake,
            HANDLER_TEMPLATE.to_string(),
            "crate".to_string(),
        )
    }

    fn route(handler: &str, request: &str, response: &str) -> Route {
        Route {
            method: "post".into(),
            path: format!("/{}", handler.to_lowercase()),
            annotations: Annotations::new().with(AnnotationKey::HANDLER, handler),
            request_type: request.into(),
            response_type: response.into(),
        }
    }

    fn order_group(routes: Vec<Route>) -> Group {
        Group {
            annotations: Annotations::new().with(AnnotationKey::GROUP, "order"),
            routes,
        }
    }

    fn description(groups: Vec<Group>) -> ServiceDescription {
        let mut desc = ServiceDescription::default();
        desc.service.groups = groups;
        desc
    }

    const ORDER_FILE: &str = "proj/src/handler/order/handlers.rs";

    #[test]
    fn test_new_file_gets_header_and_handler() {
        let store = MemoryStore::new();
        let desc = description(vec![order_group(vec![route("create", "CreateReq", "CreateResp")])]);

        let report = engine(&store).run(&desc).unwrap();
        let code = store.get(ORDER_FILE).unwrap();

        assert!(code.starts_with("//! HTTP handlers."));
        assert!(code.contains("use crate::logic::order as logic;"));
        assert!(code.contains("use crate::svc;"));
        assert!(code.contains("use crate::types;"));
        assert!(code.contains("use cdd_rest::httpx;"));
        assert!(code.contains("pub async fn create_handler("));
        assert!(code.contains("types::CreateReq"));
        assert!(code.contains("logic::CreateLogic::new(ctx)"));
        assert!(code.contains("httpx::ok_json(resp)"));

        assert_eq!(report.merged_handlers().collect::<Vec<_>>(), vec!["create_handler"]);
        assert!(report.outcomes[0].created);
    }

    #[test]
    fn test_second_run_is_identical() {
        let store = MemoryStore::new();
        let desc = description(vec![order_group(vec![
            route("create", "CreateReq", "CreateResp"),
            route("list", "", "ListResp"),
        ])]);

        engine(&store).run(&desc).unwrap();
        let first = store.get(ORDER_FILE).unwrap();

        let report = engine(&store).run(&desc).unwrap();
        let second = store.get(ORDER_FILE).unwrap();

        assert_eq!(first, second);
        assert!(report.outcomes[0].merged.is_empty());
        assert_eq!(report.outcomes[0].skipped, vec!["create_handler", "list_handler"]);
    }

    #[test]
    fn test_hand_written_function_is_kept() {
        let store = MemoryStore::new();
        let hand_written = "pub async fn create_handler() -> &'static str {\n    \"custom\"\n}\n";
        store.insert(ORDER_FILE, hand_written);

        let desc = description(vec![order_group(vec![
            route("create", "CreateReq", "CreateResp"),
            route("cancel", "", ""),
        ])]);
        engine(&store).run(&desc).unwrap();

        let code = store.get(ORDER_FILE).unwrap();
        assert!(code.starts_with(hand_written));
        assert_eq!(code.matches("fn create_handler").count(), 1);
        assert!(code.contains("pub async fn cancel_handler("));
        assert!(!code.contains("use crate::svc;"));
    }

    #[test]
    fn test_new_file_imports_are_deduplicated() {
        let store = MemoryStore::new();
        let desc = description(vec![order_group(vec![
            route("ping", "", ""),
            route("create", "CreateReq", "CreateResp"),
            route("update", "UpdateReq", ""),
        ])]);
        engine(&store).run(&desc).unwrap();

        let code = store.get(ORDER_FILE).unwrap();
        for import in [
            "use crate::logic::order as logic;",
            "use crate::svc;",
            "use crate::types;",
            "use cdd_rest::httpx;",
        ] {
            assert_eq!(code.matches(import).count(), 1, "{import}");
        }
        let svc = code.find("use crate::svc;").unwrap();
        let httpx = code.find("use cdd_rest::httpx;").unwrap();
        let types = code.find("use crate::types;").unwrap();
        assert!(svc < httpx && httpx < types);
    }

    #[test]
    fn test_default_folder_handlers_are_crate_visible() {
        let store = MemoryStore::new();
        let desc = description(vec![Group {
            annotations: Annotations::new(),
            routes: vec![route("ping", "", "")],
        }]);
        engine(&store).run(&desc).unwrap();

        let code = store.get(format!("proj/{}/handlers.rs", HANDLER_DIR)).unwrap();
        assert!(code.contains("pub(crate) async fn ping_handler("));
        assert!(code.contains("use crate::logic;"));
    }

    #[test]
    fn test_empty_existing_file_gets_no_header() {
        let store = MemoryStore::new();
        store.insert(ORDER_FILE, "");

        let desc = description(vec![order_group(vec![route("create", "CreateReq", "")])]);
        let report = engine(&store).run(&desc).unwrap();

        let code = store.get(ORDER_FILE).unwrap();
        assert!(code.starts_with("pub async fn create_handler("));
        assert!(!code.contains("//! HTTP handlers."));
        assert!(!code.contains("use crate::svc;"));
        assert!(!report.outcomes[0].created);
        assert_eq!(report.outcomes[0].merged, vec!["create_handler"]);
    }

    #[test]
    fn test_merge_notices_arrive_before_a_later_group_fails() {
        let store = MemoryStore::new();
        store.insert("proj/src/handler/admin/handlers.rs", "fn broken( {\n");
        let admin = Group {
            annotations: Annotations::new().with(AnnotationKey::GROUP, "admin"),
            routes: vec![route("ban", "", "")],
        };
        let desc = description(vec![order_group(vec![route("create", "", "")]), admin]);

        let seen = std::cell::RefCell::new(Vec::new());
        let err = engine(&store)
            .on_merge(|name| seen.borrow_mut().push(name.to_string()))
            .run(&desc)
            .unwrap_err();

        assert!(matches!(err, AppError::Parse { .. }));
        assert_eq!(seen.into_inner(), vec!["create_handler"]);
        assert!(store.get(ORDER_FILE).is_some());
    }

    #[test]
    fn test_invalid_handler_aborts_and_leaves_file_untouched() {
        let store = MemoryStore::new();
        store.insert(ORDER_FILE, "fn keep() {}\n");

        let desc = description(vec![order_group(vec![
            route("create", "CreateReq", ""),
            route("bad-name", "", ""),
        ])]);
        let err = engine(&store).run(&desc).unwrap_err();

        match err {
            AppError::Validation { path, value, .. } => {
                assert_eq!(path, "/bad-name");
                assert_eq!(value, "bad-name");
            }
            other => panic!("expected validation error, got {other}"),
        }
        assert_eq!(store.get(ORDER_FILE).as_deref(), Some("fn keep() {}\n"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_invalid_existing_file_is_fatal() {
        let store = MemoryStore::new();
        store.insert(ORDER_FILE, "fn broken( {\n");

        let desc = description(vec![order_group(vec![route("create", "", "")])]);
        let err = engine(&store).run(&desc).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
        assert_eq!(store.get(ORDER_FILE).as_deref(), Some("fn broken( {\n"));
    }

    #[test]
    fn test_legacy_files_removed_even_without_changes() {
        let store = MemoryStore::new();
        let desc = description(vec![order_group(vec![route("create", "", "")])]);
        engine(&store).run(&desc).unwrap();

        let legacy = "proj/src/handler/order/create_handler.rs";
        store.insert(legacy, "old layout");
        let report = engine(&store).run(&desc).unwrap();

        assert!(store.get(legacy).is_none());
        assert_eq!(report.cleanups[0].removed, vec![PathBuf::from(legacy)]);
        assert!(report.outcomes[0].merged.is_empty());
    }

    #[test]
    fn test_missing_legacy_file_is_recorded_not_raised() {
        let store = MemoryStore::new();
        let group = order_group(vec![route("create", "", "")]);
        let report = engine(&store).cleanup_legacy(&group).unwrap();
        assert!(report.removed.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].1.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_write_failure_is_fatal() {
        let store = MemoryStore::new();
        store.insert(ORDER_FILE, "");
        store.deny_writes(ORDER_FILE);

        let desc = description(vec![order_group(vec![route("create", "", "")])]);
        let err = engine(&store).run(&desc).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_empty_groups_are_skipped() {
        let store = MemoryStore::new();
        let desc = description(vec![Group::default()]);
        let report = engine(&store).run(&desc).unwrap();
        assert!(report.outcomes.is_empty());
        assert!(store.paths().is_empty());
    }

    #[test]
    fn test_destination_follows_style() {
        let store = MemoryStore::new();
        let e = MergeEngine::from_parts(
            &store,
            PathBuf::from("proj"),
            NamingStyle::UpperCamel,
            HANDLER_TEMPLATE.to_string(),
            "crate".to_string(),
        );
        assert_eq!(
            e.destination("src/handler"),
            PathBuf::from("proj/src/handler/Handlers.rs")
        );
        assert_eq!(
            engine(&store).destination("src/handler"),
            PathBuf::from("proj/src/handler/handlers.rs")
        );
    }

    #[test]
    fn test_unformattable_template_is_written_raw() {
        let store = MemoryStore::new();
        let e = MergeEngine::from_parts(
            &store,
            PathBuf::from("proj"),
            NamingStyle::Snake,
            "fn {{.HandlerName}}( {".to_string(),
            "crate".to_string(),
        );
        let group = order_group(vec![route("create", "", "")]);
        e.merge_group("src/handler/order", &group).unwrap();

        let code = store.get(ORDER_FILE).unwrap();
        assert!(code.contains("fn create_handler( {"));
        assert!(code.contains("use crate::svc;"));
    }
}
