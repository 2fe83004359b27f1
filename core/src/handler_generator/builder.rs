#![deny(missing_docs)]

//! # Handler Builder
//!
//! Renders one handler function from its descriptor.

use crate::error::AppResult;
use crate::handler_generator::HandlerDescriptor;
use crate::template::{load_template, render};
use std::path::Path;

/// Template category handler templates are looked up under.
pub const TEMPLATE_CATEGORY: &str = "api";

/// File name of the handler template override.
pub const TEMPLATE_NAME: &str = "handlers.tpl";

/// Built-in handler template.
pub const HANDLER_TEMPLATE: &str = r#"{{.Visibility}} async fn {{.HandlerName}}(
    State(ctx): State<Arc<svc::ServiceContext>>,
    {{if .HasRequest}}req{{else}}_req{{end}}: Request,
) -> Response {
    {{if .HasRequest}}let req: types::{{.RequestType}} = match httpx::parse(req).await {
        Ok(req) => req,
        Err(err) => return httpx::error(err),
    };
    {{end}}let l = logic::{{.LogicType}}::new(ctx);
    match l.{{.Call}}({{if .HasRequest}}req{{end}}).await {
        {{if .HasResp}}Ok(resp) => httpx::ok_json(resp),{{else}}Ok(()) => httpx::ok(),{{end}}
        Err(err) => httpx::error(err),
    }
}"#;

/// Loads the handler template, preferring `<home>/api/handlers.tpl`.
pub fn load_handler_template(home: Option<&Path>) -> AppResult<String> {
    load_template(home, TEMPLATE_CATEGORY, TEMPLATE_NAME, HANDLER_TEMPLATE)
}

/// Renders the handler described by `desc` with `template`.
pub fn render_handler(template: &str, desc: &HandlerDescriptor) -> AppResult<String> {
    render(template, &desc.context())
}
