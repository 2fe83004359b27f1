#![deny(missing_docs)]

//! # Handler Descriptor
//!
//! Per-route values a handler template is rendered with.

use crate::error::AppResult;
use crate::model::Route;
use crate::resolver::{call_name, handler_name, is_exported, logic_name, title_case};
use crate::template::TemplateContext;

/// Everything the handler template needs for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
    /// Function name, e.g. `create_handler`.
    pub handler_name: String,
    /// Request type inside the `types` module, e.g. `CreateReq`.
    pub request_type: String,
    /// Logic type the handler delegates to, e.g. `CreateLogic`.
    pub logic_type: String,
    /// Method invoked on the logic value, e.g. `create`.
    pub call: String,
    /// Whether a request body is decoded.
    pub has_request: bool,
    /// Whether the logic call returns a body.
    pub has_resp: bool,
    /// Whether the handler is exported from its module.
    pub exported: bool,
}

impl HandlerDescriptor {
    /// Derives the descriptor of `route` merged into `folder`.
    pub fn from_route(route: &Route, folder: &str) -> AppResult<Self> {
        let handler = handler_name(route)?;
        Ok(HandlerDescriptor {
            call: call_name(&handler).to_string(),
            handler_name: handler,
            request_type: title_case(&route.request_type),
            logic_type: logic_name(route)?,
            has_request: route.has_request(),
            has_resp: route.has_response(),
            exported: is_exported(folder),
        })
    }

    /// Visibility keyword of the generated function.
    pub fn visibility(&self) -> &'static str {
        if self.exported {
            "pub"
        } else {
            "pub(crate)"
        }
    }

    /// Template bindings for this descriptor.
    pub fn context(&self) -> TemplateContext {
        TemplateContext::new()
            .text("Visibility", self.visibility())
            .text("HandlerName", &self.handler_name)
            .text("RequestType", &self.request_type)
            .text("LogicType", &self.logic_type)
            .text("Call", &self.call)
            .flag("HasRequest", self.has_request)
            .flag("HasResp", self.has_resp)
    }
}
