#![deny(missing_docs)]

//! # Naming Styles
//!
//! File naming conventions for generated files.
//!
//! A style is written as a sample spelling of the words "go" and "zero":
//! `go_zero` is snake case, `goZero` lower camel case and so on.

use crate::error::{AppError, AppResult};
use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use std::str::FromStr;

/// Style applied when none is configured.
pub const DEFAULT_STYLE: &str = "go_zero";

/// A file naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStyle {
    /// `gozero`: all lowercase, no separators.
    Flat,
    /// `go_zero`
    Snake,
    /// `go-zero`
    Kebab,
    /// `goZero`
    LowerCamel,
    /// `GoZero`
    UpperCamel,
}

impl FromStr for NamingStyle {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim() {
            "gozero" | "lower" | "flat" => Ok(NamingStyle::Flat),
            "" | "go_zero" | "snake" | "snake_case" => Ok(NamingStyle::Snake),
            "go-zero" | "kebab" | "kebab-case" => Ok(NamingStyle::Kebab),
            "goZero" | "camel" | "camelCase" => Ok(NamingStyle::LowerCamel),
            "GoZero" | "pascal" | "PascalCase" => Ok(NamingStyle::UpperCamel),
            other => Err(AppError::Style(format!(
                "unsupported naming style '{}', expected one of gozero, go_zero, go-zero, goZero, GoZero",
                other
            ))),
        }
    }
}

impl NamingStyle {
    /// Re-cases `name` in this style.
    pub fn apply(self, name: &str) -> String {
        match self {
            NamingStyle::Flat => name.to_snake_case().replace('_', ""),
            NamingStyle::Snake => name.to_snake_case(),
            NamingStyle::Kebab => name.to_kebab_case(),
            NamingStyle::LowerCamel => name.to_lower_camel_case(),
            NamingStyle::UpperCamel => name.to_upper_camel_case(),
        }
    }
}

/// Formats `name` according to the style identifier `style`.
pub fn file_naming_format(style: &str, name: &str) -> AppResult<String> {
    Ok(style.parse::<NamingStyle>()?.apply(name))
}
