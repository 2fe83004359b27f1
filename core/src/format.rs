#![deny(missing_docs)]

//! # Source Formatting
//!
//! Canonical formatting of synthesized code via `syn` and `prettyplease`.

/// Formats `code` as a Rust file.
pub fn format_source(code: &str) -> Result<String, syn::Error> {
    let file = syn::parse_file(code)?;
    Ok(prettyplease::unparse(&file))
}

/// Formats `code`, returning it unchanged when it is not a valid Rust file.
///
/// `prettyplease` prints from the syntax tree, so plain `//` and `/* */` comments in
/// synthesized code are dropped. Only doc comments (`///`, `//!`) survive; a custom
/// handler template should put any comment it wants kept in doc form.
pub fn format_or_keep(code: &str) -> String {
    match format_source(code) {
        Ok(formatted) => formatted,
        Err(e) => {
            log::warn!("formatting skipped: {}", e);
            code.to_string()
        }
    }
}
