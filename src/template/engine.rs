//! Adapter around the handlebars engine.

use crate::error::{Error, Result};
use crate::template::go_syntax;
use crate::template::options::{EscapeMode, TemplateOptions, TemplateSyntax};
use aho_corasick::AhoCorasick;
use handlebars::{Handlebars, HelperDef, Template};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, error};

/// Name under which the document body is registered.
pub const TEMPLATE_NAME: &str = "document";

/// Boxed helper, as accepted by [`TemplateEngine::add_functions`].
pub type Function = Box<dyn HelperDef + Send + Sync + 'static>;

/// A template program: one compiled body plus the registered functions.
pub struct TemplateEngine {
    registry: Handlebars<'static>,
    syntax: TemplateSyntax,
    parsed: bool,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::with_options(&TemplateOptions::default())
    }

    pub fn with_options(options: &TemplateOptions) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(options.strict);
        registry.set_dev_mode(options.dev_mode);
        match options.escape {
            EscapeMode::Xml => registry.register_escape_fn(escape_xml),
            EscapeMode::None => registry.register_escape_fn(handlebars::no_escape),
        }

        Self {
            registry,
            syntax: options.syntax,
            parsed: false,
        }
    }

    /// Make `helper` callable from template expressions as `name`.
    pub fn register_function<H>(&mut self, name: &str, helper: H)
    where
        H: HelperDef + Send + Sync + 'static,
    {
        self.registry.register_helper(name, Box::new(helper));
    }

    /// Register a table of named functions.
    pub fn add_functions<I, S>(&mut self, functions: I)
    where
        I: IntoIterator<Item = (S, Function)>,
        S: AsRef<str>,
    {
        for (name, helper) in functions {
            self.registry.register_helper(name.as_ref(), helper);
        }
    }

    /// Compile `text` as the document template.
    ///
    /// With [`TemplateSyntax::Go`] the Go-style actions are rewritten first.
    ///
    /// On error the previously parsed template, if any, stays in place.
    pub fn parse(&mut self, text: &str) -> Result<()> {
        let source = match self.syntax {
            TemplateSyntax::Go => Cow::Owned(go_syntax::translate(text).inspect_err(|e| {
                error!(error = %e, "failed to translate template actions");
            })?),
            TemplateSyntax::Handlebars => Cow::Borrowed(text),
        };

        let template = Template::compile(&source).map_err(|e| {
            error!(error = %e, "failed to parse template");
            Error::Parse(e.to_string())
        })?;

        self.registry.register_template(TEMPLATE_NAME, template);
        self.parsed = true;
        debug!(bytes = text.len(), "parsed template");
        Ok(())
    }

    #[inline]
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Render the parsed template against `data`.
    ///
    /// Nothing is returned on failure; partial output is discarded.
    pub fn execute<T: Serialize>(&self, data: &T) -> Result<String> {
        if !self.parsed {
            error!("execute called before a template was parsed");
            return Err(Error::Execution("template has not been parsed".to_string()));
        }

        self.registry.render(TEMPLATE_NAME, data).map_err(|e| {
            error!(error = %e, "failed to execute template");
            Error::Execution(e.to_string())
        })
    }
}

static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters in a single pass.
#[inline]
pub fn escape_xml(text: &str) -> String {
    XML_ESCAPER.replace_all(text, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}
