//! Template rendering engine with Tera.
//!
//! [`TemplateRenderer`] renders one fragment at a time. Each render gets a fresh Tera
//! instance with the function library registered against the renderer's
//! [`RenderContext`]; the Tera context itself is built once per renderer.

use anyhow::Result;
use regex::Regex;
use std::sync::Arc;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::context::RenderContext;
use super::error::{ErrorLocation, TemplateError};
use super::functions;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// How deep to descend into the context when listing available variables
const MAX_VARIABLE_DEPTH: usize = 4;

pub struct TemplateRenderer {
    ctx: Arc<RenderContext>,
    tera_context: TeraContext,
}

impl TemplateRenderer {
    /// Create a renderer for one render context.
    ///
    /// # Errors
    ///
    /// Fails if the context cannot be serialized into a Tera context.
    pub fn new(ctx: RenderContext) -> Result<Self> {
        let tera_context = ctx.to_tera_context()?;
        Ok(Self {
            ctx: Arc::new(ctx),
            tera_context,
        })
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Render a fragment.
    ///
    /// `template_name` identifies the fragment in error messages; callers pass the
    /// fragment's path relative to the template repository root.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] if:
    /// - Template syntax is invalid
    /// - A referenced variable is missing from the context
    /// - A template function fails (invalid skip key, unknown URL scheme, ...)
    pub fn render(&self, template_name: &str, content: &str) -> Result<String, TemplateError> {
        tracing::trace!("Rendering template {}", template_name);

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        functions::register_functions(&mut tera, &self.ctx);

        tera.add_raw_template(template_name, content)
            .map_err(|e| self.parse_tera_error(&e, template_name, content))?;

        tera.render(template_name, &self.tera_context)
            .map_err(|e| self.parse_tera_error(&e, template_name, content))
    }

    /// Parse a Tera error into a structured TemplateError
    fn parse_tera_error(
        &self,
        error: &tera::Error,
        template_name: &str,
        template_content: &str,
    ) -> TemplateError {
        let line_number = Self::extract_line_from_tera_error(error);
        let context_lines = line_number
            .map(|line| Self::extract_context_lines(template_content, line, 2))
            .filter(|lines| !lines.is_empty());
        let location = Box::new(ErrorLocation {
            template: template_name.to_string(),
            line_number,
            context_lines,
        });

        let chain = Self::error_chain(error);

        if let Some((function, message)) = Self::extract_function_failure(&chain) {
            return TemplateError::FunctionFailed {
                function,
                message,
                location,
            };
        }

        if let Some(name) = chain.iter().find_map(|msg| Self::extract_variable_name(msg)) {
            let available_variables = self.extract_available_variables();
            let suggestions = Self::find_similar_variables(&name, &available_variables);
            return TemplateError::VariableNotFound {
                variable: name,
                available_variables: Box::new(available_variables),
                suggestions: Box::new(suggestions),
                location,
            };
        }

        TemplateError::SyntaxError {
            message: Self::format_tera_error(error),
            location,
        }
    }

    fn error_chain(error: &tera::Error) -> Vec<String> {
        use std::error::Error;

        let mut messages = vec![error.to_string()];
        let mut current: Option<&dyn Error> = error.source();
        while let Some(err) = current {
            messages.push(err.to_string());
            current = err.source();
        }
        messages
    }

    /// Tera reports function errors as "Function call 'name' failed" with the
    /// function's own message as the next link in the chain
    fn extract_function_failure(chain: &[String]) -> Option<(String, String)> {
        let re = Regex::new(r"Function call '([^']+)' failed").ok()?;
        let (idx, caps) =
            chain.iter().enumerate().find_map(|(i, msg)| re.captures(msg).map(|c| (i, c)))?;
        let function = caps.get(1)?.as_str().to_string();
        let message = chain.get(idx + 1).cloned().unwrap_or_default();
        Some((function, message))
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
        if let Some(caps) = re.captures(error_msg)
            && let Some(m) = caps.get(1)
        {
            return Some(m.as_str().to_string());
        }
        None
    }

    /// Dotted paths of everything in the context, a few levels deep
    fn extract_available_variables(&self) -> Vec<String> {
        fn walk(prefix: &str, value: &serde_json::Value, depth: usize, out: &mut Vec<String>) {
            if let serde_json::Value::Object(map) = value
                && depth < MAX_VARIABLE_DEPTH
            {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    out.push(path.clone());
                    walk(&path, child, depth + 1, out);
                }
            }
        }

        let mut vars = Vec::new();
        walk("", &self.tera_context.clone().into_json(), 0, &mut vars);
        vars
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> =
            available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();

        scored.sort_by_key(|(_, dist)| *dist);

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Up to `context_size` lines before and after the error line, 1-indexed
    fn extract_context_lines(
        content: &str,
        error_line: usize,
        context_size: usize,
    ) -> Vec<(usize, String)> {
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        if error_line == 0 || error_line > total_lines {
            return Vec::new();
        }

        let start = error_line.saturating_sub(context_size + 1);
        let end = (error_line + context_size).min(total_lines);

        lines[start..end]
            .iter()
            .enumerate()
            .map(|(idx, line)| (start + idx + 1, (*line).to_string()))
            .collect()
    }

    /// Tera parse errors carry a `--> line:column` marker somewhere in the chain
    fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
        let re = Regex::new(r"--> (\d+):(\d+)").ok()?;
        Self::error_chain(error).iter().find_map(|msg| {
            let caps = re.captures(msg)?;
            caps.get(1)?.as_str().parse::<usize>().ok()
        })
    }

    /// Flatten a Tera error chain into one readable message
    pub fn format_tera_error(error: &tera::Error) -> String {
        let messages: Vec<String> = Self::error_chain(error)
            .into_iter()
            .map(|msg| msg.trim().to_string())
            .filter(|msg| !msg.is_empty() && !msg.starts_with("Failed to render '"))
            .collect();

        if messages.is_empty() {
            "Template syntax error (see details above)".to_string()
        } else {
            messages.join("\n  -> ")
        }
    }
}
