//! Structured template errors
//!
//! Every error carries the fragment it came from (its path relative to the template
//! repository root) and, when Tera reports one, the line number with a few lines of
//! surrounding source.

/// Template rendering errors with location context
#[derive(Debug)]
pub enum TemplateError {
    VariableNotFound {
        variable: String,
        available_variables: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },

    /// A registered template function returned an error
    FunctionFailed {
        function: String,
        message: String,
        location: Box<ErrorLocation>,
    },
}

/// Where in the template repository an error occurred
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// Fragment path relative to the template repository root
    pub template: String,
    /// Line number if available from Tera
    pub line_number: Option<usize>,
    /// Source lines around the error, 1-indexed
    pub context_lines: Option<Vec<(usize, String)>>,
}

impl TemplateError {
    pub fn location(&self) -> &ErrorLocation {
        match self {
            Self::VariableNotFound {
                location,
                ..
            }
            | Self::SyntaxError {
                location,
                ..
            }
            | Self::FunctionFailed {
                location,
                ..
            } => location,
        }
    }

    /// Generate user-friendly error message with context and suggestions
    pub fn format_with_context(&self) -> String {
        match self {
            Self::VariableNotFound {
                variable,
                available_variables,
                suggestions,
                location,
            } => format_variable_not_found_error(
                variable,
                available_variables,
                suggestions,
                location,
            ),
            Self::SyntaxError {
                message,
                location,
            } => format_syntax_error(message, location),
            Self::FunctionFailed {
                function,
                message,
                location,
            } => format_function_error(function, message, location),
        }
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VariableNotFound {
                variable,
                location,
                ..
            } => {
                write!(f, "template variable not found in {}: '{}'", location.template, variable)
            }
            Self::SyntaxError {
                message,
                location,
            } => {
                write!(f, "failed to render template {}: {}", location.template, message)
            }
            Self::FunctionFailed {
                function,
                message,
                location,
            } => {
                write!(
                    f,
                    "failed to execute template {}: {}() failed: {}",
                    location.template, function, message
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

fn push_location(msg: &mut String, location: &ErrorLocation) {
    msg.push_str(&format!("Template: {}\n", location.template));
    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }
    if let Some(lines) = &location.context_lines {
        msg.push('\n');
        for (number, text) in lines {
            let marker = if Some(*number) == location.line_number {
                ">"
            } else {
                " "
            };
            msg.push_str(&format!("{} {:>4} | {}\n", marker, number, text));
        }
    }
}

fn format_variable_not_found_error(
    variable: &str,
    available_variables: &[String],
    suggestions: &[String],
    location: &ErrorLocation,
) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Variable Not Found\n\n");
    msg.push_str(&format!("Variable: {}\n", variable));
    push_location(&mut msg, location);
    msg.push('\n');

    if !suggestions.is_empty() {
        msg.push_str("Did you mean one of these?\n");
        for suggestion in suggestions {
            msg.push_str(&format!("  - {}\n", suggestion));
        }
        msg.push('\n');
    }

    if !available_variables.is_empty() {
        msg.push_str("Available variables in this context:\n");

        // Group by top-level key
        let mut grouped = std::collections::BTreeMap::new();
        for var in available_variables {
            let prefix = var.split('.').next().unwrap_or(var);
            grouped.entry(prefix).or_insert_with(Vec::new).push(var.clone());
        }

        for (prefix, vars) in grouped.iter().take(8) {
            if vars.len() <= 3 {
                for var in vars {
                    msg.push_str(&format!("  {}\n", var));
                }
            } else {
                msg.push_str(&format!("  {}.*  ({} variables)\n", prefix, vars.len()));
            }
        }

        if grouped.len() > 8 {
            msg.push_str(&format!("  ... and {} more\n", grouped.len() - 8));
        }
        msg.push('\n');
    }

    msg
}

fn format_syntax_error(message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Syntax Error\n\n");
    msg.push_str(&format!("Error: {}\n", message));
    push_location(&mut msg, location);

    msg.push_str("\nSUGGESTION: Check template syntax for unclosed tags or invalid expressions.\n");
    msg.push_str("Common issues:\n");
    msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
    msg.push_str("  - Unknown function or filter names\n");
    msg.push_str("  - Missing quotes around string values\n\n");

    msg
}

fn format_function_error(function: &str, message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Function Failed\n\n");
    msg.push_str(&format!("Function: {}\n", function));
    msg.push_str(&format!("Error: {}\n", message));
    push_location(&mut msg, location);

    let hint = match function {
        "skip" => Some("skip keys must start with a lowercase letter or '_' (e.g. skip(key=\"node_ip\"))"),
        "urlHost" | "urlPort" => Some("pass a full URL including scheme (e.g. urlPort(u=\"https://api:6443\"))"),
        f if f.starts_with("onPremPlatform") => {
            Some("on-prem functions are only valid for on-prem platforms; guard them with a platform check")
        }
        _ => None,
    };
    if let Some(hint) = hint {
        msg.push_str(&format!("\nSUGGESTION: {}\n", hint));
    }
    msg.push('\n');

    msg
}
