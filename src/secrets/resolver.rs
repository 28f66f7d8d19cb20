use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

use super::{SecretResolver, SecretSource};
use crate::context::ConfigurationContext;

/// Resolves secret-reference tokens against an ordered chain of sources
///
/// Supports:
/// - `${name}` - Secret looked up in every source, first hit wins (error if unknown)
/// - `${name:-default}` - Optional secret with default value
/// - `${SECRET:name}` - Explicit secret lookup, same rules as `${name}`
/// - `${env:NAME}` - Process environment only
/// - `${base64:text}` / `${decodeBase64:text}` - Base64 encode / decode
/// - `${readFile:path}` / `${fileBase64:path}` - File contents, raw or base64
/// - `^${...}` - Escaped token, emitted literally as `${...}`
///
/// Function arguments and secret names are resolved before use, so
/// `${base64:${SECRET:token}}` and `${SECRET:${name}}` both work. Text outside tokens is never touched.
///
/// # Examples
///
/// ```
/// use casc_script::secrets::{SecretSourceResolver, StaticSecretSource};
///
/// let resolver = SecretSourceResolver::new()
///     .with_source(StaticSecretSource::default().with("greeting", "Hello World"));
///
/// let script = r#"setMessage("${SECRET:greeting}")"#;
/// let resolved = resolver.expand(script, std::path::Path::new(".")).unwrap();
/// assert_eq!(resolved, r#"setMessage("Hello World")"#);
/// ```
#[derive(Default)]
pub struct SecretSourceResolver {
    sources: Vec<Box<dyn SecretSource>>,
}

impl SecretSourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source to the lookup chain
    pub fn with_source(mut self, source: impl SecretSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn source_labels(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.label()).collect()
    }

    /// Expand every token in `content`; relative file paths resolve against `base_dir`
    pub fn expand(&self, content: &str, base_dir: &Path) -> Result<String> {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(idx) = rest.find("${") {
            let (before, after) = rest.split_at(idx);

            // Escaped token: ^${...} is emitted without its caret
            if let Some(literal) = before.strip_suffix('^') {
                result.push_str(literal);
                result.push_str("${");
                rest = &after[2..];
                continue;
            }

            result.push_str(before);

            let body = &after[2..];
            let end = find_closing_brace(body).ok_or_else(|| {
                anyhow!(
                    "Unterminated secret reference starting at '{}'",
                    truncate(after, 32)
                )
            })?;

            result.push_str(&self.evaluate(&body[..end], base_dir)?);
            rest = &body[end + 1..];
        }

        result.push_str(rest);
        Ok(result)
    }

    fn evaluate(&self, expr: &str, base_dir: &Path) -> Result<String> {
        if let Some((prefix, arg)) = expr.split_once(':') {
            // `${name:-default}` is a default, not a function call
            if !arg.starts_with('-') {
                match prefix {
                    "SECRET" => return self.lookup(arg, base_dir, |name| self.reveal(name)),
                    "env" => {
                        return self.lookup(arg, base_dir, |name| Ok(std::env::var(name).ok()))
                    }
                    "base64" => {
                        let arg = self.expand(arg, base_dir)?;
                        return Ok(STANDARD.encode(arg.as_bytes()));
                    }
                    "decodeBase64" => {
                        let arg = self.expand(arg, base_dir)?;
                        let bytes = STANDARD
                            .decode(arg.trim())
                            .context("Failed to decode base64 value")?;
                        return String::from_utf8(bytes)
                            .context("Decoded base64 value is not valid UTF-8");
                    }
                    "readFile" => {
                        let path = base_dir.join(self.expand(arg, base_dir)?);
                        return std::fs::read_to_string(&path).with_context(|| {
                            format!("Failed to read file referenced by secret: {}", path.display())
                        });
                    }
                    "fileBase64" => {
                        let path = base_dir.join(self.expand(arg, base_dir)?);
                        let bytes = std::fs::read(&path).with_context(|| {
                            format!("Failed to read file referenced by secret: {}", path.display())
                        })?;
                        return Ok(STANDARD.encode(bytes));
                    }
                    _ => {}
                }
            }
        }

        self.lookup(expr, base_dir, |name| self.reveal(name))
    }

    fn lookup<F>(&self, expr: &str, base_dir: &Path, find: F) -> Result<String>
    where
        F: Fn(&str) -> Result<Option<String>>,
    {
        let (name, default_value) = split_default(expr);
        let name = self.expand(name, base_dir)?;
        let name = name.as_str();

        match find(name)? {
            Some(value) => Ok(value),
            None => match default_value {
                Some(default) => {
                    debug!(secret = name, "secret not found, using default");
                    Ok(default.to_string())
                }
                None => anyhow::bail!(
                    "Secret '{}' is required but could not be resolved. \
                     Use ${{{}:-default}} to provide a default value.",
                    name,
                    name
                ),
            },
        }
    }

    fn reveal(&self, name: &str) -> Result<Option<String>> {
        for source in &self.sources {
            if let Some(value) = source.reveal(name)? {
                debug!(secret = name, source = source.label(), "secret resolved");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl SecretResolver for SecretSourceResolver {
    fn resolve(&self, context: &ConfigurationContext, raw: &str) -> Result<String> {
        self.expand(raw, context.base_dir())
    }
}

/// Index of the `}` closing a token body, honoring nested braces
/// Split `name:-default` at the first `:-` outside nested tokens
fn split_default(expr: &str) -> (&str, Option<&str>) {
    let bytes = expr.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
                continue;
            }
            b'}' if depth > 0 => depth -= 1,
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b'-') => {
                return (&expr[..i], Some(&expr[i + 2..]));
            }
            _ => {}
        }
        i += 1;
    }

    (expr, None)
}

fn find_closing_brace(body: &str) -> Option<usize> {
    let mut depth = 1;
    for (idx, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
