//! Variable syntax scanning.
//!
//! Recognizes `${scalar}`, `@{list}`, `&{dict}` and `%{ENV}` references in
//! cells and free text. Scalar, list and dict sigils name the same variable;
//! environment variables live in their own namespace.

use std::fmt;

use smol_str::SmolStr;

use super::constants::BUILTIN_VARIABLES;

/// A variable reference located in a piece of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableRef<'a> {
    /// `$`, `@`, `&` or `%`.
    pub sigil: char,
    /// The text between the braces.
    pub name: &'a str,
    /// Byte offset of the sigil.
    pub start: usize,
    /// Byte offset one past the closing brace.
    pub end: usize,
}

impl VariableRef<'_> {
    pub fn key(&self) -> VariableKey {
        VariableKey::from_parts(self.sigil, self.name)
    }
}

/// Identity of a variable for comparison: namespace plus normalized name.
///
/// Names are compared ignoring case, whitespace and underscores.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VariableKey {
    environment: bool,
    name: SmolStr,
}

impl VariableKey {
    fn from_parts(sigil: char, name: &str) -> Self {
        Self {
            environment: sigil == '%',
            name: SmolStr::new(normalize_variable_name(name)),
        }
    }

    /// Parse text consisting of exactly one variable, e.g. `${Foo}` or `@{items}`.
    ///
    /// A trailing assignment mark (`${x}=`) or default value (`${x}=1`) is
    /// accepted so that argument and assignment cells parse too.
    pub fn parse(text: &str) -> Option<Self> {
        leading_variable(text.trim()).map(|var| var.key())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_environment(&self) -> bool {
        self.environment
    }

    /// Whether the runtime defines this variable (`${True}`, `${EMPTY}`, `${42}`...).
    pub fn is_builtin(&self) -> bool {
        if self.environment {
            return false;
        }
        BUILTIN_VARIABLES
            .iter()
            .any(|builtin| normalize_variable_name(builtin) == self.name.as_str())
            || is_number(&self.name)
    }
}

impl fmt::Debug for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sigil = if self.environment { '%' } else { '$' };
        write!(f, "VariableKey({}{{{}}})", sigil, self.name)
    }
}

fn normalize_variable_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_number(name: &str) -> bool {
    let digits = name.trim_start_matches('-');
    let radix_digits = ["0x", "0b", "0o"]
        .iter()
        .find_map(|prefix| digits.strip_prefix(prefix));
    match radix_digits {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_hexdigit()),
        None => {
            digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
                && digits.parse::<f64>().is_ok()
        }
    }
}

fn is_sigil(b: u8) -> bool {
    matches!(b, b'$' | b'@' | b'&' | b'%')
}

/// Find the brace closing the one at `open`, honoring nesting and escapes.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Find every variable reference in `text`, in order of appearance.
///
/// Nested references are reported too: `${a${b}}` yields the outer
/// reference followed by `${b}`. A backslash escapes the next character.
///
/// # Example
/// ```
/// use ride::base::find_variables;
///
/// let refs = find_variables("Hello ${name}, you have @{items}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "name");
/// assert_eq!(refs[1].sigil, '@');
/// ```
pub fn find_variables(text: &str) -> Vec<VariableRef<'_>> {
    let bytes = text.as_bytes();
    let mut refs = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
            continue;
        }
        if is_sigil(b) && bytes[i + 1] == b'{' {
            if let Some(close) = matching_brace(bytes, i + 1) {
                let name = &text[i + 2..close];
                if !name.is_empty() {
                    refs.push(VariableRef {
                        sigil: b as char,
                        name,
                        start: i,
                        end: close + 1,
                    });
                }
                i += 2;
                continue;
            }
        }
        i += 1;
    }
    refs
}

/// The variable that starts `text`, if it is followed only by an optional
/// `=` part (assignment mark or argument default).
pub fn leading_variable(text: &str) -> Option<VariableRef<'_>> {
    let first = find_variables(text).into_iter().next()?;
    if first.start != 0 {
        return None;
    }
    let rest = text[first.end..].trim_start();
    (rest.is_empty() || rest.starts_with('=')).then_some(first)
}

/// The variable assigned by a step cell such as `${result}=` or `@{items} =`.
pub fn assignment_target(cell: &str) -> Option<VariableRef<'_>> {
    let trimmed = cell.trim_end();
    let body = trimmed.strip_suffix('=').unwrap_or(trimmed).trim_end();
    let var = leading_variable(body)?;
    (var.end == body.len() && var.sigil != '%').then_some(var)
}
