// SPDX-License-Identifier:  MIT

//! Splitting of the boot parameter line into `ifcfg=` directives.

pub static IFCFG_PREFIX: &str = "ifcfg=";

/// Iterator over space separated tokens of a kernel command line.
///
/// A double quote toggles quoting, spaces inside quotes do not separate tokens. An unterminated
/// quote keeps the rest of the line in a single token.
pub struct Tokens<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(line: &'a str) -> Self {
        Tokens { line, pos: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.line.len() {
            return None;
        }

        let start = self.pos;
        let mut in_quote = false;

        for (i, c) in self.line[start..].char_indices() {
            match c {
                '"' => in_quote = !in_quote,
                ' ' if !in_quote => {
                    self.pos = start + i + 1;
                    return Some(&self.line[start..start + i]);
                }
                _ => {}
            }
        }

        self.pos = self.line.len();
        Some(&self.line[start..])
    }
}

/// Strips one leading double quote and, if present, the matching trailing one.
pub fn unquote(value: &str) -> &str {
    match value.strip_prefix('"') {
        Some(v) => v.strip_suffix('"').unwrap_or(v),
        None => value,
    }
}

/// Values of all `ifcfg=` options on the line, left to right, with surrounding quotes removed.
pub fn ifcfg_directives(line: &str) -> impl Iterator<Item = &str> {
    Tokens::new(line)
        .filter_map(|t| t.strip_prefix(IFCFG_PREFIX))
        .map(unquote)
}
