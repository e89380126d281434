use crate::config::AliasConfig;
use regex::Regex;
use std::ops::Range;

/// Line-oriented detector for alias imports.
///
/// Matches a quoted string right after an `import` or `from` keyword whose content starts with
/// the alias marker: `import x from "@/a/b"`, `export { y } from '@/c'`, `import "@/d.css"`.
/// This is text matching, not parsing. Statements split across lines are not seen, and only the
/// first alias on a line is reported.
#[derive(Debug, Clone)]
pub struct ImportScanner {
    re: Regex,
}

/// One alias reference found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasMatch<'a> {
    pub alias: &'a str,
    /// Byte range of `alias` within the line.
    pub span: Range<usize>,
}

impl ImportScanner {
    pub fn new(config: &AliasConfig) -> Result<Self, regex::Error> {
        let pattern = format!(
            r#"\b(?:from|import)\s+['"]({}[^'"]*)['"]"#,
            regex::escape(&config.marker)
        );
        Ok(Self {
            re: Regex::new(&pattern)?,
        })
    }

    /// The first alias reference on `line`, if any.
    pub fn find<'a>(&self, line: &'a str) -> Option<AliasMatch<'a>> {
        let caps = self.re.captures(line)?;
        let m = caps.get(1)?;
        Some(AliasMatch {
            alias: m.as_str(),
            span: m.range(),
        })
    }
}
