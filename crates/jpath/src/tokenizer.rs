//! Splits text on a delimiter while skipping over nested brackets and quoted
//! literals.
//!
//! Unbalanced input is not an error: once a bracket is left open the scanner
//! never returns to nesting depth zero, so the rest of the text lands in the
//! final chunk.

/// What to split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter<'a> {
    Char(char),
    Literal(&'a str),
}

impl From<char> for Delimiter<'static> {
    fn from(c: char) -> Self {
        Delimiter::Char(c)
    }
}

impl<'a> From<&'a str> for Delimiter<'a> {
    fn from(s: &'a str) -> Self {
        Delimiter::Literal(s)
    }
}

impl Delimiter<'_> {
    /// Byte length of the delimiter if it occurs at the start of `text`.
    fn match_len(&self, text: &str) -> Option<usize> {
        match self {
            Delimiter::Char(c) => text.starts_with(*c).then(|| c.len_utf8()),
            Delimiter::Literal(s) => (!s.is_empty() && text.starts_with(s)).then_some(s.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BalancedTokenizer {
    pairs: Vec<(char, char)>,
    quotes: Vec<char>,
}

impl Default for BalancedTokenizer {
    /// Brackets `{}`, `[]`, `()` and both quote characters.
    fn default() -> Self {
        Self::new(&[('{', '}'), ('[', ']'), ('(', ')')], &['\'', '"'])
    }
}

impl BalancedTokenizer {
    pub fn new(pairs: &[(char, char)], quotes: &[char]) -> Self {
        Self {
            pairs: pairs.to_vec(),
            quotes: quotes.to_vec(),
        }
    }

    /// Splits `text` at every top-level occurrence of `delimiter`.
    pub fn split<'d>(&self, text: &str, delimiter: impl Into<Delimiter<'d>>) -> Vec<String> {
        self.splitn(text, delimiter, usize::MAX)
    }

    /// Like [`split`](Self::split) but returns at most `limit` chunks; the last
    /// chunk holds the unsplit remainder.
    pub fn splitn<'d>(
        &self,
        text: &str,
        delimiter: impl Into<Delimiter<'d>>,
        limit: usize,
    ) -> Vec<String> {
        let delimiter = delimiter.into();
        let mut chunks = Vec::new();
        let mut depth = vec![0usize; self.pairs.len()];
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut start = 0;
        let mut resume_at = 0;

        for (pos, c) in text.char_indices() {
            if pos < resume_at {
                continue;
            }
            if let Some(open) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == open {
                    quote = None;
                }
                continue;
            }

            let balanced = depth.iter().all(|d| *d == 0);
            if balanced && chunks.len() + 1 < limit {
                if let Some(len) = delimiter.match_len(&text[pos..]) {
                    chunks.push(text[start..pos].to_string());
                    start = pos + len;
                    resume_at = start;
                    continue;
                }
            }

            if self.quotes.contains(&c) {
                quote = Some(c);
                continue;
            }
            for (k, (open, close)) in self.pairs.iter().enumerate() {
                if c == *open {
                    depth[k] += 1;
                    break;
                }
                if c == *close {
                    depth[k] = depth[k].saturating_sub(1);
                    break;
                }
            }
        }
        chunks.push(text[start..].to_string());
        chunks
    }
}
