//! The address model used by commands.
//!
//! An address is split on top-level dots into [`PathElement`]s. The elements
//! are then partitioned into a *selection prefix*, which must already exist in
//! the document, and a *construction suffix* of plain object properties that
//! may be fabricated on demand. Anything up to the last array step or
//! recursive-descent step belongs to the prefix: a missing array slot cannot
//! be invented.
use itertools::Itertools;
use std::borrow::Cow;
use std::fmt;

/// One dot-separated segment of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathElement {
    raw: String,
    name: String,
    has_array_indicator: bool,
    is_recursive_descent: bool,
}

impl PathElement {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let has_array_indicator = raw.ends_with(']') && raw.contains('[');
        let is_recursive_descent = raw.is_empty();
        let name = element_name(&raw);
        Self {
            raw,
            name,
            has_array_indicator,
            is_recursive_descent,
        }
    }

    /// The segment exactly as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The property name: the segment without trailing bracket notation and
    /// with escaped dots unescaped.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_array_indicator(&self) -> bool {
        self.has_array_indicator
    }

    /// True for the empty segment produced by `..`.
    pub fn is_recursive_descent(&self) -> bool {
        self.is_recursive_descent
    }

    /// True for a bare `$` or `@`.
    pub fn is_root_marker(&self) -> bool {
        self.raw == "$" || self.raw == "@"
    }
}

/// The text before the first top-level `[`, with `\.` unescaped.
fn element_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    name.push(next);
                }
            }
            '[' => break,
            _ => name.push(c),
        }
    }
    name
}

/// An address split into classified elements. Element 0 is the root marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPath {
    elements: Vec<PathElement>,
}

impl SplitPath {
    /// Splits an address on dots that are neither escaped nor inside brackets.
    pub fn parse(address: &str) -> Self {
        let mut elements = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;

        for c in address.chars() {
            if escaped {
                current.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => {
                    current.push(c);
                    escaped = true;
                }
                '\'' | '"' if depth > 0 => {
                    match quote {
                        Some(open) if open == c => quote = None,
                        None => quote = Some(c),
                        _ => {}
                    }
                    current.push(c);
                }
                _ if quote.is_some() => current.push(c),
                '[' => {
                    depth += 1;
                    current.push(c);
                }
                ']' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                '.' if depth == 0 => {
                    elements.push(PathElement::new(std::mem::take(&mut current)));
                }
                _ => current.push(c),
            }
        }
        elements.push(PathElement::new(current));
        Self { elements }
    }

    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Index of the last element of the selection prefix.
    ///
    /// Scanning backwards from the end (down to element 1): a recursive-descent
    /// element at `i` yields `i + 1`, an array-indicator element yields `i`.
    /// Without either, the prefix is just the root element.
    pub fn boundary(&self) -> usize {
        for i in (1..self.elements.len()).rev() {
            let element = &self.elements[i];
            if element.is_recursive_descent() {
                return (i + 1).min(self.elements.len() - 1);
            }
            if element.has_array_indicator() {
                return i;
            }
        }
        0
    }

    /// Elements that must already exist.
    pub fn selection_prefix(&self) -> &[PathElement] {
        if self.elements.is_empty() {
            return &[];
        }
        &self.elements[..=self.boundary()]
    }

    /// Trailing plain properties that may be created.
    pub fn construction_suffix(&self) -> &[PathElement] {
        if self.elements.is_empty() {
            return &[];
        }
        &self.elements[self.boundary() + 1..]
    }

    pub fn last_element(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// The property name the command writes or removes.
    pub fn last_name(&self) -> Option<&str> {
        self.last_element().map(PathElement::name)
    }

    /// True for a lone `$` or `@`.
    pub fn is_root(&self) -> bool {
        self.elements.len() == 1 && self.elements[0].is_root_marker()
    }

    /// True when the second-to-last element is `..`: the final name is a
    /// search term ("any object with this property") rather than a single
    /// write target.
    pub fn is_search(&self) -> bool {
        self.elements.len() >= 3 && self.elements[self.elements.len() - 2].is_recursive_descent()
    }

    /// The address without its final element.
    pub fn parent(&self) -> Option<SplitPath> {
        if self.elements.len() < 2 {
            return None;
        }
        Some(Self::from_elements(
            self.elements[..self.elements.len() - 1].to_vec(),
        ))
    }

    /// Number of leading elements the two addresses share verbatim.
    pub fn common_prefix_len(&self, other: &SplitPath) -> usize {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// The elements from `start` onwards, re-rooted at `$`.
    pub fn relative_to(&self, start: usize) -> SplitPath {
        let mut elements = vec![PathElement::new("$")];
        elements.extend(self.elements.iter().skip(start).cloned());
        Self::from_elements(elements)
    }

    /// Re-joins the elements into a query string.
    pub fn render(&self) -> String {
        render_elements(&self.elements)
    }
}

/// Joins elements back into an address string.
pub fn render_elements(elements: &[PathElement]) -> String {
    elements.iter().map(PathElement::raw).join(".")
}

/// Roots an address at `$` when it does not start with a root marker:
/// `a.b` becomes `$.a.b`, `[0]` becomes `$[0]`.
pub fn normalize_address(address: &str) -> Cow<'_, str> {
    let trimmed = address.trim();
    if trimmed.starts_with('$') || trimmed.starts_with('@') {
        Cow::Borrowed(trimmed)
    } else if trimmed.starts_with('.') || trimmed.starts_with('[') {
        Cow::Owned(format!("${}", trimmed))
    } else {
        Cow::Owned(format!("$.{}", trimmed))
    }
}

impl From<&str> for SplitPath {
    fn from(address: &str) -> Self {
        SplitPath::parse(address)
    }
}

impl fmt::Display for SplitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raws(elements: &[PathElement]) -> Vec<&str> {
        elements.iter().map(PathElement::raw).collect()
    }

    #[test]
    fn test_split_simple_path() {
        let path = SplitPath::parse("$.a.b.c");
        assert_eq!(raws(path.elements()), vec!["$", "a", "b", "c"]);
        assert_eq!(raws(path.selection_prefix()), vec!["$"]);
        assert_eq!(raws(path.construction_suffix()), vec!["a", "b", "c"]);
        assert_eq!(path.last_name(), Some("c"));
    }

    #[test]
    fn test_boundary_after_array_indicator() {
        let path = SplitPath::parse("$.a.b[0].c");
        assert_eq!(raws(path.selection_prefix()), vec!["$", "a", "b[0]"]);
        assert_eq!(raws(path.construction_suffix()), vec!["c"]);
        let b = &path.elements()[2];
        assert!(b.has_array_indicator());
        assert_eq!(b.name(), "b");
    }

    #[test]
    fn test_boundary_after_recursive_descent() {
        let path = SplitPath::parse("$.a..b.c");
        assert_eq!(raws(path.elements()), vec!["$", "a", "", "b", "c"]);
        assert!(path.elements()[2].is_recursive_descent());
        assert_eq!(raws(path.selection_prefix()), vec!["$", "a", "", "b"]);
        assert_eq!(raws(path.construction_suffix()), vec!["c"]);
    }

    #[test]
    fn test_last_array_indicator_wins_over_earlier_descent() {
        let path = SplitPath::parse("$..items[*].tags.x");
        assert_eq!(raws(path.selection_prefix()), vec!["$", "", "items[*]"]);
        assert_eq!(raws(path.construction_suffix()), vec!["tags", "x"]);
    }

    #[test]
    fn test_dots_inside_brackets_do_not_split() {
        let path = SplitPath::parse("$.store['book.title'].items[?(@.price > 1.5)].name");
        assert_eq!(
            raws(path.elements()),
            vec!["$", "store['book.title']", "items[?(@.price > 1.5)]", "name"]
        );
        assert_eq!(path.elements()[1].name(), "store");
    }

    #[test]
    fn test_quoted_bracket_inside_brackets() {
        let path = SplitPath::parse("$['a]b'].c");
        assert_eq!(raws(path.elements()), vec!["$['a]b']", "c"]);
    }

    #[test]
    fn test_escaped_dot() {
        let path = SplitPath::parse(r"$.a\.b.c");
        assert_eq!(raws(path.elements()), vec!["$", r"a\.b", "c"]);
        assert_eq!(path.elements()[1].name(), "a.b");
    }

    #[test]
    fn test_prefix_and_suffix_rejoin_to_elements() {
        for address in [
            "$",
            "$.a",
            "$.a.b[0].c.d",
            "$..x",
            "$.a..b[1].c",
            "$.a[*]..b.c.d",
            "@.x.y",
        ] {
            let path = SplitPath::parse(address);
            let mut joined = path.selection_prefix().to_vec();
            joined.extend_from_slice(path.construction_suffix());
            assert_eq!(joined, path.elements(), "address {}", address);
            assert_eq!(path.render(), address);
        }
    }

    #[test]
    fn test_search_mode_and_parent() {
        let search = SplitPath::parse("$..id");
        assert!(search.is_search());
        assert_eq!(raws(search.selection_prefix()), vec!["$", "", "id"]);
        assert!(search.construction_suffix().is_empty());

        let plain = SplitPath::parse("$.a.b");
        assert!(!plain.is_search());
        assert_eq!(plain.parent().unwrap().render(), "$.a");
        assert!(SplitPath::parse("$").parent().is_none());
        assert!(SplitPath::parse("$").is_root());
    }

    #[test]
    fn test_common_prefix_and_relative() {
        let source = SplitPath::parse("$.people[*].name");
        let target = SplitPath::parse("$.people[*].display.name");
        assert_eq!(source.common_prefix_len(&target), 3);
        assert_eq!(target.relative_to(3).render(), "$.display.name");
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("a.b"), "$.a.b");
        assert_eq!(normalize_address("[0].a"), "$[0].a");
        assert_eq!(normalize_address("..a"), "$..a");
        assert_eq!(normalize_address(" $.a "), "$.a");
        assert_eq!(normalize_address("@.a"), "@.a");
    }
}
