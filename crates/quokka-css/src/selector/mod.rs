//! CSS selector parsing and matching for the inliner.
//!
//! Covers the [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//! subset that makes sense against rendered email HTML, matched over the
//! element tree built by [`crate::html`]. Pseudo-classes and pseudo-elements
//! parse and count toward specificity but never match, since an inline
//! `style` attribute cannot express them.

use std::ops::Add;

use quokka_dom::{DomTree, ElementData, NodeId};

/// A single condition on one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `td`, `table`. Compared ASCII case-insensitively.
    Type(String),
    /// `.mj-column-per-100`
    Class(String),
    /// `#header`
    Id(String),
    /// `*`
    Universal,
    /// Name with any argument, without the colon: `hover`, `nth-child(2)`.
    PseudoClass(String),
    /// Name without the colons. The legacy single-colon `:before`, `:after`,
    /// `:first-line` and `:first-letter` land here too.
    PseudoElement(String),
    /// `[href]`, `[class~=cta]`, `[src$=".png"]` and friends.
    Attribute(AttributeSelector),
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors).
///
/// Names are stored lowercased, as the scanner lowercases attribute names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`
    Exists(String),
    /// `[attr=value]`
    Equals(String, String),
    /// `[attr~=value]`: one of the whitespace-separated words.
    Includes(String, String),
    /// `[attr|=value]`: exactly `value` or `value-` followed by anything.
    DashMatch(String, String),
    /// `[attr^=value]`
    PrefixMatch(String, String),
    /// `[attr$=value]`
    SuffixMatch(String, String),
    /// `[attr*=value]`
    SubstringMatch(String, String),
}

impl AttributeSelector {
    fn matches(&self, element: &ElementData) -> bool {
        let value = |name: &str| element.attrs.get(name);
        match self {
            Self::Exists(name) => element.attrs.contains_key(name),
            Self::Equals(name, val) => value(name.as_str()).is_some_and(|v| v == val),
            Self::Includes(name, val) => {
                value(name.as_str()).is_some_and(|v| v.split_ascii_whitespace().any(|w| w == val))
            }
            Self::DashMatch(name, val) => value(name.as_str()).is_some_and(|v| {
                v == val || v.strip_prefix(val.as_str()).is_some_and(|r| r.starts_with('-'))
            }),
            Self::PrefixMatch(name, val) => value(name.as_str()).is_some_and(|v| v.starts_with(val.as_str())),
            Self::SuffixMatch(name, val) => value(name.as_str()).is_some_and(|v| v.ends_with(val.as_str())),
            Self::SubstringMatch(name, val) => value(name.as_str()).is_some_and(|v| v.contains(val.as_str())),
        }
    }
}

/// Simple selectors with no combinator between them, all applying to the
/// same element: `a.cta[href]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The conditions, in source order.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        tree.as_element(node_id)
            .is_some_and(|element| self.simple_selectors.iter().all(|s| s.matches(element)))
    }

    fn specificity(&self) -> Specificity {
        self.simple_selectors
            .iter()
            .map(|simple| match simple {
                SimpleSelector::Id(_) => Specificity(1, 0, 0),
                SimpleSelector::Class(_)
                | SimpleSelector::PseudoClass(_)
                | SimpleSelector::Attribute(_) => Specificity(0, 1, 0),
                SimpleSelector::Type(_) | SimpleSelector::PseudoElement(_) => {
                    Specificity(0, 0, 1)
                }
                SimpleSelector::Universal => Specificity::default(),
            })
            .fold(Specificity::default(), Add::add)
    }
}

/// The relationship between two compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`
    Descendant,
    /// `A > B`
    Child,
    /// `A + B`: the closest preceding element sibling.
    NextSibling,
    /// `A ~ B`: any preceding element sibling.
    SubsequentSibling,
}

/// A chain of compounds joined by combinators, stored right to left.
///
/// `table.body > tr td a.cta` has subject `a.cta` and combinators
/// `[(Descendant, td), (Descendant, tr), (Child, table.body)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound; the element the selector selects.
    pub subject: CompoundSelector,
    /// `(combinator, compound)` pairs walking left from the subject.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules): the sum
    /// over every compound in the chain.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.combinators
            .iter()
            .map(|(_, compound)| compound.specificity())
            .fold(self.subject.specificity(), Add::add)
    }
}

/// `(ids, classes/attributes/pseudo-classes, types/pseudo-elements)`,
/// compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Build from the three counts.
    #[must_use]
    pub const fn new(ids: u32, classes: u32, types: u32) -> Self {
        Self(ids, classes, types)
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0, self.1 + other.1, self.2 + other.2)
    }
}

/// One member of a selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The selector chain.
    pub complex: ComplexSelector,
    /// Precomputed from `complex`.
    pub specificity: Specificity,
}

impl ParsedSelector {
    /// No combinators.
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.complex.combinators.is_empty()
    }

    /// Whether any compound in the chain uses a pseudo-class or pseudo-element.
    #[must_use]
    pub fn has_pseudo(&self) -> bool {
        std::iter::once(&self.complex.subject)
            .chain(self.complex.combinators.iter().map(|(_, c)| c))
            .flat_map(|c| &c.simple_selectors)
            .any(SimpleSelector::is_pseudo)
    }

    /// Whether the element at `node_id` is selected.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        self.complex.subject.matches(tree, node_id) && self.match_from(tree, node_id, 0)
    }

    /// Match `combinators[index..]`, given that `current` matched the
    /// compound to their right. Descendant and subsequent-sibling steps try
    /// every candidate, so `a b > c` still matches when the nearest `b`
    /// ancestor is not under an `a`.
    fn match_from(&self, tree: &DomTree, current: NodeId, index: usize) -> bool {
        let Some((combinator, compound)) = self.complex.combinators.get(index) else {
            return true;
        };
        let rest = |candidate: NodeId| {
            compound.matches(tree, candidate) && self.match_from(tree, candidate, index + 1)
        };
        let mut element_siblings = tree
            .preceding_siblings(current)
            .filter(|&sibling| tree.as_element(sibling).is_some());

        match combinator {
            Combinator::Descendant => tree.ancestors(current).any(rest),
            Combinator::Child => tree.parent(current).is_some_and(rest),
            Combinator::NextSibling => element_siblings.next().is_some_and(rest),
            Combinator::SubsequentSibling => element_siblings.any(rest),
        }
    }
}

/// A comma-separated selector list; selects the union of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    /// The member selectors, in source order.
    pub selectors: Vec<ParsedSelector>,
}

impl SelectorList {
    /// Whether any member uses a pseudo-class or pseudo-element.
    #[must_use]
    pub fn has_pseudo(&self) -> bool {
        self.selectors.iter().any(ParsedSelector::has_pseudo)
    }

    /// Whether any member matches the element.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        self.selectors
            .iter()
            .any(|selector| selector.matches_in_tree(tree, node_id))
    }

    /// Specificity of the most specific matching member, `None` when no
    /// member matches.
    #[must_use]
    pub fn matching_specificity(&self, tree: &DomTree, node_id: NodeId) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|selector| selector.matches_in_tree(tree, node_id))
            .map(|selector| selector.specificity)
            .max()
    }
}

impl SimpleSelector {
    /// Pseudo-classes and pseudo-elements.
    #[must_use]
    pub const fn is_pseudo(&self) -> bool {
        matches!(self, Self::PseudoClass(_) | Self::PseudoElement(_))
    }

    /// Whether `element` satisfies this condition.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Class(class_name) => element.classes().any(|c| c == class_name),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Universal => true,
            Self::PseudoClass(_) | Self::PseudoElement(_) => false,
            Self::Attribute(selector) => selector.matches(element),
        }
    }
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

fn skip_whitespace(chars: &mut Chars<'_>) {
    while chars.peek().is_some_and(char::is_ascii_whitespace) {
        let _ = chars.next();
    }
}

/// Consume identifier characters.
fn take_ident(chars: &mut Chars<'_>) -> String {
    let mut ident = String::new();
    while let Some(&ch) = chars.peek() {
        if !is_ident_char(ch) {
            break;
        }
        ident.push(ch);
        let _ = chars.next();
    }
    ident
}

/// Parse an attribute value inside `[attr=value]`.
/// Handles both quoted (`"val"`, `'val'`) and unquoted ident values.
fn parse_attr_value(chars: &mut Chars<'_>) -> Option<String> {
    skip_whitespace(chars);

    match chars.peek() {
        Some(&q @ ('"' | '\'')) => {
            let _ = chars.next();
            let mut val = String::new();
            for ch in chars.by_ref() {
                if ch == q {
                    return Some(val);
                }
                val.push(ch);
            }
            None // unterminated string
        }
        Some(_) => {
            let mut val = String::new();
            while let Some(&ch) = chars.peek() {
                if !(is_ident_char(ch) || ch == '.') {
                    break;
                }
                val.push(ch);
                let _ = chars.next();
            }
            (!val.is_empty()).then_some(val)
        }
        None => None,
    }
}

/// Parse the body of `[...]` after the opening bracket.
fn parse_attribute_selector(chars: &mut Chars<'_>) -> Option<AttributeSelector> {
    skip_whitespace(chars);
    let name = take_ident(chars).to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    skip_whitespace(chars);

    let operator = match chars.next()? {
        ']' => return Some(AttributeSelector::Exists(name)),
        '=' => '=',
        op @ ('~' | '|' | '^' | '$' | '*') => {
            if chars.next() != Some('=') {
                return None;
            }
            op
        }
        _ => return None,
    };

    let val = parse_attr_value(chars)?;
    skip_whitespace(chars);
    if chars.next() != Some(']') {
        return None;
    }
    Some(match operator {
        '~' => AttributeSelector::Includes(name, val),
        '|' => AttributeSelector::DashMatch(name, val),
        '^' => AttributeSelector::PrefixMatch(name, val),
        '$' => AttributeSelector::SuffixMatch(name, val),
        '*' => AttributeSelector::SubstringMatch(name, val),
        _ => AttributeSelector::Equals(name, val),
    })
}

/// Parse the pseudo after the first `:`.
fn parse_pseudo(chars: &mut Chars<'_>) -> Option<SimpleSelector> {
    // [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    let double_colon = chars.peek() == Some(&':');
    if double_colon {
        let _ = chars.next();
    }

    let mut name = take_ident(chars).to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }

    // Functional forms: :nth-child(2n+1), :not(.a)
    if chars.peek() == Some(&'(') {
        let mut depth = 0u32;
        for ch in chars.by_ref() {
            name.push(ch);
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        if depth != 0 {
            return None; // unbalanced parentheses
        }
    }

    let legacy_element = matches!(
        name.as_str(),
        "before" | "after" | "first-line" | "first-letter"
    );
    Some(if double_colon || legacy_element {
        SimpleSelector::PseudoElement(name)
    } else {
        SimpleSelector::PseudoClass(name)
    })
}

/// Parse a raw selector string into a `ParsedSelector`.
///
/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
///
/// Supports:
/// - Type selectors: `div`, `td`
/// - Class selectors: `.class`
/// - ID selectors: `#id`
/// - Universal selector: `*`
/// - Attribute selectors: `[href]`, `[type="text"]`, `[class~=a]` and the
///   other `§ 6.4` operators
/// - Pseudo-classes and pseudo-elements (recognized, never matched)
/// - Compound selectors: `div.class#id`
/// - Complex selectors with combinators: `div p`, `ul > li`, `h1 + p`, `h1 ~ p`
///
/// Returns `None` for anything else, including selector lists; see
/// [`parse_selector_list`].
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    /// Flush the current identifier as a type selector into the compound.
    fn flush_ident(ident: &mut String, compound: &mut Vec<SimpleSelector>) {
        if !ident.is_empty() {
            compound.push(SimpleSelector::Type(std::mem::take(ident)));
        }
    }

    /// Flush current compound selector into the compounds list.
    /// Returns true if a non-empty compound was flushed.
    fn flush_compound(
        ident: &mut String,
        compound: &mut Vec<SimpleSelector>,
        compounds: &mut Vec<CompoundSelector>,
    ) -> bool {
        flush_ident(ident, compound);
        if compound.is_empty() {
            return false;
        }
        compounds.push(CompoundSelector {
            simple_selectors: std::mem::take(compound),
        });
        true
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Parse left-to-right, collecting compound selectors and the combinators
    // between them; the chain is reversed at the end so matching can start
    // from the subject.
    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators_between: Vec<Combinator> = Vec::new();

    let mut chars = trimmed.chars().peekable();
    let mut current_compound = Vec::new();
    let mut current_ident = String::new();

    while let Some(c) = chars.next() {
        match c {
            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            '.' => {
                flush_ident(&mut current_ident, &mut current_compound);
                let class = take_ident(&mut chars);
                if class.is_empty() {
                    return None;
                }
                current_compound.push(SimpleSelector::Class(class));
            }

            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            '#' => {
                flush_ident(&mut current_ident, &mut current_compound);
                let id = take_ident(&mut chars);
                if id.is_empty() {
                    return None;
                }
                current_compound.push(SimpleSelector::Id(id));
            }

            // [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
            '*' => {
                flush_ident(&mut current_ident, &mut current_compound);
                current_compound.push(SimpleSelector::Universal);
            }

            // [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
            //
            // Whitespace may be the descendant combinator, or just padding
            // around an explicit one.
            ' ' | '\t' | '\n' | '\r' => {
                skip_whitespace(&mut chars);
                match chars.peek() {
                    // Explicit combinator follows: the combinator arm flushes.
                    Some('>' | '+' | '~') => {
                        flush_ident(&mut current_ident, &mut current_compound);
                    }
                    // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
                    Some(_) => {
                        if !flush_compound(
                            &mut current_ident,
                            &mut current_compound,
                            &mut compounds,
                        ) {
                            return None;
                        }
                        combinators_between.push(Combinator::Descendant);
                    }
                    None => {}
                }
            }

            // [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators) `>`
            // [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators) `+`
            // [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators) `~`
            '>' | '+' | '~' => {
                if !flush_compound(&mut current_ident, &mut current_compound, &mut compounds) {
                    return None; // no left-hand side
                }
                skip_whitespace(&mut chars);
                combinators_between.push(match c {
                    '>' => Combinator::Child,
                    '+' => Combinator::NextSibling,
                    _ => Combinator::SubsequentSibling,
                });
            }

            // [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
            // [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
            ':' => {
                flush_ident(&mut current_ident, &mut current_compound);
                current_compound.push(parse_pseudo(&mut chars)?);
            }

            // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
            '[' => {
                flush_ident(&mut current_ident, &mut current_compound);
                current_compound.push(SimpleSelector::Attribute(parse_attribute_selector(
                    &mut chars,
                )?));
            }

            // [§ 4.3.9-10 ident code points](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
            // A type selector must come first in its compound.
            _ if current_ident.is_empty()
                && current_compound.is_empty()
                && (is_ident_start_char(c) || c == '-') =>
            {
                current_ident.push(c);
            }
            _ if !current_ident.is_empty() && is_ident_char(c) => {
                current_ident.push(c);
            }

            // Unsupported syntax
            _ => return None,
        }
    }

    let _ = flush_compound(&mut current_ident, &mut current_compound, &mut compounds);

    // "A B C" has 3 compounds and 2 combinators; a dangling combinator breaks that.
    if compounds.len() != combinators_between.len() + 1 {
        return None;
    }

    // [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    // "The elements represented by a complex selector are the elements matched
    // by the last compound selector in the complex selector."
    let subject = compounds.pop()?;

    // For "A > B C": compounds [A, B], combinators [Child, Descendant]
    // become [(Descendant, B), (Child, A)].
    let combinators = compounds
        .into_iter()
        .zip(combinators_between)
        .rev()
        .map(|(compound, combinator)| (combinator, compound))
        .collect();

    let complex = ComplexSelector {
        subject,
        combinators,
    };
    let specificity = complex.specificity();

    Some(ParsedSelector {
        complex,
        specificity,
    })
}

/// Parse a comma-separated selector list.
///
/// Commas inside brackets, parentheses or quotes do not split. If any
/// member is invalid the whole list is, as in
/// [§ 4.1](https://www.w3.org/TR/selectors-4/#grouping):
/// "If just one of these selectors were invalid, the entire selector list
/// would be invalid."
#[must_use]
pub fn parse_selector_list(raw: &str) -> Option<SelectorList> {
    let mut selectors = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                selectors.push(parse_selector(&raw[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    selectors.push(parse_selector(&raw[start..])?);

    Some(SelectorList { selectors })
}
