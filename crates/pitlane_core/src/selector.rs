//! Selector subset parser and matcher
//!
//! Parses the selector syntax the page queries with and matches it against
//! any [`ElementSource`].
//!
//! # Supported Syntax
//!
//! - Type selectors: `a`, `section`, `*`
//! - ID selectors: `#header`
//! - Class selectors: `.nav-link`
//! - Attribute selectors: `[data-aos]`, `[data-aos="fade-up"]`, `[href^="#"]`
//! - Compound selectors: `a.nav-link[href^="#"]`
//! - Descendant combinator: `.footer-bottom p`
//! - Selector lists: `.team-card, .news-card`
//!
//! # Example
//!
//! ```rust
//! use pitlane_core::SelectorList;
//!
//! let list = SelectorList::parse(".timeline-item, .team-card").unwrap();
//! assert_eq!(list.len(), 2);
//! assert!(SelectorList::parse(".").is_err());
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, cut, map, opt},
    error::{context, convert_error, ErrorKind, ParseError, VerboseError},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, tuple},
    Finish, IResult,
};
use smallvec::SmallVec;

use crate::document::ElementId;
use crate::error::{CoreError, Result};

/// Parser result type using VerboseError for diagnostics
type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Read access to the element tree, as needed for selector matching
pub trait ElementSource {
    /// Lower-case tag name
    fn element_tag(&self, element: ElementId) -> Option<&str>;

    /// Attribute value
    fn element_attribute(&self, element: ElementId, name: &str) -> Option<&str>;

    /// Whether the element carries `class`
    fn element_has_class(&self, element: ElementId, class: &str) -> bool;

    /// Parent element
    fn element_parent(&self, element: ElementId) -> Option<ElementId>;
}

/// Attribute matching operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeOp {
    /// `[name]`
    Exists,
    /// `[name="value"]`
    Equals(String),
    /// `[name^="value"]`
    Prefix(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttributeMatcher {
    name: String,
    op: AttributeOp,
}

impl AttributeMatcher {
    fn matches(&self, value: Option<&str>) -> bool {
        match (&self.op, value) {
            (_, None) => false,
            (AttributeOp::Exists, Some(_)) => true,
            (AttributeOp::Equals(expected), Some(v)) => v == expected,
            (AttributeOp::Prefix(prefix), Some(v)) => v.starts_with(prefix.as_str()),
        }
    }
}

/// A compound selector: optional type plus id/class/attribute conditions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    attributes: SmallVec<[AttributeMatcher; 1]>,
}

impl Compound {
    /// Check a single element against this compound
    pub fn matches<S: ElementSource + ?Sized>(&self, source: &S, element: ElementId) -> bool {
        if let Some(ref tag) = self.tag {
            match source.element_tag(element) {
                Some(name) if name.eq_ignore_ascii_case(tag) => {}
                _ => return false,
            }
        }

        if let Some(ref id) = self.id {
            if source.element_attribute(element, "id") != Some(id.as_str()) {
                return false;
            }
        }

        self.classes
            .iter()
            .all(|class| source.element_has_class(element, class))
            && self
                .attributes
                .iter()
                .all(|attr| attr.matches(source.element_attribute(element, &attr.name)))
    }
}

/// A chain of compounds joined by descendant combinators
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    compounds: SmallVec<[Compound; 2]>,
}

impl Selector {
    /// Check whether `element` matches this selector
    ///
    /// The rightmost compound must match the element itself; each compound
    /// to its left must match some ancestor, in order.
    pub fn matches<S: ElementSource + ?Sized>(&self, source: &S, element: ElementId) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };

        if !subject.matches(source, element) {
            return false;
        }

        let mut cursor = source.element_parent(element);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(ancestor) = cursor else {
                    return false;
                };
                cursor = source.element_parent(ancestor);
                if compound.matches(source, ancestor) {
                    break;
                }
            }
        }

        true
    }
}

/// A comma-separated list of selectors
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    selectors: SmallVec<[Selector; 2]>,
    source: String,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self> {
        match selector_list(input).finish() {
            Ok((_, selectors)) => Ok(Self {
                selectors: selectors.into_iter().collect(),
                source: input.trim().to_string(),
            }),
            Err(err) => Err(CoreError::InvalidSelector {
                selector: input.to_string(),
                reason: convert_error(input, err),
            }),
        }
    }

    /// Check whether any selector in the list matches `element`
    pub fn matches<S: ElementSource + ?Sized>(&self, source: &S, element: ElementId) -> bool {
        self.selectors
            .iter()
            .any(|selector| selector.matches(source, element))
    }

    /// Number of selectors in the list
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// The selector text this list was parsed from
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for SelectorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for SelectorList {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        SelectorList::parse(s)
    }
}

// ============================================================================
// Parsers
// ============================================================================

enum Simple<'a> {
    Id(&'a str),
    Class(&'a str),
    Attribute(AttributeMatcher),
}

/// Parse an identifier (alphanumeric, hyphen, underscore)
fn identifier(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parse a quoted or bare attribute value
fn attribute_value(input: &str) -> ParseResult<&str> {
    alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        identifier,
    ))(input)
}

/// Parse `[name]`, `[name=value]` or `[name^=value]`
fn attribute_selector(input: &str) -> ParseResult<AttributeMatcher> {
    context("attribute selector", attribute_body)(input)
}

fn attribute_body(input: &str) -> ParseResult<AttributeMatcher> {
    let (input, _) = char('[')(input)?;
    let (input, (_, name, _)) = cut(tuple((multispace0, identifier, multispace0)))(input)?;
    let (input, op) = opt(tuple((
        alt((tag("^="), tag("="))),
        multispace0,
        cut(attribute_value),
        multispace0,
    )))(input)?;
    let (input, _) = cut(char(']'))(input)?;

    let op = match op {
        None => AttributeOp::Exists,
        Some(("^=", _, value, _)) => AttributeOp::Prefix(value.to_string()),
        Some((_, _, value, _)) => AttributeOp::Equals(value.to_string()),
    };

    Ok((
        input,
        AttributeMatcher {
            name: name.to_ascii_lowercase(),
            op,
        },
    ))
}

fn simple_selector(input: &str) -> ParseResult<Simple<'_>> {
    alt((
        map(
            preceded(char('#'), context("id selector", cut(identifier))),
            Simple::Id,
        ),
        map(
            preceded(char('.'), context("class selector", cut(identifier))),
            Simple::Class,
        ),
        map(attribute_selector, Simple::Attribute),
    ))(input)
}

fn compound(input: &str) -> ParseResult<Compound> {
    let (rest, tag_name) = opt(alt((tag("*"), identifier)))(input)?;
    let (rest, parts) = many0(simple_selector)(rest)?;

    if tag_name.is_none() && parts.is_empty() {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::Verify,
        )));
    }

    let mut compound = Compound {
        tag: tag_name
            .filter(|name| *name != "*")
            .map(|name| name.to_ascii_lowercase()),
        ..Default::default()
    };

    for part in parts {
        match part {
            Simple::Id(id) => compound.id = Some(id.to_string()),
            Simple::Class(class) => compound.classes.push(class.to_string()),
            Simple::Attribute(attr) => compound.attributes.push(attr),
        }
    }

    Ok((rest, compound))
}

fn selector(input: &str) -> ParseResult<Selector> {
    map(separated_list1(multispace1, compound), |compounds| Selector {
        compounds: compounds.into_iter().collect(),
    })(input)
}

fn selector_list(input: &str) -> ParseResult<Vec<Selector>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(tuple((multispace0, char(','), multispace0)), selector),
        multispace0,
    ))(input)
}
