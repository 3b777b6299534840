//! Geometry primitives
//!
//! Document-space rectangles for element boxes and the viewport, plus CSS
//! box offsets (`0px 0px -100px 0px`) used as root margins.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, opt, verify},
    multi::separated_list1,
    number::complete::float,
    sequence::delimited,
    Finish, IResult,
};

use crate::error::{CoreError, Result};

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn area(&self) -> f32 {
        self.size.area()
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }

    /// Grow the rect outward by `insets` (negative values shrink it)
    ///
    /// Percentages resolve against this rect's own size: horizontal offsets
    /// against the width, vertical offsets against the height.
    pub fn outset(&self, insets: &Insets) -> Self {
        let top = insets.top.resolve(self.size.height);
        let right = insets.right.resolve(self.size.width);
        let bottom = insets.bottom.resolve(self.size.height);
        let left = insets.left.resolve(self.size.width);

        Rect {
            origin: Point::new(self.origin.x - left, self.origin.y - top),
            size: Size::new(
                (self.size.width + left + right).max(0.0),
                (self.size.height + top + bottom).max(0.0),
            ),
        }
    }

    /// Get the intersection of two rects
    ///
    /// Edge-adjacent rects intersect with a zero-area result; `None` means
    /// the rects are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Self> {
        let x = self.origin.x.max(other.origin.x);
        let y = self.origin.y.max(other.origin.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < x || bottom < y {
            return None;
        }

        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// A CSS length in the units a root margin accepts
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels
    Px(f32),
    /// Percentage of the reference dimension
    Pct(f32),
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl Length {
    /// Resolve to pixels against a reference dimension
    pub fn resolve(&self, reference: f32) -> f32 {
        match *self {
            Length::Px(px) => px,
            Length::Pct(pct) => reference * pct / 100.0,
        }
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Length::Px(px) => write!(f, "{px}px"),
            Length::Pct(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Box offsets in CSS shorthand order (top, right, bottom, left)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: Length::Px(0.0),
        right: Length::Px(0.0),
        bottom: Length::Px(0.0),
        left: Length::Px(0.0),
    };

    pub const fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Parse CSS shorthand with one to four lengths
    ///
    /// `"10px"` applies to every side, `"10px 5%"` is vertical/horizontal,
    /// `"1px 2px 3px"` is top/horizontal/bottom and four values are
    /// top/right/bottom/left.
    pub fn parse(input: &str) -> Result<Self> {
        let (_, values) = all_consuming(delimited(
            multispace0,
            separated_list1(multispace1, parse_length),
            multispace0,
        ))(input)
        .finish()
        .map_err(|_: nom::error::Error<&str>| CoreError::InvalidLength(input.to_string()))?;

        match values.as_slice() {
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [vertical, horizontal] => Ok(Self::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(Self::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(Self::new(*top, *right, *bottom, *left)),
            _ => Err(CoreError::InvalidLength(input.to_string())),
        }
    }
}

impl std::fmt::Display for Insets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl std::str::FromStr for Insets {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Insets::parse(s)
    }
}

/// Parse a finite length value with an optional px/% suffix
fn parse_length(input: &str) -> IResult<&str, Length> {
    let (input, value) = verify(float, |value: &f32| value.is_finite())(input)?;
    let (input, unit) = opt(alt((tag_no_case("px"), tag("%"))))(input)?;

    let length = match unit {
        Some("%") => Length::Pct(value),
        _ => Length::Px(value),
    };

    Ok((input, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 25.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 25.0, 50.0, 75.0)));
    }

    #[test]
    fn test_intersection_edge_adjacent_is_zero_area() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(0.0, 100.0, 100.0, 50.0);
        let hit = a.intersection(&b).unwrap();
        assert_eq!(hit.area(), 0.0);
    }

    #[test]
    fn test_intersection_disjoint() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(0.0, 101.0, 100.0, 50.0);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_insets_shorthand() {
        let four = Insets::parse("0px 0px -100px 0px").unwrap();
        assert_eq!(four.bottom, Length::Px(-100.0));
        assert_eq!(four.top, Length::Px(0.0));

        let one = Insets::parse("10%").unwrap();
        assert_eq!(one.left, Length::Pct(10.0));
        assert_eq!(one.top, Length::Pct(10.0));

        let two = Insets::parse(" 5px 10px ").unwrap();
        assert_eq!(two.top, Length::Px(5.0));
        assert_eq!(two.right, Length::Px(10.0));
        assert_eq!(two.bottom, Length::Px(5.0));

        let three = Insets::parse("1px 2px 3px").unwrap();
        assert_eq!(three.left, Length::Px(2.0));
        assert_eq!(three.bottom, Length::Px(3.0));
    }

    #[test]
    fn test_insets_rejects_garbage() {
        assert!(Insets::parse("").is_err());
        assert!(Insets::parse("10em").is_err());
        assert!(Insets::parse("1px 2px 3px 4px 5px").is_err());
    }

    #[test]
    fn test_insets_rejects_non_finite() {
        assert!(Insets::parse("nanpx").is_err());
        assert!(Insets::parse("infpx").is_err());
        assert!(Insets::parse("0px 0px -infinity 0px").is_err());
        assert!(Insets::parse("0px 0px NaN% 0px").is_err());
    }

    #[test]
    fn test_outset_shrinks_bottom_edge() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let margin = Insets::parse("0px 0px -100px 0px").unwrap();
        assert_eq!(viewport.outset(&margin), Rect::new(0.0, 0.0, 1000.0, 700.0));

        let pct = Insets::parse("10%").unwrap();
        assert_eq!(
            viewport.outset(&pct),
            Rect::new(-100.0, -80.0, 1200.0, 960.0)
        );
    }
}
