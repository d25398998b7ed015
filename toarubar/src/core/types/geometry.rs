//! Primitives for working with geometries.
//!
//! This module contains the core types [`Scale`], [`Point`], [`Size`], and [`Rectangle`],
//! which are used to describe bar boxes, button regions and window geometry.
//!
//! All types in this module are generic over a [`Scalar`], which is a type that can act as a scalar
//! in a 2D coordinate space. This trait is implemented for the signed integer and floating
//! point primitives.
//!
//! ## Physical and Logical Coordinate Spaces
//!
//! The `Point`, `Size`, and `Rectangle` types are additionally generic over a marker type that implements
//! [`GeometryKind`], which marks the type as acting in a certain coordinate space.
//! Bar boxes arrive from the host in [`Logical`] space and are scaled into [`Physical`]
//! space by the monitor scale before anything is drawn.

use core::ops::{Add, Sub, Mul};

use std::marker::PhantomData;

pub mod marker {
    //! Marker types for marking Size, Point and Rectangle kind, Physical or Logical.
    //!
    //! Logical geometries are relative to other outputs, accounting for their scale.
    //! Physical geometries are relative to the pixels of a single output, and are what
    //! rasterized textures and render boxes are measured in.

    mod private {
        pub trait Sealed {}
    }

    use core::ops::{Add, Sub, Mul};

    /// A sealed trait for marking types as Scalars, that can be used in Points and Rectangles.
    pub trait Scalar:
        Sized
        + Copy
        + PartialEq
        + PartialOrd
        + Add<Self, Output = Self>
        + Sub<Self, Output = Self>
        + Mul<Self, Output = Self>
        + Default
        + private::Sealed
    {
        /// The multiplicative identity of the Scalar.
        const SCALE_ID: Self;

        /// The additive identity of the Scalar.
        const ZERO: Self;

        /// Convert to this Scalar from an f64.
        fn from_f64(v: f64) -> Self;

        /// Convert this Scalar to an f64.
        fn to_f64(self) -> f64;

        #[inline]
        /// Check if the Scalar is greater than its zero.
        fn positive(self) -> bool {
            self > Self::ZERO
        }
    }

    macro_rules! __impl_scalar_signed {
        ($($targ:ty),+) => {
            $(
                impl private::Sealed for $targ {}
                impl Scalar for $targ {
                    const SCALE_ID: Self = 1;
                    const ZERO: Self = 0;

                    #[inline]
                    fn from_f64(v: f64) -> Self {
                        v as $targ
                    }

                    #[inline]
                    fn to_f64(self) -> f64 {
                        self as f64
                    }
                }
            )+
        };
    }

    macro_rules! __impl_scalar_floating {
        ($($targ:ty),+) => {
            $(
                impl private::Sealed for $targ {}
                impl Scalar for $targ {
                    const SCALE_ID: Self = 1.0;
                    const ZERO: Self = 0.0;

                    #[inline]
                    fn from_f64(v: f64) -> Self {
                        v as $targ
                    }

                    #[inline]
                    fn to_f64(self) -> f64 {
                        self as f64
                    }
                }
            )+
        };
    }

    __impl_scalar_signed!(i32, i64);
    __impl_scalar_floating!(f32, f64);

    /// A sealed trait defining marker types `Logical` and `Physical`.
    pub trait GeometryKind: Copy + PartialEq + private::Sealed {}

    macro_rules! __impl_geometrykind {
        {$(#[$outer:meta])? $targ:ident} => {
            $(
                #[$outer]
            )?
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
            pub struct $targ;

            impl private::Sealed for $targ {}
            impl GeometryKind for $targ {}
        };
    }

    __impl_geometrykind!{
        /// A type for marking geometrical types as logical.
        Logical
    }
    __impl_geometrykind!{
        /// A type for marking geometrical types as physical.
        Physical
    }
}

pub use marker::{GeometryKind, Logical, Physical, Scalar};

/// A two-dimensional Scale that can be used to scale [`Point`]s, [`Size`]s,
/// and [`Rectangle`]s, by multiplying them with it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scale<N: Scalar> {
    /// The scale on the X-axis.
    pub x: N,
    /// The scale on the Y-axis.
    pub y: N,
}

impl<N: Scalar> Scale<N> {
    /// Creates a uniform Scale.
    pub const fn uniform(s: N) -> Scale<N> {
        Scale { x: s, y: s }
    }

    /// Returns a identity Scale, that has no effect on Scaling operations.
    pub const fn id() -> Scale<N> {
        Scale::uniform(N::SCALE_ID)
    }
}

impl<N: Scalar> From<N> for Scale<N> {
    fn from(from: N) -> Self {
        Scale::uniform(from)
    }
}

/// A point on a 2D plane.
///
/// The (0, 0) reference is taken from the top left corner of the plane.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point<N: Scalar, Kind: GeometryKind> {
    /// The `Point`'s X-coordinate.
    pub x: N,
    /// The `Point`'s Y-coordinate.
    pub y: N,
    _kind: PhantomData<Kind>,
}

impl<N: Scalar, Kind: GeometryKind> Add for Point<N, Kind> {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl<N: Scalar, Kind: GeometryKind> Sub for Point<N, Kind> {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl<N: Scalar, Kind: GeometryKind> Mul<Scale<N>> for Point<N, Kind> {
    type Output = Self;

    fn mul(self, rhs: Scale<N>) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl<N: Scalar, Kind: GeometryKind> From<(N, N)> for Point<N, Kind> {
    fn from(from: (N, N)) -> Self {
        let (x, y) = from;
        Self::new(x, y)
    }
}

impl<N: Scalar, Kind: GeometryKind> Point<N, Kind> {
    /// Creates a new Point.
    pub const fn new(x: N, y: N) -> Point<N, Kind> {
        Point { x, y, _kind: PhantomData }
    }

    /// Creates a new Point where both coordinates are zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use toarubar::types::{Point, Logical};
    ///
    /// let point1 = Point::<i32, Logical>::zeroed();
    /// let point2 = Point::<i32, Logical>::new(0, 0);
    ///
    /// assert_eq!(point1, point2);
    /// ```
    pub const fn zeroed() -> Point<N, Kind> {
        Point { x: N::ZERO, y: N::ZERO, _kind: PhantomData }
    }

    /// Converts `self` to a `Point<f64, Kind>`.
    pub fn as_f64(&self) -> Point<f64, Kind> {
        Point::new(self.x.to_f64(), self.y.to_f64())
    }
}

impl<Kind: GeometryKind> Point<f64, Kind> {
    /// Rounds both coordinates to the nearest integer.
    pub fn round(&self) -> Point<i32, Kind> {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// A 2D size.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size<N: Scalar, Kind: GeometryKind> {
    /// The width of the Size.
    pub width: N,
    /// The height of the Size.
    pub height: N,
    _kind: PhantomData<Kind>,
}

impl<N: Scalar, Kind: GeometryKind> Mul<Scale<N>> for Size<N, Kind> {
    type Output = Self;

    fn mul(self, rhs: Scale<N>) -> Self {
        Self::new(self.width * rhs.x, self.height * rhs.y)
    }
}

impl<N: Scalar, Kind: GeometryKind> From<(N, N)> for Size<N, Kind> {
    fn from(from: (N, N)) -> Self {
        let (width, height) = from;
        Self::new(width, height)
    }
}

impl<N: Scalar, Kind: GeometryKind> Size<N, Kind> {
    /// Creates a new Size.
    pub const fn new(width: N, height: N) -> Size<N, Kind> {
        Size { width, height, _kind: PhantomData }
    }

    /// Creates a Size with both dimensions set to zero.
    pub const fn zeroed() -> Size<N, Kind> {
        Size { width: N::ZERO, height: N::ZERO, _kind: PhantomData }
    }

    /// Converts `self` to a `Size<f64, Kind>`.
    pub fn as_f64(&self) -> Size<f64, Kind> {
        Size::new(self.width.to_f64(), self.height.to_f64())
    }

    /// Whether either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        !self.width.positive() || !self.height.positive()
    }
}

impl<Kind: GeometryKind> Size<f64, Kind> {
    /// Rounds both dimensions to the nearest integer.
    pub fn round(&self) -> Size<i32, Kind> {
        Size::new(self.width.round() as i32, self.height.round() as i32)
    }
}

/// A rectangle on a 2D plane.
///
/// Rectangles take their gravity from the top-left corner, that is,
/// any increase is an offset to the right or downwards.
///
/// _Note:_ The Default impl returns Rectangle {0, 0, 0, 0}.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle<N: Scalar, Kind: GeometryKind> {
    /// The point that the Rectangle is anchored to.
    pub point: Point<N, Kind>,
    /// The size of the Rectangle.
    pub size: Size<N, Kind>,
}

impl<N: Scalar, Kind: GeometryKind> Default for Rectangle<N, Kind> {
    fn default() -> Self {
        Rectangle::zeroed()
    }
}

impl<N: Scalar, Kind: GeometryKind> Mul<Scale<N>> for Rectangle<N, Kind> {
    type Output = Self;

    fn mul(self, scale: Scale<N>) -> Self {
        Self {
            point: self.point * scale,
            size: self.size * scale,
        }
    }
}

impl<N: Scalar, Kind: GeometryKind> Rectangle<N, Kind> {
    /// Constructs a new `Rectangle`.
    pub fn new(x: N, y: N, h: N, w: N) -> Self {
        Rectangle {
            point: Point::new(x, y),
            size: Size::new(w, h)
        }
    }

    /// Convenience function for constructing a `Rectangle` with all fields
    /// set to zero.
    pub fn zeroed() -> Self {
        Rectangle::new(N::ZERO, N::ZERO, N::ZERO, N::ZERO)
    }

    /// Converts `self` to a `Rectangle<f64, Kind>`.
    pub fn as_f64(&self) -> Rectangle<f64, Kind> {
        Rectangle {
            point: self.point.as_f64(),
            size: self.size.as_f64(),
        }
    }

    /// Whether the Rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// The x-coordinate of the right edge.
    pub fn right(&self) -> N {
        self.point.x + self.size.width
    }

    /// The y-coordinate of the bottom edge.
    pub fn bottom(&self) -> N {
        self.point.y + self.size.height
    }

    /// Check whether this Rectangle contains a certain point.
    ///
    /// The right and bottom edges are excluded.
    ///
    /// # Example
    ///
    /// ```rust
    /// use toarubar::types::{Rectangle, Point, Logical};
    ///
    /// let original = Rectangle::<i32, Logical>::new(0, 0, 100, 200);
    ///
    /// assert!(original.contains_point(Point::new(50, 50)));
    /// assert!(!original.contains_point(Point::new(200, 50)));
    /// ```
    pub fn contains_point(&self, pt: Point<N, Kind>) -> bool {
        let wrange = self.point.x..self.right();
        let hrange = self.point.y..self.bottom();

        wrange.contains(&pt.x) && hrange.contains(&pt.y)
    }

    /// Check whether this Rectangle contains a certain point, edges included.
    pub fn contains_point_inclusive(&self, pt: Point<N, Kind>) -> bool {
        let wrange = self.point.x..=self.right();
        let hrange = self.point.y..=self.bottom();

        wrange.contains(&pt.x) && hrange.contains(&pt.y)
    }

    /// Moves the Rectangle by `delta`, keeping its size.
    #[must_use]
    pub fn translate(&self, delta: Point<N, Kind>) -> Self {
        Rectangle {
            point: self.point + delta,
            size: self.size,
        }
    }
}

impl<N: Scalar> Rectangle<N, Logical> {
    /// Converts self into the physical coordinate space of an output with the given scale.
    pub fn as_physical(self, scale: Scale<N>) -> Rectangle<N, Physical> {
        let scaled = self * scale;
        Rectangle {
            point: Point::new(scaled.point.x, scaled.point.y),
            size: Size::new(scaled.size.width, scaled.size.height),
        }
    }
}

impl<Kind: GeometryKind> Rectangle<f64, Kind> {
    /// Rounds each component to the nearest integer.
    pub fn round(&self) -> Rectangle<i32, Kind> {
        Rectangle {
            point: self.point.round(),
            size: self.size.round(),
        }
    }
}
