//! Bounding box value object and rectangle-overlap math.
//!
//! Coordinates live in the normalized blueprint space [0, 1000]. A
//! [`BoundingBox`] can only be constructed from coordinates that satisfy the
//! geometric invariants (`x_min < x_max`, `y_min < y_max`, all in range), so
//! every box a consumer sees is valid by construction.

use crate::{Error, Result};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the normalized coordinate space.
pub const COORD_MIN: f64 = 0.0;

/// Upper bound of the normalized coordinate space.
pub const COORD_MAX: f64 = 1000.0;

/// Immutable axis-aligned rectangle `(x_min, y_min, x_max, y_max)`.
///
/// Invariants, enforced at every construction site (including
/// deserialization):
///
/// - `x_min < x_max` and `y_min < y_max` (strictly positive extent)
/// - all four coordinates within `[0, 1000]`
///
/// Serializes as the wire-format array `[x_min, y_min, x_max, y_max]`.
///
/// # Example
///
/// ```rust
/// use roomiq::BoundingBox;
///
/// let b = BoundingBox::new(100.0, 100.0, 500.0, 600.0).unwrap();
/// assert_eq!(b.width(), 400.0);
/// assert_eq!(b.area(), 200_000.0);
/// assert!((b.iou(&b) - 1.0).abs() < 1e-12);
///
/// // Inverted geometry never materializes
/// assert!(BoundingBox::new(500.0, 100.0, 100.0, 600.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct BoundingBox {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl BoundingBox {
    /// Create a bounding box, checking the geometric invariants.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        for (name, value) in [
            ("x_min", x_min),
            ("y_min", y_min),
            ("x_max", x_max),
            ("y_max", y_max),
        ] {
            if !value.is_finite() {
                return Err(Error::geometry(format!("{} is not finite: {}", name, value)));
            }
            if !(COORD_MIN..=COORD_MAX).contains(&value) {
                return Err(Error::geometry(format!(
                    "{} ({}) must be between {} and {}",
                    name, value, COORD_MIN, COORD_MAX
                )));
            }
        }
        if x_min >= x_max {
            return Err(Error::geometry(format!(
                "x_min ({}) must be less than x_max ({})",
                x_min, x_max
            )));
        }
        if y_min >= y_max {
            return Err(Error::geometry(format!(
                "y_min ({}) must be less than y_max ({})",
                y_min, y_max
            )));
        }
        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Create from a `[x_min, y_min, x_max, y_max]` slice.
    pub fn from_slice(coords: &[f64]) -> Result<Self> {
        match coords {
            [x_min, y_min, x_max, y_max] => Self::new(*x_min, *y_min, *x_max, *y_max),
            _ => Err(Error::geometry(format!(
                "expected 4 coordinates, got {}",
                coords.len()
            ))),
        }
    }

    /// Left edge.
    #[must_use]
    #[inline]
    pub const fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Top edge.
    #[must_use]
    #[inline]
    pub const fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Right edge.
    #[must_use]
    #[inline]
    pub const fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Bottom edge.
    #[must_use]
    #[inline]
    pub const fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Horizontal extent (always > 0).
    #[must_use]
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical extent (always > 0).
    #[must_use]
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Rectangle area (always > 0).
    #[must_use]
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center point `(x, y)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Check whether a point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }

    /// Convert to the wire-format array `[x_min, y_min, x_max, y_max]`.
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }

    /// Overlapping area with another box (0.0 when disjoint).
    #[must_use]
    pub fn intersection_area(&self, other: &Self) -> f64 {
        let x1 = self.x_min.max(other.x_min);
        let y1 = self.y_min.max(other.y_min);
        let x2 = self.x_max.min(other.x_max);
        let y2 = self.y_max.min(other.y_max);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }
        (x2 - x1) * (y2 - y1)
    }

    /// Intersection over Union with another box.
    ///
    /// Always in [0.0, 1.0]; symmetric; 1.0 for identical boxes; 0.0 for
    /// disjoint boxes or (defensively) a zero union.
    #[must_use]
    pub fn iou(&self, other: &Self) -> f64 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;

        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

impl fmt::Debug for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox({}, {}, {}, {})",
            self.x_min, self.y_min, self.x_max, self.y_max
        )
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(4)?;
        tup.serialize_element(&self.x_min)?;
        tup.serialize_element(&self.y_min)?;
        tup.serialize_element(&self.x_max)?;
        tup.serialize_element(&self.y_max)?;
        tup.end()
    }
}

impl<'de> Deserialize<'de> for BoundingBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BoxVisitor;

        impl<'de> Visitor<'de> for BoxVisitor {
            type Value = BoundingBox;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of 4 numbers [x_min, y_min, x_max, y_max]")
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<BoundingBox, A::Error> {
                let mut coords = [0.0_f64; 4];
                for (i, slot) in coords.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                // Reject trailing elements so a 5-number array fails loudly
                if seq.next_element::<f64>()?.is_some() {
                    return Err(de::Error::invalid_length(5, &self));
                }
                BoundingBox::from_slice(&coords).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_seq(BoxVisitor)
    }
}
