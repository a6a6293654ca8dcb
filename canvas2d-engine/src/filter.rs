//! Filter chains for the `filter` property.
//!
//! A [`Filter`] is an ordered list of primitives in evaluation order: the
//! first operation runs on the painted content, each following one runs on
//! the previous result. [`Filter::compose`] puts the newer filter in front of
//! the older chain.

/// Kind of a per-pixel color filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFilterKind {
    Brightness,
    Contrast,
    Grayscale,
    Invert,
    Opacity,
    Saturate,
    Sepia,
}

/// A single typed filter primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOperation {
    /// Gaussian blur with the given standard deviation in pixels.
    Blur { radius: f32 },
    /// Color adjustment; `amount` is the CSS number (1.0 = 100%).
    Color { kind: ColorFilterKind, amount: f32 },
    /// Hue rotation in degrees.
    HueRotate { degrees: f32 },
    /// Blurred, offset copy of the content's alpha tinted with `color`,
    /// drawn behind the content.
    DropShadow {
        offset_x: f32,
        offset_y: f32,
        radius: f32,
        color: tiny_skia::Color,
    },
}

/// An ordered filter chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    operations: Vec<FilterOperation>,
}

impl Filter {
    /// A chain of one primitive.
    pub fn single(operation: FilterOperation) -> Self {
        Self {
            operations: vec![operation],
        }
    }

    /// Chain `new` so that it runs before every primitive of `old`.
    pub fn compose(new: Filter, old: Filter) -> Filter {
        let mut operations = new.operations;
        operations.extend(old.operations);
        Filter { operations }
    }

    /// Compose a parsed operation list onto `existing` one primitive at a
    /// time, each new primitive going in front of what was built so far.
    ///
    /// Returns None only when both `existing` and `operations` are empty.
    pub fn compose_operations(
        existing: Option<Filter>,
        operations: impl IntoIterator<Item = FilterOperation>,
    ) -> Option<Filter> {
        operations.into_iter().fold(existing, |acc, op| {
            let new = Filter::single(op);
            Some(match acc {
                Some(old) => Filter::compose(new, old),
                None => new,
            })
        })
    }

    /// Primitives in evaluation order.
    pub fn operations(&self) -> &[FilterOperation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// How far the chain can spread content beyond its painted bounds.
    pub fn outset(&self) -> f32 {
        self.operations
            .iter()
            .map(|op| match op {
                FilterOperation::Blur { radius } => radius * 3.0,
                FilterOperation::DropShadow {
                    offset_x,
                    offset_y,
                    radius,
                    ..
                } => offset_x.abs().max(offset_y.abs()) + radius * 3.0,
                _ => 0.0,
            })
            .sum()
    }
}
