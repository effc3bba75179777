// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dead-zone mapping: from raw surface UV to active-area UV.
//!
//! ## Overview
//!
//! An overlay's texture may carry a border that should not react to pointers (for example
//! the letterbox bands around a screen capture). The border is given in texture pixels and
//! converted once into fractions of the surface:
//!
//! - `dead_zone = (margin.x / width, margin.y / height)`
//! - `active_ratio = (1 - 2 * dead_zone.x, 1 - 2 * dead_zone.y)`
//! - `active_uv = (raw_uv - dead_zone) / active_ratio`
//!
//! A hit is live iff `raw_uv` lies within `[dead_zone, 1 - dead_zone]` on both axes.
//!
//! A margin that reaches half a dimension leaves no interactive area. [`DeadZone`]
//! constructors report this as a [`DeadZoneError`]; [`ActiveArea`] folds the error into an
//! overlay with zero interactive area.

use kurbo::{Point, Size, Vec2};

/// Errors produced while deriving a [`DeadZone`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum DeadZoneError {
    /// The texture has a zero, negative or non-finite dimension.
    #[error("texture size {width}x{height} has no area")]
    EmptyTexture {
        /// Texture width in pixels.
        width: f64,
        /// Texture height in pixels.
        height: f64,
    },
    /// The margin is negative or not a number.
    #[error("dead-zone margin ({x}, {y}) is negative")]
    NegativeMargin {
        /// Horizontal margin.
        x: f64,
        /// Vertical margin.
        y: f64,
    },
    /// The margin covers at least half of a dimension.
    #[error("dead zone ({x}, {y}) leaves no interactive area")]
    Degenerate {
        /// Horizontal dead-zone fraction.
        x: f64,
        /// Vertical dead-zone fraction.
        y: f64,
    },
}

/// Active-area transform of one overlay surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeadZone {
    dead_zone: Vec2,
    active_ratio: Vec2,
}

impl Default for DeadZone {
    fn default() -> Self {
        Self::NONE
    }
}

impl DeadZone {
    /// No border: the whole surface is interactive.
    pub const NONE: Self = Self {
        dead_zone: Vec2::ZERO,
        active_ratio: Vec2::new(1.0, 1.0),
    };

    /// Build from dead-zone fractions of the surface (each in `[0, 0.5)`).
    pub fn from_fraction(dead_zone: Vec2) -> Result<Self, DeadZoneError> {
        if !(dead_zone.x >= 0.0 && dead_zone.y >= 0.0) {
            return Err(DeadZoneError::NegativeMargin {
                x: dead_zone.x,
                y: dead_zone.y,
            });
        }
        let active_ratio = Vec2::new(1.0 - 2.0 * dead_zone.x, 1.0 - 2.0 * dead_zone.y);
        if !(active_ratio.x > 0.0 && active_ratio.y > 0.0) {
            return Err(DeadZoneError::Degenerate {
                x: dead_zone.x,
                y: dead_zone.y,
            });
        }
        Ok(Self {
            dead_zone,
            active_ratio,
        })
    }

    /// Build from texture dimensions and a per-side margin, both in pixels.
    pub fn from_margin(texture: Size, margin: Vec2) -> Result<Self, DeadZoneError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(texture.width) && valid(texture.height)) {
            return Err(DeadZoneError::EmptyTexture {
                width: texture.width,
                height: texture.height,
            });
        }
        if !(margin.x >= 0.0 && margin.y >= 0.0) {
            return Err(DeadZoneError::NegativeMargin {
                x: margin.x,
                y: margin.y,
            });
        }
        Self::from_fraction(Vec2::new(
            margin.x / texture.width,
            margin.y / texture.height,
        ))
    }

    /// Dead zone for content letterboxed into a square texture.
    ///
    /// The texture is `content.width` on each side and the content is centered vertically,
    /// so the bands above and below it are dead.
    ///
    /// ```
    /// use kurbo::{Point, Size};
    /// use understory_pointer::DeadZone;
    ///
    /// // 1920x1080 content in a 1920x1920 texture: 420 px bands above and below.
    /// let dz = DeadZone::letterboxed(Size::new(1920.0, 1080.0)).unwrap();
    /// assert!(dz.is_dead(Point::new(0.5, 0.1)));
    /// assert!(!dz.is_dead(Point::new(0.5, 0.5)));
    /// ```
    pub fn letterboxed(content: Size) -> Result<Self, DeadZoneError> {
        let texture = Size::new(content.width, content.width);
        Self::from_margin(
            texture,
            Vec2::new(0.0, (content.width - content.height) / 2.0),
        )
    }

    /// Dead-zone fractions of the surface.
    pub fn dead_zone(&self) -> Vec2 {
        self.dead_zone
    }

    /// Fraction of the surface covered by the active area on each axis.
    pub fn active_ratio(&self) -> Vec2 {
        self.active_ratio
    }

    /// Returns true when `raw_uv` falls inside the dead border (or is not a number).
    pub fn is_dead(&self, raw_uv: Point) -> bool {
        let dz = self.dead_zone;
        !(raw_uv.x >= dz.x && raw_uv.x <= 1.0 - dz.x && raw_uv.y >= dz.y && raw_uv.y <= 1.0 - dz.y)
    }

    /// Remap `raw_uv` into active-area coordinates.
    ///
    /// Dead hits fall outside `[0, 1]²`. Hits on the border itself may round just past it;
    /// [`Self::map`] clamps those.
    pub fn active_uv(&self, raw_uv: Point) -> Point {
        Point::new(
            (raw_uv.x - self.dead_zone.x) / self.active_ratio.x,
            (raw_uv.y - self.dead_zone.y) / self.active_ratio.y,
        )
    }

    /// Active-area coordinates of a live hit, or `None` if the hit is dead.
    ///
    /// Live hits always map into `[0, 1]²`, rounding at the border included.
    pub fn map(&self, raw_uv: Point) -> Option<Point> {
        if self.is_dead(raw_uv) {
            return None;
        }
        let uv = self.active_uv(raw_uv);
        Some(Point::new(uv.x.clamp(0.0, 1.0), uv.y.clamp(0.0, 1.0)))
    }
}

/// Interactive area of an overlay: a valid dead zone, or nothing at all.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ActiveArea {
    /// The surface has an interactive area described by the dead zone.
    Live(DeadZone),
    /// The configuration left no interactive area; every hit is dead.
    Empty,
}

impl Default for ActiveArea {
    fn default() -> Self {
        Self::Live(DeadZone::NONE)
    }
}

impl From<DeadZone> for ActiveArea {
    fn from(dz: DeadZone) -> Self {
        Self::Live(dz)
    }
}

impl ActiveArea {
    /// Derive the area from texture dimensions and a margin in pixels.
    ///
    /// Invalid configurations are logged and produce [`ActiveArea::Empty`].
    pub fn from_margin(texture: Size, margin: Vec2) -> Self {
        match DeadZone::from_margin(texture, margin) {
            Ok(dz) => Self::Live(dz),
            Err(err) => {
                tracing::warn!(%err, "overlay has no interactive area");
                Self::Empty
            }
        }
    }

    /// Active-area coordinates of a live hit, or `None` if the hit is dead.
    pub fn map(&self, raw_uv: Point) -> Option<Point> {
        match self {
            Self::Live(dz) => dz.map(raw_uv),
            Self::Empty => None,
        }
    }

    /// Returns true when no hit can ever be live.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
