use crate::algebra::{FloatScalar, Vector};

/// An axis-aligned bounding box, represented by its low and high corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<N, const D: usize> {
    low: Vector<N, D>,
    high: Vector<N, D>,
}

impl<N: FloatScalar, const D: usize> BBox<N, D> {
    /// Construct a box from explicit corners. `low` must be componentwise
    /// `<= high`; violating this is a contract error.
    pub fn new(low: Vector<N, D>, high: Vector<N, D>) -> Self {
        debug_assert!(low.le(&high).all(), "BBox low corner must not exceed high corner");
        Self { low, high }
    }

    /// The degenerate box containing only `point`.
    pub fn from_point(point: Vector<N, D>) -> Self {
        Self {
            low: point,
            high: point,
        }
    }

    /// The smallest box containing every point in `points`. Panics if
    /// `points` is empty (contract violation, not a recoverable error).
    pub fn from_points(points: &[Vector<N, D>]) -> Self {
        assert!(!points.is_empty(), "cannot build a bounding box from zero points");
        let mut low = points[0];
        let mut high = points[0];
        for p in &points[1..] {
            low = low.min(p);
            high = high.max(p);
        }
        Self { low, high }
    }

    /// Low corner.
    pub fn low(&self) -> Vector<N, D> {
        self.low
    }

    /// High corner.
    pub fn high(&self) -> Vector<N, D> {
        self.high
    }

    /// Center point.
    pub fn center(&self) -> Vector<N, D> {
        (self.low + self.high) / (N::one() + N::one())
    }

    /// Per-axis extents (`high - low`).
    pub fn extents(&self) -> Vector<N, D> {
        self.high - self.low
    }

    /// Axis of largest extent.
    pub fn longest_axis(&self) -> usize {
        self.extents().max_value_index()
    }

    /// Grow the box outward by `r` on every axis.
    pub fn grow(&self, r: N) -> Self {
        let rv = Vector::splat(r);
        Self {
            low: self.low - rv,
            high: self.high + rv,
        }
    }

    /// Shrink the box inward by `r` on every axis (may become degenerate
    /// or inverted if `r` exceeds half the smallest extent).
    pub fn shrink(&self, r: N) -> Self {
        self.grow(-r)
    }

    /// Clamp `point` to lie within the box.
    pub fn clamp(&self, point: Vector<N, D>) -> Vector<N, D> {
        point.max(&self.low).min(&self.high)
    }

    /// True if `point` lies within the box (inclusive).
    pub fn contains(&self, point: Vector<N, D>) -> bool {
        point.ge(&self.low).all() && point.le(&self.high).all()
    }

    /// The smallest box containing both `self` and `point`.
    pub fn expand(&self, point: Vector<N, D>) -> Self {
        Self {
            low: self.low.min(&point),
            high: self.high.max(&point),
        }
    }

    /// The smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            low: self.low.min(&other.low),
            high: self.high.max(&other.high),
        }
    }

    /// The overlapping region of `self` and `other`, which may be
    /// inverted (`low > high` on some axis) if the boxes do not overlap;
    /// callers should check [`BBox::contains`]-style predicates or
    /// `extents().min_value() >= 0` before trusting the result as
    /// non-empty.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            low: self.low.max(&other.low),
            high: self.high.min(&other.high),
        }
    }

    /// True if `self` and `other` overlap (touching counts as overlapping).
    pub fn overlaps(&self, other: &Self) -> bool {
        self.low.le(&other.high).all() && other.low.le(&self.high).all()
    }

    /// Split the box into two halves along `axis` at `pivot`. When
    /// `reverse` is set, the first half returned is the "high" side.
    pub fn split(&self, axis: usize, pivot: N, reverse: bool) -> (Self, Self) {
        let mut low_half = *self;
        let mut high_half = *self;
        low_half.high[axis] = pivot;
        high_half.low[axis] = pivot;
        if reverse {
            (high_half, low_half)
        } else {
            (low_half, high_half)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_and_expand_round_trip() {
        let b = BBox::new(Vector::from_array([0.0, 0.0]), Vector::from_array([1.0, 1.0]));
        let outside = Vector::from_array([2.0, -1.0]);
        let clamped = b.clamp(outside);
        assert!(b.contains(clamped));
        assert!(b.expand(outside).contains(outside));
    }

    #[test]
    fn split_halves_cover_original_box() {
        let b = BBox::new(Vector::from_array([0.0, 0.0]), Vector::from_array([4.0, 4.0]));
        let (lo, hi) = b.split(0, 2.0, false);
        assert_eq!(lo.union(&hi), b);
    }

    #[test]
    fn from_points_covers_every_point() {
        let pts = vec![
            Vector::from_array([1.0, 5.0]),
            Vector::from_array([-2.0, 0.0]),
            Vector::from_array([3.0, -1.0]),
        ];
        let b = BBox::from_points(&pts);
        for p in &pts {
            assert!(b.contains(*p));
        }
    }
}
