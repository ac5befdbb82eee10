use crate::common::*;

/// A 2D point or displacement in image coordinates.
///
/// The y axis points down, matching raster image conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point2<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn from_xy([x, y]: [T; 2]) -> Self {
        Self { x, y }
    }

    pub fn try_cast<U>(self) -> Option<Point2<U>>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        Some(Point2 {
            x: U::from(self.x)?,
            y: U::from(self.y)?,
        })
    }

    pub fn cast<U>(self) -> Point2<U>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Point2<T>
where
    T: Float,
{
    /// Euclidean length of the displacement from the origin.
    pub fn length(self) -> T {
        self.x.hypot(self.y)
    }

    pub fn floor(self) -> Self {
        Self {
            x: self.x.floor(),
            y: self.y.floor(),
        }
    }

    /// Rotate about the origin by `radians`.
    ///
    /// Positive angles turn counter-clockwise on screen given the y-down
    /// axis convention, so `(1, 0)` maps toward negative y.
    pub fn rotate(self, radians: T) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            x: sin * self.y + cos * self.x,
            y: cos * self.y - sin * self.x,
        }
    }
}

impl<T> Add for Point2<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T> Sub for Point2<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T> Add<T> for Point2<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn add(self, rhs: T) -> Self {
        Self {
            x: self.x + rhs,
            y: self.y + rhs,
        }
    }
}

impl<T> Sub<T> for Point2<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn sub(self, rhs: T) -> Self {
        Self {
            x: self.x - rhs,
            y: self.y - rhs,
        }
    }
}

impl<T> Mul<T> for Point2<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl<T> Div<T> for Point2<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn point_scalar_ops() {
        let p = Point2::new(2.0, -4.0);
        assert_eq!(p + 1.0, Point2::new(3.0, -3.0));
        assert_eq!(p - 1.0, Point2::new(1.0, -5.0));
        assert_eq!(p * 2.0, Point2::new(4.0, -8.0));
        assert_eq!(p / 2.0, Point2::new(1.0, -2.0));
    }

    #[test]
    fn point_length() {
        let p = Point2::new(3.0, 4.0);
        assert_abs_diff_eq!(p.length(), 5.0);
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = Point2::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_preserves_length() {
        let p = Point2::new(3.0, -7.0);
        assert_abs_diff_eq!(p.rotate(0.61).length(), p.length(), epsilon = 1e-12);
    }

    #[test]
    fn cast_truncates() {
        let p = Point2::new(3.9_f64, -1.2).floor().cast::<i64>();
        assert_eq!(p, Point2::new(3, -2));
    }
}
