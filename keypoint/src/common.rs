pub use num_traits::{Float, Num, NumCast, ToPrimitive};
pub use std::ops::{Add, Div, Mul, Sub};
