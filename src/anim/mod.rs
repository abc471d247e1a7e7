mod tween;

pub use tween::{Ease, Tween, DEFAULT_DURATION};
