pub mod hit_testing;
pub mod shapes;

pub use hit_testing::{contains_point, element_at, elements_in_rect, fill_contains};
