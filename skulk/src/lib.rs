pub mod handlers;

pub use handlers::{PatternList, code_color, nonblank_globs, perc};
