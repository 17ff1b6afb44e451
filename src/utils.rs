//! # Utility Functions Module
//!
//! Small helpers for building external tool command lines.

/// Builds an argument vector from items of mixed `Display` types.
///
/// # Example
/// ```rust
/// use gif_tree_optimizer::args;
///
/// let level = 3;
/// let args = args!["-w", format!("--optimize={}", level), 0.9];
/// assert_eq!(args, vec!["-w", "--optimize=3", "0.9"]);
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {
        vec![$(::std::string::ToString::to_string(&$item)),*]
    };
}
