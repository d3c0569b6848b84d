//! Human-readable byte counts.

const KB: u64 = 1024;
const MB: u64 = KB * 1024;

/// Formats a byte count with binary units.
///
/// Below 1 KiB the plain number is printed; below 1 MiB the value is in
/// kibibytes with a `kb` suffix, otherwise in mebibytes with `mb`.
///
/// ```
/// use cmamap_core::pretty_size;
///
/// assert_eq!(pretty_size(512), "512");
/// assert_eq!(pretty_size(2048), "2.00kb");
/// assert_eq!(pretty_size(3 * 1024 * 1024), "3.00mb");
/// ```
#[must_use]
pub fn pretty_size(bytes: u64) -> String {
    if bytes < KB {
        bytes.to_string()
    } else if bytes < MB {
        format!("{:.2}kb", bytes as f64 / KB as f64)
    } else {
        format!("{:.2}mb", bytes as f64 / MB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_size_thresholds() {
        assert_eq!(pretty_size(0), "0");
        assert_eq!(pretty_size(512), "512");
        assert_eq!(pretty_size(1023), "1023");
        assert_eq!(pretty_size(1024), "1.00kb");
        assert_eq!(pretty_size(2048), "2.00kb");
        assert_eq!(pretty_size(1536), "1.50kb");
        assert_eq!(pretty_size(MB - 1), "1024.00kb");
        assert_eq!(pretty_size(MB), "1.00mb");
        assert_eq!(pretty_size(3 * MB), "3.00mb");
        assert_eq!(pretty_size(316 * MB), "316.00mb");
    }
}
