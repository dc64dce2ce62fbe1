//! Materialized-path helpers: a material title such as `Unit1/Lesson1.pdf`
//! encodes its folder chain with `/` separators.

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Split a materialized path into its non-empty segments.
///
/// Leading, trailing, and doubled separators never yield empty segments.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Join segments back into a materialized path.
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(seg.as_ref());
    }
    out
}

/// Whether `segments` begins with every element of `prefix`, element-wise.
pub fn starts_with_segments<A: AsRef<str>, B: AsRef<str>>(segments: &[A], prefix: &[B]) -> bool {
    segments.len() >= prefix.len()
        && segments
            .iter()
            .zip(prefix)
            .all(|(a, b)| a.as_ref() == b.as_ref())
}
