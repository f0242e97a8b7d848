//! Street label extraction from provider strings.
//!
//! Providers hand us two candidate sources for a point's label: a reverse
//! geocoded description and the step's instruction markup (for example
//! `Turn <b>left</b> onto <b>Market St</b>`). [`resolve`] picks the most
//! useful one and never fails.

/// Markers that introduce the street a step continues on, in priority order.
const STREET_MARKERS: [&str; 2] = [" onto ", " on "];

const BOLD_OPEN: &str = "<b>";
const BOLD_CLOSE: &str = "</b>";

/// Resolve the label for a point.
///
/// 1. A usable `external` label is returned verbatim. Labels containing `+`
///    (plus codes) or starting with `Unnamed` are not usable.
/// 2. Otherwise the first bold span after ` onto ` (or, failing that, ` on `)
///    in `markup` is used.
/// 3. Otherwise the markup with all tags stripped is used.
pub fn resolve(markup: &str, external: Option<&str>) -> String {
    if let Some(label) = external.filter(|label| is_usable(label)) {
        return label.to_string();
    }

    if let Some(street) = street_after_marker(markup) {
        return street;
    }

    strip_markup(markup)
}

fn is_usable(label: &str) -> bool {
    !label.trim().is_empty() && !label.contains('+') && !label.starts_with("Unnamed")
}

/// Text of the first bold span following the highest-priority marker found.
fn street_after_marker(markup: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `markup`.
    let folded = markup.to_ascii_lowercase();

    let after = STREET_MARKERS
        .iter()
        .find_map(|marker| folded.find(marker).map(|at| at + marker.len()))?;

    let open = after + folded[after..].find(BOLD_OPEN)? + BOLD_OPEN.len();
    let close = open + folded[open..].find(BOLD_CLOSE)?;

    let street = strip_markup(&markup[open..close]);
    (!street.is_empty()).then_some(street)
}

/// Remove every `<...>` tag and trim the remainder.
///
/// The scanner only toggles an inside-tag state, so unmatched `<` or `>`
/// never cause an error: text after a dangling `<` is dropped and a stray `>`
/// is discarded.
pub fn strip_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;

    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.trim().to_string()
}
