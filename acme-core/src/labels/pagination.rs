use serde::{Serialize, Serializer};
use std::fmt;

/// Marker rendered in place of skipped page numbers.
pub const ELLIPSIS: &str = "...";

/// One entry of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page(page) => write!(f, "{}", page),
            PageToken::Ellipsis => f.write_str(ELLIPSIS),
        }
    }
}

// Pages serialize as numbers, the ellipsis as a string.
impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageToken::Page(page) => serializer.serialize_u32(*page),
            PageToken::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

/// Computes the page links shown for `current_page` out of `total_pages`.
///
/// Up to seven pages are listed in full. Beyond that the first and last
/// pages stay visible and gaps collapse into an ellipsis:
///
/// - current page among the first three: `1 2 3 ... n-1 n`
/// - current page among the last three: `1 2 ... n-2 n-1 n`
/// - otherwise: `1 ... c-1 c c+1 ... n`
///
/// `current_page` is clamped into `1..=total_pages`; zero pages yield an
/// empty bar.
pub fn generate_pagination(current_page: u32, total_pages: u32) -> Vec<PageToken> {
    use PageToken::{Ellipsis, Page};

    if total_pages <= 7 {
        return (1..=total_pages).map(Page).collect();
    }

    let current = current_page.clamp(1, total_pages);

    if current <= 3 {
        return vec![
            Page(1),
            Page(2),
            Page(3),
            Ellipsis,
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    if current >= total_pages - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current - 1),
        Page(current),
        Page(current + 1),
        Ellipsis,
        Page(total_pages),
    ]
}
