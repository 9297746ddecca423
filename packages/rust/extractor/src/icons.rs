//! Icon/logo resolution.
//!
//! A branded logo anchor beats any favicon-style `<link>`.

use crate::document::PageDocument;

/// `rel` values accepted as site icons.
const ICON_RELS: [&str; 3] = ["icon", "shortcut icon", "apple-touch-icon"];

/// First anchor href mentioning "logo", else the first icon `<link>` in
/// document order.
pub fn resolve(doc: &dyn PageDocument) -> Option<String> {
    if let Some(logo) = doc
        .links()
        .iter()
        .find(|href| href.to_lowercase().contains("logo"))
    {
        return Some(logo.clone());
    }

    doc.icon_links()
        .iter()
        .find(|link| ICON_RELS.iter().any(|rel| link.rel.eq_ignore_ascii_case(rel)))
        .map(|link| link.href.clone())
}
