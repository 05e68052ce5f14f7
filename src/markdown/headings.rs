//! Heading level normalization.
//!
//! Legacy posts start their outline at whatever level the editor picked. The
//! shallowest heading in a region is moved to [`CANONICAL_LEVEL`] and every
//! other heading is shifted by the same amount.

use dom_query::Selection;
use tracing::debug;

use crate::region::ContentRegion;

/// Level the shallowest heading is normalized to.
pub const CANONICAL_LEVEL: u8 = 2;

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Parse the level out of an `h1`..`h6` tag name.
fn heading_level(selection: &Selection) -> Option<u8> {
  let node = selection.nodes().first()?;
  let name = node.node_name()?.to_ascii_lowercase();
  match name.strip_prefix('h')?.parse::<u8>() {
    Ok(level @ 1..=6) => Some(level),
    _ => None,
  }
}

/// Rewrite heading levels so the shallowest heading sits at level 2.
///
/// Headings keep their content and attributes. Levels are processed deepest
/// first when moving headings down and shallowest first when moving them up,
/// so a heading that was already rewritten never matches a later level query.
///
/// # Arguments
/// * `region` - The content region to rewrite.
///
/// # Returns
/// The same region with its headings rewritten.
pub fn normalize_headings(region: ContentRegion) -> ContentRegion {
  {
    let min_level = region
      .select(HEADING_SELECTOR)
      .iter()
      .filter_map(|heading| heading_level(&heading))
      .min();

    let Some(min_level) = min_level else {
      return region;
    };

    if min_level == CANONICAL_LEVEL {
      return region;
    }

    let adjustment = i16::from(CANONICAL_LEVEL) - i16::from(min_level);
    debug!("Shifting headings by {adjustment} (shallowest was h{min_level})");

    let order: Vec<u8> = if adjustment > 0 {
      (1..=6).rev().collect()
    } else {
      (1..=6).collect()
    };

    for level in order {
      let target = shifted_level(level, adjustment);
      if target == level {
        continue;
      }
      let headings = region.select(&format!("h{level}"));
      if headings.exists() {
        headings.rename(&format!("h{target}"));
      }
    }
  }

  region
}

/// Apply `adjustment` to `level`, clamped to the valid heading range.
pub fn shifted_level(level: u8, adjustment: i16) -> u8 {
  (i16::from(level) + adjustment).clamp(1, 6) as u8
}
