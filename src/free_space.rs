use crate::types::{FreeRegion, Placement, Sheet};

/// Rebuilds the free rectangles of `sheet` from its placement history.
///
/// Starts from the whole sheet and replays every placement in commit order,
/// replacing each free rectangle it touches with the slivers left of, right
/// of, above and below it. The result may contain overlapping rectangles but
/// never covers occupied area. Adjacent rectangles are not coalesced, so
/// fragmentation is permanent for the rest of the run.
pub fn free_regions(sheet: &Sheet) -> Vec<FreeRegion> {
    let mut free = vec![FreeRegion::new(0, 0, sheet.width(), sheet.height())];
    for placement in sheet.placements() {
        free = split_around(&free, placement);
    }
    free
}

fn split_around(free: &[FreeRegion], p: &Placement) -> Vec<FreeRegion> {
    let mut next = Vec::with_capacity(free.len() + 3);
    for &region in free {
        if !region.overlaps(p) {
            next.push(region);
            continue;
        }

        // Left
        if p.x > region.x {
            next.push(FreeRegion::new(
                region.x,
                region.y,
                p.x - region.x,
                region.rect.h,
            ));
        }
        // Right
        if p.right() < region.right() {
            next.push(FreeRegion::new(
                p.right(),
                region.y,
                region.right() - p.right(),
                region.rect.h,
            ));
        }
        // Above
        if p.y > region.y {
            next.push(FreeRegion::new(
                region.x,
                region.y,
                region.rect.w,
                p.y - region.y,
            ));
        }
        // Below
        if p.bottom() < region.bottom() {
            next.push(FreeRegion::new(
                region.x,
                p.bottom(),
                region.rect.w,
                region.bottom() - p.bottom(),
            ));
        }
    }
    next
}
