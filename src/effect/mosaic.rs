use crate::buffer::WorkingBuffer;
use crate::geometry::PixelRect;

/// Replace the R, G and B of every pixel in `cell` with the cell's mean.
///
/// `cell` must already lie inside the buffer. Alpha is left untouched.
pub fn mosaic_cell(work: &mut WorkingBuffer, cell: PixelRect) {
    if cell.is_empty() {
        return;
    }
    let (x0, y0) = (cell.x as u32, cell.y as u32);
    let (x1, y1) = (cell.right() as u32, cell.bottom() as u32);

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let px = work.pixel(x, y);
            sum[0] += u64::from(px[0]);
            sum[1] += u64::from(px[1]);
            sum[2] += u64::from(px[2]);
            count += 1;
        }
    }

    let mean = [
        rounded_mean(sum[0], count),
        rounded_mean(sum[1], count),
        rounded_mean(sum[2], count),
    ];
    for y in y0..y1 {
        for x in x0..x1 {
            work.set_rgb(x, y, mean);
        }
    }
}

/// Mosaic `rect` with a grid anchored at the rectangle's own top-left corner.
///
/// Cells are clipped to the rectangle and to the buffer; cells entirely
/// outside the buffer are skipped.
pub fn mosaic_rect(work: &mut WorkingBuffer, rect: PixelRect, block_size: u32) {
    let Some(area) = rect.clip_to(work.width(), work.height()) else {
        return;
    };
    let block = i64::from(block_size.max(1));

    // First grid line at or before the visible area
    let start_x = rect.x + (area.x - rect.x) / block * block;
    let start_y = rect.y + (area.y - rect.y) / block * block;

    let mut cy = start_y;
    while cy < area.bottom() {
        let mut cx = start_x;
        while cx < area.right() {
            let cell = PixelRect::new(
                cx,
                cy,
                (cx + block).min(rect.right()) - cx,
                (cy + block).min(rect.bottom()) - cy,
            );
            if let Some(cell) = cell.clip_to(work.width(), work.height()) {
                mosaic_cell(work, cell);
            }
            cx += block;
        }
        cy += block;
    }
}

/// Top-left corner of the cell containing `(x, y)` on the buffer-global grid
pub fn global_cell_origin(x: i64, y: i64, block_size: u32) -> (i64, i64) {
    let block = i64::from(block_size.max(1));
    (x.div_euclid(block) * block, y.div_euclid(block) * block)
}

// round(sum / count), halves rounded up
fn rounded_mean(sum: u64, count: u64) -> u8 {
    if count == 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)).min(255) as u8
}
