use crate::types::{Placement, Sheet};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// ASCII diagram of a sheet and its placements, scaled to fit 80x40 cells.
pub fn render_sheet(sheet: &Sheet) -> String {
    let scale = f64::min(
        MAX_WIDTH / sheet.width() as f64,
        MAX_HEIGHT / sheet.height() as f64,
    );
    let grid_w = (sheet.width() as f64 * scale).round() as usize;
    let grid_h = (sheet.height() as f64 * scale).round() as usize;

    let mut result = format!("{} ({}x{})\n", sheet.name(), sheet.width(), sheet.height());
    if grid_w == 0 || grid_h == 0 {
        return result;
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];
    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in sheet.placements() {
        let sx = (p.x as f64 * scale).round() as usize;
        let sy = (p.y as f64 * scale).round() as usize;
        let sw = (p.width as f64 * scale).round() as usize;
        let sh = (p.height as f64 * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);
        write_label(&mut grid, p, sx, sy, sw, sh);
    }

    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

/// Centres the plate label inside its outline, clipped to the interior.
fn write_label(grid: &mut [Vec<char>], p: &Placement, sx: usize, sy: usize, sw: usize, sh: usize) {
    if sw <= 2 || sh < 2 {
        return;
    }
    let label: Vec<char> = p.source_label.chars().collect();
    let cx = sx + sw / 2;
    let cy = sy + sh / 2;
    let start_x = cx.saturating_sub(label.len() / 2);

    for (i, &ch) in label.iter().enumerate() {
        let x = start_x + i;
        if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
            grid[cy][x] = ch;
        }
    }
}

fn edge(current: char, crossing: char, own: char) -> char {
    if current == crossing || current == '+' {
        '+'
    } else {
        own
    }
}

#[allow(clippy::needless_range_loop)]
fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    for i in x..=x + w {
        if i >= cols {
            break;
        }
        for row in [y, y + h] {
            if row < rows {
                grid[row][i] = edge(grid[row][i], '|', '-');
            }
        }
    }

    for j in y..=y + h {
        if j >= rows {
            break;
        }
        for col in [x, x + w] {
            if col < cols {
                grid[j][col] = edge(grid[j][col], '-', '|');
            }
        }
    }

    for cx in [x, x + w] {
        for cy in [y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Strategy;
    use crate::nester::nest;
    use crate::types::Plate;

    #[test]
    fn test_render_single_plate() {
        let mut sheets = vec![Sheet::new("Offcut-1", 100, 50).unwrap()];
        let plates = vec![Plate::new("D01", 100, 50, true).unwrap()];
        nest(&plates, &mut sheets, Strategy::RectangleSplit).unwrap();
        let output = render_sheet(&sheets[0]);
        assert!(output.starts_with("Offcut-1 (100x50)\n"));
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("D01"));
    }

    #[test]
    fn test_render_two_plates() {
        let mut sheets = vec![Sheet::new("Sheet-1", 100, 100).unwrap()];
        let plates = vec![
            Plate::new("LEFT", 50, 100, true).unwrap(),
            Plate::new("RIGHT", 50, 100, true).unwrap(),
        ];
        nest(&plates, &mut sheets, Strategy::RectangleSplit).unwrap();
        let output = render_sheet(&sheets[0]);
        assert!(output.contains("LEFT"));
        assert!(output.contains("RIGHT"));
    }

    #[test]
    fn test_render_empty() {
        let sheet = Sheet::new("Sheet-1", 100, 100).unwrap();
        let output = render_sheet(&sheet);
        assert!(output.contains('+'));
    }

    #[test]
    fn test_render_degenerate_aspect_keeps_header() {
        let sheet = Sheet::new("Strip", 1, 4_000_000_000).unwrap();
        assert_eq!(render_sheet(&sheet), "Strip (1x4000000000)\n");
    }
}
