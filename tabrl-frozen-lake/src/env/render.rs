//! Raster image of the lake.
use super::Cell;
use anyhow::Result;
use tabrl_core::Frame;

/// Side of a cell in pixels.
pub const CELL_SIZE: u32 = 100;

const GRID_LINE: u32 = 2;
const BLACK: [u8; 3] = [0, 0, 0];
const AGENT: [u8; 3] = [255, 0, 0];

fn color(cell: Cell) -> [u8; 3] {
    match cell {
        Cell::Start => [135, 206, 250],
        Cell::Frozen => [255, 255, 255],
        Cell::Hole => [100, 100, 100],
        Cell::Goal => [50, 205, 50],
    }
}

/// Draws the cells colored by type with grid lines on their top and left
/// edges, and the agent as a disk in the center of its cell.
pub(super) fn render(cells: &[Cell], ncol: usize, agent: usize) -> Result<Frame> {
    let nrow = cells.len() / ncol;
    let (width, height) = (ncol as u32 * CELL_SIZE, nrow as u32 * CELL_SIZE);
    let mut frame = Frame::filled(width, height, [255, 255, 255])?;

    for (i, &cell) in cells.iter().enumerate() {
        let x0 = (i % ncol) as u32 * CELL_SIZE;
        let y0 = (i / ncol) as u32 * CELL_SIZE;
        let (x1, y1) = (x0 + CELL_SIZE, y0 + CELL_SIZE);
        frame.fill_rect(x0, y0, x1, y1, color(cell));
        frame.fill_rect(x0, y0, x1, y0 + GRID_LINE, BLACK);
        frame.fill_rect(x0, y0, x0 + GRID_LINE, y1, BLACK);
    }

    let cx = (agent % ncol) as u32 * CELL_SIZE + CELL_SIZE / 2;
    let cy = (agent / ncol) as u32 * CELL_SIZE + CELL_SIZE / 2;
    frame.fill_disk(cx, cy, CELL_SIZE / 3, AGENT);

    Ok(frame)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render_colors() {
        use Cell::*;
        let cells = [Start, Frozen, Hole, Goal];
        let frame = render(&cells, 2, 3).unwrap();
        assert_eq!((frame.width(), frame.height()), (200, 200));

        // Corners of the cells are grid lines
        assert_eq!(frame.pixel(0, 0), Some(BLACK));
        assert_eq!(frame.pixel(101, 150), Some(BLACK));

        assert_eq!(frame.pixel(10, 10), Some([135, 206, 250]));
        assert_eq!(frame.pixel(110, 10), Some([255, 255, 255]));
        assert_eq!(frame.pixel(10, 110), Some([100, 100, 100]));
        assert_eq!(frame.pixel(190, 190), Some([50, 205, 50]));

        // Agent in the goal cell
        assert_eq!(frame.pixel(150, 150), Some(AGENT));
        assert_eq!(frame.pixel(150, 150 - 33), Some(AGENT));
        assert_eq!(frame.pixel(150, 150 - 34), Some([50, 205, 50]));
    }
}
