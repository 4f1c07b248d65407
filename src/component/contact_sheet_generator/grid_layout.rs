/// Pixel geometry of a contact sheet.
///
/// Tiles are laid out row-major with a gutter on every side. The last row may
/// be partial; the row count rounds up so the canvas always fits every tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub frames_per_row: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub gutter: u32,
    pub header_height: u32,
    pub rows: u32,
    pub sheet_width: u32,
    pub sheet_height: u32,
}

impl GridGeometry {
    /// # Panics
    ///
    /// Panics if `frames_per_row` is zero.
    #[must_use]
    pub fn new(
        frame_count: usize,
        frames_per_row: usize,
        tile_width: u32,
        tile_height: u32,
        gutter: u32,
        header_height: u32,
    ) -> Self {
        let rows = frame_count.div_ceil(frames_per_row) as u32;
        let columns = frames_per_row as u32;

        Self {
            frames_per_row: columns,
            tile_width,
            tile_height,
            gutter,
            header_height,
            rows,
            sheet_width: columns * tile_width + (columns + 1) * gutter,
            sheet_height: header_height + rows * tile_height + (rows + 1) * gutter,
        }
    }

    /// Top-left corner of tile `index`.
    #[must_use]
    pub fn tile_origin(&self, index: usize) -> (u32, u32) {
        let row = index as u32 / self.frames_per_row;
        let col = index as u32 % self.frames_per_row;
        let x = self.gutter + col * (self.tile_width + self.gutter);
        let y = self.header_height + self.gutter + row * (self.tile_height + self.gutter);
        (x, y)
    }
}
