//! Diagnostic rendering of a logical tile's layout.
//!
//! Output is meant for logs and debugging sessions. It shows structure only
//! (pointers, validity, positions), never values, so formatting a tile cannot
//! fail on a released borrowed tile.

use std::fmt;

use super::LogicalTile;

impl fmt::Display for LogicalTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "LOGICAL TILE ({} rows, {} valid, {} columns)",
            self.row_count(),
            self.valid_row_count(),
            self.column_count()
        )?;

        writeln!(f, "SCHEMA")?;
        for (column_id, pointer) in self.columns().iter().enumerate() {
            writeln!(
                f,
                "  column {column_id}: position list {}, tile {}, origin column {}",
                pointer.position_list_idx(),
                pointer.tile_id(),
                pointer.origin_column_id()
            )?;
        }

        writeln!(f, "OWNED TILES")?;
        writeln!(f, "  {:?}", self.owned_tile_ids())?;

        writeln!(f, "VALID ROWS")?;
        let bits: Vec<&str> = (0..self.row_count())
            .map(|row| if self.valid_bit(row) { "1" } else { "0" })
            .collect();
        writeln!(f, "  {}", bits.join(" "))?;

        writeln!(f, "POSITION LISTS")?;
        for (idx, list) in self.position_lists().iter().enumerate() {
            writeln!(f, "  {idx}: {list:?}")?;
        }
        Ok(())
    }
}
