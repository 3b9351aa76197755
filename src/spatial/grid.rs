//! Generic fixed-size grid addressed by (row, col)

use serde::ser::{Serialize, Serializer};

use crate::core::types::Direction;

/// Row-major 2D grid whose dimensions never change after creation
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Bounds-check signed coordinates coming from outside the engine
    #[inline]
    pub fn checked_coords(&self, row: i64, col: i64) -> Option<(usize, usize)> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        self.contains(row, col).then_some((row, col))
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if self.contains(row, col) {
            Some(&self.data[row * self.width + col])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if self.contains(row, col) {
            Some(&mut self.data[row * self.width + col])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        if self.contains(row, col) {
            self.data[row * self.width + col] = value;
        }
    }

    /// Adjacent coordinates one step in `direction`, or None past the edge
    ///
    /// There is no wraparound.
    pub fn neighbor(&self, row: usize, col: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = direction.offset();
        self.checked_coords(row as i64 + dr, col as i64 + dc)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks(self.width)
    }

    /// All cells in scan order with their coordinates
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, value)| ((i / width, i % width), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut T)> + '_ {
        let width = self.width;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(i, value)| ((i / width, i % width), value))
    }
}

/// Serialized as an ordered sequence of rows
impl<T: Clone + Default + Serialize> Serialize for Grid<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_out_of_bounds() {
        let grid: Grid<u8> = Grid::square(4);
        assert!(grid.get(3, 3).is_some());
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(0, 4).is_none());
    }

    #[test]
    fn test_set_is_row_major() {
        let mut grid: Grid<u8> = Grid::new(3, 2);
        grid.set(1, 2, 7);
        let rows: Vec<&[u8]> = grid.rows().collect();
        assert_eq!(rows, vec![&[0, 0, 0][..], &[0, 0, 7][..]]);
    }

    #[test]
    fn test_checked_coords_rejects_negative() {
        let grid: Grid<u8> = Grid::square(16);
        assert_eq!(grid.checked_coords(-1, 0), None);
        assert_eq!(grid.checked_coords(0, 16), None);
        assert_eq!(grid.checked_coords(15, 15), Some((15, 15)));
    }

    #[test]
    fn test_neighbor_stops_at_edges() {
        let grid: Grid<u8> = Grid::square(16);
        assert_eq!(grid.neighbor(0, 0, Direction::North), None);
        assert_eq!(grid.neighbor(0, 0, Direction::West), None);
        assert_eq!(grid.neighbor(0, 15, Direction::East), None);
        assert_eq!(grid.neighbor(15, 3, Direction::South), None);
        assert_eq!(grid.neighbor(5, 5, Direction::East), Some((5, 6)));
        assert_eq!(grid.neighbor(5, 5, Direction::North), Some((4, 5)));
    }

    #[test]
    fn test_iter_scan_order() {
        let grid: Grid<u8> = Grid::new(2, 2);
        let coords: Vec<(usize, usize)> = grid.iter().map(|(pos, _)| pos).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_serializes_as_rows() {
        let mut grid: Grid<u8> = Grid::new(2, 2);
        grid.set(0, 1, 1);
        assert_eq!(serde_json::to_string(&grid).unwrap(), "[[0,1],[0,0]]");
    }
}
