use crate::config::CityConfig;
use glam::Vec3;

/// What a lattice cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Crossing of two streets.
    Intersection,
    /// Street segment between two intersections.
    Street,
    /// Block interior, where buildings go.
    Block,
}

/// Direction a street runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreetAxis {
    /// Runs along Z, at a fixed X.
    NorthSouth,
    /// Runs along X, at a fixed Z.
    EastWest,
}

/// One cell of the city lattice.
///
/// The lattice alternates street bands and block bands on both axes, so it
/// is `2 * city_size` cells per side: even indices are street bands, odd
/// indices are block bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub column: u32,
    pub row: u32,
    pub kind: CellKind,
    pub center: Vec3,
}

impl GridCell {
    pub fn is_street(&self) -> bool {
        self.kind != CellKind::Block
    }

    /// Block coordinates `(c, r)` for block cells.
    pub fn block_coords(&self) -> Option<(u32, u32)> {
        (self.kind == CellKind::Block).then_some((self.column / 2, self.row / 2))
    }
}

/// Geometry of the street lattice, derived from the city parameters.
///
/// Street `k` is centered at `(k - city_size / 2) * pitch` on its axis; the
/// block after it is centered half a pitch further. The lattice tiles with a
/// period of `chunk_size`, which is what makes chunk wrapping seamless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityGrid {
    city_size: u32,
    block_size: f32,
    street_width: f32,
}

impl CityGrid {
    pub fn new(config: &CityConfig) -> Self {
        Self {
            city_size: config.city_size,
            block_size: config.block_size,
            street_width: config.street_width,
        }
    }

    pub fn city_size(&self) -> u32 {
        self.city_size
    }

    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    pub fn street_width(&self) -> f32 {
        self.street_width
    }

    pub fn pitch(&self) -> f32 {
        self.block_size + self.street_width
    }

    pub fn chunk_size(&self) -> f32 {
        self.city_size as f32 * self.pitch()
    }

    /// Lattice cells per side.
    pub fn lattice_size(&self) -> u32 {
        self.city_size * 2
    }

    /// Centerline coordinate of street `k` on either axis.
    pub fn street_center(&self, k: u32) -> f32 {
        (k as f32 - self.city_size as f32 / 2.0) * self.pitch()
    }

    /// Centerline coordinate of the street closest to the city middle.
    /// Zero when `city_size` is even.
    pub fn central_street(&self) -> f32 {
        self.street_center(self.city_size / 2)
    }

    /// Center of block `(c, r)` on the ground plane.
    pub fn block_center(&self, column: u32, row: u32) -> Vec3 {
        let half = self.pitch() * 0.5;
        Vec3::new(
            self.street_center(column) + half,
            0.0,
            self.street_center(row) + half,
        )
    }

    fn band_center(&self, index: u32) -> f32 {
        let k = index / 2;
        if index % 2 == 0 {
            self.street_center(k)
        } else {
            self.street_center(k) + self.pitch() * 0.5
        }
    }

    /// Lattice cell at `(column, row)`. `None` outside the lattice.
    pub fn cell(&self, column: u32, row: u32) -> Option<GridCell> {
        if column >= self.lattice_size() || row >= self.lattice_size() {
            return None;
        }
        let kind = match (column % 2 == 0, row % 2 == 0) {
            (true, true) => CellKind::Intersection,
            (false, false) => CellKind::Block,
            _ => CellKind::Street,
        };
        Some(GridCell {
            column,
            row,
            kind,
            center: Vec3::new(self.band_center(column), 0.0, self.band_center(row)),
        })
    }

    /// All lattice cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let n = self.lattice_size();
        (0..n).flat_map(move |row| (0..n).filter_map(move |column| self.cell(column, row)))
    }

    /// Lattice band index for a coordinate, treating the lattice as periodic.
    fn band_index(&self, coord: f32) -> u32 {
        let origin = self.street_center(0) - self.street_width * 0.5;
        let chunk = self.chunk_size();
        let local = (coord - origin).rem_euclid(chunk);
        // rem_euclid can round up to the divisor for tiny negative inputs.
        let local = if local >= chunk { 0.0 } else { local };
        let k = ((local / self.pitch()).floor() as u32).min(self.city_size - 1);
        let within = local - k as f32 * self.pitch();
        if within < self.street_width {
            k * 2
        } else {
            k * 2 + 1
        }
    }

    /// Lattice cell containing a world position. The lattice repeats every
    /// chunk, so any position maps to some cell.
    pub fn cell_at(&self, position: Vec3) -> GridCell {
        let column = self.band_index(position.x);
        let row = self.band_index(position.z);
        // In range by construction of band_index.
        self.cell(column, row).unwrap_or(GridCell {
            column,
            row,
            kind: CellKind::Block,
            center: position,
        })
    }

    /// Random point on a street band, at ground level, away from the curb.
    pub fn random_street_point(&self, rng: &mut fastrand::Rng) -> Vec3 {
        let k = rng.u32(0..self.city_size);
        let across = self.street_center(k) + (rng.f32() - 0.5) * self.street_width * 0.5;
        let origin = self.street_center(0) - self.street_width * 0.5;
        let along = origin + rng.f32() * self.chunk_size();
        if rng.bool() {
            Vec3::new(across, 0.0, along)
        } else {
            Vec3::new(along, 0.0, across)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> CityGrid {
        CityGrid::new(&CityConfig::default())
    }

    #[test]
    fn central_street_passes_through_origin() {
        assert_eq!(grid().central_street(), 0.0);
    }

    #[test]
    fn odd_city_central_street_is_offset() {
        let g = CityGrid::new(&CityConfig {
            city_size: 5,
            ..CityConfig::default()
        });
        assert_eq!(g.central_street(), -26.0);
    }

    #[test]
    fn cell_kinds_alternate() {
        let g = grid();
        assert_eq!(g.cell(0, 0).unwrap().kind, CellKind::Intersection);
        assert_eq!(g.cell(1, 0).unwrap().kind, CellKind::Street);
        assert_eq!(g.cell(0, 1).unwrap().kind, CellKind::Street);
        assert_eq!(g.cell(1, 1).unwrap().kind, CellKind::Block);
        assert!(g.cell(16, 0).is_none());
    }

    #[test]
    fn cells_cover_the_lattice() {
        let g = grid();
        let cells: Vec<GridCell> = g.cells().collect();
        assert_eq!(cells.len(), 16 * 16);
        let blocks = cells.iter().filter(|c| c.kind == CellKind::Block).count();
        assert_eq!(blocks, 64);
    }

    #[test]
    fn block_cell_center_matches_block_center() {
        let g = grid();
        let cell = g.cell(5, 7).unwrap();
        assert_eq!(cell.block_coords(), Some((2, 3)));
        assert_eq!(cell.center, g.block_center(2, 3));
    }

    #[test]
    fn cell_at_round_trips_centers() {
        let g = grid();
        for cell in g.cells() {
            let found = g.cell_at(cell.center);
            assert_eq!((found.column, found.row), (cell.column, cell.row));
            assert_eq!(found.kind, cell.kind);
        }
    }

    #[test]
    fn cell_at_is_periodic() {
        let g = grid();
        let p = Vec3::new(10.0, 0.0, -30.0);
        let a = g.cell_at(p);
        let b = g.cell_at(p + Vec3::new(g.chunk_size(), 0.0, -g.chunk_size()));
        assert_eq!((a.column, a.row), (b.column, b.row));
    }

    #[test]
    fn band_seam_rounding_stays_on_street_zero() {
        let g = grid();
        let origin = g.street_center(0) - g.street_width * 0.5;
        // One ulp below the seam: the remainder rounds up to the chunk size.
        let below = f32::from_bits(origin.to_bits() + 1);
        assert!(below < origin);
        assert_eq!(g.band_index(below), 0);
        let cell = g.cell_at(Vec3::new(below, 0.0, 0.0));
        assert_eq!(cell.column, 0);
        assert!(cell.is_street());
    }

    #[test]
    fn origin_is_on_a_street() {
        let g = grid();
        assert!(g.cell_at(Vec3::ZERO).is_street());
        assert!(g.cell_at(Vec3::new(3.0, 0.0, -150.0)).is_street());
    }

    #[test]
    fn random_street_points_land_on_streets() {
        let g = grid();
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..500 {
            let p = g.random_street_point(&mut rng);
            assert!(g.cell_at(p).is_street(), "{p}");
        }
    }
}
