//! One-dimensional wave propagation patch.

use tsunami_lab_types::{Boundary, CellIdx, Real, DRY_TOLERANCE};

use crate::patches::{reflect_edge, WavePropagation};
use crate::solvers::fwave;

/// A row of cells with one ghost cell on each side.
///
/// Heights and momenta are double buffered so one time step can read the
/// old state while writing the new one. Bathymetry is static during a
/// simulation and kept in a single array.
pub struct WavePropagation1d {
    n_cells: CellIdx,
    step: usize,
    h: [Vec<Real>; 2],
    hu: [Vec<Real>; 2],
    b: Vec<Real>,
    boundary_left: Boundary,
    boundary_right: Boundary,
}

impl WavePropagation1d {
    pub fn new(n_cells: CellIdx, boundary_left: Boundary, boundary_right: Boundary) -> Self {
        let size = n_cells + 2;
        Self {
            n_cells,
            step: 0,
            h: [vec![0.0; size], vec![0.0; size]],
            hu: [vec![0.0; size], vec![0.0; size]],
            b: vec![0.0; size],
            boundary_left,
            boundary_right,
        }
    }
}

impl WavePropagation for WavePropagation1d {
    fn time_step(&mut self, scaling_x: Real, _scaling_y: Real) {
        let old = self.step;
        let new = 1 - old;

        let [h_first, h_second] = &mut self.h;
        let (h_old, h_new) = if old == 0 {
            (&*h_first, h_second)
        } else {
            (&*h_second, h_first)
        };
        let [hu_first, hu_second] = &mut self.hu;
        let (hu_old, hu_new) = if old == 0 {
            (&*hu_first, hu_second)
        } else {
            (&*hu_second, hu_first)
        };

        h_new.copy_from_slice(h_old);
        hu_new.copy_from_slice(hu_old);

        for edge in 0..=self.n_cells {
            let cell_l = edge;
            let cell_r = edge + 1;

            let states = reflect_edge(h_old, hu_old, &self.b, cell_l, cell_r);
            let (update_l, update_r) = fwave::net_updates(
                states.h_l,
                states.h_r,
                states.hu_l,
                states.hu_r,
                states.b_l,
                states.b_r,
            );

            if h_old[cell_l] > DRY_TOLERANCE {
                h_new[cell_l] -= scaling_x * update_l[0];
                hu_new[cell_l] -= scaling_x * update_l[1];
            } else {
                h_new[cell_l] = 0.0;
                hu_new[cell_l] = 0.0;
            }

            if h_old[cell_r] > DRY_TOLERANCE {
                h_new[cell_r] -= scaling_x * update_r[0];
                hu_new[cell_r] -= scaling_x * update_r[1];
            } else {
                h_new[cell_r] = 0.0;
                hu_new[cell_r] = 0.0;
            }
        }

        self.step = new;
    }

    fn set_ghost_outflow(&mut self) {
        let step = self.step;
        let n = self.n_cells;
        let h = &mut self.h[step];
        let hu = &mut self.hu[step];

        h[0] = match self.boundary_left {
            Boundary::Wall => 0.0,
            Boundary::Outflow => h[1],
        };
        hu[0] = hu[1];
        self.b[0] = self.b[1];

        h[n + 1] = match self.boundary_right {
            Boundary::Wall => 0.0,
            Boundary::Outflow => h[n],
        };
        hu[n + 1] = hu[n];
        self.b[n + 1] = self.b[n];
    }

    fn stride(&self) -> CellIdx {
        self.n_cells + 2
    }

    fn height(&self) -> &[Real] {
        &self.h[self.step][1..]
    }

    fn momentum_x(&self) -> &[Real] {
        &self.hu[self.step][1..]
    }

    fn momentum_y(&self) -> Option<&[Real]> {
        None
    }

    fn bathymetry(&self) -> &[Real] {
        &self.b[1..]
    }

    fn set_height(&mut self, ix: CellIdx, _iy: CellIdx, value: Real) {
        let step = self.step;
        self.h[step][ix + 1] = value;
    }

    fn set_momentum_x(&mut self, ix: CellIdx, _iy: CellIdx, value: Real) {
        let step = self.step;
        self.hu[step][ix + 1] = value;
    }

    fn set_momentum_y(&mut self, _ix: CellIdx, _iy: CellIdx, _value: Real) {}

    fn set_bathymetry(&mut self, ix: CellIdx, _iy: CellIdx, value: Real) {
        self.b[ix + 1] = value;
    }

    fn adjust_water_height(&mut self) {
        let step = self.step;
        for cell in 1..=self.n_cells {
            self.h[step][cell] = (self.h[step][cell] - self.b[cell]).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Real, expected: Real, tolerance: Real) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_steady_state() {
        let mut patch = WavePropagation1d::new(100, Boundary::Outflow, Boundary::Outflow);
        for cell in 0..100 {
            patch.set_height(cell, 0, 10.0);
            patch.set_momentum_x(cell, 0, 0.0);
        }
        patch.set_ghost_outflow();
        patch.time_step(0.1, 0.0);

        for cell in 0..100 {
            assert_eq!(patch.cell_height(cell, 0), 10.0);
            assert_eq!(patch.cell_momentum_x(cell, 0), 0.0);
        }
    }

    #[test]
    fn test_dam_break() {
        let mut patch = WavePropagation1d::new(100, Boundary::Outflow, Boundary::Outflow);
        for cell in 0..50 {
            patch.set_height(cell, 0, 10.0);
            patch.set_momentum_x(cell, 0, 0.0);
        }
        for cell in 50..100 {
            patch.set_height(cell, 0, 8.0);
            patch.set_momentum_x(cell, 0, 0.0);
        }
        patch.set_ghost_outflow();
        patch.time_step(0.1, 0.0);

        for cell in 0..49 {
            assert_eq!(patch.cell_height(cell, 0), 10.0);
            assert_eq!(patch.cell_momentum_x(cell, 0), 0.0);
        }
        assert_close(patch.cell_height(49, 0), 10.0 - 0.1 * 9.394671362, 1e-6);
        assert_close(patch.cell_momentum_x(49, 0), 0.1 * 88.25985, 1e-6);
        assert_close(patch.cell_height(50, 0), 8.0 + 0.1 * 9.394671362, 1e-6);
        assert_close(patch.cell_momentum_x(50, 0), 0.1 * 88.25985, 1e-6);
        for cell in 51..100 {
            assert_eq!(patch.cell_height(cell, 0), 8.0);
            assert_eq!(patch.cell_momentum_x(cell, 0), 0.0);
        }
    }

    #[test]
    fn test_shoreline_at_rest() {
        // A resting lake next to dry land must stay at rest: the dry
        // neighbor mirrors the wet state, which cancels all waves.
        let mut patch = WavePropagation1d::new(20, Boundary::Outflow, Boundary::Outflow);
        for cell in 0..10 {
            patch.set_height(cell, 0, 10.0);
        }
        for cell in 10..20 {
            patch.set_height(cell, 0, 0.0);
        }
        patch.set_ghost_outflow();
        patch.time_step(0.1, 0.0);

        for cell in 0..10 {
            assert_eq!(patch.cell_height(cell, 0), 10.0);
            assert_eq!(patch.cell_momentum_x(cell, 0), 0.0);
        }
        for cell in 10..20 {
            assert_eq!(patch.cell_height(cell, 0), 0.0);
            assert_eq!(patch.cell_momentum_x(cell, 0), 0.0);
        }
    }

    #[test]
    fn test_lake_at_rest_over_bathymetry() {
        let mut patch = WavePropagation1d::new(10, Boundary::Outflow, Boundary::Outflow);
        for cell in 0..10 {
            let b = -2.0 + 0.1 * cell as Real;
            patch.set_bathymetry(cell, 0, b);
            patch.set_height(cell, 0, 5.0 - b);
            patch.set_momentum_x(cell, 0, 0.0);
        }
        patch.set_ghost_outflow();
        for _ in 0..5 {
            patch.time_step(0.05, 0.0);
            patch.set_ghost_outflow();
        }

        for cell in 0..10 {
            let b = -2.0 + 0.1 * cell as Real;
            assert_close(patch.cell_height(cell, 0), 5.0 - b, 1e-9);
            assert_close(patch.cell_momentum_x(cell, 0), 0.0, 1e-9);
        }
    }

    #[test]
    fn test_ghost_outflow_wall() {
        let mut patch = WavePropagation1d::new(4, Boundary::Wall, Boundary::Outflow);
        for cell in 0..4 {
            patch.set_height(cell, 0, 3.0);
            patch.set_momentum_x(cell, 0, 2.0);
            patch.set_bathymetry(cell, 0, -5.0);
        }
        patch.set_ghost_outflow();

        // Full views include the ghost cells.
        assert_eq!(patch.h[0][0], 0.0);
        assert_eq!(patch.hu[0][0], 2.0);
        assert_eq!(patch.b[0], -5.0);
        assert_eq!(patch.h[0][5], 3.0);
        assert_eq!(patch.hu[0][5], 2.0);
        assert_eq!(patch.b[5], -5.0);
    }

    #[test]
    fn test_adjust_water_height() {
        let mut patch = WavePropagation1d::new(3, Boundary::Outflow, Boundary::Outflow);
        patch.set_height(0, 0, 10.0);
        patch.set_height(1, 0, 10.0);
        patch.set_height(2, 0, 10.0);
        patch.set_bathymetry(0, 0, -2.0);
        patch.set_bathymetry(1, 0, 4.0);
        patch.set_bathymetry(2, 0, 12.0);
        patch.adjust_water_height();

        assert_eq!(patch.cell_height(0, 0), 12.0);
        assert_eq!(patch.cell_height(1, 0), 6.0);
        assert_eq!(patch.cell_height(2, 0), 0.0);
    }
}
