//! Two-dimensional wave propagation patch.

use tsunami_lab_types::{Boundary, CellIdx, Real, DRY_TOLERANCE};

use crate::patches::{reflect_edge, WavePropagation};
use crate::solvers::fwave;

/// A rectangular grid of cells with a one cell wide ghost frame.
///
/// A time step applies dimensional splitting: an x-sweep updates heights
/// and x-momenta row by row, then the horizontal ghost rows are refreshed
/// from the new interior values, then a y-sweep updates heights and
/// y-momenta column by column. The refresh between the sweeps keeps
/// columns that are constant in y exactly constant.
pub struct WavePropagation2d {
    nx: CellIdx,
    ny: CellIdx,
    step: usize,
    h: [Vec<Real>; 2],
    hu: [Vec<Real>; 2],
    hv: [Vec<Real>; 2],
    b: Vec<Real>,
    boundary_left: Boundary,
    boundary_right: Boundary,
    boundary_top: Boundary,
    boundary_bottom: Boundary,
}

/// Borrows the old and new buffer of a double buffered quantity.
fn split_buffers<'a>(
    buffers: &'a mut [Vec<Real>; 2],
    old: usize,
) -> (&'a [Real], &'a mut [Real]) {
    let [first, second] = buffers;
    if old == 0 {
        (first, second)
    } else {
        (second, first)
    }
}

impl WavePropagation2d {
    pub fn new(
        nx: CellIdx,
        ny: CellIdx,
        boundary_left: Boundary,
        boundary_right: Boundary,
        boundary_top: Boundary,
        boundary_bottom: Boundary,
    ) -> Self {
        let size = (nx + 2) * (ny + 2);
        Self {
            nx,
            ny,
            step: 0,
            h: [vec![0.0; size], vec![0.0; size]],
            hu: [vec![0.0; size], vec![0.0; size]],
            hv: [vec![0.0; size], vec![0.0; size]],
            b: vec![0.0; size],
            boundary_left,
            boundary_right,
            boundary_top,
            boundary_bottom,
        }
    }

    /// Buffer index of a cell addressed with ghost cells included.
    fn idx(&self, ix: CellIdx, iy: CellIdx) -> usize {
        iy * (self.nx + 2) + ix
    }

    fn x_sweep(&mut self, scaling: Real) {
        let old = self.step;
        let (h_old, h_new) = split_buffers(&mut self.h, old);
        let (hu_old, hu_new) = split_buffers(&mut self.hu, old);
        let (hv_old, hv_new) = split_buffers(&mut self.hv, old);

        h_new.copy_from_slice(h_old);
        hu_new.copy_from_slice(hu_old);
        hv_new.copy_from_slice(hv_old);

        let stride = self.nx + 2;
        for iy in 1..=self.ny {
            for edge in 0..=self.nx {
                let cell_l = iy * stride + edge;
                let cell_r = cell_l + 1;

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
                    h_new[cell_l] -= scaling * update_l[0];
                    hu_new[cell_l] -= scaling * update_l[1];
                } else {
                    h_new[cell_l] = 0.0;
                    hu_new[cell_l] = 0.0;
                }

                if h_old[cell_r] > DRY_TOLERANCE {
                    h_new[cell_r] -= scaling * update_r[0];
                    hu_new[cell_r] -= scaling * update_r[1];
                } else {
                    h_new[cell_r] = 0.0;
                    hu_new[cell_r] = 0.0;
                }
            }
        }

        self.step = 1 - old;
    }

    fn y_sweep(&mut self, scaling: Real) {
        let old = self.step;
        let (h_old, h_new) = split_buffers(&mut self.h, old);
        let (hu_old, hu_new) = split_buffers(&mut self.hu, old);
        let (hv_old, hv_new) = split_buffers(&mut self.hv, old);

        h_new.copy_from_slice(h_old);
        hu_new.copy_from_slice(hu_old);
        hv_new.copy_from_slice(hv_old);

        let stride = self.nx + 2;
        for ix in 1..=self.nx {
            for edge in 0..=self.ny {
                let cell_l = edge * stride + ix;
                let cell_r = cell_l + stride;

                let states = reflect_edge(h_old, hv_old, &self.b, cell_l, cell_r);
                let (update_l, update_r) = fwave::net_updates(
                    states.h_l,
                    states.h_r,
                    states.hu_l,
                    states.hu_r,
                    states.b_l,
                    states.b_r,
                );

                if h_old[cell_l] > DRY_TOLERANCE {
                    h_new[cell_l] -= scaling * update_l[0];
                    hv_new[cell_l] -= scaling * update_l[1];
                } else {
                    h_new[cell_l] = 0.0;
                    hv_new[cell_l] = 0.0;
                }

                if h_old[cell_r] > DRY_TOLERANCE {
                    h_new[cell_r] -= scaling * update_r[0];
                    hv_new[cell_r] -= scaling * update_r[1];
                } else {
                    h_new[cell_r] = 0.0;
                    hv_new[cell_r] = 0.0;
                }
            }
        }

        self.step = 1 - old;
    }

    /// Refreshes the ghost rows below and above the interior from the
    /// current cell values. Run between the sweeps so the y-sweep sees
    /// the post x-sweep state at the horizontal boundaries.
    fn refresh_ghost_rows(&mut self) {
        let step = self.step;
        let ny = self.ny;
        for ix in 1..=self.nx {
            let bottom_ghost = self.idx(ix, 0);
            let bottom_inner = self.idx(ix, 1);
            self.h[step][bottom_ghost] = match self.boundary_bottom {
                Boundary::Wall => 0.0,
                Boundary::Outflow => self.h[step][bottom_inner],
            };
            self.hu[step][bottom_ghost] = self.hu[step][bottom_inner];
            self.hv[step][bottom_ghost] = self.hv[step][bottom_inner];
            self.b[bottom_ghost] = self.b[bottom_inner];

            let top_ghost = self.idx(ix, ny + 1);
            let top_inner = self.idx(ix, ny);
            self.h[step][top_ghost] = match self.boundary_top {
                Boundary::Wall => 0.0,
                Boundary::Outflow => self.h[step][top_inner],
            };
            self.hu[step][top_ghost] = self.hu[step][top_inner];
            self.hv[step][top_ghost] = self.hv[step][top_inner];
            self.b[top_ghost] = self.b[top_inner];
        }
    }

    fn refresh_ghost_columns(&mut self) {
        let step = self.step;
        let nx = self.nx;
        for iy in 1..=self.ny {
            let left_ghost = self.idx(0, iy);
            let left_inner = self.idx(1, iy);
            self.h[step][left_ghost] = match self.boundary_left {
                Boundary::Wall => 0.0,
                Boundary::Outflow => self.h[step][left_inner],
            };
            self.hu[step][left_ghost] = self.hu[step][left_inner];
            self.hv[step][left_ghost] = self.hv[step][left_inner];
            self.b[left_ghost] = self.b[left_inner];

            let right_ghost = self.idx(nx + 1, iy);
            let right_inner = self.idx(nx, iy);
            self.h[step][right_ghost] = match self.boundary_right {
                Boundary::Wall => 0.0,
                Boundary::Outflow => self.h[step][right_inner],
            };
            self.hu[step][right_ghost] = self.hu[step][right_inner];
            self.hv[step][right_ghost] = self.hv[step][right_inner];
            self.b[right_ghost] = self.b[right_inner];
        }
    }
}

impl WavePropagation for WavePropagation2d {
    fn time_step(&mut self, scaling_x: Real, scaling_y: Real) {
        self.x_sweep(scaling_x);
        self.refresh_ghost_rows();
        self.y_sweep(scaling_y);
    }

    fn set_ghost_outflow(&mut self) {
        self.refresh_ghost_columns();
        self.refresh_ghost_rows();
    }

    fn stride(&self) -> CellIdx {
        self.nx + 2
    }

    fn height(&self) -> &[Real] {
        &self.h[self.step][self.nx + 3..]
    }

    fn momentum_x(&self) -> &[Real] {
        &self.hu[self.step][self.nx + 3..]
    }

    fn momentum_y(&self) -> Option<&[Real]> {
        Some(&self.hv[self.step][self.nx + 3..])
    }

    fn bathymetry(&self) -> &[Real] {
        &self.b[self.nx + 3..]
    }

    fn set_height(&mut self, ix: CellIdx, iy: CellIdx, value: Real) {
        let step = self.step;
        let idx = self.idx(ix + 1, iy + 1);
        self.h[step][idx] = value;
    }

    fn set_momentum_x(&mut self, ix: CellIdx, iy: CellIdx, value: Real) {
        let step = self.step;
        let idx = self.idx(ix + 1, iy + 1);
        self.hu[step][idx] = value;
    }

    fn set_momentum_y(&mut self, ix: CellIdx, iy: CellIdx, value: Real) {
        let step = self.step;
        let idx = self.idx(ix + 1, iy + 1);
        self.hv[step][idx] = value;
    }

    fn set_bathymetry(&mut self, ix: CellIdx, iy: CellIdx, value: Real) {
        let idx = self.idx(ix + 1, iy + 1);
        self.b[idx] = value;
    }

    fn adjust_water_height(&mut self) {
        let step = self.step;
        for iy in 1..=self.ny {
            for ix in 1..=self.nx {
                let idx = self.idx(ix, iy);
                self.h[step][idx] = (self.h[step][idx] - self.b[idx]).max(0.0);
            }
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
        let mut patch = WavePropagation2d::new(
            50,
            50,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
        );
        for iy in 0..50 {
            for ix in 0..50 {
                patch.set_height(ix, iy, 10.0);
                patch.set_momentum_x(ix, iy, 0.0);
                patch.set_momentum_y(ix, iy, 0.0);
            }
        }
        patch.set_ghost_outflow();
        patch.time_step(0.1, 0.1);

        for iy in 0..50 {
            for ix in 0..50 {
                assert_eq!(patch.cell_height(ix, iy), 10.0);
                assert_eq!(patch.cell_momentum_x(ix, iy), 0.0);
                assert_eq!(patch.cell_momentum_y(ix, iy), 0.0);
            }
        }
    }

    #[test]
    fn test_dam_break_stays_uniform_in_y() {
        let mut patch = WavePropagation2d::new(
            100,
            100,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
        );
        for iy in 0..100 {
            for ix in 0..50 {
                patch.set_height(ix, iy, 10.0);
            }
            for ix in 50..100 {
                patch.set_height(ix, iy, 8.0);
            }
        }
        patch.set_ghost_outflow();
        patch.time_step(0.1, 0.1);

        for iy in 0..100 {
            assert_eq!(patch.cell_height(10, iy), 10.0);
            assert_eq!(patch.cell_momentum_x(10, iy), 0.0);
            assert_close(patch.cell_height(49, iy), 10.0 - 0.1 * 9.394671362, 1e-6);
            assert_close(patch.cell_momentum_x(49, iy), 0.1 * 88.25985, 1e-6);
            assert_eq!(patch.cell_momentum_y(49, iy), 0.0);
            assert_close(patch.cell_height(50, iy), 8.0 + 0.1 * 9.394671362, 1e-6);
            assert_close(patch.cell_momentum_x(50, iy), 0.1 * 88.25985, 1e-6);
            assert_eq!(patch.cell_momentum_y(50, iy), 0.0);
            assert_eq!(patch.cell_height(90, iy), 8.0);
            assert_eq!(patch.cell_momentum_x(90, iy), 0.0);
        }
    }

    #[test]
    fn test_views_are_row_major_with_stride() {
        let mut patch = WavePropagation2d::new(
            3,
            2,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
        );
        patch.set_height(0, 0, 1.0);
        patch.set_height(2, 0, 3.0);
        patch.set_height(1, 1, 5.0);

        let stride = patch.stride();
        assert_eq!(stride, 5);
        let height = patch.height();
        assert_eq!(height[0], 1.0);
        assert_eq!(height[2], 3.0);
        assert_eq!(height[stride + 1], 5.0);
    }

    #[test]
    fn test_adjust_water_height() {
        let mut patch = WavePropagation2d::new(
            2,
            2,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
            Boundary::Outflow,
        );
        for iy in 0..2 {
            for ix in 0..2 {
                patch.set_height(ix, iy, 4.0);
            }
        }
        patch.set_bathymetry(0, 0, -6.0);
        patch.set_bathymetry(1, 1, 9.0);
        patch.adjust_water_height();

        assert_eq!(patch.cell_height(0, 0), 10.0);
        assert_eq!(patch.cell_height(1, 0), 4.0);
        assert_eq!(patch.cell_height(0, 1), 4.0);
        assert_eq!(patch.cell_height(1, 1), 0.0);
    }
}
