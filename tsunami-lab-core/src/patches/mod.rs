//! Finite volume patches that advance the shallow water equations.

pub mod wave_propagation_1d;
pub mod wave_propagation_2d;

pub use wave_propagation_1d::WavePropagation1d;
pub use wave_propagation_2d::WavePropagation2d;

use tsunami_lab_types::{CellIdx, Real, REFLECTION_TOLERANCE};

/// One patch of the computational domain.
///
/// The cell data getters return row-major views that start at the first
/// interior cell. A cell `(ix, iy)` lives at index `iy * stride() + ix`
/// of such a view, with `ix` and `iy` counted from zero over the interior
/// cells only.
pub trait WavePropagation: Send {
    /// Advances the patch by one time step. The scalings are `dt / dx`
    /// and `dt / dy`; one-dimensional patches ignore the second.
    fn time_step(&mut self, scaling_x: Real, scaling_y: Real);

    /// Refreshes the ghost cells from the adjacent interior cells. Edges
    /// with a wall boundary zero the ghost height instead, which makes
    /// the reflection handling in [`Self::time_step`] mirror the flow.
    fn set_ghost_outflow(&mut self);

    /// Row distance between vertically adjacent cells in the views.
    fn stride(&self) -> CellIdx;

    /// Water heights of the interior cells.
    fn height(&self) -> &[Real];

    /// Momenta in x-direction of the interior cells.
    fn momentum_x(&self) -> &[Real];

    /// Momenta in y-direction, `None` for one-dimensional patches.
    fn momentum_y(&self) -> Option<&[Real]>;

    /// Bathymetry of the interior cells.
    fn bathymetry(&self) -> &[Real];

    fn set_height(&mut self, ix: CellIdx, iy: CellIdx, value: Real);

    fn set_momentum_x(&mut self, ix: CellIdx, iy: CellIdx, value: Real);

    /// No-op for one-dimensional patches.
    fn set_momentum_y(&mut self, ix: CellIdx, iy: CellIdx, value: Real);

    fn set_bathymetry(&mut self, ix: CellIdx, iy: CellIdx, value: Real);

    /// Subtracts the bathymetry from the water height of every interior
    /// cell and clamps the result at zero. Used after a bathymetry file
    /// has been loaded over an already sampled water surface.
    fn adjust_water_height(&mut self);

    fn cell_height(&self, ix: CellIdx, iy: CellIdx) -> Real {
        self.height()[iy * self.stride() + ix]
    }

    fn cell_momentum_x(&self, ix: CellIdx, iy: CellIdx) -> Real {
        self.momentum_x()[iy * self.stride() + ix]
    }

    fn cell_momentum_y(&self, ix: CellIdx, iy: CellIdx) -> Real {
        self.momentum_y()
            .map(|hv| hv[iy * self.stride() + ix])
            .unwrap_or(0.0)
    }

    fn cell_bathymetry(&self, ix: CellIdx, iy: CellIdx) -> Real {
        self.bathymetry()[iy * self.stride() + ix]
    }
}

/// Edge states after wall reflection handling.
///
/// A dry neighbor mirrors the wet cell: same height and bathymetry,
/// negated momentum. The momentum component is the one normal to the
/// edge, so sweeps in y-direction pass the y-momentum here.
pub(crate) struct EdgeStates {
    pub h_l: Real,
    pub h_r: Real,
    pub hu_l: Real,
    pub hu_r: Real,
    pub b_l: Real,
    pub b_r: Real,
}

pub(crate) fn reflect_edge(
    h: &[Real],
    momentum: &[Real],
    b: &[Real],
    cell_l: usize,
    cell_r: usize,
) -> EdgeStates {
    let mut states = EdgeStates {
        h_l: h[cell_l],
        h_r: h[cell_r],
        hu_l: momentum[cell_l],
        hu_r: momentum[cell_r],
        b_l: b[cell_l],
        b_r: b[cell_r],
    };

    if h[cell_r] <= REFLECTION_TOLERANCE {
        states.h_r = states.h_l;
        states.b_r = states.b_l;
        states.hu_r = -states.hu_l;
    } else if h[cell_l] <= REFLECTION_TOLERANCE {
        states.h_l = states.h_r;
        states.b_l = states.b_r;
        states.hu_l = -states.hu_r;
    }

    states
}
