//! CSV output of patch state.

use std::io::Write;

use tsunami_lab_types::Real;

use crate::io::IoError;

/// Writes the interior of a patch as CSV. The first two columns are the
/// cell center coordinates; height, momenta and bathymetry columns are
/// emitted for the slices that are present.
///
/// The slices point at the first interior cell of a ghost-free view and
/// are indexed as `iy * stride + ix`.
#[allow(clippy::too_many_arguments)]
pub fn write(
    out: &mut impl Write,
    dxy: Real,
    nx: usize,
    ny: usize,
    stride: usize,
    height: Option<&[Real]>,
    momentum_x: Option<&[Real]>,
    momentum_y: Option<&[Real]>,
    bathymetry: Option<&[Real]>,
) -> Result<(), IoError> {
    write!(out, "x,y")?;
    if height.is_some() {
        write!(out, ",height")?;
    }
    if momentum_x.is_some() {
        write!(out, ",momentum_x")?;
    }
    if momentum_y.is_some() {
        write!(out, ",momentum_y")?;
    }
    if bathymetry.is_some() {
        write!(out, ",bathymetry")?;
    }
    writeln!(out)?;

    for iy in 0..ny {
        for ix in 0..nx {
            let position_x = (ix as Real + 0.5) * dxy;
            let position_y = (iy as Real + 0.5) * dxy;
            write!(out, "{position_x},{position_y}")?;

            let cell = iy * stride + ix;
            for column in [height, momentum_x, momentum_y, bathymetry]
                .into_iter()
                .flatten()
            {
                write!(out, ",{}", column[cell])?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Splits one CSV line into trimmed fields.
pub fn split_line(line: &str, separator: char) -> Vec<&str> {
    line.split(separator).map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_1d() {
        let height: [Real; 7] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let momentum_x: [Real; 7] = [6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0];

        let mut out = Vec::new();
        write(
            &mut out,
            0.5,
            5,
            1,
            7,
            Some(&height[1..]),
            Some(&momentum_x[1..]),
            None,
            None,
        )
        .unwrap();

        let expected = "\
x,y,height,momentum_x
0.25,0.25,1,5
0.75,0.25,2,4
1.25,0.25,3,3
1.75,0.25,4,2
2.25,0.25,5,1
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_write_2d() {
        #[rustfmt::skip]
        let height: [Real; 16] = [
             0.0,  1.0,  2.0,  3.0,
             4.0,  5.0,  6.0,  7.0,
             8.0,  9.0, 10.0, 11.0,
            12.0, 13.0, 14.0, 15.0,
        ];
        #[rustfmt::skip]
        let momentum_x: [Real; 16] = [
            15.0, 14.0, 13.0, 12.0,
            11.0, 10.0,  9.0,  8.0,
             7.0,  6.0,  5.0,  4.0,
             3.0,  2.0,  1.0,  0.0,
        ];
        #[rustfmt::skip]
        let momentum_y: [Real; 16] = [
            0.0, 4.0,  8.0, 12.0,
            1.0, 5.0,  9.0, 13.0,
            2.0, 6.0, 10.0, 14.0,
            3.0, 7.0, 11.0, 15.0,
        ];

        let mut out = Vec::new();
        write(
            &mut out,
            10.0,
            2,
            2,
            4,
            Some(&height[5..]),
            Some(&momentum_x[5..]),
            Some(&momentum_y[5..]),
            None,
        )
        .unwrap();

        let output = String::from_utf8(out).unwrap();
        insta::assert_snapshot!(output.trim_end(), @r"
        x,y,height,momentum_x,momentum_y
        5,5,5,10,5
        15,5,6,9,9
        5,15,9,6,6
        15,15,10,5,10
        ");
    }

    #[test]
    fn test_split_line() {
        assert_eq!(split_line("a, b,c", ','), vec!["a", "b", "c"]);
        assert_eq!(split_line("DIM,10,5", ','), vec!["DIM", "10", "5"]);
        assert_eq!(split_line("", ','), vec![""]);
    }
}
