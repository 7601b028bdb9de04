use itertools::{izip, Itertools};
use metfor::Quantity;

/// Interpolate values given two parallel slices of data and a target value.
///
/// Assumes that `xs` is monotonic, either increasing or decreasing. Returns `None` if the target
/// is not bracketed by the data, there is no extrapolation.
pub fn linear_interpolate<X, Y>(xs: &[X], ys: &[Y], target_x: X) -> Option<Y>
where
    X: Quantity + PartialOrd + Copy,
    Y: Quantity + Copy,
{
    debug_assert_eq!(xs.len(), ys.len());

    enum BracketType<X, Y> {
        Bracket((X, Y), (X, Y)),
        EndEqual((X, Y)),
    }

    let tgt = target_x.unpack();

    let make_bracket = |pnt_0: (X, Y), pnt_1: (X, Y)| -> Option<BracketType<X, Y>> {
        let x0 = pnt_0.0.unpack();
        let x1 = pnt_1.0.unpack();

        if (x0 < tgt && x1 > tgt) || (x0 > tgt && x1 < tgt) {
            Some(BracketType::Bracket(pnt_0, pnt_1))
        } else if (x0 - tgt).abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_0))
        } else if (x1 - tgt).abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_1))
        } else {
            None
        }
    };

    izip!(xs, ys)
        .map(|(x, y)| (*x, *y))
        // Look at them in pairs.
        .tuple_windows::<(_, _)>()
        // Make a bracket and filter out all pairs that don't bracket the target.
        .filter_map(|(pnt_0, pnt_1)| make_bracket(pnt_0, pnt_1))
        // Get the first one that brackets the target value
        .next()
        // Map from the bracket type to the interpolated value
        .map(|val| match val {
            BracketType::Bracket((x0, y0), (x1, y1)) => linear_interp(target_x, x0, x1, y0, y1),
            BracketType::EndEqual(pnt) => pnt.1,
        })
}

#[inline]
pub(crate) fn linear_interp<X, Y>(x_val: X, x1: X, x2: X, y1: Y, y2: Y) -> Y
where
    X: Quantity + Copy,
    Y: Quantity + Copy,
{
    debug_assert!((x2.unpack() - x1.unpack()).abs() > 0.0);

    let run = x2.unpack() - x1.unpack();
    let rise = y2.unpack() - y1.unpack();
    let dx = x_val.unpack() - x1.unpack();

    Y::pack(y1.unpack() + dx * (rise / run))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;
    use metfor::{Celsius, HectoPascal};

    #[test]
    fn test_linear_interpolate_decreasing_x() {
        let ps = [HectoPascal(1000.0), HectoPascal(900.0), HectoPascal(800.0)];
        let ts = [Celsius(20.0), Celsius(10.0), Celsius(4.0)];

        let t = linear_interpolate(&ps, &ts, HectoPascal(950.0)).unwrap();
        assert!(approx_equal(t.unpack(), 15.0, 1.0e-12));

        let t = linear_interpolate(&ps, &ts, HectoPascal(850.0)).unwrap();
        assert!(approx_equal(t.unpack(), 7.0, 1.0e-12));

        let t = linear_interpolate(&ps, &ts, HectoPascal(800.0)).unwrap();
        assert!(approx_equal(t.unpack(), 4.0, 1.0e-12));
    }

    #[test]
    fn test_linear_interpolate_increasing_x() {
        let ps = [HectoPascal(300.0), HectoPascal(500.0)];
        let ts = [Celsius(-40.0), Celsius(-20.0)];

        let t = linear_interpolate(&ps, &ts, HectoPascal(400.0)).unwrap();
        assert!(approx_equal(t.unpack(), -30.0, 1.0e-12));
    }

    #[test]
    fn test_no_extrapolation() {
        let ps = [HectoPascal(1000.0), HectoPascal(900.0)];
        let ts = [Celsius(20.0), Celsius(10.0)];

        assert!(linear_interpolate(&ps, &ts, HectoPascal(1010.0)).is_none());
        assert!(linear_interpolate(&ps, &ts, HectoPascal(500.0)).is_none());
        assert!(linear_interpolate::<HectoPascal, Celsius>(&[], &[], HectoPascal(500.0)).is_none());
    }
}
