/// Evenly spaced samples over `[start, stop]`, both ends included.
///
/// With `num == 1` the only sample is `start`.
pub fn linspace(start: f64, stop: f64, num: usize) -> impl Iterator<Item = f64> {
    let step = if num > 1 {
        (stop - start) / (num - 1) as f64
    } else {
        0.0
    };

    (0..num).map(move |i| {
        // Pin the last value so it is exactly `stop`.
        if num > 1 && i == num - 1 {
            stop
        } else {
            start + step * i as f64
        }
    })
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_linspace() {
        let vals: Vec<f64> = linspace(0.0, 1.0, 5).collect();
        assert_eq!(vals, vec![0.0, 0.25, 0.5, 0.75, 1.0]);

        let vals: Vec<f64> = linspace(1000.0, 50.0, 3).collect();
        assert_eq!(vals, vec![1000.0, 525.0, 50.0]);

        assert_eq!(linspace(3.0, 4.0, 1).collect::<Vec<_>>(), vec![3.0]);
        assert_eq!(linspace(3.0, 4.0, 0).count(), 0);
    }
}
