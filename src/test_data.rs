//! Data used in tests.
use metfor::{Celsius, HectoPascal, Knots};

const CAMBORNE: [(f64, f64); 12] = [
    (1006.0, 26.4),
    (1000.0, 24.0),
    (950.0, 20.8),
    (925.0, 19.2),
    (850.0, 14.4),
    (800.0, 10.6),
    (700.0, 2.4),
    (600.0, -6.1),
    (500.0, -16.9),
    (400.0, -29.7),
    (300.0, -45.1),
    (250.0, -53.9),
];

const CAMBORNE_WINDS: [(f64, f64, f64); 8] = [
    (0.0, 0.0, 1006.0),
    (2.0, 135.0, 1000.0),
    (8.0, 160.0, 950.0),
    (15.0, 200.0, 850.0),
    (23.0, 230.0, 700.0),
    (38.0, 250.0, 500.0),
    (55.0, 260.0, 400.0),
    (72.0, 265.0, 300.0),
];

/// A summer afternoon sounding, pressure and temperature pairs.
pub(crate) fn camborne() -> Vec<(HectoPascal, Celsius)> {
    CAMBORNE
        .iter()
        .map(|&(p, t)| (HectoPascal(p), Celsius(t)))
        .collect()
}

/// Winds to go with [`camborne`], speed, direction and pressure triples.
pub(crate) fn camborne_winds() -> Vec<(Knots, f64, HectoPascal)> {
    CAMBORNE_WINDS
        .iter()
        .map(|&(s, d, p)| (Knots(s), d, HectoPascal(p)))
        .collect()
}
