use metfor::{Celsius, HectoPascal, Knots, WindSpdDir};
use optional::Optioned;
use std::{fs::File, io::Read, path::PathBuf, str::FromStr};
use tephigram::{RecordingSurface, Viewport};

/// Columns loaded from a test data file, missing values are none.
pub struct TestSounding {
    pub pressure: Vec<Optioned<HectoPascal>>,
    pub temperature: Vec<Optioned<Celsius>>,
    pub wind: Vec<Optioned<WindSpdDir<Knots>>>,
}

pub fn load_test_file(fname: &str) -> TestSounding {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    load_test_csv(&test_path)
}

fn load_test_csv(location: &PathBuf) -> TestSounding {
    let mut f = File::open(location).expect(&format!("Error opening file: {:#?}", location));

    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .expect(&format!("Error reading file: {:#?}", location));

    let mut pressure = vec![];
    let mut temperature = vec![];
    let mut wind = vec![];

    // Skip the header.
    for line in contents.lines().skip(1) {
        let tokens: Vec<&str> = line.split(',').collect();
        if tokens.len() < 4 {
            continue;
        }

        let wspd = f64::from_str(tokens[2]).ok();
        let wdir = f64::from_str(tokens[3]).ok();
        let wind_val: Option<WindSpdDir<Knots>> = wspd.and_then(|wspd| {
            wdir.map(|wdir| WindSpdDir {
                speed: Knots(wspd),
                direction: wdir,
            })
        });

        pressure.push(f64::from_str(tokens[0]).ok().map(HectoPascal).into());
        temperature.push(f64::from_str(tokens[1]).ok().map(Celsius).into());
        wind.push(wind_val.into());
    }

    TestSounding {
        pressure,
        temperature,
        wind,
    }
}

/// A recording surface at the default zoom, the anchor or first profile moves it.
#[allow(dead_code)]
pub fn default_surface() -> RecordingSurface {
    RecordingSurface::new(Viewport::new((0.0, 700.0), (0.0, 700.0)))
}
