use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use metfor::{Celsius, HectoPascal, Quantity};
use tephigram::{
    transforms, BarbStyle, DrawingSurface, Isopleth, IsoplethKind, LineStyleKind,
    LineStyleOverride, Profile, Tephigram, TephigramConfig, Viewport, WindBarbSet,
};

mod utils;

fn camborne_profile() -> Profile {
    let snd = utils::load_test_file("camborne.csv");
    Profile::from_columns(&snd.pressure, &snd.temperature)
        .unwrap()
        .with_source_description("Camborne".to_owned())
        .with_valid_time(NaiveDate::from_ymd(2011, 6, 2).and_hms(12, 0, 0))
}

#[test]
fn test_transforms_round_trip() {
    for &(p, t) in &[(1000.0, 20.0), (850.0, 5.5), (500.0, -21.0), (200.0, -60.0)] {
        let xy = transforms::pressure_temperature_to_xy(HectoPascal(p), Celsius(t));
        let (p2, t2) = transforms::xy_to_pressure_temperature(xy);

        assert_abs_diff_eq!(p2.unpack(), p, epsilon = 1.0e-6);
        assert_abs_diff_eq!(t2.unpack(), t, epsilon = 1.0e-9);
    }
}

#[test]
fn test_plot_sounding_with_barbs() {
    let mut tpg = Tephigram::new(utils::default_surface(), TephigramConfig::new()).unwrap();
    let handle = tpg.plot_profile(
        camborne_profile(),
        &LineStyleOverride::new().with_color("red"),
    );

    let line = tpg.profile(handle).unwrap().line().unwrap();
    let recorded = tpg.surface().line(line).unwrap();
    assert_eq!(recorded.points.len(), 12);
    assert_eq!(recorded.legend.as_deref(), Some("Camborne 2011-06-02 12Z"));

    let snd = utils::load_test_file("camborne.csv");
    let barbs = WindBarbSet::from_columns(&snd.wind, &snd.pressure, BarbStyle::new()).unwrap();
    assert_eq!(barbs.len(), 8);
    tpg.barbs(handle, barbs).unwrap();

    // The view is centered on the profile so every barb is on the gutter line.
    assert_eq!(tpg.surface().visible_glyphs().count(), 8);
    assert!(tpg
        .surface()
        .glyphs()
        .iter()
        .all(|g| g.style.color.as_deref() == Some("red")));
}

#[test]
fn test_isobar_groups_at_profile_zoom() {
    let mut tpg = Tephigram::new(utils::default_surface(), TephigramConfig::new()).unwrap();
    tpg.plot_profile(camborne_profile(), &LineStyleOverride::new().with_color("red"));
    tpg.add_isobars().unwrap();

    // Centering on the profile zooms in to a little over a tenth of the initial width.
    assert!(tpg.zoom() > 0.10 && tpg.zoom() < 0.25);

    let visible: Vec<bool> = tpg
        .isobars()
        .unwrap()
        .groups()
        .iter()
        .map(|g| g.is_visible())
        .collect();
    assert_eq!(visible, vec![true, true, false, false]);

    // Every 100 hPa, plus the pinned 50 hPa line.
    let blue = tpg
        .surface()
        .visible_lines()
        .filter(|l| l.style.color == "blue")
        .count();
    assert_eq!(blue, 11);
}

#[test]
fn test_zoom_in_reveals_groups() {
    let config = TephigramConfig::new().with_anchor(vec![
        (HectoPascal(1000.0), Celsius(30.0)),
        (HectoPascal(200.0), Celsius(-60.0)),
    ]);
    let mut tpg = Tephigram::new(utils::default_surface(), config).unwrap();
    tpg.add_isobars().unwrap();
    tpg.add_wet_adiabats().unwrap();
    tpg.add_mixing_ratios().unwrap();

    let before = tpg.surface().visible_lines().count();

    let c = tpg.surface().viewport().center();
    let half = 0.01 * 700.0;
    assert!(tpg.set_viewport(Viewport::new((c.x - half, c.x + half), (c.y - half, c.y + half))));
    assert_abs_diff_eq!(tpg.zoom(), 0.02, epsilon = 1.0e-9);

    assert!(tpg
        .isobars()
        .unwrap()
        .groups()
        .iter()
        .all(|g| g.is_visible()));
    assert!(tpg.surface().visible_lines().count() > before);

    // Labels of lines crossing the view sit inside it.
    let vp = tpg.surface().viewport();
    let wet = tpg.wet_adiabats().unwrap();
    for group in wet.groups() {
        for value in group.values() {
            let iso = group.isopleth(value).unwrap();
            if iso.is_in_view(&vp) {
                let (_, label) = group.handles(value).unwrap();
                let pos = tpg.surface().label(label).unwrap().position;
                assert!(iso.xy().contains(&pos));
            }
        }
    }
}

#[test]
fn test_pick_and_highlight() {
    let mut tpg = Tephigram::new(utils::default_surface(), TephigramConfig::new()).unwrap();
    let snd = utils::load_test_file("dews.csv");
    let dews = Profile::from_columns(&snd.pressure, &snd.temperature).unwrap();
    assert_eq!(dews.xy().len(), 9);

    let a = tpg.plot_profile(camborne_profile(), &LineStyleOverride::new());
    let dashed = LineStyleOverride::new().with_linestyle(LineStyleKind::Dashed);
    let b = tpg.plot_profile(dews, &dashed);

    let picked = tpg.profile_for_line(tpg.profile(b).unwrap().line().unwrap()).unwrap();
    assert_eq!(picked, b);

    assert!(tpg.highlight(picked, None).unwrap());
    assert_eq!(tpg.highlighted(), vec![b]);
    assert!(tpg.highlight(a, None).unwrap());
    assert_eq!(tpg.highlighted(), vec![a, b]);

    let halos = tpg
        .surface()
        .visible_lines()
        .filter(|l| l.style.color == "grey" && l.style.alpha < 1.0)
        .count();
    assert_eq!(halos, 2);
}

#[test]
fn test_wet_adiabat_reaches_floor() {
    let iso = Isopleth::new(IsoplethKind::WetAdiabat {
        temperature: Celsius(20.0),
        min_temperature: Celsius(-50.0),
        max_pressure: HectoPascal(1000.0),
    });

    let temps = &iso.points().temperature;
    assert_abs_diff_eq!(temps[0].unpack(), 20.0);
    assert_abs_diff_eq!(temps[temps.len() - 1].unpack(), -50.0);
    assert!(temps.windows(2).all(|w| w[1] <= w[0]));
}
