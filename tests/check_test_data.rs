mod utils;

#[test]
fn test_load_camborne() {
    let snd = utils::load_test_file("camborne.csv");

    assert_eq!(snd.pressure.len(), 12);
    assert_eq!(snd.temperature.len(), 12);
    assert_eq!(snd.wind.len(), 12);

    assert!(snd.pressure.iter().all(|p| p.is_some()));
    assert!(snd.temperature.iter().all(|t| t.is_some()));
    assert_eq!(snd.wind.iter().filter(|w| w.is_some()).count(), 8);
}

#[test]
fn test_load_dews() {
    let snd = utils::load_test_file("dews.csv");

    assert_eq!(snd.pressure.len(), 10);
    assert_eq!(snd.temperature.iter().filter(|t| t.is_none()).count(), 1);
    assert!(snd.wind.iter().all(|w| w.is_none()));
}
