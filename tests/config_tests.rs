// Loading gauge configuration files.

use std::f64::consts::PI;

use gauge::{Color, GaugeConfig, GaugeError, Label};

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("gauge-{}-{name}", std::process::id()));
    fs_err::write(&path, contents).unwrap();
    path
}

#[test]
fn load_reads_and_normalizes_a_file() {
    let path = write_temp(
        "speed.toml",
        r#"
        values = ["Low", "Mid", "High"]
        init_value = "Turbo"
        delta_angle = 3.0
        hand_color = "black"
        "#,
    );
    let config = GaugeConfig::load(&path).unwrap();
    fs_err::remove_file(&path).unwrap();

    assert_eq!(config.init_value, Some(Label::from("Low")));
    assert_eq!(config.delta_angle, 3.0);
    assert_eq!(config.hand_color, Color::BLACK);
    assert_eq!(config.init_angle, 5.0 / 6.0 * PI);
}

#[test]
fn load_reports_missing_files() {
    let err = GaugeConfig::load("/definitely/not/here/gauge.toml").unwrap_err();
    assert!(matches!(err, GaugeError::Io(_)));
}

#[test]
fn load_reports_bad_toml() {
    let path = write_temp("broken.toml", "values = [");
    let err = GaugeConfig::load(&path).unwrap_err();
    fs_err::remove_file(&path).unwrap();
    assert!(matches!(err, GaugeError::Config(_)));
}
