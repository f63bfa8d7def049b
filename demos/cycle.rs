use gauge::{labels, Canvas, Gauge, GaugeCommand, GaugeConfig, GaugeWindow, Label};
use rand::Rng;
use std::f64::consts::PI;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let values = labels([0, 20, 40, 60, 80, 100, 120]);
    let config = GaugeConfig::builder()
        .values(values.clone())
        .init_value(Label::Number(60.0))
        .delta_angle(3.0 / 2.0 * PI)
        .init_angle(3.0 / 4.0 * PI)
        .title_reverse(true)
        .build();

    let mut canvas = Canvas::new(320, 320);
    if let Some(path) = std::env::args().nth(1) {
        canvas = canvas.with_font_data(fs_err::read(path)?)?;
    }
    let gauge = Gauge::new(canvas, config)?;

    let (sender, receiver) = mpsc::channel();

    // Jump to a random value every half second
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let value = values[rng.random_range(0..values.len())].clone();
            if sender.send(GaugeCommand::SetValue(value)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(500));
        }
    });

    println!("Displaying a gauge that jumps between random values");
    println!("Pass a .ttf/.otf path as the first argument to draw tick labels");
    GaugeWindow::new("Gauge demo", gauge).show_with_commands(receiver)?;
    Ok(())
}
