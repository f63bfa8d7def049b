use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use clap::Parser;
use gauge::{Canvas, Gauge, GaugeCommand, GaugeConfig, GaugeError, GaugeWindow, Label, Scene};

/// Render an analog gauge and point it at values read line by line from stdin.
#[derive(Parser, Debug)]
#[command(name = "gauge", version)]
struct Args {
    /// TOML gauge configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick value, repeatable; replaces the configured list
    #[arg(long = "value", value_name = "LABEL")]
    values: Vec<String>,

    #[arg(long, default_value_t = 300)]
    width: u32,

    #[arg(long, default_value_t = 300)]
    height: u32,

    /// TrueType/OpenType font for tick labels
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, default_value = "Gauge")]
    title: String,

    /// Print the recorded draw commands instead of opening a window
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<(), GaugeError> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GaugeConfig::load(path)?,
        None => GaugeConfig::default(),
    };
    if !args.values.is_empty() {
        config.values = args.values.iter().map(|v| parse_label(v)).collect();
    }

    if args.dry_run {
        return dry_run(&args, config);
    }

    let mut canvas = Canvas::new(args.width, args.height);
    match &args.font {
        Some(path) => canvas = canvas.with_font_data(fs_err::read(path)?)?,
        None => log::warn!("no --font given, tick labels will not be drawn"),
    }

    let values = config.values.clone();
    let gauge = Gauge::new(canvas, config)?;

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let command = GaugeCommand::SetValue(resolve_label(&values, &line));
            if sender.send(command).is_err() {
                break;
            }
        }
    });

    GaugeWindow::new(args.title, gauge).show_with_commands(receiver)
}

fn dry_run(args: &Args, config: GaugeConfig) -> Result<(), GaugeError> {
    let values = config.values.clone();
    let mut gauge = Gauge::new(Scene::new(args.width, args.height), config)?;
    for line in io::stdin().lock().lines() {
        gauge.set_value(resolve_label(&values, &line?));
    }
    for command in gauge.surface().commands() {
        println!("{command:?}");
    }
    Ok(())
}

/// Numbers become numeric labels, anything else stays text.
fn parse_label(input: &str) -> Label {
    match input.trim().parse::<f64>() {
        Ok(n) => Label::Number(n),
        Err(_) => Label::from(input.trim()),
    }
}

/// Picks the configured label shown as `input`; unknown input stays text.
fn resolve_label(values: &[Label], input: &str) -> Label {
    let input = input.trim();
    values
        .iter()
        .find(|v| v.to_string() == input)
        .cloned()
        .unwrap_or_else(|| Label::from(input))
}
