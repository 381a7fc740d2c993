use std::path::PathBuf;

use clap::{Parser, ValueEnum};

const DEFAULT_TICKS: u32 = 600;

fn parse_u32(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).map_err(|err| err.to_string())
    } else {
        trimmed.parse::<u32>().map_err(|err| err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Play,
    Record,
    Replay,
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "retrowave",
    version,
    about = "Endless scrolling terrain strip",
    disable_help_subcommand = true
)]
pub struct CliOptions {
    #[arg(long, value_enum, default_value_t = Mode::Play)]
    mode: Mode,
    /// Strip configuration (TOML). Defaults to assets/strip.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Record output or replay input.
    #[arg(long)]
    pub io: Option<PathBuf>,
    #[arg(long = "fixed-dt")]
    pub fixed_dt: Option<f64>,
    #[arg(long)]
    pub headless: bool,
    /// Frames to simulate when running headless.
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    pub ticks: u32,
    #[arg(long = "debug-logs")]
    pub debug_logs: bool,
    /// Freeze the camera and regenerate the strip whenever the config file changes.
    #[arg(long)]
    pub tune: bool,
    #[arg(long, value_parser = parse_u32)]
    seed: Option<u32>,
}

impl CliOptions {
    const DEFAULT_FIXED_DT: f64 = 1.0 / 60.0;

    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn effective_fixed_dt(&self) -> f64 {
        self.fixed_dt.unwrap_or(Self::DEFAULT_FIXED_DT)
    }

    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    /// True when no window should be opened.
    pub fn runs_headless(&self) -> bool {
        self.headless || self.mode != Mode::Play
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_accept_hex_and_decimal() {
        assert_eq!(parse_u32("0x2A"), Ok(42));
        assert_eq!(parse_u32(" 42 "), Ok(42));
        assert!(parse_u32("0x1_0000_0000").is_err());
    }

    #[test]
    fn record_mode_is_headless() {
        let opts = CliOptions::try_parse_from(["retrowave", "--mode", "record", "--io", "r.json"])
            .expect("parse");
        assert_eq!(opts.mode(), Mode::Record);
        assert!(opts.runs_headless());
        assert_eq!(opts.ticks, DEFAULT_TICKS);
    }

    #[test]
    fn replay_mode_takes_fixed_dt_override() {
        let opts = CliOptions::try_parse_from([
            "retrowave",
            "--mode",
            "replay",
            "--io",
            "r.json",
            "--fixed-dt",
            "0.25",
        ])
        .expect("parse");
        assert_eq!(opts.mode(), Mode::Replay);
        assert!(opts.runs_headless());
        assert_eq!(opts.effective_fixed_dt(), 0.25);
        assert_eq!(opts.io.as_deref(), Some(std::path::Path::new("r.json")));
    }

    #[test]
    fn play_mode_defaults() {
        let opts = CliOptions::try_parse_from(["retrowave", "--seed", "0xff"]).expect("parse");
        assert!(!opts.runs_headless());
        assert_eq!(opts.seed(), Some(255));
        assert_eq!(opts.effective_fixed_dt(), 1.0 / 60.0);
    }
}
