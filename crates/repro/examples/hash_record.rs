use std::error::Error;
use std::{env, fs, process};

fn main() -> Result<(), Box<dyn Error>> {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: hash_record <record.json>");
        process::exit(2);
    };
    let record: repro::Record = serde_json::from_str(&fs::read_to_string(&path)?)?;
    let hash = repro::hash_record(&record)?;
    let last_front = record.shifts.last().map_or(0, |s| s.front_row);
    println!(
        "{hash}  {} shifts over {} frames (front row {last_front})",
        record.shifts.len(),
        record.meta.frames
    );
    Ok(())
}
