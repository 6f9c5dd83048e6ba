//! Build script for picobench-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates board.toml and passes its values to the binaries

use std::env;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use picobench_core::board::Board;
use picobench_core::config::{BAUD_RATE_RANGE, FLASH_SPI_HZ_RANGE};

fn main() {
    setup_linker();
    validate_config();
}

/// Put memory.x on the linker search path and pick the link scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("memory.x"), include_bytes!("memory.x"))
        .expect("write memory.x to OUT_DIR");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate board.toml and export it as `PICOBENCH_*` variables
fn validate_config() {
    println!("cargo:rerun-if-changed=board.toml");

    let path = Path::new("board.toml");
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        fail(
            "board.toml could not be read",
            &[
                e.to_string(),
                "Create it next to Cargo.toml in picobench-firmware.".to_string(),
            ],
        )
    });
    let config: toml::Value = toml::from_str(&text).unwrap_or_else(|e| {
        let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
        fail("board.toml is not valid TOML", &lines)
    });

    let mut errors = Vec::new();
    let board = validate_board(&config, &mut errors);
    let baud_rate = validate_number(&config, "console", "baud_rate", &BAUD_RATE_RANGE, &mut errors);
    let spi_hz = validate_number(
        &config,
        "flash",
        "spi_frequency_hz",
        &FLASH_SPI_HZ_RANGE,
        &mut errors,
    );
    if !errors.is_empty() {
        let bullets: Vec<String> = errors.iter().map(|e| format!("• {}", e)).collect();
        fail("board.toml has invalid values", &bullets);
    }

    // Absent optional values are exported empty and defaulted at startup
    let export = |name: &str, value: Option<u32>| {
        let value = value.map(|v| v.to_string()).unwrap_or_default();
        println!("cargo:rustc-env={}={}", name, value);
    };
    println!("cargo:rustc-env=PICOBENCH_BOARD={}", board);
    export("PICOBENCH_BAUD_RATE", baud_rate);
    export("PICOBENCH_FLASH_SPI_HZ", spi_hz);

    println!("cargo:warning=board.toml ok (board: {})", board);
}

const BOX_WIDTH: usize = 66;

/// Abort the build with `title` and `lines` framed in a box
fn fail(title: &str, lines: &[String]) -> ! {
    let rule = "═".repeat(BOX_WIDTH);
    let row = |text: &str| {
        let text = if text.chars().count() > BOX_WIDTH - 2 {
            let cut: String = text.chars().take(BOX_WIDTH - 5).collect();
            format!("{}...", cut)
        } else {
            text.to_string()
        };
        format!("║  {:<width$}║", text, width = BOX_WIDTH - 2)
    };

    let mut out = vec![format!("╔{}╗", rule), row(&format!("ERROR: {}", title))];
    if !lines.is_empty() {
        out.push(format!("╠{}╣", rule));
        out.extend(lines.iter().map(|l| row(l)));
    }
    out.push(format!("╚{}╝", rule));
    panic!("\n{}\n", out.join("\n"));
}

/// `[board] name` must name a known board
fn validate_board(config: &toml::Value, errors: &mut Vec<String>) -> String {
    let name = match config.get("board").and_then(|b| b.get("name")) {
        Some(toml::Value::String(name)) => name.clone(),
        Some(_) => {
            errors.push("[board] name must be a string".to_string());
            return String::new();
        }
        None => {
            errors.push("Missing [board] name".to_string());
            return String::new();
        }
    };

    if Board::from_name(&name).is_none() {
        let known: Vec<&str> = Board::ALL.iter().map(|b| b.name()).collect();
        errors.push(format!(
            "[board] unknown name '{}' (known: {})",
            name,
            known.join(", ")
        ));
    }
    name
}

/// Optional integer `[section] key` inside `range`
fn validate_number(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: &RangeInclusive<u32>,
    errors: &mut Vec<String>,
) -> Option<u32> {
    let value = config.get(section).and_then(|s| s.get(key))?;
    let problem = match value.as_integer() {
        Some(v) => match u32::try_from(v) {
            Ok(v) if range.contains(&v) => return Some(v),
            _ => format!("must be {}-{}", range.start(), range.end()),
        },
        None => "must be an integer".to_string(),
    };
    errors.push(format!("[{}] {} {}", section, key, problem));
    None
}
