//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `letterhouse_core` linkage.
//! - Print the countdown for a timezone and the slot grid of a template.
//!
//! Usage: `letterhouse_cli [timezone] [template]`

use chrono::Utc;
use letterhouse_core::{resolve_slot_rect, time_remaining, SLOTS_PER_PAGE};
use std::process::ExitCode;

const DEFAULT_TIMEZONE: &str = "UTC";
const DEFAULT_TEMPLATE: &str = "house1";

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let timezone = args.next().unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
    let template = args.next().unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

    println!("letterhouse_core ping={}", letterhouse_core::ping());
    println!("letterhouse_core version={}", letterhouse_core::core_version());

    match time_remaining(&timezone, Utc::now()) {
        Ok(remaining) if remaining.has_passed => {
            println!("countdown tz={timezone} status=christmas");
        }
        Ok(remaining) => println!(
            "countdown tz={timezone} target={} remaining={}d {:02}:{:02}:{:02}",
            remaining.target_year,
            remaining.days,
            remaining.hours,
            remaining.minutes,
            remaining.seconds
        ),
        Err(err) => {
            eprintln!("countdown tz={timezone} error={err}");
            return ExitCode::FAILURE;
        }
    }

    for position in 1..=SLOTS_PER_PAGE as u32 {
        match resolve_slot_rect(&template, position) {
            Ok(rect) => println!(
                "slot template={template} position={position} left={} top={} width={} height={}",
                rect.left, rect.top, rect.width, rect.height
            ),
            Err(err) => {
                eprintln!("slot template={template} position={position} error={err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
