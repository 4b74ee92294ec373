//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use hidstick_calibration::AxisRange;
use hidstick_hid_joystick_protocol::{
    CapabilityConfig, Descriptor, FieldKind, ReportLayout,
};
use hidstick_settings::Settings;
use serde::Serialize;
use serde_json::json;

use crate::commands::emulate::EmulationReport;

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

/// Upper-case, space-separated hex.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    print_json(&json!({
        "success": false,
        "error": {
            "message": error.to_string(),
        }
    }));
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn field_label(kind: FieldKind) -> String {
    match kind {
        FieldKind::Buttons => "buttons".to_string(),
        FieldKind::HatSwitches => "hat switches".to_string(),
        FieldKind::Axis(axis) => format!("axis {}", axis.name()),
        FieldKind::Simulation(control) => format!("simulation {}", control.name()),
    }
}

fn capability_summary(config: &CapabilityConfig) -> String {
    let axes: Vec<_> = config.axes().axes().map(|a| a.name()).collect();
    let simulation: Vec<_> = config.simulation().controls().map(|c| c.name()).collect();
    format!(
        "{:?}, {} buttons, {} hats, axes [{}], simulation [{}]",
        config.device_type(),
        config.button_count(),
        config.hat_switch_count(),
        axes.join(", "),
        simulation.join(", ")
    )
}

/// Print a synthesised report descriptor
pub fn print_descriptor(config: &CapabilityConfig, descriptor: &Descriptor, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "report_id": config.report_id(),
            "capabilities": config,
            "length": descriptor.len(),
            "hex": descriptor.to_hex(),
            "bytes": descriptor.as_bytes(),
        }));
    } else {
        println!(
            "{} {} bytes, report id {}",
            "Descriptor:".bold(),
            descriptor.len(),
            config.report_id()
        );
        println!("  {}", capability_summary(config).dimmed());
        println!("{}", descriptor.to_hex());
    }
}

/// Print the input report layout
pub fn print_layout(config: &CapabilityConfig, layout: &ReportLayout, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "report_id": config.report_id(),
            "report_size": layout.report_size(),
            "fields": layout.fields(),
        }));
    } else {
        println!(
            "{} {} bytes, report id {}",
            "Input report:".bold(),
            layout.report_size(),
            config.report_id()
        );
        println!("  {:>6}  {:>3}  field", "offset", "len");
        for field in layout.fields() {
            println!(
                "  {:>6}  {:>3}  {}",
                field.offset,
                field.len,
                field_label(field.kind)
            );
        }
    }
}

/// Print a single normalised value
pub fn print_normalized(range: &AxisRange, value: i16, normalized: i16, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "value": value,
            "range": range,
            "inverted": range.is_inverted(),
            "normalized": normalized,
        }));
    } else {
        let suffix = if range.is_inverted() { " (inverted)" } else { "" };
        println!("{value} in {range}{suffix} -> {}", normalized.to_string().bold());
    }
}

fn format_range(range: &AxisRange) -> String {
    let mut text = range.to_string();
    if range.is_inverted() {
        text.push_str(" (inverted)");
    }
    text
}

/// Print stored settings
pub fn print_settings(settings: &Settings, stored_valid: bool, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "stored_valid": stored_valid,
            "settings": settings,
        }));
    } else {
        let source = if stored_valid {
            "stored record".green()
        } else {
            "defaults (no valid record)".yellow()
        };
        println!("{} {}", "Settings:".bold(), source);
        println!("  Identity: {}", settings.identity);
        println!("  Version: {}", settings.version);
        println!("  X range: {}", format_range(&settings.x_range));
        println!("  Y range: {}", format_range(&settings.y_range));
        println!("  Auto recoil: {}", settings.auto_recoil);
        println!("  Trigger repeat rate: {}", settings.trigger_repeat_rate);
        println!("  Trigger hold time: {}", settings.trigger_hold_time);
    }
}

/// Print a short confirmation
pub fn print_success<T: Serialize>(message: &str, data: &T, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "message": message,
            "data": data,
        }));
    } else {
        println!("{} {}", "✓".green(), message);
    }
}

/// Print the transcript of an emulated session
pub fn print_emulation(report: &EmulationReport, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "descriptor_len": report.descriptor_len,
            "report_size": report.report_size,
            "reports": report.reports,
            "commands": report.commands,
            "fired": report.fired,
            "state": report.state,
        }));
        return;
    }

    println!(
        "{} descriptor {} bytes, input report {} bytes",
        "Emulated device:".bold(),
        report.descriptor_len,
        report.report_size
    );
    for sent in &report.reports {
        println!("  [{:>3}] {:<8} {}", sent.report_id, sent.kind, sent.hex);
    }
    if !report.commands.is_empty() {
        println!("  Commands: {}", report.commands.join(", "));
    }
    println!("  Actuator fired: {}", report.fired);
}
