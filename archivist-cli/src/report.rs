use colored::Colorize;
use pipeline::{CounterSnapshot, IdentifierOutcome};

/// Prints one line per identifier as it completes, colored green/red per
/// `IdentifierOutcome`'s success flag (spec.md §7: "each identifier
/// produces one line in the summary indicating success/failure").
pub fn print_outcome(outcome: &IdentifierOutcome) {
    let line = outcome.summary_line();
    if outcome.is_success() {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
    }
}

/// Prints the final aggregate-counters block (spec.md §7: "a final block
/// reports aggregate counters").
pub fn print_summary(counters: &CounterSnapshot) {
    println!();
    println!("{}", "Summary".bold());
    println!("  identifiers:   {} total", counters.identifiers_total);
    println!(
        "  {} {}  {} {}",
        "succeeded:".green(),
        counters.identifiers_succeeded,
        "failed:".red(),
        counters.identifiers_failed
    );
    println!("  sidecars written:   {}", counters.sidecars_written);
    println!(
        "  images downloaded:  {} ({})",
        counters.images_downloaded,
        format_bytes(counters.bytes_downloaded)
    );
    println!(
        "  relocations:        {} completed, {} rolled back",
        counters.organize_completed, counters.organize_rolled_back
    );
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = UNITS[0];
    for candidate in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = candidate;
    }
    format!("{value:.1} {unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_byte_counts_with_unit_scaling() {
        assert_eq!(format_bytes(512), "512.0 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
