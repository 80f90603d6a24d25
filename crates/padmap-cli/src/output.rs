//! Output formatting for CLI responses

use anyhow::{Error, Result};
use colored::*;
use padmap_compiler::{Artifact, CompileStats, Identified};
use padmap_format::DecodedRecord;
use padmap_registry::{NO_KEY, key_name, target_label};
use serde_json::json;

use crate::c_artifact::WrittenFiles;
use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error, exit_code: i32) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "chain": error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
            "exit_code": exit_code,
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
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

fn to_json(value: &serde_json::Value) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

fn bucket_sizes(artifact: &Artifact) -> Vec<serde_json::Value> {
    artifact
        .buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| {
            json!({
                "index": index,
                "idents_compressed": bucket.idents.compressed_len,
                "idents_uncompressed": bucket.idents.uncompressed_len,
                "mappings_compressed": bucket.mappings.compressed_len,
                "mappings_uncompressed": bucket.mappings.uncompressed_len,
                "action_offset": bucket.action_offset,
            })
        })
        .collect()
}

fn print_totals(stats: &CompileStats, artifact: &Artifact) {
    println!("  Titles:              {}", stats.titles);
    println!(
        "  Hash table entries:  {} of {} ({})",
        stats.hash_entries,
        stats.table_size,
        percent(stats.fill_rate)
    );
    println!(
        "  Mapping sets:        {} distinct, {} reused",
        stats.distinct_sets, stats.reused_sets
    );
    println!("  Compressed total:    {} bytes", artifact.compressed_total());
    println!("  Map table size:      {} bytes", artifact.slots.len() * 4);
    println!("  Binary blob total:   {} bytes", artifact.binary_total());
}

/// Print the result of `compile`
pub fn print_compile_summary(
    stats: &CompileStats,
    artifact: &Artifact,
    written: &WrittenFiles,
    json: bool,
) -> Result<()> {
    if json {
        let output = json!({
            "success": true,
            "header": written.header.display().to_string(),
            "source": written.source.display().to_string(),
            "compressor": artifact.compressor,
            "compressed_total": artifact.compressed_total(),
            "binary_total": artifact.binary_total(),
            "stats": stats,
            "blobs": bucket_sizes(artifact),
        });
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    println!("{}", "Compiled catalogue:".bold());
    print_totals(stats, artifact);
    println!(
        "  {} {}",
        "Wrote".green(),
        written.header.display().to_string().bold()
    );
    println!(
        "  {} {}",
        "Wrote".green(),
        written.source.display().to_string().bold()
    );
    Ok(())
}

/// Print the result of `stats`
pub fn print_stats(
    stats: &CompileStats,
    artifact: &Artifact,
    computed_warm: &[String],
    json: bool,
) -> Result<()> {
    if json {
        let output = json!({
            "success": true,
            "stats": stats,
            "blobs": bucket_sizes(artifact),
            "computed_warm_actions": computed_warm,
            "compressed_total": artifact.compressed_total(),
            "binary_total": artifact.binary_total(),
        });
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    println!("{}", "Catalogue statistics:".bold());
    print_totals(stats, artifact);

    for (bucket, blob) in stats.buckets.iter().zip(&artifact.buckets) {
        println!("\n{}", format!("Bucket [{}]:", bucket.index).bold());
        println!("    Idents:  count {}", bucket.idents);
        println!(
            "    Titles:  count {} - {} bytes",
            bucket.titles, bucket.title_bytes
        );
        println!(
            "    Maps:    count {} - {} bytes",
            bucket.mapping_sets, bucket.mapping_bytes
        );
        println!(
            "    Actions: count {} - {} bytes",
            bucket.actions, bucket.action_bytes
        );
        println!(
            "    Idents + titles: {} -> {} bytes",
            blob.idents.uncompressed_len, blob.idents.compressed_len
        );
        println!(
            "    Maps + actions:  {} -> {} bytes",
            blob.mappings.uncompressed_len, blob.mappings.compressed_len
        );
    }

    println!("\n{}", "Most frequent actions:".bold());
    for (label, count) in &stats.top_labels {
        println!("    {} {}", format!("{count:>5}").dimmed(), label);
    }

    println!("\n{}", "Warm actions in use:".bold());
    println!("    {}", quoted(&stats.warm_actions));
    println!("{}", "Computed warm actions:".bold());
    println!("    {}", quoted(computed_warm));
    Ok(())
}

fn quoted(labels: &[String]) -> String {
    if labels.is_empty() {
        return "(none)".dimmed().to_string();
    }
    labels
        .iter()
        .map(|label| format!("\"{label}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn key_list(keys: impl Iterator<Item = u8>) -> String {
    let names: Vec<String> = keys
        .filter(|&key| key != NO_KEY)
        .map(|key| key_name(key).map_or_else(|| format!("#{key}"), str::to_string))
        .collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join("+")
    }
}

/// Render a record's keys the way a catalogue binding lists them.
pub fn describe_keys(record: &DecodedRecord) -> String {
    if record.button.is_analog() {
        let negative = key_list(record.keys.iter().copied().step_by(2));
        let positive = key_list(record.keys.iter().copied().skip(1).step_by(2));
        format!("{negative} / {positive}")
    } else {
        key_list(record.keys.iter().copied())
    }
}

/// Print the result of `inspect`
pub fn print_identified(found: &Identified, bucket_count: usize, json: bool) -> Result<()> {
    let bucket = found.slot % bucket_count.max(1);
    if json {
        let records: Vec<serde_json::Value> = found
            .records
            .iter()
            .zip(&found.labels)
            .map(|(record, label)| {
                json!({
                    "input": target_label(record.button.code),
                    "code": record.button.code,
                    "keys": record.keys,
                    "action": label,
                })
            })
            .collect();
        let output = json!({
            "success": true,
            "fingerprint": found.fingerprint,
            "slot": found.slot,
            "bucket": bucket,
            "title": found.title,
            "year": found.year,
            "mapping_set": {
                "bucket": found.entry.map.bucket,
                "offset": found.entry.map.offset,
            },
            "records": records,
        });
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    println!(
        "{} ({})",
        found.title.bold(),
        found.year.to_string().dimmed()
    );
    println!(
        "  Fingerprint {:#010x} in slot {} (bucket {})",
        found.fingerprint, found.slot, bucket
    );
    println!(
        "  Mapping set at bucket {} offset {}",
        found.entry.map.bucket, found.entry.map.offset
    );
    for (record, label) in found.records.iter().zip(&found.labels) {
        let action = label.as_deref().unwrap_or("");
        println!(
            "  {} {:<10} {} {}",
            "●".green(),
            target_label(record.button.code),
            describe_keys(record),
            action.dimmed()
        );
    }
    Ok(())
}
