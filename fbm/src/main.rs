use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use fbm::config::FbmConfig;
use fbm::io::cli::Cli;
use fbm::io::output::FbmOutput;
use fbm::{EPOCH, io, pipeline};
use flood_rs::io::enrich::format_breaks;
use flood_rs::io::export::{export_merge_result, to_feature_collection};
use flood_rs::io::report::read_report;
use flood_rs::io::svg::merge_to_svg::merge_result_to_svg;
use log::{info, warn};

fn main() -> Result<()> {
    LazyLock::force(&EPOCH);
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match &args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            FbmConfig::default()
        }
        Some(config_file) => io::read_config(config_file)?,
    };

    info!("[MAIN] Successfully parsed FbmConfig: {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid input file name: {}", args.input_file.display()))?;

    fs::create_dir_all(&args.output_folder).with_context(|| {
        format!(
            "could not create output folder: {}",
            args.output_folder.display()
        )
    })?;

    let features = io::read_feature_collection(&args.input_file)?;
    let report = args.report_file.as_deref().map(read_report).transpose()?;

    let run = pipeline::run(features, report.as_ref(), &config, !args.no_merge)?;

    if report.is_some() {
        let enriched_path = args
            .output_folder
            .join(format!("{input_stem}_enriched.geojson"));
        io::write_json(&run.features, Path::new(&enriched_path))?;
    }

    let ext_result = export_merge_result(&run.result, &run.imported.feature_indices);

    {
        let geojson_path = args.output_folder.join(format!("flood_{input_stem}.geojson"));
        io::write_json(&to_feature_collection(&ext_result), Path::new(&geojson_path))?;
    }

    {
        let output = FbmOutput {
            input_file: args.input_file.display().to_string(),
            report_file: args.report_file.as_ref().map(|p| p.display().to_string()),
            config,
            n_skipped: run.imported.n_skipped,
            enrich_stats: run.enrich_stats,
            flood_classes: run.flood_breaks.as_deref().map(format_breaks),
            run_time_ms: EPOCH.elapsed().as_millis() as u64,
            result: ext_result,
        };
        let output_path = args.output_folder.join(format!("flood_{input_stem}.json"));
        io::write_json(&output, Path::new(&output_path))?;
    }

    {
        let svg_path = args.output_folder.join(format!("flood_{input_stem}.svg"));
        let svg = merge_result_to_svg(
            &run.result,
            &run.imported.circles,
            &run.imported.depths,
            config.svg_draw_options,
            input_stem,
        );
        io::write_svg(&svg, Path::new(&svg_path))?;
    }

    Ok(())
}
