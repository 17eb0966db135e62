use anyhow::{anyhow, bail, Result};
use diorama_engine::curve::{ClosedSpline, CurveConvoy};
use diorama_engine::scene::StageManifest;
use glam::Vec3;
use std::env;
use std::process;

fn main() {
    match run() {
        Ok(errors) => {
            if errors > 0 {
                process::exit(2);
            }
        }
        Err(err) => {
            eprintln!("manifest_check error: {err:?}");
            process::exit(1);
        }
    }
}

struct CliOptions {
    write_default: Option<String>,
    show_help: bool,
    targets: Vec<String>,
}

fn run() -> Result<usize> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_cli_args(&args)?;
    if options.show_help {
        print_usage();
        return Ok(0);
    }

    if let Some(path) = &options.write_default {
        StageManifest::demo().save(path)?;
        println!("wrote default stage manifest to {path}");
        return Ok(0);
    }

    if options.targets.is_empty() {
        return Err(anyhow!("no manifest paths provided"));
    }

    let mut errors = 0usize;
    for target in &options.targets {
        match check_manifest(target) {
            Ok(summary) => println!("OK {target} - {summary}"),
            Err(err) => {
                errors += 1;
                println!("[ERROR] {target} - {err:#}");
            }
        }
    }
    println!("Checked {} manifests ({} errors)", options.targets.len(), errors);
    Ok(errors)
}

fn check_manifest(path: &str) -> Result<String> {
    let manifest = StageManifest::load(path)?;

    if manifest.swarm.count == 0 {
        bail!("swarm count must be at least 1");
    }
    for book in &manifest.flipbooks {
        if book.frames.count == 0 {
            bail!("flip-book '{}' has no frames", book.name);
        }
        if !book.rate.is_finite() || book.rate <= 0.0 {
            bail!("flip-book '{}' frame rate must be positive", book.name);
        }
    }

    let points: Vec<Vec3> = manifest.convoy.control_points.iter().map(|p| Vec3::from(*p)).collect();
    let spline = ClosedSpline::new(points)?;
    CurveConvoy::new(spline, manifest.convoy.loop_duration, manifest.convoy.spin_step)?;

    Ok(format!(
        "{} flip-books, {} clip models, {} swarm instances, {} control points",
        manifest.flipbooks.len(),
        manifest.clip_models.len(),
        manifest.swarm.count,
        manifest.convoy.control_points.len()
    ))
}

fn print_usage() {
    eprintln!(
        "Stage Manifest Check

Usage:
  manifest_check [--write-default <path>] <manifest.json> [<manifest.json>...]

Validates stage manifests: construction-time invariants (spline control
points, loop duration, flip-book rates) are checked without loading assets.
Use --write-default to emit the built-in demo stage as a starting point.
"
    );
}

fn parse_cli_args(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions { write_default: None, show_help: false, targets: Vec::new() };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--write-default" => {
                let path = iter.next().ok_or_else(|| anyhow!("expected a path after '--write-default'"))?;
                options.write_default = Some(path.clone());
            }
            "--help" | "-h" => options.show_help = true,
            _ if arg.starts_with("--") => {
                return Err(anyhow!("unknown flag '{arg}'"));
            }
            _ => options.targets.push(arg.clone()),
        }
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_handles_write_default() {
        let args = vec!["--write-default".to_string(), "stage.json".to_string()];
        let opts = parse_cli_args(&args).expect("parse args");
        assert_eq!(opts.write_default.as_deref(), Some("stage.json"));
        assert!(opts.targets.is_empty());
    }

    #[test]
    fn parse_args_errors_on_unknown_flag() {
        let args = vec!["--unknown".to_string()];
        assert!(parse_cli_args(&args).is_err());
    }
}
