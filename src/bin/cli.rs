//! CLI application for facial proportion features.
//!
//! Usage:
//!   face-ratios <landmarks.json>...              # Human-readable output
//!   face-ratios <landmarks.json>... --json       # JSON output
//!   face-ratios faces/*.json --csv -o out.csv    # One CSV row per usable face
//!   face-ratios people/*/*.json --csv --label-from-dir  # Leading label column

use clap::Parser;
use face_ratios::{
    AnalyzerConfig, ConstructedPoints, FaceAnalyzer, FeatureVector, LandmarkSet, Outcome,
    FEATURE_KEYS,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "face-ratios")]
#[command(author, version, about = "Facial proportion features from face-mesh landmarks", long_about = None)]
struct Args {
    /// Landmark JSON files: an array of [x, y] pairs, or {"landmarks": [...]}
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output as JSON
    #[arg(short, long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV, skipping inputs without features
    #[arg(long)]
    csv: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Label each face with its parent directory name (CSV gains a leading label column)
    #[arg(long)]
    label_from_dir: bool,

    /// Analyzer config (JSON); unset fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum Status {
    Ok,
    NoFaceGeometry,
    Error,
}

/// Output record for one input file
#[derive(Serialize)]
struct FaceOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    file: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    features: FeatureVector,
    #[serde(skip_serializing_if = "Option::is_none")]
    constructed_points: Option<ConstructedPoints>,
}

#[derive(Serialize)]
struct Output {
    inputs: usize,
    with_features: usize,
    faces: Vec<FaceOutput>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "face_ratios=debug" } else { "face_ratios=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            debug!("Loading config from {:?}", path);
            AnalyzerConfig::load(path)?
        }
        None => AnalyzerConfig::default(),
    };
    let analyzer = FaceAnalyzer::with_config(config);

    info!("Analysing {} landmark file(s)", args.inputs.len());

    // Each analysis is independent; order is restored by collect().
    let faces: Vec<FaceOutput> = args
        .inputs
        .par_iter()
        .map(|path| {
            let mut face = analyze_file(&analyzer, path);
            if args.label_from_dir {
                face.label = dir_label(path);
            }
            face
        })
        .collect();

    let with_features = faces.iter().filter(|f| f.status == Status::Ok).count();
    info!("Extracted features from {}/{} input(s)", with_features, faces.len());

    let output = Output {
        inputs: faces.len(),
        with_features,
        faces,
    };

    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else if args.csv {
        format_csv(&output, args.label_from_dir)
    } else {
        format_human_readable(&output)
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        info!("Output written to {:?}", path);
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn analyze_file(analyzer: &FaceAnalyzer, path: &Path) -> FaceOutput {
    let file = path.display().to_string();
    let result = LandmarkSet::load(path).and_then(|landmarks| analyzer.analyze(&landmarks));

    match result {
        Ok(Outcome::Features(analysis)) => FaceOutput {
            label: None,
            file,
            status: Status::Ok,
            error: None,
            features: analysis.features,
            constructed_points: Some(analysis.constructed_points),
        },
        Ok(outcome) => {
            warn!("{}: no usable face geometry, skipping", file);
            FaceOutput {
                label: None,
                file,
                status: Status::NoFaceGeometry,
                error: None,
                features: outcome.feature_vector(),
                constructed_points: None,
            }
        }
        Err(e) => {
            warn!("{}: {}, skipping", file, e);
            FaceOutput {
                label: None,
                file,
                status: Status::Error,
                error: Some(e.to_string()),
                features: FeatureVector::new(),
                constructed_points: None,
            }
        }
    }
}

/// Name of the directory holding `path`, e.g. `alice` for `people/alice/01.json`.
fn dir_label(path: &Path) -> Option<String> {
    path.parent()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn format_csv(output: &Output, labelled: bool) -> String {
    let mut s = String::new();
    if labelled {
        s.push_str("label,");
    }
    s.push_str("file");
    for key in FEATURE_KEYS {
        s.push(',');
        s.push_str(key);
    }
    s.push('\n');

    for face in output.faces.iter().filter(|f| f.status == Status::Ok) {
        if labelled {
            s.push_str(&csv_field(face.label.as_deref().unwrap_or("")));
            s.push(',');
        }
        s.push_str(&csv_field(&face.file));
        for key in FEATURE_KEYS {
            s.push(',');
            if let Some(v) = face.features.get(key) {
                s.push_str(&v.to_string());
            }
        }
        s.push('\n');
    }

    s
}

/// Quote a CSV field if it contains a separator, quote or newline.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    s.push_str(&format!(
        "Inputs: {} ({} with features)\n",
        output.inputs, output.with_features
    ));

    for face in &output.faces {
        match &face.label {
            Some(label) => s.push_str(&format!("\n--- {} ({}) ---\n", face.file, label)),
            None => s.push_str(&format!("\n--- {} ---\n", face.file)),
        }
        match face.status {
            Status::Ok => {}
            Status::NoFaceGeometry => {
                s.push_str("No usable face geometry.\n");
                continue;
            }
            Status::Error => {
                s.push_str(&format!(
                    "Error: {}\n",
                    face.error.as_deref().unwrap_or("unknown")
                ));
                continue;
            }
        }

        s.push_str("\nFace:\n");
        for key in &FEATURE_KEYS[..10] {
            if let Some(v) = face.features.get(key) {
                s.push_str(&format!("  {:<20} {:.3}\n", key, v));
            }
        }

        s.push_str("\nEyes:\n");
        for key in &FEATURE_KEYS[10..] {
            if let Some(v) = face.features.get(key) {
                s.push_str(&format!("  {:<20} {:.3}\n", key, v));
            }
        }

        if let Some(points) = &face.constructed_points {
            s.push_str("\nConstructed points:\n");
            s.push_str(&format!(
                "  vertex               ({:.4}, {:.4})\n",
                points.vertex.x, points.vertex.y
            ));
            s.push_str(&format!(
                "  brow_mid             ({:.4}, {:.4})\n",
                points.brow_mid.x, points.brow_mid.y
            ));
        }
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file: &str, status: Status, features: FeatureVector) -> FaceOutput {
        FaceOutput {
            label: None,
            file: file.to_string(),
            status,
            error: None,
            features,
            constructed_points: None,
        }
    }

    #[test]
    fn csv_skips_faces_without_features() {
        let features: FeatureVector = FEATURE_KEYS.iter().map(|k| (*k, 0.5)).collect();
        let output = Output {
            inputs: 2,
            with_features: 1,
            faces: vec![
                record("a.json", Status::Ok, features),
                record("b.json", Status::NoFaceGeometry, FeatureVector::new()),
            ],
        };

        let csv = format_csv(&output, false);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("file,face_lw_ratio,"));
        assert!(lines[0].ends_with(",eye_symmetry"));
        assert!(lines[1].starts_with("a.json,0.5,"));
        assert_eq!(lines[1].split(',').count(), 14);
    }

    #[test]
    fn csv_label_column_comes_first() {
        let features: FeatureVector = FEATURE_KEYS.iter().map(|k| (*k, 0.25)).collect();
        let mut labelled = record("people/alice/01.json", Status::Ok, features.clone());
        labelled.label = dir_label(Path::new("people/alice/01.json"));
        let output = Output {
            inputs: 2,
            with_features: 2,
            faces: vec![labelled, record("02.json", Status::Ok, features)],
        };

        let csv = format_csv(&output, true);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("label,file,face_lw_ratio,"));
        assert!(lines[1].starts_with("alice,people/alice/01.json,0.25,"));
        assert!(lines[2].starts_with(",02.json,0.25,"));
        assert_eq!(lines[1].split(',').count(), 15);
    }

    #[test]
    fn label_is_the_parent_directory() {
        assert_eq!(dir_label(Path::new("faces/bob/x.json")).as_deref(), Some("bob"));
        assert_eq!(dir_label(Path::new("x.json")), None);
    }

    #[test]
    fn csv_quotes_awkward_names() {
        assert_eq!(csv_field("plain.json"), "plain.json");
        assert_eq!(csv_field("a,b.json"), "\"a,b.json\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
