//! Voxseg command-line host.
//!
//! Decodes a WAV file, runs the speech-region detector over channel 0, and
//! emits the result as JSON — optionally with the waveform-overlay rectangles
//! (`left`/`width` in percent of total duration) a player UI draws from.
//!
//! ```text
//! voxseg --input take.wav [--output segments.json] [--overlay] [--pretty]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use voxseg_core::{AudioBuffer, DetectorConfig, Segment, SpeechDetector};

const USAGE: &str =
    "usage: voxseg --input <file.wav> [--output <segments.json>] [--overlay] [--pretty]";

#[derive(Debug)]
struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    overlay: bool,
    pretty: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(argv: I) -> Result<Args> {
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut overlay = false;
    let mut pretty = false;

    let mut it = argv.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--input" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --input\n{USAGE}");
                };
                input = Some(PathBuf::from(v));
            }
            "--output" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --output\n{USAGE}");
                };
                output = Some(PathBuf::from(v));
            }
            "--overlay" => overlay = true,
            "--pretty" => pretty = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
    }

    let Some(input) = input else {
        bail!("--input is required\n{USAGE}");
    };
    Ok(Args {
        input,
        output,
        overlay,
        pretty,
    })
}

/// JSON report printed to stdout or written to `--output`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    input: String,
    sample_rate: u32,
    channels: u16,
    duration_secs: f64,
    segments: Vec<ReportSegment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportSegment {
    start: f64,
    end: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<OverlaySpan>,
}

/// Waveform-overlay rectangle, in percent of the total duration.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlaySpan {
    left: f64,
    width: f64,
}

impl OverlaySpan {
    fn from_segment(segment: &Segment, duration_secs: f64) -> Self {
        Self {
            left: segment.start / duration_secs * 100.0,
            width: segment.duration_secs() / duration_secs * 100.0,
        }
    }
}

/// Decode a WAV file into a channel-0 `AudioBuffer`.
///
/// Float and 16/24/32-bit integer PCM are supported; integer samples are
/// normalized to [-1, 1] by their sample width.
fn read_wav(path: &Path) -> Result<(AudioBuffer, u16)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("open {}", path.display()))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("decode {}", path.display()))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .with_context(|| format!("decode {}", path.display()))?
        }
    };

    Ok((
        AudioBuffer::from_interleaved(&interleaved, spec.channels as usize, spec.sample_rate),
        spec.channels,
    ))
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    let (buffer, channels) = read_wav(&args.input)?;
    let duration_secs = buffer.duration_secs();
    info!(
        input = %args.input.display(),
        sample_rate = buffer.sample_rate,
        channels,
        duration_secs,
        "audio decoded"
    );

    let detector = SpeechDetector::new(DetectorConfig::default());
    let segments = detector
        .detect(&buffer)
        .with_context(|| format!("detect speech in {}", args.input.display()))?;

    let report = Report {
        input: args.input.display().to_string(),
        sample_rate: buffer.sample_rate,
        channels,
        duration_secs,
        segments: segments
            .iter()
            .map(|seg| ReportSegment {
                start: seg.start,
                end: seg.end,
                overlay: (args.overlay && duration_secs > 0.0)
                    .then(|| OverlaySpan::from_segment(seg, duration_secs)),
            })
            .collect(),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    if let Some(out) = args.output {
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        std::fs::write(&out, json).with_context(|| format!("write {}", out.display()))?;
        info!(output = %out.display(), segments = report.segments.len(), "report written");
    } else {
        println!("{json}");
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxseg=info".parse().unwrap()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("voxseg: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_all_flags() {
        let args = parse_args(argv(&[
            "--input", "a.wav", "--output", "out.json", "--overlay", "--pretty",
        ]))
        .unwrap();
        assert_eq!(args.input, PathBuf::from("a.wav"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(args.overlay);
        assert!(args.pretty);
    }

    #[test]
    fn input_is_required() {
        assert!(parse_args(argv(&["--overlay"])).is_err());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(parse_args(argv(&["--input", "a.wav", "--frobnicate"])).is_err());
    }

    #[test]
    fn overlay_maps_seconds_to_percentages() {
        let seg = Segment {
            start: 1.0,
            end: 2.0,
        };
        let span = OverlaySpan::from_segment(&seg, 4.0);
        assert!((span.left - 25.0).abs() < 1e-9);
        assert!((span.width - 25.0).abs() < 1e-9);
    }
}
