use std::{io::ErrorKind, path::PathBuf, process::Stdio, sync::LazyLock, time::Duration};

use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::{
    config::CheckerConfig,
    playlist::PlaylistEntry,
    probe::{ProbeMetadata, ProbeOutcome, Prober},
    util::truncate_string,
};

const MAX_REASON_LENGTH: usize = 200;

/// `[tls @ 0x55d5c8a0a0c0] `
static CONTEXT_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]@]+ @ 0x[0-9a-fA-F]+\]\s*").unwrap());

/// `error:0A000086:SSL routines::`
static OPENSSL_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"error:[0-9A-Fa-f]{8}:[^:]*:[^:]*:").unwrap());

static CERTIFICATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)certificate|verif(y|ication) failed").unwrap());

/// Checks if ffprobe is installed / available in PATH
pub async fn is_installed() -> bool {
    debug!("Checking for ffprobe installation");
    tokio::process::Command::new("ffprobe")
        .arg("-version")
        .stderr(Stdio::null())
        .stdout(Stdio::null())
        .status()
        .await
        .is_ok_and(|s| s.success())
}

/// Probes streams by running `ffprobe` once per entry.
///
/// TLS verification and the timeout are fixed when the prober is built and
/// apply to every probe it runs.
#[derive(Debug, Clone)]
pub struct Ffprobe {
    program: PathBuf,
    timeout_ms: u64,
    timeout_secs: u64,
    insecure: bool,
}

impl Ffprobe {
    #[must_use]
    pub fn new(config: &CheckerConfig) -> Self {
        Self {
            program: PathBuf::from("ffprobe"),
            timeout_ms: config.timeout_ms,
            timeout_secs: config.timeout_secs(),
            insecure: config.insecure,
        }
    }

    /// Runs `program` instead of the `ffprobe` found in PATH
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn args(&self, entry: &PlaylistEntry) -> Vec<String> {
        let mut args: Vec<String> = [
            "-v",
            "error",
            "-hide_banner",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ]
        .map(String::from)
        .into();

        args.push("-rw_timeout".into());
        args.push(self.timeout_secs.saturating_mul(1_000_000).to_string());

        let url = entry.url.as_str();
        // ffprobe rejects options that the input protocol does not consume
        if url.starts_with("http://") || url.starts_with("https://") {
            if let Some(user_agent) = &entry.http.user_agent {
                args.push("-user_agent".into());
                args.push(user_agent.clone());
            }
            if let Some(referrer) = &entry.http.referrer {
                args.push("-referer".into());
                args.push(referrer.clone());
            }
        }
        if url.starts_with("https://") {
            args.push("-tls_verify".into());
            args.push(if self.insecure { "0" } else { "1" }.into());
        }

        args.push(entry.url.clone());
        args
    }
}

impl Prober for Ffprobe {
    #[instrument(skip_all, fields(url = %entry.url))]
    async fn probe(&self, entry: &PlaylistEntry) -> ProbeOutcome {
        let child = match tokio::process::Command::new(&self.program)
            .args(self.args(entry))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return ProbeOutcome::offline(
                    self.timeout_ms,
                    format!("`{}` is not installed or available in PATH!", self.program.display()),
                );
            }
            Err(e) => {
                return ProbeOutcome::offline(self.timeout_ms, format!("Unable to run ffprobe: {e}"));
            }
        };

        let timeout = Duration::from_secs(self.timeout_secs);
        let out = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => {
                return ProbeOutcome::offline(self.timeout_ms, format!("Unable to run ffprobe: {e}"));
            }
            Err(_) => {
                return ProbeOutcome::offline(
                    self.timeout_ms,
                    format!("Connection timeout after {}s", self.timeout_secs),
                );
            }
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            debug!("ffprobe stderr: {stderr}");
            return ProbeOutcome::offline(self.timeout_ms, parse_message(&stderr, &entry.url));
        }

        let metadata = serde_json::from_slice::<ProbeMetadata>(&out.stdout).unwrap_or_else(|e| {
            warn!("Unable to parse ffprobe output: {e}");
            ProbeMetadata::default()
        });

        ProbeOutcome::online(self.timeout_ms, metadata)
    }
}

/// Turns ffprobe's stderr into a short reason fit for a playlist comment.
///
/// Certificate problems win over everything else, then the `<url>: <error>`
/// summary line ffprobe prints last, then whatever the last line is.
#[must_use]
pub fn parse_message(stderr: &str, url: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let line = lines
        .iter()
        .find(|l| CERTIFICATE_REGEX.is_match(l))
        .or_else(|| lines.iter().rev().find(|l| l.starts_with(url)))
        .or_else(|| lines.last());

    let message = line
        .map(|l| clean_line(l, url))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Unknown error".to_string());

    truncate_string(&message, MAX_REASON_LENGTH)
}

fn clean_line(line: &str, url: &str) -> String {
    let line = line
        .strip_prefix(url)
        .map_or(line, |rest| rest.trim_start_matches(':'));
    let line = CONTEXT_TAG_REGEX.replace_all(line, "");
    let line = OPENSSL_CODE_REGEX.replace_all(&line, "");
    line.trim().to_string()
}
