use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::cli::{SearchArgs, VoiceArgs};

/// Captures one utterance from an external speech-to-text command and
/// searches with it. The capture program stands in for the browser
/// speech API the original page leaned on.
pub async fn run(args: VoiceArgs, data_dir: &Path) -> anyhow::Result<()> {
    let transcript = capture(&args.command, &args.command_args)?;
    println!("Heard: {transcript}");

    let search_args = SearchArgs {
        query: vec![transcript],
        order_by: args.order_by,
        filter: args.filter,
        base_url: args.base_url,
    };
    crate::search::run(search_args, data_dir).await
}

/// Runs the capture program and takes the first line of its stdout as
/// the transcript. An unlaunchable or failing program is a
/// user-visible error, not a silent no-op.
pub fn capture(program: &str, args: &[String]) -> anyhow::Result<String> {
    tracing::info!(command = program, "capturing voice query");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .with_context(|| format!("voice capture is not available (failed to run {program})"))?;

    if !output.status.success() {
        anyhow::bail!("voice capture failed: {program} ({})", output.status);
    }

    let stdout = String::from_utf8(output.stdout).context("voice transcript is not valid UTF-8")?;
    let transcript = stdout.lines().next().unwrap_or("").trim().to_owned();
    if transcript.is_empty() {
        anyhow::bail!("voice capture produced no transcript");
    }

    Ok(transcript)
}
