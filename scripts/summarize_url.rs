//! Run with: cargo run --bin summarize_url -- <video-url> [output.mp3]

use std::env;
use std::process::ExitCode;

use vidsum::config::settings::Settings;
use vidsum::services::llm::LlmClient;
use vidsum::services::transcript::fetch_transcript;
use vidsum::services::tts::TtsClient;
use vidsum::services::video_id::extract_video_id;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let mut args = env::args().skip(1);
    let Some(url) = args.next() else {
        eprintln!("usage: summarize_url <video-url> [output.mp3]");
        return ExitCode::from(2);
    };
    let audio_path = args.next();

    match run(&url, audio_path.as_deref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(url: &str, audio_path: Option<&str>) -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    let video = extract_video_id(url)
        .ok_or_else(|| anyhow::anyhow!("Could not extract video ID from {}", url))?;
    println!("Video: {}", video);

    let transcript = fetch_transcript(&settings, &video).await?;
    println!(
        "✓ Transcript: \"{}\" by {} ({} segments, {}s)",
        transcript.title,
        transcript.channel_name,
        transcript.transcript.len(),
        transcript.length_seconds
    );

    let summary = LlmClient::new(&settings)
        .summarize(&transcript.full_text())
        .await?;
    println!("\n{}\n", summary.summary);

    if let Some(path) = audio_path {
        let audio = TtsClient::new(&settings).speech(&summary.summary).await?;
        tokio::fs::write(path, &audio).await?;
        println!("✓ Audio written to {} ({} bytes)", path, audio.len());
    }

    Ok(())
}
