//! Offline story pre-rendering
//!
//! Walks the curated catalog, generates each story through the configured
//! provider chain, synthesizes it, and writes `<out>/<lang>/<series>/<id>.mp3`
//! plus a `.txt` transcript. Individual failures are logged and skipped so a
//! flaky provider doesn't abort a whole batch.
//!
//! Usage: `generate-stories [language] [output_dir]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use plushpal_config::{load_settings, Settings};
use plushpal_core::Language;
use plushpal_llm::{create_chain, GenerationBackend};
use plushpal_speech::{HttpTextToSpeech, TextToSpeech};
use plushpal_tools::{story_prompt, STORY_SERIES};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let language = args
        .next()
        .as_deref()
        .map(|code| Language::from_code(code).context("unknown language code"))
        .transpose()?
        .unwrap_or(Language::Swedish);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "stories".to_string()));

    let settings = load_settings(std::env::var("PLUSHPAL_ENV").ok().as_deref())
        .unwrap_or_else(|_| Settings::default());

    let generator: Arc<dyn GenerationBackend> = Arc::new(create_chain(&settings.llm)?);
    let tts = HttpTextToSpeech::new(&settings.tts)?;

    let total: usize = STORY_SERIES.iter().map(|s| s.stories.len()).sum();
    tracing::info!(
        language = %language,
        series = STORY_SERIES.len(),
        stories = total,
        "starting story generation"
    );

    let mut rendered = 0usize;
    for series in STORY_SERIES {
        for story in series.stories {
            let Some(prompt) = story_prompt(series.id, story.id, language) else {
                continue;
            };

            tracing::info!(series = series.id, story = story.id, "generating story");
            let text = match generator.generate_story(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(story = story.id, error = %e, "story generation failed, skipping");
                    continue;
                }
            };

            let audio = match tts.synthesize_buffered(&text, language).await {
                Ok(audio) => audio,
                Err(e) => {
                    tracing::error!(story = story.id, error = %e, "synthesis failed, skipping");
                    continue;
                }
            };

            let dir = out_dir.join(language.as_code()).join(series.id);
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;

            tokio::fs::write(dir.join(format!("{}.mp3", story.id)), &audio).await?;
            tokio::fs::write(dir.join(format!("{}.txt", story.id)), &text).await?;

            tracing::info!(
                story = story.id,
                chars = text.len(),
                audio_kb = audio.len() / 1024,
                "story rendered"
            );
            rendered += 1;
        }
    }

    tracing::info!(rendered, total, "story generation finished");
    Ok(())
}
