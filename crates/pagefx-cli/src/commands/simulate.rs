use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use pagefx_core::scene::ScriptStep;
use pagefx_core::{AppConfig, ManualScheduler, PageOutcome, Scene, TokioScheduler};

use crate::session::{Session, SessionReport};

pub async fn run(config: &AppConfig, scene_path: &Path, json: bool, realtime: bool) -> Result<()> {
    let scene = Scene::load(scene_path)
        .with_context(|| format!("Failed to load scene {}", scene_path.display()))?;

    info!(
        "Replaying {} steps from {} ({} clock)",
        scene.script.len(),
        scene_path.display(),
        if realtime { "wall" } else { "virtual" }
    );

    let report = if realtime {
        replay_realtime(config, &scene).await
    } else {
        replay_virtual(config, &scene)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Replay on a virtual clock; waits complete instantly
fn replay_virtual(config: &AppConfig, scene: &Scene) -> SessionReport {
    let mut session = Session::new(config, scene, ManualScheduler::new());

    for step in &scene.script {
        let outcomes: Vec<PageOutcome> = match step {
            ScriptStep::WaitMs(ms) => {
                let ticks = session
                    .scheduler_mut()
                    .map(|s| s.advance(Duration::from_millis(*ms)))
                    .unwrap_or_default();
                ticks.into_iter().map(|handle| session.tick(handle)).collect()
            }
            _ => session.apply(step),
        };
        session.record(step.clone(), outcomes);
    }

    session.finish()
}

/// Replay on tokio timers; waits take real time while ticks are delivered
async fn replay_realtime(config: &AppConfig, scene: &Scene) -> SessionReport {
    let (scheduler, mut ticks) = TokioScheduler::new();
    let mut session = Session::new(config, scene, scheduler);

    for step in &scene.script {
        let outcomes: Vec<PageOutcome> = match step {
            ScriptStep::WaitMs(ms) => {
                let deadline = tokio::time::Instant::now() + Duration::from_millis(*ms);
                let mut handles = Vec::new();
                loop {
                    tokio::select! {
                        biased;
                        Some(handle) = ticks.recv() => handles.push(handle),
                        _ = tokio::time::sleep_until(deadline) => break,
                    }
                }

                // Timer tasks due at the deadline may not have sent yet
                tokio::task::yield_now().await;
                while let Ok(handle) = ticks.try_recv() {
                    handles.push(handle);
                }

                handles
                    .into_iter()
                    .map(|handle| session.tick(handle))
                    .filter(|outcome| *outcome != PageOutcome::Ignored)
                    .collect()
            }
            _ => session.apply(step),
        };
        session.record(step.clone(), outcomes);
    }

    session.finish()
}

fn print_report(report: &SessionReport) {
    if let Some(color) = &report.initial_color {
        println!("Initial background: {}", color);
    }
    println!();

    for (i, step) in report.steps.iter().enumerate() {
        let outcomes: Vec<String> = step
            .outcomes
            .iter()
            .filter(|o| **o != PageOutcome::Ignored)
            .map(describe)
            .collect();
        let summary = if outcomes.is_empty() {
            "no change".to_string()
        } else {
            outcomes.join(", ")
        };
        println!("  {:>3}. {:<24} {}", i + 1, format!("{:?}", step.step), summary);
    }

    println!();
    println!(
        "Background updates: {} body, {} header",
        report.body_updates, report.header_updates
    );
    if let Some(color) = &report.final_color {
        println!("Final background: {}", color);
    }
    if report.revealed.is_empty() {
        println!("Revealed: (none)");
    } else {
        println!("Revealed: {}", report.revealed.join(", "));
    }
    match (report.slide, &report.carousel) {
        (Some(slide), Some(view)) => println!(
            "Carousel: slide {} of {} (offset {}%)",
            slide + 1,
            view.markers().len(),
            view.offset_percent()
        ),
        _ => println!("Carousel: (none)"),
    }
}

fn describe(outcome: &PageOutcome) -> String {
    match outcome {
        PageOutcome::Scrolled { color, revealed: 0 } => format!("background {}", color),
        PageOutcome::Scrolled { color, revealed } => {
            format!("background {}, revealed {}", color, revealed)
        }
        PageOutcome::Revealed(count) => format!("revealed {}", count),
        PageOutcome::SlideChanged(index) => format!("slide {}", index + 1),
        PageOutcome::Ignored => "ignored".to_string(),
    }
}
