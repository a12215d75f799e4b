//! Locomotion simulation over a scripted signal sequence

use anyhow::{Context, Result};
use clap::Args;
use glam::Mat4;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use anim_pose::{
    AnimationResult, CharacterAnimator, LocomotionConfig, LocomotionSignals, SignalValue,
};

use crate::commands::{open_cache, read_json};
use crate::utils::{add_table_row, create_table};

#[derive(Args)]
pub struct SimulateArgs {
    /// Asset directory
    pub dir: PathBuf,

    /// Character manifest JSON file
    pub character: PathBuf,

    /// Signal script JSON file
    pub signals: PathBuf,

    /// Default seconds per tick for steps without their own `dt`
    #[arg(long, default_value_t = 1.0 / 30.0)]
    pub dt: f32,

    /// Print skinning matrices after every tick
    #[arg(short, long)]
    pub matrices: bool,
}

/// Skeleton and locomotion setup of one character
#[derive(Debug, Deserialize)]
pub struct CharacterManifest {
    /// Skeleton path relative to the asset directory
    pub skeleton: String,
    pub locomotion: LocomotionConfig,
}

/// One entry of a signal script
///
/// Every key other than `dt` and `repeat` is read as a named signal.
#[derive(Debug, Deserialize)]
pub struct SignalStep {
    pub dt: Option<f32>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    #[serde(flatten)]
    pub signals: HashMap<String, SignalValue>,
}

const fn default_repeat() -> u32 {
    1
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let manifest: CharacterManifest = read_json(&args.character)?;
    let script: Vec<SignalStep> = read_json(&args.signals)?;
    check_dt(args.dt).context("Invalid --dt")?;

    let cache = open_cache(&args.dir)?;
    let mut animator =
        CharacterAnimator::from_cache(&cache, &manifest.skeleton, manifest.locomotion)
            .with_context(|| {
                format!("Failed to set up character {}", args.character.display())
            })?;

    println!("Simulating {} with {}", manifest.skeleton, args.signals.display());

    let mut table = create_table(&["Tick", "Time", "State", "Changed", "Phase"]);
    let mut matrices = Vec::new();
    let mut time = 0.0_f32;
    let mut tick_index = 0_usize;

    for (step_index, step) in script.iter().enumerate() {
        let dt = step.dt.unwrap_or(args.dt);
        check_dt(dt).with_context(|| format!("Invalid dt in step {step_index}"))?;
        let signals = LocomotionSignals::from_map(&step.signals);
        log::debug!("Step {step_index}: {signals:?} x{}", step.repeat);

        for _ in 0..step.repeat {
            let tick = animator
                .tick(&cache, dt, &signals)
                .with_context(|| format!("Tick {tick_index} failed"))?;
            time += dt;

            add_table_row(
                &mut table,
                vec![
                    tick_index.to_string(),
                    format!("{time:.3}"),
                    tick.state.to_string(),
                    if tick.state_changed { "yes" } else { "" }.to_string(),
                    format!("{:.3}", tick.phase),
                ],
            );
            if args.matrices {
                matrices.push((tick_index, tick.result));
            }
            tick_index += 1;
        }
    }

    println!();
    table.printstd();

    for (tick, result) in &matrices {
        println!("\n=== Skinning Matrices (tick {tick}) ===");
        print!("{}", format_result(result));
    }

    println!(
        "\nFinal state: {} after {tick_index} tick(s), {time:.3}s",
        animator.state()
    );

    Ok(())
}

fn check_dt(dt: f32) -> Result<()> {
    if !dt.is_finite() || dt < 0.0 {
        anyhow::bail!("tick length must be a finite, non-negative number of seconds, got {dt}");
    }
    Ok(())
}

/// Format every matrix of a result as four rows
fn format_result(result: &AnimationResult) -> String {
    let mut output = String::new();
    for node in &result.nodes {
        output.push_str(&format!("node {}:\n", node.index));
        output.push_str(&format_matrix(&node.transform));
    }
    output
}

fn format_matrix(matrix: &Mat4) -> String {
    // Rows of the matrix, so translation ends up in the last column
    let rows = matrix.transpose().to_cols_array_2d();
    rows.iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>9.4}")).collect();
            format!("  [{}]\n", cells.join(" "))
        })
        .collect()
}
