//! Blend request command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use anim_pose::{BlendState, BlendWeightResolver};

use crate::commands::{open_cache, read_json};
use crate::utils::{add_table_row, create_table, format_weight};

#[derive(Subcommand)]
pub enum BlendCommands {
    /// Resolve a blend request into normalized per-bone weights
    Resolve {
        /// Asset directory
        dir: PathBuf,

        /// Blend request JSON file
        blend_file: PathBuf,
    },
}

pub fn execute(cmd: BlendCommands) -> Result<()> {
    match cmd {
        BlendCommands::Resolve { dir, blend_file } => handle_resolve(dir, blend_file),
    }
}

fn handle_resolve(dir: PathBuf, blend_file: PathBuf) -> Result<()> {
    println!("Resolving blend request: {}", blend_file.display());
    let state: BlendState = read_json(&blend_file)?;
    let cache = open_cache(&dir)?;

    let resolved = BlendWeightResolver::new(&cache)
        .resolve(&state)
        .context("Failed to resolve blend request")?;

    // Bone names come from the skeleton of the first mask
    let first = &state.clips[0];
    let mask = cache.mask(&first.mask_file_path)?;
    let skeleton = cache.skeleton(&mask.skeleton_file_path)?;

    println!("\n=== Blend Information ===");
    println!("Skeleton: {}", mask.skeleton_file_path);
    println!("Clips: {}", resolved.clip_count());
    println!("Bones: {}", resolved.bone_count);

    let mut clips = create_table(&["#", "Clip", "Mask", "Phase", "Weight"]);
    for (i, clip) in state.clips.iter().enumerate() {
        add_table_row(
            &mut clips,
            vec![
                i.to_string(),
                clip.clip_file_path.clone(),
                clip.mask_file_path.clone(),
                format_weight(clip.phase),
                format_weight(clip.weight),
            ],
        );
    }
    println!();
    clips.printstd();

    let mut headers = vec!["Bone".to_string(), "Name".to_string()];
    headers.extend((0..resolved.clip_count()).map(|i| format!("#{i}")));
    headers.push("Sum".to_string());

    let mut weights = create_table(&headers);
    for bone in 0..resolved.bone_count {
        let name = skeleton
            .bones
            .get(bone)
            .map_or("?", |raw| raw.name.as_str());

        let mut row = vec![bone.to_string(), name.to_string()];
        row.extend(
            resolved
                .clips
                .iter()
                .map(|clip| format_weight(clip.weight(bone))),
        );
        row.push(format_weight(resolved.weight_sum(bone)));
        add_table_row(&mut weights, row);
    }
    println!("\n=== Per-bone Weights ===");
    weights.printstd();

    if resolved.uncovered_bones.is_empty() {
        println!("\n✓ Every bone is covered");
    } else {
        let names: Vec<String> = resolved
            .uncovered_bones
            .iter()
            .map(|&bone| {
                skeleton
                    .bones
                    .get(bone)
                    .map_or_else(|| bone.to_string(), |raw| raw.name.clone())
            })
            .collect();
        println!(
            "\n⚠ {} bone(s) not covered by any clip, kept at bind pose: {}",
            names.len(),
            names.join(", ")
        );
    }

    Ok(())
}
