//! Skeleton definition command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anim_pose::{RuntimeSkeleton, SkeletonDefinition};

use crate::commands::open_cache;
use crate::utils::{TreeOptions, add_table_row, create_table, render_tree, skeleton_tree};

#[derive(Subcommand)]
pub enum SkeletonCommands {
    /// Display bone count and hierarchy, and validate the topology
    Info {
        /// Asset directory
        dir: PathBuf,

        /// Skeleton path relative to the asset directory
        skeleton: String,

        /// Show the bind pose of every bone
        #[arg(short, long)]
        detailed: bool,
    },

    /// Display the bone hierarchy as a tree
    Tree {
        /// Asset directory
        dir: PathBuf,

        /// Skeleton path relative to the asset directory
        skeleton: String,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Show bind positions next to each bone
        #[arg(short, long)]
        metadata: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

pub fn execute(cmd: SkeletonCommands) -> Result<()> {
    match cmd {
        SkeletonCommands::Info {
            dir,
            skeleton,
            detailed,
        } => handle_info(dir, &skeleton, detailed),
        SkeletonCommands::Tree {
            dir,
            skeleton,
            depth,
            metadata,
            no_color,
        } => handle_tree(dir, &skeleton, depth, metadata, no_color),
    }
}

fn load_definition(dir: &Path, skeleton: &str) -> Result<Arc<SkeletonDefinition>> {
    let cache = open_cache(dir)?;
    cache
        .skeleton(skeleton)
        .with_context(|| format!("Failed to load skeleton {skeleton}"))
}

fn handle_info(dir: PathBuf, skeleton: &str, detailed: bool) -> Result<()> {
    println!("Loading skeleton: {skeleton}");
    let definition = load_definition(&dir, skeleton)?;

    let roots = definition
        .bones
        .iter()
        .filter(|bone| bone.parent_index.is_none())
        .count();

    println!("\n=== Skeleton Information ===");
    println!("Bones: {}", definition.bone_count());
    println!("Roots: {roots}");
    println!("Flat: {}", definition.is_flat);
    println!("Topological order: {}", definition.in_topological_order);

    let mut headers = vec!["Index", "Name", "Parent", "Children"];
    if detailed {
        headers.extend(["Position", "Rotation", "Scale"]);
    }
    let mut table = create_table(&headers);
    for (index, bone) in definition.bones.iter().enumerate() {
        let children = definition
            .bones
            .iter()
            .filter(|other| other.parent_index == Some(index))
            .count();
        let parent = bone
            .parent_index
            .map_or_else(|| "-".to_string(), |p| p.to_string());

        let mut row = vec![
            index.to_string(),
            bone.name.clone(),
            parent,
            children.to_string(),
        ];
        if detailed {
            let pose = &bone.bind_pose;
            row.push(format!("{:.3?}", pose.position.to_array()));
            row.push(format!("{:.3?}", pose.rotation.to_array()));
            row.push(format!("{:.3?}", pose.scale.to_array()));
        }
        add_table_row(&mut table, row);
    }
    println!();
    table.printstd();

    println!("\n=== Hierarchy ===");
    let options = TreeOptions {
        no_color: true,
        ..TreeOptions::default()
    };
    print!("{}", render_tree(&skeleton_tree(skeleton, &definition), &options));

    println!("\n=== Validation ===");
    match RuntimeSkeleton::build_skeleton(&definition) {
        Ok(runtime) => {
            println!("✓ Topology valid ({} bones)", runtime.bone_count());
            Ok(())
        }
        Err(e) => {
            println!("❌ Topology invalid: {e}");
            Err(e).with_context(|| format!("Skeleton {skeleton} failed validation"))
        }
    }
}

fn handle_tree(
    dir: PathBuf,
    skeleton: &str,
    depth: Option<usize>,
    metadata: bool,
    no_color: bool,
) -> Result<()> {
    let definition = load_definition(&dir, skeleton)?;
    if let Err(e) = definition.validate() {
        log::warn!("Skeleton {skeleton} is not valid: {e}");
    }

    let options = TreeOptions {
        max_depth: depth,
        no_color,
        show_metadata: metadata,
    };
    print!("{}", render_tree(&skeleton_tree(skeleton, &definition), &options));

    Ok(())
}
