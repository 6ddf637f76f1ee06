use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use scene_kit::{find_colliding_configuration, Scene, SceneCollisionChecker};
use scene_kit_apps::{
    utils::{get_scene_kit_config, init_tracing, resolve_scene_kit_config},
    SceneKitConfig,
};
use schemars::schema_for;
use tracing::info;

/// Build collision scenes and list the pairs to check.
#[derive(Parser, Debug)]
#[clap(name = env!("CARGO_BIN_NAME"))]
struct Args {
    /// Path to the setting file.
    #[clap(short, long, value_parser, global = true)]
    config_path: Option<PathBuf>,
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand {
    /// Build the scene and print the names of every collision pair.
    Pairs,
    /// Draw random configurations until a pair collides.
    FindCollision {
        /// Maximum number of random configurations.
        #[clap(long, default_value = "100")]
        trials: usize,
        /// Seed of the configuration sampler.
        #[clap(long, default_value = "0")]
        seed: u64,
    },
    /// Generate JSON schema of the setting file.
    Schema,
    /// Prints the default setting as TOML.
    ShowDefaultConfig,
}

fn print_pairs(scene: &Scene) -> Result<()> {
    for pair in &scene.collision_pairs {
        let (a, b) = scene.pair_names(pair)?;
        println!("{a} {b}");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    info!("ParsedArgs {args:?}");

    match args.subcommand {
        Subcommand::Schema => {
            let schema = schema_for!(SceneKitConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Subcommand::ShowDefaultConfig => {
            print!("{}", toml::to_string(&SceneKitConfig::default())?);
        }
        Subcommand::Pairs => {
            let config_path = get_scene_kit_config(args.config_path);
            let config = resolve_scene_kit_config(config_path.as_deref())?;
            let scene = config.scene.build()?;
            info!(
                "{} geometries, {} pairs",
                scene.geometries.len(),
                scene.collision_pairs.len()
            );
            print_pairs(&scene)?;
        }
        Subcommand::FindCollision { trials, seed } => {
            let config_path = get_scene_kit_config(args.config_path);
            let config = resolve_scene_kit_config(config_path.as_deref())?;
            let scene = config.scene.build()?;
            match find_colliding_configuration(
                &scene,
                config.collision_checker_config,
                seed,
                trials,
            )? {
                Some((configuration, pairs)) => {
                    for (body, pose) in scene.bodies.iter().zip(&configuration) {
                        println!("{}: {pose}", body.name);
                    }
                    for pair in &pairs {
                        let (a, b) = scene.pair_names(pair)?;
                        println!("collision: {a} {b}");
                    }
                    let checker =
                        SceneCollisionChecker::new(&scene, config.collision_checker_config);
                    if let Some(contact) = checker.contact(&configuration, &pairs[0])? {
                        let (p1, p2, n) = (contact.world1, contact.world2, contact.normal);
                        println!("contact point 1: [{:.4}, {:.4}, {:.4}]", p1.x, p1.y, p1.z);
                        println!("contact point 2: [{:.4}, {:.4}, {:.4}]", p2.x, p2.y, p2.z);
                        println!("normal: [{:.4}, {:.4}, {:.4}]", n.x, n.y, n.z);
                        println!("depth: {:.4}", contact.depth);
                    }
                }
                None => println!("no collision found in {trials} trials"),
            }
        }
    }
    Ok(())
}
