//! Startup data loading.
//!
//! The property feed and the catchment documents are read and parsed on the
//! async compute pool so the first frames are not blocked on disk; ordinary
//! systems poll the tasks and publish the results. A failed property load is
//! fatal to the property list only; the map stays up with no markers.

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool, Task};
use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::data::catchment::{parse_catchment_doc, CatchmentDoc, CatchmentTier};
use crate::data::property::{parse_property_feed, Property, PropertyCatalog};
use crate::demo;

#[derive(Component)]
pub struct PropertyLoadTask(Task<anyhow::Result<Vec<Property>>>);

#[derive(Component)]
pub struct CatchmentLoadTask {
    tier: CatchmentTier,
    task: Task<anyhow::Result<CatchmentDoc>>,
}

/// Fired when a catchment document finishes loading; the overlay module
/// turns it into scene entities.
#[derive(Event)]
pub struct CatchmentDocReady {
    pub tier: CatchmentTier,
    pub doc: CatchmentDoc,
}

/// Kicks off the property and catchment loads, or builds the synthetic demo
/// dataset when `--demo` is given.
pub fn begin_data_loads(
    mut commands: Commands,
    args: Res<CliArgs>,
    mut catchment_events: EventWriter<CatchmentDocReady>,
) {
    if args.demo {
        let (catalog, primary, secondary) = demo::demo_dataset();
        info!(
            "demo mode: {} synthetic properties, {} + {} catchments",
            catalog.properties.len(),
            primary.features.len(),
            secondary.features.len()
        );
        commands.insert_resource(catalog);
        catchment_events.write(CatchmentDocReady {
            tier: CatchmentTier::Primary,
            doc: primary,
        });
        catchment_events.write(CatchmentDocReady {
            tier: CatchmentTier::Secondary,
            doc: secondary,
        });
        return;
    }

    let pool = AsyncComputeTaskPool::get();

    let feed_path = args.properties_path();
    info!("loading property feed from {}", feed_path.display());
    let task = pool.spawn(async move { load_properties(feed_path) });
    commands.spawn(PropertyLoadTask(task));

    for (tier, path) in [
        (CatchmentTier::Primary, args.primary_catchments_path()),
        (CatchmentTier::Secondary, args.secondary_catchments_path()),
    ] {
        let task = pool.spawn(async move { load_catchments(path) });
        commands.spawn(CatchmentLoadTask { tier, task });
    }
}

fn load_properties(path: PathBuf) -> anyhow::Result<Vec<Property>> {
    let text = std::fs::read_to_string(&path)?;
    parse_property_feed(&text)
}

fn load_catchments(path: PathBuf) -> anyhow::Result<CatchmentDoc> {
    let text = std::fs::read_to_string(&path)?;
    parse_catchment_doc(&text)
}

pub fn poll_property_load(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut PropertyLoadTask)>,
) {
    for (entity, mut load) in &mut tasks {
        let Some(result) = block_on(future::poll_once(&mut load.0)) else {
            continue;
        };
        match result {
            Ok(properties) => {
                info!("loaded {} properties", properties.len());
                commands.insert_resource(PropertyCatalog::new(properties));
            }
            Err(err) => {
                error!("property feed load failed: {err:#}");
                error!("continuing with an empty property list");
            }
        }
        commands.entity(entity).despawn();
    }
}

pub fn poll_catchment_loads(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut CatchmentLoadTask)>,
    mut events: EventWriter<CatchmentDocReady>,
) {
    for (entity, mut load) in &mut tasks {
        let Some(result) = block_on(future::poll_once(&mut load.task)) else {
            continue;
        };
        match result {
            Ok(doc) => {
                info!(
                    "loaded {} {} catchment features",
                    doc.features.len(),
                    load.tier.display()
                );
                events.write(CatchmentDocReady {
                    tier: load.tier,
                    doc,
                });
            }
            Err(err) => {
                warn!(
                    "no {} catchment overlay: {err:#}",
                    load.tier.display()
                );
            }
        }
        commands.entity(entity).despawn();
    }
}
