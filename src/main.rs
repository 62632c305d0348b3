use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::{interval, Duration, MissedTickBehavior};

use raycar::config::{DriveSegment, SimConfig};
use raycar::debug_builders::DebugOverlay;
use raycar::gauge::Speedometer;
use raycar::spawn::scatter_props;
use raycar::state::VehicleSnapshot;
use raycar::{CarController, ControlInput, PhysicsWorld, SimResult};

/// Scripted driver: which input applies at `tick`. Holds the last segment
/// once the plan runs out.
fn planned_input(plan: &[DriveSegment], tick: u64) -> ControlInput {
    let mut start = 0;
    for seg in plan {
        if tick < start + seg.ticks {
            return ControlInput { throttle: seg.throttle, steer: seg.steer };
        }
        start += seg.ticks;
    }
    plan.last()
        .map(|s| ControlInput { throttle: s.throttle, steer: s.steer })
        .unwrap_or_default()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> SimResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("🚀 Starting raycar simulation...");

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(&path)?,
        None => {
            let cfg = SimConfig::default();
            cfg.validate()?;
            cfg
        }
    };
    let dt = config.dt();

    let mut world = PhysicsWorld::new(&config.world);
    let mut rng = StdRng::seed_from_u64(config.world.forest.seed);
    scatter_props(&mut world, &config.world.forest, &mut rng)?;

    let body = world.spawn_car(&config.car, config.world.spawn_position);
    let mut car = CarController::new(config.car.clone(), body);
    let mut speedometer = Speedometer::new(config.speedometer.clone());
    let mut overlay = DebugOverlay::default();

    let mut ticker = interval(Duration::from_secs_f32(dt));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut tick: u64 = 0;
    loop {
        if config.run.duration_ticks > 0 && tick >= config.run.duration_ticks {
            break;
        }

        if config.run.realtime {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => {
                    warn!("🛑 Interrupted at tick {}", tick);
                    break;
                }
            }
        }

        // 1) Driver intent (no physics)
        car.set_target(planned_input(&config.run.drive_plan, tick));
        car.update_input(dt);

        // 2) Suspension + grip + drive forces
        world.begin_step();
        let report = car.fixed_step(&mut world);

        // 3) Integrate
        world.step(dt);

        let chassis = world.body(body)?;
        let needle = speedometer.update(chassis.linvel().norm(), dt);

        tick += 1;
        if config.run.snapshot_every > 0 && tick % config.run.snapshot_every == 0 {
            let mut snapshot = VehicleSnapshot::capture(
                tick,
                chassis,
                car.throttle(),
                car.steer_angle(),
                needle,
                report.wheels,
            );
            if config.run.debug_overlay {
                overlay.clear();
                for (id, mount, solution) in &report.solutions {
                    overlay.push_wheel(*id, mount, solution);
                }
                snapshot = snapshot.with_debug(overlay.rays.clone());
            }
            info!("{}", snapshot.to_json());
        }
    }

    info!("🏁 Finished after {} ticks", tick);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_walks_segments_then_holds_last() {
        let plan = [
            DriveSegment { ticks: 2, throttle: 0.0, steer: 0.0 },
            DriveSegment { ticks: 3, throttle: 1.0, steer: 0.5 },
        ];
        assert_eq!(planned_input(&plan, 0).throttle, 0.0);
        assert_eq!(planned_input(&plan, 2).throttle, 1.0);
        assert_eq!(planned_input(&plan, 4).steer, 0.5);
        assert_eq!(planned_input(&plan, 99).throttle, 1.0);
        assert_eq!(planned_input(&[], 5), ControlInput::default());
    }
}
