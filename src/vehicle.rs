// ==============================================================================
// vehicle.rs — FOUR-WHEEL CAR CONTROLLER
// ------------------------------------------------------------------------------
// Owns the wheel mounts and driver state of one car and runs the suspension
// solver for every wheel each fixed step.
//
// Per step:
// 1) update_input(dt): smooth throttle + steering toward the targets
// 2) fixed_step(host):
//      - mounts -> world space using the chassis pose
//      - front mounts yawed by the steering angle (positive = right)
//      - solve every wheel (front wheels driven by throttle * power)
//      - forward every force contribution to the host
//      - update cosmetic wheel offsets (kept while airborne)
// ==============================================================================

use rapier3d::prelude::{Point, Real, Vector};
use serde::Serialize;

use crate::config::CarConfig;
use crate::host::PhysicsHost;
use crate::smoothing::Smoothed;
use crate::suspension::{solve_wheel, SuspensionParams, WheelId, WheelMount, WheelSolution};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    pub throttle: Real, // -1..1
    pub steer: Real,    // -1..1, positive = right
}

#[derive(Debug, Clone)]
pub struct Wheel {
    pub id: WheelId,
    pub mount: WheelMount, // chassis space
    pub visual_offset: Real,
}

#[derive(Debug, Clone, Serialize)]
pub struct WheelReport {
    pub id: WheelId,
    pub grounded: bool,
    pub compression: Real,
    pub slip_lateral: Real,
    pub visual_offset: Real,
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub wheels: Vec<WheelReport>,
    pub solutions: Vec<(WheelId, WheelMount, WheelSolution)>, // world-space mounts, for debug drawing
}

impl StepReport {
    pub fn grounded_count(&self) -> usize {
        self.wheels.iter().filter(|w| w.grounded).count()
    }
}

pub struct CarController<B> {
    pub body: B,
    pub config: CarConfig,
    pub wheels: Vec<Wheel>,
    pub target: ControlInput,
    throttle: Smoothed,
    steer_angle: Smoothed, // radians
}

impl<B: Copy> CarController<B> {
    pub fn new(config: CarConfig, body: B) -> Self {
        let wheels = WheelId::ALL
            .iter()
            .zip(config.mount_offsets.iter())
            .map(|(&id, o)| Wheel {
                id,
                mount: WheelMount {
                    origin: Point::new(o[0], o[1], o[2]),
                    up: Vector::y(),
                    forward: Vector::z(),
                    probe_length: config.suspension_length,
                },
                visual_offset: config.wheel_visual_lift - config.suspension_length,
            })
            .collect();

        Self {
            body,
            config,
            wheels,
            target: ControlInput::default(),
            throttle: Smoothed::new(0.0),
            steer_angle: Smoothed::new(0.0),
        }
    }

    pub fn set_target(&mut self, input: ControlInput) {
        self.target = ControlInput {
            throttle: input.throttle.clamp(-1.0, 1.0),
            steer: input.steer.clamp(-1.0, 1.0),
        };
    }

    pub fn throttle(&self) -> Real {
        self.throttle.value
    }

    pub fn steer_angle(&self) -> Real {
        self.steer_angle.value
    }

    pub fn update_input(&mut self, dt: Real) {
        let t = self.config.input_smooth_time;
        self.throttle.update(self.target.throttle, t, dt);
        self.steer_angle
            .update(self.target.steer * self.config.max_steer_angle, t, dt);
    }

    fn params_for(&self, id: WheelId) -> SuspensionParams {
        let drive = if id.is_front() { self.throttle.value * self.config.power } else { 0.0 };
        SuspensionParams {
            rest_length: self.config.suspension_length,
            spring_strength: self.config.suspension_strength,
            grip_coefficient: self.config.grip_amount,
            drive_force: drive,
        }
    }

    pub fn fixed_step<H>(&mut self, host: &mut H) -> StepReport
    where
        H: PhysicsHost<Body = B>,
    {
        let pose = host.body_pose(self.body);

        let mut report = StepReport {
            wheels: Vec::with_capacity(self.wheels.len()),
            solutions: Vec::with_capacity(self.wheels.len()),
        };

        for i in 0..self.wheels.len() {
            let id = self.wheels[i].id;
            let mut mount = self.wheels[i].mount.to_world(&pose);
            if id.is_front() {
                // right turn yaws toward -X for a +Z-forward chassis
                mount = mount.steered(-self.steer_angle.value);
            }

            let params = self.params_for(id);
            let solution = solve_wheel(&*host, self.body, &mount, &params);

            for f in &solution.forces {
                host.apply_force(self.body, *f);
            }

            let wheel = &mut self.wheels[i];
            if let Some(travel) = solution.visual_travel() {
                wheel.visual_offset = -travel + self.config.wheel_visual_lift;
            }

            let (compression, slip_lateral) = solution
                .contact
                .map(|c| (c.compression, c.slip_lateral))
                .unwrap_or((0.0, 0.0));

            report.wheels.push(WheelReport {
                id,
                grounded: solution.grounded(),
                compression,
                slip_lateral,
                visual_offset: wheel.visual_offset,
            });
            report.solutions.push((id, mount, solution));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::FlatGround;
    use crate::suspension::ForceMode;
    use rapier3d::prelude::Isometry;

    fn car() -> CarController<u32> {
        CarController::new(CarConfig::default(), 0)
    }

    #[test]
    fn airborne_car_applies_nothing() {
        let mut ground = FlatGround::at(0.0);
        ground.pose = Isometry::translation(0.0, 10.0, 0.0);
        let mut car = car();
        let report = car.fixed_step(&mut ground);
        assert!(ground.applied.is_empty());
        assert_eq!(report.grounded_count(), 0);
        // cosmetic offset stays at full droop
        let lift = car.config.wheel_visual_lift;
        assert!(car.wheels.iter().all(|w| (w.visual_offset - (lift - 1.0)).abs() < 1e-6));
    }

    #[test]
    fn grounded_car_gets_spring_and_contact_per_wheel() {
        let mut ground = FlatGround::at(0.0);
        ground.pose = Isometry::translation(0.0, 0.7, 0.0); // mounts at y = 0.5
        let mut car = car();
        let report = car.fixed_step(&mut ground);

        assert_eq!(report.grounded_count(), 4);
        assert_eq!(ground.applied.len(), 8);

        let springs: Vec<_> = ground.applied.iter().filter(|f| f.mode == ForceMode::Force).collect();
        assert_eq!(springs.len(), 4);
        for s in springs {
            assert!((s.force.y - 0.25 * car.config.suspension_strength).abs() < 1e-2);
        }
        for w in &car.wheels {
            assert!((w.visual_offset - (-0.5 + car.config.wheel_visual_lift)).abs() < 1e-5);
        }
    }

    #[test]
    fn only_front_wheels_drive() {
        let mut ground = FlatGround::at(0.0);
        ground.pose = Isometry::translation(0.0, 0.7, 0.0);
        let mut car = car();
        car.set_target(ControlInput { throttle: 1.0, steer: 0.0 });
        for _ in 0..120 {
            car.update_input(1.0 / 60.0);
        }
        assert!(car.throttle() > 0.95);

        car.fixed_step(&mut ground);
        let drives: Vec<_> = ground
            .applied
            .iter()
            .filter(|f| f.mode == ForceMode::Acceleration)
            .map(|f| f.force.z)
            .collect();
        assert_eq!(drives.len(), 4);
        assert!(drives[0] > 3.5 && drives[1] > 3.5);
        assert_eq!(drives[2], 0.0);
        assert_eq!(drives[3], 0.0);
    }

    #[test]
    fn right_steer_yaws_front_drive_toward_negative_x() {
        let mut ground = FlatGround::at(0.0);
        ground.pose = Isometry::translation(0.0, 0.7, 0.0);
        let mut car = car();
        car.set_target(ControlInput { throttle: 1.0, steer: 1.0 });
        for _ in 0..240 {
            car.update_input(1.0 / 60.0);
        }
        assert!((car.steer_angle() - car.config.max_steer_angle).abs() < 1e-3);

        car.fixed_step(&mut ground);
        let front = ground.applied[0].force;
        assert!(front.x < -1.0 && front.z > 1.0, "{front:?}");
    }

    #[test]
    fn mounts_follow_configured_offsets() {
        let car = car();
        for (wheel, o) in car.wheels.iter().zip(car.config.mount_offsets.iter()) {
            assert_eq!(wheel.mount.origin, Point::new(o[0], o[1], o[2]));
            assert_eq!(wheel.mount.up, Vector::y());
            assert_eq!(wheel.mount.forward, Vector::z());
            assert_eq!(wheel.mount.probe_length, car.config.suspension_length);
        }
        assert_eq!(car.wheels[0].id, WheelId::FL);
        assert_eq!(car.wheels[3].id, WheelId::RR);
    }

    #[test]
    fn inputs_are_clamped() {
        let mut car = CarController::new(CarConfig::default(), 0u32);
        car.set_target(ControlInput { throttle: 3.0, steer: -9.0 });
        assert_eq!(car.target, ControlInput { throttle: 1.0, steer: -1.0 });
    }
}
