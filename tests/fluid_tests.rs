// Host-side tests for the fluid solver: pass schedule, buffer parity, the
// splat driver and the CPU reference kernels.

use fx_core::constants::*;
use fx_core::fluid::{
    run_step, step_schedule, CpuFluid, DoubleBuffer, FluidBackend, FluidConfig, FluidController, Pass,
    Splat, SplatDriver,
};
use fx_core::parse_config;
use glam::Vec2;

/// Backend that only records which passes ran and tracks slot parity.
struct Recorder {
    ops: Vec<&'static str>,
    velocity: DoubleBuffer<u8>,
    pressure: DoubleBuffer<u8>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            ops: Vec::new(),
            velocity: DoubleBuffer::new(0, 1),
            pressure: DoubleBuffer::new(0, 1),
        }
    }
}

impl FluidBackend for Recorder {
    fn splat(&mut self, _splat: Splat, _radius: f32) {
        self.ops.push("splat");
        self.velocity.swap();
    }
    fn advect(&mut self, _dt: f32, _dissipation: f32) {
        self.ops.push("advect");
        self.velocity.swap();
    }
    fn divergence(&mut self) {
        self.ops.push("divergence");
    }
    fn relax_pressure(&mut self) {
        self.ops.push("pressure");
        self.pressure.swap();
    }
    fn subtract_gradient(&mut self) {
        self.ops.push("gradient");
        self.velocity.swap();
    }
}

#[test]
fn schedule_order_with_splat() {
    let passes = step_schedule(20, true);
    assert_eq!(passes.len(), 24);
    assert_eq!(passes[0], Pass::Splat);
    assert_eq!(passes[1], Pass::Advect);
    assert_eq!(passes[2], Pass::Divergence);
    assert_eq!(passes[3], Pass::Pressure(0));
    assert_eq!(passes[22], Pass::Pressure(19));
    assert_eq!(passes[23], Pass::SubtractGradient);
}

#[test]
fn schedule_without_splat() {
    let passes = step_schedule(5, false);
    assert_eq!(passes.len(), 8);
    assert!(!passes.contains(&Pass::Splat));
    assert_eq!(passes.iter().filter(|p| matches!(p, Pass::Pressure(_))).count(), 5);
}

#[test]
fn only_divergence_keeps_its_buffer() {
    assert!(Pass::Splat.swaps());
    assert!(Pass::Advect.swaps());
    assert!(!Pass::Divergence.swaps());
    assert!(Pass::Pressure(3).swaps());
    assert!(Pass::SubtractGradient.swaps());
}

#[test]
fn swap_turns_write_into_read() {
    let mut buf = DoubleBuffer::new('a', 'b');
    for step in 1..=9u64 {
        let written = *buf.write();
        buf.swap();
        assert_eq!(*buf.read(), written);
        assert_eq!(buf.read_index() as u64, step % 2);
        assert_eq!(buf.swap_count(), step);
    }
}

#[test]
fn split_borrows_read_and_write() {
    let mut buf = DoubleBuffer::new(vec![1, 2], vec![0, 0]);
    {
        let (read, write) = buf.split();
        write.copy_from_slice(read);
        write[0] = 10;
    }
    buf.swap();
    assert_eq!(buf.read(), &vec![10, 2]);
    let (read, write) = buf.split();
    assert_eq!(read, &vec![10, 2]);
    assert_eq!(write, &mut vec![1, 2]);
}

#[test]
fn run_step_follows_schedule() {
    let cfg = FluidConfig {
        pressure_iterations: 3,
        ..Default::default()
    };
    let mut rec = Recorder::new();
    let splat = Splat {
        point: Vec2::splat(0.5),
        force: Vec2::new(1.0, 0.0),
    };
    run_step(&mut rec, Some(splat), 0.016, &cfg);
    assert_eq!(
        rec.ops,
        [
            "splat",
            "advect",
            "divergence",
            "pressure",
            "pressure",
            "pressure",
            "gradient"
        ]
    );
    // splat + advect + gradient
    assert_eq!(rec.velocity.swap_count(), 3);
    assert_eq!(rec.velocity.read_index(), 1);
    assert_eq!(rec.pressure.swap_count(), 3);
}

#[test]
fn velocity_parity_alternates_per_step() {
    let cfg = FluidConfig::default();
    let mut rec = Recorder::new();
    for step in 1..=4 {
        run_step(&mut rec, None, 0.016, &cfg);
        // advect + gradient: two swaps per step without a splat.
        assert_eq!(rec.velocity.swap_count(), 2 * step);
        assert_eq!(rec.velocity.read_index(), 0);
    }
}

#[test]
fn stationary_pointer_never_splats() {
    let mut driver = SplatDriver::new(&FluidConfig::default());
    for _ in 0..120 {
        assert!(driver.next().is_none());
    }
    driver.set_pointer(Vec2::splat(0.5));
    assert!(driver.next().is_none());
}

#[test]
fn splat_force_scales_with_swipe_speed() {
    let cfg = FluidConfig::default();
    let mut slow = SplatDriver::new(&cfg);
    let mut fast = SplatDriver::new(&cfg);
    slow.set_pointer(Vec2::new(0.6, 0.5));
    fast.set_pointer(Vec2::new(0.9, 0.5));
    let a = slow.next().unwrap();
    let b = fast.next().unwrap();
    assert!((b.force.length() / a.force.length() - 4.0).abs() < 1e-3);
    assert!(b.force.x > 0.0);
    assert_eq!(b.point, fast.smoothed());
}

#[test]
fn non_finite_pointer_is_ignored() {
    let mut driver = SplatDriver::new(&FluidConfig::default());
    driver.set_pointer(Vec2::new(f32::NAN, 0.2));
    assert!(driver.next().is_none());
    assert_eq!(driver.smoothed(), Vec2::splat(0.5));
}

#[test]
fn controller_clamps_dt_and_accumulates_time() {
    let mut ctl = FluidController::new(FluidConfig::default());
    let mut rec = Recorder::new();
    let f = ctl.frame(&mut rec, 1.0);
    assert_eq!(f.dt, FLUID_MAX_DT);
    let f = ctl.frame(&mut rec, f32::NAN);
    assert_eq!(f.dt, 0.0);
    let f = ctl.frame(&mut rec, 0.01);
    assert!((f.time - (FLUID_MAX_DT + 0.01)).abs() < 1e-6);
    assert!(f.splat.is_none());
}

#[test]
fn controller_passes_splats_through() {
    let mut ctl = FluidController::new(FluidConfig::default());
    let mut rec = Recorder::new();
    ctl.set_pointer(Vec2::new(0.9, 0.1));
    let f = ctl.frame(&mut rec, 0.016);
    assert!(f.splat.is_some());
    assert_eq!(rec.ops[0], "splat");
    assert_eq!(f.pointer, f.splat.unwrap().point);
}

#[test]
fn cpu_splat_peaks_at_the_point() {
    let mut fluid = CpuFluid::new(32);
    fluid.splat(
        Splat {
            point: Vec2::new(0.25, 0.75),
            force: Vec2::new(3.0, 0.0),
        },
        FLUID_SPLAT_RADIUS,
    );
    let (i, j) = fluid.peak_cell();
    assert!((7..=8).contains(&i), "peak column {i}");
    assert!((23..=24).contains(&j), "peak row {j}");
    assert!(fluid.velocity_at(i, j).x > 1.5);
    assert_eq!(fluid.velocity_field().swap_count(), 1);
}

#[test]
fn projection_reduces_divergence() {
    let mut fluid = CpuFluid::new(32);
    fluid.splat(
        Splat {
            point: Vec2::splat(0.5),
            force: Vec2::new(5.0, 0.0),
        },
        FLUID_SPLAT_RADIUS,
    );
    let before = fluid.total_divergence();
    assert!(before > 0.0);
    fluid.divergence();
    for _ in 0..FLUID_PRESSURE_ITERATIONS {
        fluid.relax_pressure();
    }
    fluid.subtract_gradient();
    let after = fluid.total_divergence();
    assert!(after < before * 0.8, "divergence {before} -> {after}");
}

#[test]
fn energy_decays_without_input() {
    let cfg = FluidConfig::default();
    let mut fluid = CpuFluid::new(32);
    fluid.splat(
        Splat {
            point: Vec2::splat(0.5),
            force: Vec2::new(5.0, 0.0),
        },
        cfg.splat_radius,
    );
    let mut last = fluid.kinetic_energy();
    for _ in 0..30 {
        run_step(&mut fluid, None, 0.016, &cfg);
        let e = fluid.kinetic_energy();
        assert!(e <= last + 1e-4, "energy rose {last} -> {e}");
        last = e;
    }
    assert!(last.is_finite());
}

#[test]
fn empty_field_stays_empty() {
    let mut fluid = CpuFluid::new(16);
    run_step(&mut fluid, None, FLUID_MAX_DT, &FluidConfig::default());
    assert_eq!(fluid.kinetic_energy(), 0.0);
    assert_eq!(fluid.total_divergence(), 0.0);
}

#[test]
fn paint_is_rgba_at_sim_resolution() {
    let mut fluid = CpuFluid::new(16);
    let mut pixels = Vec::new();
    fluid.paint_rgba(&mut pixels);
    assert_eq!(pixels.len(), 16 * 16 * 4);
    assert!(pixels.chunks(4).all(|px| px[3] == 0));

    fluid.splat(
        Splat {
            point: Vec2::splat(0.5),
            force: Vec2::new(2.0, 0.0),
        },
        FLUID_SPLAT_RADIUS,
    );
    fluid.paint_rgba(&mut pixels);
    assert_eq!(pixels.len(), 16 * 16 * 4);
    assert!(pixels.chunks(4).any(|px| px[3] > 0));

    fluid.reset();
    assert_eq!(fluid.kinetic_energy(), 0.0);
}

#[test]
fn config_exposes_solver_tradeoffs() {
    let cfg: FluidConfig = parse_config(Some(r#"{"pressureIterations": 40, "simResolution": 64}"#)).unwrap();
    assert_eq!(cfg.pressure_iterations, 40);
    assert_eq!(cfg.sim_resolution, 64);
    assert!(parse_config::<FluidConfig>(Some(r#"{"pressureIterations": 0}"#)).is_err());
    assert!(parse_config::<FluidConfig>(Some(r#"{"simResolution": 4}"#)).is_err());
    assert!(parse_config::<FluidConfig>(Some(r#"{"dissipation": 1.0}"#)).is_err());
}

#[test]
fn pressure_is_warm_started_between_steps() {
    let cfg = FluidConfig {
        pressure_iterations: 4,
        ..Default::default()
    };
    let mut fluid = CpuFluid::new(16);
    let splat = Splat {
        point: Vec2::splat(0.5),
        force: Vec2::new(4.0, 0.0),
    };
    run_step(&mut fluid, Some(splat), 0.016, &cfg);
    assert!(fluid.divergence_field().iter().any(|d| d.abs() > 0.0));
    assert!(fluid.pressure_field().read().iter().any(|p| p.abs() > 0.0));
    assert_eq!(fluid.pressure_field().swap_count(), 4);

    // The next step starts from the previous pressure instead of zero.
    run_step(&mut fluid, None, 0.016, &cfg);
    assert_eq!(fluid.pressure_field().swap_count(), 8);

    fluid.reset();
    assert_eq!(fluid.pressure_field().swap_count(), 0);
    assert!(fluid.pressure_field().read().iter().all(|p| *p == 0.0));
    assert!(fluid.divergence_field().iter().all(|d| *d == 0.0));
}

#[test]
fn splat_is_round_on_wide_surfaces() {
    let center = Vec2::splat(8.5 / 16.0);
    let splat = Splat {
        point: center,
        force: Vec2::new(1.0, 0.0),
    };

    let mut square = CpuFluid::new(16);
    square.splat(splat, 0.05);
    let (across, down) = (square.velocity_at(12, 8).x, square.velocity_at(8, 12).x);
    assert!((across - down).abs() < 1e-6);

    // Twice as wide as tall: four cells across cover the distance of eight
    // cells down, so the impulse falls off faster along x.
    let mut wide = CpuFluid::new(16);
    wide.set_aspect(2.0);
    assert_eq!(wide.aspect(), 2.0);
    wide.splat(splat, 0.05);
    let (across, down) = (wide.velocity_at(12, 8).x, wide.velocity_at(8, 12).x);
    assert!(across < down * 0.1);
    assert!((wide.velocity_at(8, 8).x - 1.0).abs() < 1e-6);

    for bad in [0.0, -1.5, f32::NAN, f32::INFINITY] {
        wide.set_aspect(bad);
        assert_eq!(wide.aspect(), 2.0);
    }
}
