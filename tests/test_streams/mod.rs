use kalmansmooth::host::{Command, FilterRegistry, InstanceId, Outlet};
use kalmansmooth::simulation::{NoiseConfig, TruthSignal, apply_noise};

/// Noisy samples around a constant level, reproducible for a given seed
#[allow(dead_code)]
pub fn noisy_constant(level: f64, std_dev: f64, len: usize, seed: u64) -> Vec<f64> {
    let truth = TruthSignal::Constant { level }.generate(len);
    let noise = NoiseConfig::default().with_seed(seed).with_gaussian(std_dev);
    apply_noise(&truth, &noise).expect("valid noise config")
}

/// Truth and noisy samples of a step with occasional impulses
#[allow(dead_code)]
pub fn noisy_step_with_impulses(len: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let truth = TruthSignal::Step {
        before: -2.0,
        after: 3.0,
        at: len / 2,
    }
    .generate(len);
    let noise = NoiseConfig::default()
        .with_seed(seed)
        .with_gaussian(0.4)
        .with_impulse(0.02, 6.0);
    let noisy = apply_noise(&truth, &noise).expect("valid noise config");
    (truth, noisy)
}

/// Run a script of host messages, collecting values from the filter outlet
#[allow(dead_code)]
pub fn run_script(registry: &mut FilterRegistry, id: InstanceId, script: &str) -> Vec<f64> {
    let mut out = Vec::new();
    for line in script.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let command: Command = line.parse().expect("valid message");
        for event in registry.dispatch(id, command).expect("live instance") {
            if event.outlet == Outlet::Filter {
                out.push(event.value);
            }
        }
    }
    out
}
