/// One explicit Euler step of `dx/dt = derivative(x)`.
pub fn euler_step(x: f64, time_step: f64, derivative: impl Fn(f64) -> f64) -> f64 {
    x + time_step * derivative(x)
}

pub fn membrane_voltage_derivative(
    voltage: f64,
    total_input: f64,
    leak_potential: f64,
    tau_membrane: f64,
) -> f64 {
    (leak_potential - voltage + total_input) / tau_membrane
}

pub fn decay_derivative(x: f64, tau: f64) -> f64 {
    -x / tau
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn voltage_relaxes_towards_leak() {
        let v = euler_step(-70.0, 1.0, |v| {
            membrane_voltage_derivative(v, 0.0, -60.0, 20.0)
        });
        assert_approx_eq!(f64, v, -70.0 + 10.0 / 20.0);
    }

    #[test]
    fn input_shifts_fixed_point() {
        let v = euler_step(-50.0, 0.5, |v| {
            membrane_voltage_derivative(v, 10.0, -60.0, 10.0)
        });
        assert_approx_eq!(f64, v, -50.0);
    }

    #[test]
    fn single_evaluation_per_step() {
        let calls = std::cell::Cell::new(0);
        euler_step(1.0, 0.1, |x| {
            calls.set(calls.get() + 1);
            decay_derivative(x, 3.0)
        });
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn exponential_decay() {
        let mut g = 1.0;
        for _ in 0..10 {
            g = euler_step(g, 1.0, |g| decay_derivative(g, 4.0));
        }
        assert_approx_eq!(f64, g, 0.75f64.powi(10), epsilon = 1e-12);
    }
}
