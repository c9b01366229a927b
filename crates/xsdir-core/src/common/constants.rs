//! Physical constants and fixed tolerances used while building property
//! records.

/// Neutron rest mass in atomic mass units (CODATA 2018).
pub const NEUTRON_REST_MASS_AMU: f64 = 1.008_664_915_88_f64;

/// Boltzmann constant in MeV/K (CODATA 2018).
pub const BOLTZMANN_CONSTANT_MEV_PER_K: f64 = 8.617_333_262e-11_f64;

/// Relative error below which two evaluation temperatures are the same.
pub const EVALUATION_TEMP_RELATIVE_TOLERANCE: f64 = 1.0e-9;

/// Exclusive bounds on the leading ZAID of an atomic weight ratio line.
pub const AWR_ENTRY_MIN_EXCLUSIVE_ZAID: u32 = 1;
pub const AWR_ENTRY_MAX_EXCLUSIVE_ZAID: u32 = 101_000;

/// Photoatomic versions whose tables also carry electron data.
pub const COMBINED_PHOTOATOMIC_VERSIONS: [u32; 2] = [12, 14];

pub fn temperature_in_kelvin(evaluation_temp_in_mev: f64) -> f64 {
    evaluation_temp_in_mev / BOLTZMANN_CONSTANT_MEV_PER_K
}

pub fn temperature_in_mev(temperature_in_kelvin: f64) -> f64 {
    temperature_in_kelvin * BOLTZMANN_CONSTANT_MEV_PER_K
}

/// Relative comparison used for evaluation temperatures. Two zeros compare
/// equal.
pub fn relative_error_equal(first: f64, second: f64, tolerance: f64) -> bool {
    if first == second {
        return true;
    }
    let scale = first.abs().max(second.abs());
    (first - second).abs() <= tolerance * scale
}

#[cfg(test)]
mod tests {
    use super::{
        BOLTZMANN_CONSTANT_MEV_PER_K, EVALUATION_TEMP_RELATIVE_TOLERANCE, NEUTRON_REST_MASS_AMU,
        relative_error_equal, temperature_in_kelvin, temperature_in_mev,
    };

    #[test]
    fn room_temperature_round_trips_through_kelvin() {
        let room_temp_mev = 2.5301e-8;
        let kelvin = temperature_in_kelvin(room_temp_mev);

        assert!((kelvin - 293.6).abs() < 0.1, "got {kelvin}");
        assert!((temperature_in_mev(kelvin) - room_temp_mev).abs() <= 1.0e-20);
    }

    #[test]
    fn constants_remain_finite_and_positive() {
        for value in [
            NEUTRON_REST_MASS_AMU,
            BOLTZMANN_CONSTANT_MEV_PER_K,
            EVALUATION_TEMP_RELATIVE_TOLERANCE,
        ] {
            assert!(value.is_finite());
            assert!(value > 0.0);
        }
    }

    #[test]
    fn relative_comparison_respects_tolerance() {
        assert!(relative_error_equal(0.0, 0.0, 1.0e-9));
        assert!(relative_error_equal(2.5301e-8, 2.5301e-8 * (1.0 + 1.0e-10), 1.0e-9));
        assert!(!relative_error_equal(2.5301e-8, 2.5302e-8, 1.0e-9));
        assert!(!relative_error_equal(0.0, 1.0e-12, 1.0e-9));
    }
}
