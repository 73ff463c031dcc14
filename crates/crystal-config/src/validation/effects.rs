//! Effect parameter and bloom validation.

use crate::schema::CrystalConfig;

use super::helpers::check_range;

/// Validate effect parameters. Disabled effects are still checked so a
/// later toggle does not surface a stale bad value.
pub(crate) fn validate_effects(errors: &mut Vec<String>, config: &CrystalConfig) {
    let effects = &config.effects;
    check_range(errors, "effects.fresnel.power", effects.fresnel.power, 0.1..=20.0);
    check_range(errors, "effects.dispersion.strength", effects.dispersion.strength, 0.0..=1.0);
    check_range(errors, "effects.specular.strength", effects.specular.strength, 0.0..=10.0);
    check_range(errors, "effects.glitter.density", effects.glitter.density, 1.0..=10000.0);
}

pub(crate) fn validate_bloom(errors: &mut Vec<String>, config: &CrystalConfig) {
    check_range(errors, "bloom.threshold", config.bloom.threshold, 0.0..=1.0);
    check_range(errors, "bloom.intensity", config.bloom.intensity, 0.0..=5.0);
}
