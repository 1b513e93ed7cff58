// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

/// Casas decimais das colunas `weight` (NUMERIC(12, 3)).
pub const WEIGHT_SCALE: u32 = 3;

// ---
// Validações customizadas reaproveitadas pelos payloads
// ---
pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Must be a positive number.".into());
        return Err(err);
    }
    Ok(())
}

/// O banco arredondaria silenciosamente além de 3 casas (0.0004 viraria 0.000).
pub fn exceeds_weight_scale(val: &Decimal) -> bool {
    val.normalize().scale() > WEIGHT_SCALE
}

pub fn validate_weight(val: &Decimal) -> Result<(), ValidationError> {
    validate_positive(val)?;
    if exceeds_weight_scale(val) {
        let mut err = ValidationError::new("scale");
        err.add_param("max_decimals".into(), &WEIGHT_SCALE);
        err.message = Some("Weight can have at most 3 decimal places.".into());
        return Err(err);
    }
    Ok(())
}
